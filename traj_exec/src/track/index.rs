//! # Spatial query index
//!
//! A planar nearest-neighbour index over every band point of a
//! [`TrackModel`]. Built once, read-only afterwards, and therefore safe to
//! share between any number of concurrent readers.
//!
//! The altitude and slope queries average over the `k` nearest band points.
//! Note the vertical angle is the origin-relative `asin(z / rho)` proxy used
//! by the strategy tooling, not a geodesic slope, and the containment check
//! is a coarse componentwise heuristic over the boundary samples, not true
//! polygon containment.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use nalgebra::Vector3;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::Deserialize;

use super::model::{TrackError, TrackModel};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the spatial query index
#[derive(Deserialize, Debug, Clone)]
pub struct TrackIndexParams {
    /// Number of band points averaged by the altitude and vertical angle
    /// queries.
    pub num_query_neighbours: usize,
}

/// A single band point held by the index.
///
/// The R-tree searches on the 2D projection; the full 3D coordinate is kept
/// so height data can be recovered from planar queries.
#[derive(Debug, Clone, Copy)]
pub struct BandPoint {
    pub point_m: Vector3<f64>,
}

/// The spatial query index over a track model.
///
/// Owns the model: after construction the rest of the system only sees the
/// track through this index.
pub struct TrackIndex {
    tree: RTree<BandPoint>,
    model: TrackModel,
    params: TrackIndexParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for TrackIndexParams {
    fn default() -> Self {
        Self {
            num_query_neighbours: 4,
        }
    }
}

impl RTreeObject for BandPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point_m[0], self.point_m[1]])
    }
}

impl PointDistance for BandPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point_m[0] - point[0];
        let dy = self.point_m[1] - point[1];
        dx * dx + dy * dy
    }
}

impl TrackIndex {
    /// Build the index over all band points of the given model.
    ///
    /// The altitude and slope queries average over
    /// `params.num_query_neighbours` points, so it must be at least one.
    pub fn new(model: TrackModel, params: TrackIndexParams) -> Result<Self, TrackError> {
        if params.num_query_neighbours == 0 {
            return Err(TrackError::NoQueryNeighbours);
        }

        let points: Vec<BandPoint> = model
            .bands()
            .flat_map(|band| band.points_m.iter())
            .map(|point_m| BandPoint {
                point_m: *point_m,
            })
            .collect();

        let tree = RTree::bulk_load(points);

        Ok(Self {
            tree,
            model,
            params,
        })
    }

    /// The track model backing this index.
    pub fn model(&self) -> &TrackModel {
        &self.model
    }

    /// The `k` nearest band points to `(x, y)` by planar Euclidean distance.
    pub fn nearest_k(&self, x_m: f64, y_m: f64, k: usize) -> Vec<&BandPoint> {
        self.tree
            .nearest_neighbor_iter(&[x_m, y_m])
            .take(k)
            .collect()
    }

    /// Track altitude at `(x, y)`: the mean height of the nearest band
    /// points.
    pub fn altitude_m(&self, x_m: f64, y_m: f64) -> f64 {
        let neighbours = self.nearest_k(x_m, y_m, self.params.num_query_neighbours);

        neighbours.iter().map(|bp| bp.point_m[2]).sum::<f64>() / neighbours.len() as f64
    }

    /// Approximate local slope at `(x, y)`: the mean of `asin(z / rho)` over
    /// the nearest band points, `rho` being each point's distance from the
    /// coordinate origin.
    pub fn vertical_angle_rad(&self, x_m: f64, y_m: f64) -> f64 {
        let neighbours = self.nearest_k(x_m, y_m, self.params.num_query_neighbours);

        let total: f64 = neighbours
            .iter()
            .map(|bp| {
                let rho = bp.point_m.norm();
                if rho > 0.0 {
                    clamped_asin(bp.point_m[2] / rho)
                } else {
                    // A band point at the origin has no defined slope
                    0.0
                }
            })
            .sum();

        total / neighbours.len() as f64
    }

    /// Whether `(x, y)` lies within the track boundaries.
    ///
    /// Scans the pre-subdivision boundary pairs: the point is in bounds as
    /// soon as some pair is found where it is neither componentwise inside
    /// the inner sample nor componentwise outside the outer sample. Coarse
    /// and non-convex, but cheap.
    pub fn within_bounds(&self, x_m: f64, y_m: f64) -> bool {
        let x_sq = x_m * x_m;
        let y_sq = y_m * y_m;

        for (inner, outer) in self.model.boundary_pairs() {
            let inside_inner = inner[0] * inner[0] > x_sq && inner[1] * inner[1] > y_sq;
            let outside_outer = outer[0] * outer[0] < x_sq && outer[1] * outer[1] < y_sq;

            if !(inside_inner || outside_outer) {
                return true;
            }
        }

        false
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// `asin` with its argument clamped into `[-1, 1]`.
///
/// Floating round-off can push the height ratio marginally out of the asin
/// domain. Clamping is deterministic; the degraded precision is logged
/// rather than silently ignored.
fn clamped_asin(ratio: f64) -> f64 {
    if ratio < -1.0 || ratio > 1.0 {
        warn!(
            "Vertical angle ratio {} outside the asin domain, clamping (degraded precision)",
            ratio
        );
        ratio.clamp(-1.0, 1.0).asin()
    } else {
        ratio.asin()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    /// Straight flat track along x at the given uniform height.
    fn flat_track(height_m: f64) -> TrackIndex {
        let inner: Vec<_> = (0..=4)
            .map(|x| Vector3::new(x as f64, -1.0, height_m))
            .collect();
        let outer: Vec<_> = (0..=4)
            .map(|x| Vector3::new(x as f64, 1.0, height_m))
            .collect();

        TrackIndex::new(
            TrackModel::build(&inner, &outer).unwrap(),
            TrackIndexParams::default(),
        )
        .unwrap()
    }

    fn circle_track() -> TrackIndex {
        let inner: Vec<_> = (0..=360)
            .step_by(10)
            .map(|deg| {
                let a = (deg as f64).to_radians();
                Vector3::new(a.cos(), a.sin(), 0.0)
            })
            .collect();
        let outer: Vec<_> = (0..=360)
            .step_by(10)
            .map(|deg| {
                let a = (deg as f64).to_radians();
                Vector3::new(6.0 * a.cos(), 6.0 * a.sin(), 0.0)
            })
            .collect();

        TrackIndex::new(
            TrackModel::build(&inner, &outer).unwrap(),
            TrackIndexParams::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_query_neighbours_rejected() {
        // An average over zero neighbours would be 0/0; the parameter is
        // rejected at construction instead
        let inner: Vec<_> = (0..=4)
            .map(|x| Vector3::new(x as f64, -1.0, 0.0))
            .collect();
        let outer: Vec<_> = (0..=4).map(|x| Vector3::new(x as f64, 1.0, 0.0)).collect();

        let result = TrackIndex::new(
            TrackModel::build(&inner, &outer).unwrap(),
            TrackIndexParams {
                num_query_neighbours: 0,
            },
        );

        assert!(matches!(result, Err(TrackError::NoQueryNeighbours)));
    }

    #[test]
    fn test_nearest_k() {
        let index = flat_track(0.0);

        // The nearest band point to a spot just off the mid band is the mid
        // band point itself
        let nearest = index.nearest_k(2.1, 0.05, 1);
        assert_eq!(nearest.len(), 1);
        assert!((nearest[0].point_m - Vector3::new(2.0, 0.0, 0.0)).norm() < 1e-12);

        assert_eq!(index.nearest_k(0.0, 0.0, 4).len(), 4);
    }

    #[test]
    fn test_altitude_uniform_height() {
        let index = flat_track(5.0);

        // Every band point is at z = 5, so any average is too
        assert!((index.altitude_m(2.0, 0.0) - 5.0).abs() < 1e-12);
        assert!((index.altitude_m(-3.0, 7.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_vertical_angle_flat() {
        let index = flat_track(0.0);
        assert!(index.vertical_angle_rad(2.0, 0.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamped_asin() {
        // Marginally out-of-domain ratios clamp instead of returning NaN
        assert!((clamped_asin(1.0 + 1e-12) - FRAC_PI_2).abs() < 1e-9);
        assert!((clamped_asin(-1.0 - 1e-12) + FRAC_PI_2).abs() < 1e-9);
        assert!(clamped_asin(0.5).is_finite());
    }

    #[test]
    fn test_within_bounds_circle() {
        let index = circle_track();
        let a = 45f64.to_radians();

        // Between the boundaries: in bounds
        assert!(index.within_bounds(3.0 * a.cos(), 3.0 * a.sin()));

        // Far outside both boundaries: out of bounds
        assert!(!index.within_bounds(100.0 * a.cos(), 100.0 * a.sin()));
    }
}

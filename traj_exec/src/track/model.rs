//! # Track model
//!
//! Builds the five concentric point bands (inner, inner-quarter, mid,
//! outer-quarter, outer) from the raw boundary samples. All bands have the
//! same length and shared index correspondence: index `i` in every band is
//! the same longitudinal position around the track.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One of the five concentric point sequences spanning the track surface.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Band {
    pub points_m: Vec<Vector3<f64>>,
}

/// The dense track-surface model.
///
/// Immutable once built. The five bands are subdivided; the boundary pair
/// lists are kept at their pre-subdivision sampling for containment checks.
#[derive(Clone, Debug)]
pub struct TrackModel {
    pub inner: Band,
    pub inner_quarter: Band,
    pub mid: Band,
    pub outer_quarter: Band,
    pub outer: Band,

    /// Resampled inner boundary, before subdivision.
    inner_bound_m: Vec<Vector3<f64>>,

    /// Resampled outer boundary, before subdivision.
    outer_bound_m: Vec<Vector3<f64>>,

    /// First point of the mid band, where the vehicle starts.
    start_point_m: Vector3<f64>,

    /// 3D polyline length of the mid band.
    course_distance_m: f64,
}

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("Attempted to build a track from an empty boundary sequence")]
    EmptyBoundary,

    #[error("The outer boundary ({outer} samples) has fewer samples than the inner ({inner})")]
    TooFewOuterPoints { inner: usize, outer: usize },

    #[error("Boundary sample {index} has {found} coordinates, expected 3")]
    DimensionMismatch { index: usize, found: usize },

    #[error("num_query_neighbours must be at least 1")]
    NoQueryNeighbours,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Band {
    /// Number of points in the band.
    pub fn len(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }

    /// Quadrisect every segment of the band by inserting three collinear
    /// interior points, taking the length from `n` to `4(n - 1) + 1`.
    ///
    /// Applied once, not recursively. All five bands are subdivided with
    /// this same function so their index correspondence is preserved.
    fn subdivided(&self) -> Band {
        if self.points_m.len() < 2 {
            return self.clone();
        }

        let mut points_m = Vec::with_capacity(4 * (self.points_m.len() - 1) + 1);

        for pair in self.points_m.windows(2) {
            let mid = (pair[0] + pair[1]) / 2.0;
            points_m.push(pair[0]);
            points_m.push((pair[0] + mid) / 2.0);
            points_m.push(mid);
            points_m.push((pair[1] + mid) / 2.0);
        }
        points_m.push(self.points_m[self.points_m.len() - 1]);

        Band { points_m }
    }

    /// Sum of the 3D segment lengths of the band's polyline.
    fn polyline_length_m(&self) -> f64 {
        self.points_m
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).norm())
            .sum()
    }
}

impl TrackModel {
    /// Build the track model from the inner and outer boundary samples.
    ///
    /// The outer boundary may be sampled more densely than the inner one; it
    /// is resampled down to the inner length by nearest-index subsampling
    /// before the bands are derived.
    pub fn build(inner: &[Vector3<f64>], outer: &[Vector3<f64>]) -> Result<Self, TrackError> {
        if inner.is_empty() || outer.is_empty() {
            return Err(TrackError::EmptyBoundary);
        }
        if outer.len() < inner.len() {
            return Err(TrackError::TooFewOuterPoints {
                inner: inner.len(),
                outer: outer.len(),
            });
        }

        // Resample the outer boundary to the inner length by taking every
        // round(m/n)-th point. No interpolation at this stage. The stride
        // index is clamped so rounding can't overrun the last sample.
        let stride = ((outer.len() as f64) / (inner.len() as f64)).round() as usize;
        let outer_rs: Vec<Vector3<f64>> = (0..inner.len())
            .map(|i| outer[(stride * i).min(outer.len() - 1)])
            .collect();

        // Derive the mid and quarter bands, per index
        let mut mid = Vec::with_capacity(inner.len());
        let mut inner_quarter = Vec::with_capacity(inner.len());
        let mut outer_quarter = Vec::with_capacity(inner.len());

        for i in 0..inner.len() {
            let mid_point = (inner[i] + outer_rs[i]) / 2.0;
            inner_quarter.push((inner[i] + mid_point) / 2.0);
            outer_quarter.push((mid_point + outer_rs[i]) / 2.0);
            mid.push(mid_point);
        }

        let start_point_m = mid[0];

        // One synchronized subdivision pass over all five bands
        let mid_band = Band { points_m: mid }.subdivided();
        let course_distance_m = mid_band.polyline_length_m();

        debug!(
            "Track model built from {} boundary samples, {} points per band, course {:.2} m",
            inner.len(),
            mid_band.len(),
            course_distance_m
        );

        Ok(TrackModel {
            inner: Band {
                points_m: inner.to_vec(),
            }
            .subdivided(),
            inner_quarter: Band {
                points_m: inner_quarter,
            }
            .subdivided(),
            mid: mid_band,
            outer_quarter: Band {
                points_m: outer_quarter,
            }
            .subdivided(),
            outer: Band {
                points_m: outer_rs.clone(),
            }
            .subdivided(),
            inner_bound_m: inner.to_vec(),
            outer_bound_m: outer_rs,
            start_point_m,
            course_distance_m,
        })
    }

    /// Build the track model from raw coordinate triples, for example survey
    /// samples handed over by a telemetry collaborator.
    ///
    /// Every sample must have exactly three coordinates.
    pub fn from_raw_samples(inner: &[Vec<f64>], outer: &[Vec<f64>]) -> Result<Self, TrackError> {
        let inner = raw_to_points(inner)?;
        let outer = raw_to_points(outer)?;
        Self::build(&inner, &outer)
    }

    /// The point at which the vehicle starts, the first mid-band point.
    pub fn start_point_m(&self) -> Vector3<f64> {
        self.start_point_m
    }

    /// Total course distance to cover, the 3D length of the mid band.
    pub fn course_distance_m(&self) -> f64 {
        self.course_distance_m
    }

    /// Number of points in each (subdivided) band.
    pub fn band_len(&self) -> usize {
        self.mid.len()
    }

    /// Iterator over the five bands, innermost first.
    pub fn bands(&self) -> impl Iterator<Item = &Band> {
        vec![
            &self.inner,
            &self.inner_quarter,
            &self.mid,
            &self.outer_quarter,
            &self.outer,
        ]
        .into_iter()
    }

    /// Iterator over the pre-subdivision (inner, outer) boundary point pairs.
    pub fn boundary_pairs(&self) -> impl Iterator<Item = (&Vector3<f64>, &Vector3<f64>)> {
        self.inner_bound_m.iter().zip(self.outer_bound_m.iter())
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert raw coordinate triples into point vectors, validating the
/// per-sample dimensionality.
fn raw_to_points(raw: &[Vec<f64>]) -> Result<Vec<Vector3<f64>>, TrackError> {
    raw.iter()
        .enumerate()
        .map(|(index, sample)| {
            if sample.len() != 3 {
                Err(TrackError::DimensionMismatch {
                    index,
                    found: sample.len(),
                })
            } else {
                Ok(Vector3::new(sample[0], sample[1], sample[2]))
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    /// A circular trial track: unit-circle inner boundary, radius 6 outer
    /// boundary sampled twice as densely.
    fn circle_boundaries() -> (Vec<Vector3<f64>>, Vec<Vector3<f64>>) {
        let inner = (0..=360)
            .step_by(10)
            .map(|deg| {
                let a = (deg as f64).to_radians();
                Vector3::new(a.cos(), a.sin(), 0.1 * a.sin())
            })
            .collect();
        let outer = (0..=360)
            .step_by(5)
            .map(|deg| {
                let a = (deg as f64).to_radians();
                Vector3::new(6.0 * a.cos(), 6.0 * a.sin(), 0.1 * a.cos())
            })
            .collect();
        (inner, outer)
    }

    #[test]
    fn test_band_lengths_and_mid_average() {
        let (inner, outer) = circle_boundaries();
        let model = TrackModel::build(&inner, &outer).unwrap();

        // All five bands share the subdivided length 4(n - 1) + 1
        let expected_len = 4 * (inner.len() - 1) + 1;
        for band in model.bands() {
            assert_eq!(band.len(), expected_len);
        }

        // The mid band is the elementwise average of inner and outer. The
        // relation also survives subdivision since it is linear.
        for i in 0..expected_len {
            let avg = (model.inner.points_m[i] + model.outer.points_m[i]) / 2.0;
            assert!((model.mid.points_m[i] - avg).norm() < 1e-12);
        }
    }

    #[test]
    fn test_subdivision_collinear() {
        let (inner, outer) = circle_boundaries();
        let model = TrackModel::build(&inner, &outer).unwrap();

        // Every inserted point must lie on the segment between the original
        // points either side of it (indices 4i and 4i + 4).
        for band in model.bands() {
            for seg in band.points_m.chunks_exact(4) {
                let dir = seg[3] - seg[0];
                for point in &seg[1..] {
                    let cross = (*point - seg[0]).cross(&dir);
                    assert!(cross.norm() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_straight_course_distance() {
        // Straight flat track along x, mid band on the x axis, length 4
        let inner: Vec<_> = (0..=4)
            .map(|x| Vector3::new(x as f64, -1.0, 0.0))
            .collect();
        let outer: Vec<_> = (0..=4).map(|x| Vector3::new(x as f64, 1.0, 0.0)).collect();

        let model = TrackModel::build(&inner, &outer).unwrap();

        assert!((model.course_distance_m() - 4.0).abs() < 1e-12);
        assert!((model.start_point_m() - Vector3::new(0.0, 0.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_invalid_inputs() {
        let point = Vector3::new(1.0, 0.0, 0.0);

        assert!(matches!(
            TrackModel::build(&[], &[point]),
            Err(TrackError::EmptyBoundary)
        ));
        assert!(matches!(
            TrackModel::build(&[point], &[]),
            Err(TrackError::EmptyBoundary)
        ));
        assert!(matches!(
            TrackModel::build(&[point, point, point], &[point, point]),
            Err(TrackError::TooFewOuterPoints { inner: 3, outer: 2 })
        ));
    }

    #[test]
    fn test_raw_sample_dimension_mismatch() {
        let good = vec![vec![0.0, 0.0, 0.0], vec![1.0, 0.0, 0.0]];
        let bad = vec![vec![0.0, 0.0, 0.0], vec![1.0, 0.0]];

        assert!(matches!(
            TrackModel::from_raw_samples(&good, &bad),
            Err(TrackError::DimensionMismatch { index: 1, found: 2 })
        ));
        assert!(TrackModel::from_raw_samples(&good, &good).is_ok());
    }
}

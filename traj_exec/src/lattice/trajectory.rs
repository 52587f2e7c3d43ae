//! Trajectory output types

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One entry of the speed profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpeedPoint {
    /// Cumulative distance covered at this time step.
    pub dist_m: f64,

    /// Speed held over the step.
    pub speed_ms: f64,
}

/// An energy-minimal trajectory: the chronological path and speed profile
/// reconstructed from the cost lattice, plus the minimum total cost.
///
/// Consumed read-only by downstream collaborators (e.g. plotting).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trajectory {
    /// Planar vehicle positions, one per time step.
    pub path_m: Vec<Vector2<f64>>,

    /// Speed profile, one entry per time step.
    pub profile: Vec<SpeedPoint>,

    /// Minimum total energy cost of the trajectory.
    pub cost_j: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Trajectory {
    /// Number of time steps in the trajectory.
    pub fn num_steps(&self) -> usize {
        self.profile.len()
    }

    /// Total distance covered by the end of the trajectory.
    pub fn final_distance_m(&self) -> f64 {
        self.profile.last().map(|sp| sp.dist_m).unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_serialise() {
        let trajectory = Trajectory {
            path_m: vec![Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)],
            profile: vec![
                SpeedPoint {
                    dist_m: 0.0,
                    speed_ms: 0.0,
                },
                SpeedPoint {
                    dist_m: 1.0,
                    speed_ms: 2.0,
                },
            ],
            cost_j: 42.0,
        };

        // The trajectory is the external interface, it must serialise
        let json = serde_json::to_string_pretty(&trajectory).unwrap();
        let parsed: Trajectory = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.num_steps(), 2);
        assert!((parsed.final_distance_m() - 1.0).abs() < 1e-12);
        assert!((parsed.cost_j - 42.0).abs() < 1e-12);
    }
}

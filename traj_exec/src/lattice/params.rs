//! Lattice optimizer parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the lattice optimizer
#[derive(Deserialize, Debug, Clone)]
pub struct LatticeParams {
    /// Number of discrete time steps in the search lattice.
    pub num_time_steps: usize,

    /// Number of integer speed levels, starting at zero.
    pub num_speed_levels: usize,

    /// Number of steering angle samples per transition.
    pub num_steer_samples: usize,

    /// Steering sample half-range. Samples are spaced uniformly from
    /// `-steer_limit_rad` with spacing `2 * steer_limit_rad / samples`.
    pub steer_limit_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for LatticeParams {
    /// Reference scenario: 30 time steps, 16 speed levels, 36 steering
    /// samples over plus/minus 90 degrees.
    fn default() -> Self {
        Self {
            num_time_steps: 30,
            num_speed_levels: 16,
            num_steer_samples: 36,
            steer_limit_rad: std::f64::consts::FRAC_PI_2,
        }
    }
}

impl LatticeParams {
    /// The steering angle sample set.
    pub(crate) fn steer_samples_rad(&self) -> Vec<f64> {
        let spacing = 2.0 * self.steer_limit_rad / self.num_steer_samples as f64;

        (0..self.num_steer_samples)
            .map(|i| -self.steer_limit_rad + spacing * i as f64)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

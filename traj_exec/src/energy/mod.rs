//! # Energy module
//!
//! The physics cost model: maps the kinematics of one path segment (length,
//! average speed, steering, acceleration, slope) to a nonnegative energy
//! cost. Pure arithmetic, no state beyond the vehicle parameters.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Vehicle and environment parameters for the energy model
#[derive(Deserialize, Debug, Clone)]
pub struct EnergyParams {
    /// Vehicle mass
    pub mass_kg: f64,

    /// Gravitational acceleration
    pub gravity_ms2: f64,

    /// Air resistance coefficient, applied to the squared average speed
    pub air_resistance: f64,

    /// Rolling resistance coefficient, applied to the normal force
    pub rolling_resistance: f64,

    /// Cornering resistance coefficient, applied to the steering angle.
    /// Zero in the reference vehicle, the term is kept for tuning.
    pub cornering_resistance: f64,
}

/// The energy cost model
#[derive(Debug, Clone)]
pub struct EnergyModel {
    params: EnergyParams,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for EnergyParams {
    /// Reference vehicle constants.
    fn default() -> Self {
        Self {
            mass_kg: 96.0,
            gravity_ms2: 9.8,
            air_resistance: 0.01,
            rolling_resistance: 0.03,
            cornering_resistance: 0.0,
        }
    }
}

impl EnergyModel {
    pub fn new(params: EnergyParams) -> Self {
        Self { params }
    }

    /// Energy spent traversing one segment.
    ///
    /// The exerted force sums the inertial, aerodynamic, rolling, grade and
    /// cornering terms; the cost is force times distance, clamped at zero.
    /// The model never rewards energy recovery, so a downhill deceleration
    /// costs nothing rather than paying the vehicle back.
    pub fn energy_j(
        &self,
        distance_m: f64,
        avg_speed_ms: f64,
        avg_steer_rad: f64,
        accel_ms2: f64,
        vertical_angle_rad: f64,
    ) -> f64 {
        let p = &self.params;

        let force_n = p.mass_kg * accel_ms2
            + p.air_resistance * avg_speed_ms.powi(2)
            + p.rolling_resistance * p.mass_kg * p.gravity_ms2 * vertical_angle_rad.cos()
            + p.mass_kg * p.gravity_ms2 * vertical_angle_rad.sin()
            + p.cornering_resistance * avg_steer_rad;

        (distance_m * force_n).max(0.0)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_zero_distance_is_free() {
        let model = EnergyModel::new(EnergyParams::default());

        assert_eq!(model.energy_j(0.0, 5.0, 0.3, 2.0, 0.1), 0.0);
        assert_eq!(model.energy_j(0.0, 0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_never_negative() {
        let model = EnergyModel::new(EnergyParams::default());

        // Hard braking downhill would give a negative raw cost; the model
        // clamps it to zero
        assert_eq!(model.energy_j(10.0, 2.0, 0.0, -8.0, -0.5), 0.0);
        assert!(model.energy_j(3.0, 4.0, -0.2, 1.0, 0.2) >= 0.0);
    }

    #[test]
    fn test_flat_cruise_cost() {
        let model = EnergyModel::new(EnergyParams::default());

        // Flat ground, constant speed 1 m/s over 1 m:
        // force = 0.01 * 1 + 0.03 * 96 * 9.8 = 28.234
        let cost_j = model.energy_j(1.0, 1.0, 0.0, 0.0, 0.0);
        assert!((cost_j - 28.234).abs() < 1e-9);
    }
}

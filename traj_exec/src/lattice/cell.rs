//! Cost lattice cells

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::Serialize;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Cost sentinel carried by every lattice cell that has not been reached.
///
/// Unreached states must never win a minimisation; infinity propagates
/// through comparisons without special-casing.
pub const UNREACHED_COST: f64 = f64::INFINITY;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One cell of the time/speed cost lattice.
///
/// Written exactly once, by the fill pass that determines its optimal
/// predecessor, and never mutated afterwards.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CostCell {
    /// Minimum cumulative cost of reaching this (time, speed) state.
    pub cost: f64,

    /// Cumulative distance covered along the course.
    pub dist_m: f64,

    /// Planar position of the vehicle in this state.
    pub pos_m: Vector2<f64>,

    /// Accumulated heading, without wraparound.
    pub heading_rad: f64,

    /// Speed level of the winning predecessor in the previous column, an
    /// arena index rather than a reference.
    pub backptr: Option<usize>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CostCell {
    /// The explicit initial value of every lattice cell before the fill
    /// pass.
    pub fn unreached() -> Self {
        Self {
            cost: UNREACHED_COST,
            dist_m: 0.0,
            pos_m: Vector2::zeros(),
            heading_rad: 0.0,
            backptr: None,
        }
    }

    /// Whether the fill pass found any feasible way into this state.
    pub fn is_reached(&self) -> bool {
        self.cost.is_finite()
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unreached_sentinel() {
        let cell = CostCell::unreached();

        assert!(!cell.is_reached());
        assert!(cell.backptr.is_none());

        // The sentinel must lose every cost comparison
        assert!(!(cell.cost < UNREACHED_COST));
        assert!(0.0 < cell.cost);
    }
}

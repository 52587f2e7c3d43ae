//! # Lattice optimizer module
//!
//! Dynamic-programming search for the energy-minimal trajectory over a
//! discretized time/speed state lattice.
//!
//! The lattice has one column per discrete time step and one row per integer
//! speed level. Filling proceeds column by column: for each target state the
//! optimizer evaluates every finite-cost predecessor in the previous column
//! and every steering sample, keeping the transition minimising the
//! cumulative cost (physics energy plus a pace penalty discouraging uneven
//! per-step distance). Boundary violations and impossible transitions are
//! absorbed locally as the infinite-cost sentinel; only if the whole
//! terminal column is infinite does the search report `Infeasible`.
//!
//! Columns depend only on their predecessor and on the read-only
//! [`TrackIndex`](crate::track::TrackIndex), so states within a column could
//! be evaluated in parallel; the fill is sequential, matching the scale of
//! the reference scenario.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod cell;
pub mod params;
pub mod trajectory;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, trace};
use nalgebra::Vector2;
use ndarray::Array2;

// Internal
use crate::energy::EnergyModel;
use crate::track::TrackIndex;
pub use cell::*;
pub use params::LatticeParams;
pub use trajectory::*;

// ---------------------------------------------------------------------------
// ENUMS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LatticeError {
    #[error("The track model has zero course distance")]
    ZeroCourseDistance,

    #[error("Lattice parameters must give at least one time step, speed level and steering sample")]
    EmptyLattice,

    #[error("No legal trajectory respects the track boundaries within the search lattice")]
    Infeasible,
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The dynamic-programming trajectory optimizer.
pub struct LatticeOptimizer {
    params: LatticeParams,
    energy: EnergyModel,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LatticeOptimizer {
    pub fn new(params: LatticeParams, energy: EnergyModel) -> Self {
        Self { params, energy }
    }

    /// Compute the energy-minimal trajectory over the given track.
    ///
    /// Fails fast on degenerate inputs, and with
    /// [`LatticeError::Infeasible`] if no legal trajectory exists in the
    /// search space.
    pub fn optimise(&self, index: &TrackIndex) -> Result<Trajectory, LatticeError> {
        let lattice = self.fill(index)?;
        self.reconstruct(&lattice)
    }

    /// Fill the cost lattice column by column.
    pub(crate) fn fill(&self, index: &TrackIndex) -> Result<Array2<CostCell>, LatticeError> {
        let num_t = self.params.num_time_steps;
        let num_s = self.params.num_speed_levels;

        if num_t == 0 || num_s == 0 || self.params.num_steer_samples == 0 {
            return Err(LatticeError::EmptyLattice);
        }

        let course_dist_m = index.model().course_distance_m();
        if course_dist_m <= 0.0 {
            return Err(LatticeError::ZeroCourseDistance);
        }

        // Desired uniform per-step distance; deviations from it are
        // penalised quadratically
        let target_pace_m = course_dist_m / num_t as f64;
        let steer_samples_rad = self.params.steer_samples_rad();

        info!(
            "Filling {}x{} cost lattice ({} steering samples, course {:.2} m, target pace {:.2} m/step)",
            num_t, num_s, steer_samples_rad.len(), course_dist_m, target_pace_m
        );

        // Every cell starts at the explicit unreached sentinel, then the
        // seed state (t = 0, speed 0) is placed at the track start
        let mut lattice = Array2::from_elem((num_t, num_s), CostCell::unreached());

        let start_m = index.model().start_point_m();
        lattice[[0, 0]] = CostCell {
            cost: 0.0,
            dist_m: 0.0,
            pos_m: Vector2::new(start_m[0], start_m[1]),
            heading_rad: 0.0,
            backptr: None,
        };

        for t in 1..num_t {
            for s_target in 0..num_s {
                let mut best = CostCell::unreached();

                for s_prev in 0..num_s {
                    let prev = lattice[[t - 1, s_prev]];
                    if !prev.is_reached() {
                        continue;
                    }

                    // Unit time step: the step distance is the average speed
                    let avg_speed_ms = (s_target + s_prev) as f64 / 2.0;
                    let accel_ms2 = s_target as f64 - s_prev as f64;
                    let step_dist_m = avg_speed_ms;
                    let cand_dist_m = prev.dist_m + step_dist_m;

                    let candidate = if cand_dist_m > course_dist_m {
                        // Course complete. Stopping is free of further
                        // movement; still moving after the finish is
                        // impossible
                        if s_target == 0 {
                            CostCell {
                                cost: prev.cost,
                                dist_m: prev.dist_m,
                                pos_m: prev.pos_m,
                                heading_rad: prev.heading_rad,
                                backptr: Some(s_prev),
                            }
                        } else {
                            continue;
                        }
                    } else {
                        match self.best_steer(
                            index,
                            &steer_samples_rad,
                            &prev,
                            s_prev,
                            step_dist_m,
                            avg_speed_ms,
                            accel_ms2,
                            target_pace_m,
                        ) {
                            Some(cell) => cell,
                            // Every steering sample left the track
                            None => continue,
                        }
                    };

                    if candidate.cost < best.cost {
                        best = candidate;
                    }
                }

                lattice[[t, s_target]] = best;
            }

            trace!("Lattice column {} of {} filled", t + 1, num_t);
        }

        Ok(lattice)
    }

    /// Evaluate every steering sample for one (predecessor, target speed)
    /// pair, returning the cheapest resulting cell, or `None` if every
    /// sample leaves the track.
    #[allow(clippy::too_many_arguments)]
    fn best_steer(
        &self,
        index: &TrackIndex,
        steer_samples_rad: &[f64],
        prev: &CostCell,
        s_prev: usize,
        step_dist_m: f64,
        avg_speed_ms: f64,
        accel_ms2: f64,
        target_pace_m: f64,
    ) -> Option<CostCell> {
        let pace_penalty = (target_pace_m - step_dist_m).powi(2);
        let mut best = CostCell::unreached();

        for steer_rad in steer_samples_rad {
            // Heading accumulates without wraparound
            let heading_rad = prev.heading_rad + steer_rad;
            let pos_m = prev.pos_m
                + step_dist_m * Vector2::new(heading_rad.cos(), heading_rad.sin());

            if !index.within_bounds(pos_m[0], pos_m[1]) {
                continue;
            }

            // Slope is sampled at the segment midpoint
            let mid_m = (prev.pos_m + pos_m) / 2.0;
            let vertical_angle_rad = index.vertical_angle_rad(mid_m[0], mid_m[1]);

            let cost = prev.cost
                + self.energy.energy_j(
                    step_dist_m,
                    avg_speed_ms,
                    heading_rad,
                    accel_ms2,
                    vertical_angle_rad,
                )
                + pace_penalty;

            if cost < best.cost {
                best = CostCell {
                    cost,
                    dist_m: prev.dist_m + step_dist_m,
                    pos_m,
                    heading_rad,
                    backptr: Some(s_prev),
                };
            }
        }

        if best.is_reached() {
            Some(best)
        } else {
            None
        }
    }

    /// Select the minimum-cost terminal state and chain backpointers to the
    /// seed, reversing into chronological order.
    pub(crate) fn reconstruct(
        &self,
        lattice: &Array2<CostCell>,
    ) -> Result<Trajectory, LatticeError> {
        let num_t = lattice.nrows();
        let num_s = lattice.ncols();

        // Terminal state: minimum cost over all speeds in the last column
        let mut terminal_s = 0;
        for s in 1..num_s {
            if lattice[[num_t - 1, s]].cost < lattice[[num_t - 1, terminal_s]].cost {
                terminal_s = s;
            }
        }

        let terminal = lattice[[num_t - 1, terminal_s]];
        if !terminal.is_reached() {
            return Err(LatticeError::Infeasible);
        }

        debug!(
            "Terminal state at speed level {} with cost {:.3}",
            terminal_s, terminal.cost
        );

        let mut path_m = Vec::with_capacity(num_t);
        let mut profile = Vec::with_capacity(num_t);

        let mut t = num_t - 1;
        let mut s = terminal_s;
        loop {
            let cell = lattice[[t, s]];
            path_m.push(cell.pos_m);
            profile.push(SpeedPoint {
                dist_m: cell.dist_m,
                speed_ms: s as f64,
            });

            match cell.backptr {
                Some(prev_s) if t > 0 => {
                    s = prev_s;
                    t -= 1;
                }
                _ => break,
            }
        }

        path_m.reverse();
        profile.reverse();

        Ok(Trajectory {
            path_m,
            profile,
            cost_j: terminal.cost,
        })
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

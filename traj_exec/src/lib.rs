//! # Trajectory synthesis library.
//!
//! Computes an energy-minimal trajectory (position path and speed profile)
//! for a vehicle traversing a closed race track given only as two boundary
//! point sequences. The binary in this crate drives the full pipeline:
//! track model construction, spatial indexing, and the dynamic-programming
//! search over the time/speed cost lattice.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Track module - builds the dense track-surface model and answers geometric queries over it
pub mod track;

/// Energy module - the physics cost model mapping segment kinematics to an energy cost
pub mod energy;

/// Lattice module - the dynamic-programming optimizer over the time/speed cost lattice
pub mod lattice;

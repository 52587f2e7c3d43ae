//! # Track module
//!
//! Turns two sparse boundary point sequences (inner/outer edge samples of a
//! closed race track) into a dense, queryable model of the track surface.
//!
//! The [`model`] submodule builds five concentric bands of points spanning
//! the track width, subdivided so that neighbouring samples are close enough
//! for nearest-neighbour queries to approximate the local surface. The
//! [`index`] submodule wraps the finished model in a 2D spatial index
//! answering altitude, slope and boundary-containment queries.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod index;
pub mod model;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// Internal
pub use index::*;
pub use model::*;

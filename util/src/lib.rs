//! Utility library for the eco trajectory software
//!
//! Provides the ambient services shared by the executables in this workspace:
//! logging, parameter loading, and session management.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod host;
pub mod logger;
pub mod params;
pub mod session;

//! Trajectory optimizer executable entry point.
//!
//! # Architecture
//!
//! One execution runs the full pipeline once:
//!
//!     - Initialise the session and logging
//!     - Load parameters
//!     - Build the track model and spatial index from the boundary samples
//!     - Run the lattice optimizer
//!     - Save the trajectory into the session directory

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use traj_lib::{
    energy::{EnergyModel, EnergyParams},
    lattice::{LatticeOptimizer, LatticeParams},
    track::{TrackIndex, TrackIndexParams, TrackModel},
};

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{eyre::WrapErr, Report};
use log::info;
use nalgebra::Vector3;

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    // ---- EARLY INITIALISATION ----

    color_eyre::install()?;

    // Initialise session
    let session = Session::new("traj_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Trajectory Optimizer Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let index_params: TrackIndexParams =
        util::params::load("track.toml").wrap_err("Could not load track params")?;
    let energy_params: EnergyParams =
        util::params::load("energy.toml").wrap_err("Could not load energy params")?;
    let lattice_params: LatticeParams =
        util::params::load("lattice.toml").wrap_err("Could not load lattice params")?;

    info!("Parameters loaded");

    // ---- BUILD TRACK ----

    let (inner, outer) = trial_boundaries();
    let model =
        TrackModel::build(&inner, &outer).wrap_err("Could not build the track model")?;

    info!(
        "Track model built: course distance {:.2} m, {} points per band",
        model.course_distance_m(),
        model.band_len()
    );

    let index = TrackIndex::new(model, index_params)
        .wrap_err("Could not build the spatial query index")?;

    // ---- OPTIMISE ----

    let optimizer = LatticeOptimizer::new(lattice_params, EnergyModel::new(energy_params));

    let trajectory = optimizer
        .optimise(&index)
        .wrap_err("Trajectory optimisation failed")?;

    info!(
        "Optimal trajectory found: cost {:.3}, {:.2} m covered in {} steps",
        trajectory.cost_j,
        trajectory.final_distance_m(),
        trajectory.num_steps()
    );

    session.save("trajectory.json", trajectory);

    // ---- SHUTDOWN ----

    session.exit();

    Ok(())
}

/// The trial track boundaries: a unit-circle inner boundary sampled every 10
/// degrees and a radius 6 outer boundary sampled every 5 degrees, with a
/// gentle sinusoidal height variation.
fn trial_boundaries() -> (Vec<Vector3<f64>>, Vec<Vector3<f64>>) {
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

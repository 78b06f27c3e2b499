//! Benchmark profiles for the Strata engine.
//!
//! - [`reference_profile`]: 256x256 grid, 30% random fill, 8 workers
//! - [`seeded_simulation`]: a [`Simulation`] ready to run from any config

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use strata_core::CellGrid;
use strata_engine::{SimConfig, Simulation};
use strata_test_utils::random_grid;

/// Reference grid side length.
pub const REFERENCE_SIDE: usize = 256;

/// Reference profile: 256x256, 8 workers, 50 generations, gather only at
/// the end.
pub fn reference_profile() -> SimConfig {
    SimConfig {
        rows: REFERENCE_SIDE,
        cols: REFERENCE_SIDE,
        workers: 8,
        generations: 50,
        gather_every: None,
        ..SimConfig::default()
    }
}

/// A simulation for `config` seeded with a deterministic random fill.
///
/// # Panics
///
/// Panics if `config` is invalid.
pub fn seeded_simulation(config: SimConfig, density_pct: u32, seed: u64) -> Simulation {
    let grid = seed_grid(&config, density_pct, seed);
    let mut sim = Simulation::new(config).expect("benchmark config must be valid");
    *sim.grid_mut() = grid;
    sim
}

/// The deterministic seed grid used by [`seeded_simulation`].
pub fn seed_grid(config: &SimConfig, density_pct: u32, seed: u64) -> CellGrid {
    random_grid(config.rows, config.cols, density_pct, seed)
}

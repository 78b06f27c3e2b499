//! A glider travelling through every band of a 32x32 grid.
//!
//! Gathers every fourth generation and prints the topmost live row. The
//! population is checked once mid-flight, while the glider is still clear
//! of every edge.
//!
//! Run with:
//!   cargo run --example glider

use strata_core::{Generation, Rect};
use strata_engine::{Checkpoint, KernelMode, SimConfig, Simulation};
use strata_test_utils::fixtures;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = SimConfig {
        rows: 32,
        cols: 32,
        workers: 8,
        generations: 100,
        gather_every: Some(4),
        kernel: KernelMode::Parallel,
        ..SimConfig::default()
    };
    let mut sim = Simulation::new(config)?;
    sim.place(&fixtures::glider(), 0, 0)?;
    sim.add_checkpoint(Checkpoint::population("glider", 5).at(Generation(20)));
    sim.add_checkpoint(Checkpoint::region("launch", Rect::new(0, 0, 3, 3), 5).at(Generation::ZERO));

    let report = sim.run_with(|generation, grid| {
        let first = (0..grid.rows()).find(|&r| grid.row(r).contains(&1));
        match first {
            Some(row) => println!("generation {:>3}: top live row {row:>2}", generation.0),
            None => println!("generation {:>3}: empty", generation.0),
        }
    })?;

    println!(
        "{} checks passed, {} mismatched, final population {}",
        report.checks_passed,
        report.mismatches.len(),
        report.population()
    );
    Ok(())
}

//! Beehive still life on a 20x20 grid split across four workers.
//!
//! Places a beehive at (10, 10), runs ten generations gathering after
//! each one, and checks that the six cells of its footprint stay alive.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example beehive

use strata_core::Generation;
use strata_engine::{Checkpoint, SimConfig, Simulation};
use strata_test_utils::fixtures;
use tracing_subscriber::EnvFilter;

// ─── Run parameters ─────────────────────────────────────────────

const ROWS: usize = 20;
const COLS: usize = 20;
const WORKERS: usize = 4;
const GENERATIONS: u64 = 10;
const ORIGIN: (usize, usize) = (10, 10);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = SimConfig {
        rows: ROWS,
        cols: COLS,
        workers: WORKERS,
        generations: GENERATIONS,
        ..SimConfig::default()
    };
    let beehive = fixtures::beehive();
    let mut sim = Simulation::new(config)?;
    sim.place(&beehive, ORIGIN.0, ORIGIN.1)?;
    sim.add_checkpoint(Checkpoint::region(
        "beehive",
        beehive.footprint_at(ORIGIN.0, ORIGIN.1),
        beehive.population(),
    ));

    let report = sim.run_with(|generation: Generation, grid| {
        println!("generation {generation}: {} live", grid.population());
    })?;

    for m in &report.metrics {
        println!(
            "worker {}: {} generations, exchange {} us, update {} us",
            m.rank, m.generations, m.exchange_us, m.update_us
        );
    }
    if report.verified() {
        println!("beehive stable for {} generations", report.generations_run);
    } else {
        for m in &report.mismatches {
            println!("{m}");
        }
    }
    println!("\n{}", report.final_grid);
    Ok(())
}

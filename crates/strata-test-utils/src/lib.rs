//! Test utilities for Strata development.
//!
//! Provides the standard still-life and oscillator [`fixtures`], a
//! seeded [`random_grid`] generator, and [`reference_step`], a
//! single-buffer stepper with no decomposition that distributed runs are
//! checked against.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use strata_core::{CellGrid, ALIVE, DEAD};
use strata_kernel::next_state;

/// A grid where each cell is alive with probability `density_pct / 100`.
///
/// Deterministic for a given `seed`.
pub fn random_grid(rows: usize, cols: usize, density_pct: u32, seed: u64) -> CellGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    CellGrid::from_fn(rows, cols, |_, _| {
        if rng.next_u32() % 100 < density_pct {
            ALIVE
        } else {
            DEAD
        }
    })
    .expect("test grid dimensions must be non-zero")
}

/// One generation over the whole grid with closed boundaries on all four
/// sides. Written independently of the band kernel so the two can be
/// compared.
pub fn reference_step(grid: &CellGrid) -> CellGrid {
    let rows = grid.rows() as isize;
    let cols = grid.cols() as isize;
    CellGrid::from_fn(grid.rows(), grid.cols(), |r, c| {
        let mut live = 0u8;
        for dr in -1isize..=1 {
            for dc in -1isize..=1 {
                if dr == 0 && dc == 0 {
                    continue;
                }
                let nr = r as isize + dr;
                let nc = c as isize + dc;
                if (0..rows).contains(&nr) && (0..cols).contains(&nc) {
                    live += u8::from(grid.is_alive(nr as usize, nc as usize));
                }
            }
        }
        next_state(grid.get(r, c), live)
    })
    .expect("grid dimensions already validated")
}

/// Apply [`reference_step`] `generations` times.
pub fn reference_run(grid: &CellGrid, generations: u64) -> CellGrid {
    let mut g = grid.clone();
    for _ in 0..generations {
        g = reference_step(&g);
    }
    g
}

//! Per-worker timing counters and the end-of-run report.

use strata_core::{CellGrid, Generation, Rank, VerificationMismatch};

/// Timing and traffic counters collected by one worker over a run.
///
/// Durations are in microseconds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkerMetrics {
    /// Worker rank.
    pub rank: Rank,
    /// Generations this worker completed.
    pub generations: u64,
    /// Time spent in halo exchange, in microseconds.
    pub exchange_us: u64,
    /// Time spent in the update kernel, in microseconds.
    pub update_us: u64,
    /// Halo cells received from neighbours.
    pub halo_cells: u64,
}

impl WorkerMetrics {
    /// Zeroed counters for `rank`.
    pub fn new(rank: Rank) -> Self {
        Self {
            rank,
            generations: 0,
            exchange_us: 0,
            update_us: 0,
            halo_cells: 0,
        }
    }
}

/// Outcome of a completed run.
#[derive(Clone, Debug)]
pub struct RunReport {
    /// Last generation computed.
    pub generations_run: Generation,
    /// Global grid as of `generations_run`.
    pub final_grid: CellGrid,
    /// Checkpoint evaluations that matched.
    pub checks_passed: usize,
    /// Checkpoint evaluations that did not.
    pub mismatches: Vec<VerificationMismatch>,
    /// Checkpoints never evaluated (their generation was not gathered).
    pub unchecked: Vec<String>,
    /// Generation at which the grid died out, if extinction detection
    /// was enabled and triggered.
    pub extinct_at: Option<Generation>,
    /// Per-worker counters, in rank order.
    pub metrics: Vec<WorkerMetrics>,
}

impl RunReport {
    /// Whether every checkpoint evaluation matched.
    pub fn verified(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Live cells in the final grid.
    pub fn population(&self) -> u64 {
        self.final_grid.population()
    }
}

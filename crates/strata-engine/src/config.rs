//! Run configuration and pre-flight validation.
//!
//! [`SimConfig`] is fixed for the lifetime of a run. [`validate()`](SimConfig::validate)
//! rejects every configuration error before any buffer is distributed.

use std::time::Duration;

use strata_core::{ConfigError, Generation, PlacementPolicy};
use strata_kernel::KernelMode;

/// Everything a run needs to know up front.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Global grid rows. Must be divisible by `workers`.
    pub rows: usize,
    /// Global grid columns.
    pub cols: usize,
    /// Number of worker ranks. Default: 4.
    pub workers: usize,
    /// Number of generations to run. Default: 10.
    pub generations: u64,
    /// Gather and verify every `k` generations. `None` gathers only after
    /// the final generation. Default: `Some(1)`.
    pub gather_every: Option<u64>,
    /// How each worker schedules its owned rows. Default: `Serial`.
    pub kernel: KernelMode,
    /// Upper bound on any single blocking worker-side send or receive.
    /// It does not bound the run as a whole. `None` blocks indefinitely.
    /// Default: `None`.
    pub exchange_timeout: Option<Duration>,
    /// End the run early once the whole grid is dead. Costs one sum
    /// reduction per generation. Default: `false`.
    pub stop_on_extinction: bool,
    /// What to do with pattern cells placed outside the grid.
    /// Default: `Reject`.
    pub placement: PlacementPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            workers: 4,
            generations: 10,
            gather_every: Some(1),
            kernel: KernelMode::Serial,
            exchange_timeout: None,
            stop_on_extinction: false,
            placement: PlacementPolicy::Reject,
        }
    }
}

impl SimConfig {
    /// A `rows x cols` grid with every other field at its default.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            ..Self::default()
        }
    }

    /// Use one worker per available hardware thread (1 if unknown).
    pub fn with_workers_from_env(mut self) -> Self {
        self.workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if self.rows % self.workers != 0 {
            return Err(ConfigError::IndivisibleRows {
                rows: self.rows,
                workers: self.workers,
            });
        }
        if self.gather_every == Some(0) {
            return Err(ConfigError::InvalidCadence);
        }
        Ok(())
    }

    /// Rows owned by each worker.
    pub fn band_rows(&self) -> usize {
        self.rows / self.workers.max(1)
    }

    /// Whether the global grid is gathered after `generation`.
    ///
    /// Both the coordinator and every worker consult this, so they agree
    /// on which generations carry a gather without extra messages. The
    /// final generation is always gathered.
    pub fn gathers_at(&self, generation: Generation) -> bool {
        generation.0 == self.generations
            || self
                .gather_every
                .is_some_and(|k| k > 0 && generation.0 % k == 0)
    }
}

//! The coordinator: sole owner of the global grid.
//!
//! Places patterns, scatters bands, gathers them back, and evaluates
//! checkpoints. It never runs the update kernel and owns no band.

use strata_comm::RootEndpoint;
use strata_core::{
    CellGrid, CommError, ConfigError, Generation, Pattern, PlacementPolicy, SimError,
};

use crate::checkpoint::{Checkpoint, Checkpoints, Evaluation};
use crate::config::SimConfig;
use crate::partition::Partition;

/// Global grid plus the bookkeeping around distributing it.
#[derive(Debug)]
pub struct Coordinator {
    grid: CellGrid,
    partition: Partition,
    placement: PlacementPolicy,
    checkpoints: Checkpoints,
}

impl Coordinator {
    /// An all-dead grid sized and partitioned per `config`.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            grid: CellGrid::new(config.rows, config.cols)?,
            partition: Partition::new(config.rows, config.workers)?,
            placement: config.placement,
            checkpoints: Checkpoints::new(),
        })
    }

    /// The global grid as of the last scatter or gather.
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// Mutable access to the global grid, for seeding before a run.
    pub fn grid_mut(&mut self) -> &mut CellGrid {
        &mut self.grid
    }

    /// How rows are split across workers.
    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    /// Overlay `pattern` at `(row, col)` under the configured policy.
    pub fn place(&mut self, pattern: &Pattern, row: usize, col: usize) -> Result<usize, ConfigError> {
        let written = self.grid.place(pattern, row, col, self.placement)?;
        tracing::debug!(row, col, written, "pattern placed");
        Ok(written)
    }

    /// Register a checkpoint.
    pub fn add_checkpoint(&mut self, checkpoint: Checkpoint) {
        self.checkpoints.insert(checkpoint);
    }

    /// Send every worker its band of the current grid.
    pub fn scatter(&self, root: &RootEndpoint) -> Result<(), SimError> {
        let bands = self.partition.split(&self.grid)?;
        root.scatter(Generation::ZERO, bands)?;
        Ok(())
    }

    /// Replace the global grid with every worker's band for `generation`.
    pub fn gather(&mut self, root: &RootEndpoint, generation: Generation) -> Result<(), CommError> {
        root.gather(generation, self.grid.as_mut_slice())?;
        tracing::debug!(
            generation = generation.0,
            population = self.grid.population(),
            "grid gathered"
        );
        Ok(())
    }

    /// Evaluate checkpoints against the grid, logging each mismatch.
    pub fn verify(&mut self, generation: Generation) -> Evaluation {
        let eval = self.checkpoints.evaluate(generation, &self.grid);
        for m in &eval.mismatches {
            tracing::warn!(
                checkpoint = %m.checkpoint,
                generation = m.generation.0,
                expected = m.expected,
                actual = m.actual,
                "checkpoint mismatch"
            );
        }
        eval
    }

    /// Names of checkpoints that were never evaluated.
    pub fn unchecked(&self) -> Vec<String> {
        self.checkpoints.unchecked()
    }

    /// Consume the coordinator, returning the grid.
    pub fn into_grid(self) -> CellGrid {
        self.grid
    }
}

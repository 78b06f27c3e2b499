//! Population checkpoints evaluated on gathered grids.
//!
//! A checkpoint names a region (or the whole grid) and the live-cell
//! count expected there. Mismatches are collected and logged; they never
//! stop the run.

use indexmap::IndexMap;
use strata_core::{CellGrid, Generation, Rect, VerificationMismatch};

/// When a checkpoint applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckpointWhen {
    /// At every generation the grid is gathered (generation 0 included).
    EveryGather,
    /// Only at this generation.
    At(Generation),
}

/// An expected live-cell count over a region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint {
    /// Unique name, used in reports and logs.
    pub name: String,
    /// Region to count, `None` for the whole grid.
    pub region: Option<Rect>,
    /// Expected live cells.
    pub expected: u64,
    /// When to evaluate.
    pub when: CheckpointWhen,
}

impl Checkpoint {
    /// Expect `expected` live cells inside `region` at every gather.
    pub fn region(name: impl Into<String>, region: Rect, expected: u64) -> Self {
        Self {
            name: name.into(),
            region: Some(region),
            expected,
            when: CheckpointWhen::EveryGather,
        }
    }

    /// Expect `expected` live cells in the whole grid at every gather.
    pub fn population(name: impl Into<String>, expected: u64) -> Self {
        Self {
            name: name.into(),
            region: None,
            expected,
            when: CheckpointWhen::EveryGather,
        }
    }

    /// Restrict the checkpoint to a single generation.
    pub fn at(mut self, generation: Generation) -> Self {
        self.when = CheckpointWhen::At(generation);
        self
    }

    fn applies_at(&self, generation: Generation) -> bool {
        match self.when {
            CheckpointWhen::EveryGather => true,
            CheckpointWhen::At(g) => g == generation,
        }
    }

    fn count(&self, grid: &CellGrid) -> u64 {
        match &self.region {
            Some(r) => grid.population_in(r),
            None => grid.population(),
        }
    }
}

/// Result of evaluating all checkpoints against one gathered grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// Checkpoints that matched.
    pub passed: usize,
    /// Checkpoints that did not.
    pub mismatches: Vec<VerificationMismatch>,
}

/// Insertion-ordered set of checkpoints, keyed by name.
#[derive(Clone, Debug, Default)]
pub struct Checkpoints {
    entries: IndexMap<String, (Checkpoint, bool)>,
}

impl Checkpoints {
    /// No checkpoints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a checkpoint, replacing any existing one with the same name.
    pub fn insert(&mut self, checkpoint: Checkpoint) -> Option<Checkpoint> {
        self.entries
            .insert(checkpoint.name.clone(), (checkpoint, false))
            .map(|(old, _)| old)
    }

    /// Number of checkpoints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no checkpoints.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Evaluate every checkpoint that applies at `generation`.
    pub fn evaluate(&mut self, generation: Generation, grid: &CellGrid) -> Evaluation {
        let mut eval = Evaluation::default();
        for (checkpoint, seen) in self.entries.values_mut() {
            if !checkpoint.applies_at(generation) {
                continue;
            }
            *seen = true;
            let actual = checkpoint.count(grid);
            if actual == checkpoint.expected {
                eval.passed += 1;
            } else {
                eval.mismatches.push(VerificationMismatch {
                    checkpoint: checkpoint.name.clone(),
                    generation,
                    expected: checkpoint.expected,
                    actual,
                });
            }
        }
        eval
    }

    /// Names of checkpoints that have never applied to a gathered grid,
    /// in insertion order.
    pub fn unchecked(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, (_, seen))| !seen)
            .map(|(name, _)| name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::PlacementPolicy;
    use strata_test_utils::fixtures;

    fn beehive_grid() -> CellGrid {
        let mut g = CellGrid::new(20, 20).unwrap();
        g.place(&fixtures::beehive(), 10, 10, PlacementPolicy::Reject)
            .unwrap();
        g
    }

    #[test]
    fn matching_region_passes() {
        let mut cps = Checkpoints::new();
        cps.insert(Checkpoint::region("beehive", Rect::new(10, 10, 3, 4), 6));
        let eval = cps.evaluate(Generation(3), &beehive_grid());
        assert_eq!(eval.passed, 1);
        assert!(eval.mismatches.is_empty());
    }

    #[test]
    fn mismatch_is_reported_not_fatal() {
        let mut cps = Checkpoints::new();
        cps.insert(Checkpoint::population("total", 49));
        cps.insert(Checkpoint::region("beehive", Rect::new(10, 10, 3, 4), 6));
        let eval = cps.evaluate(Generation(10), &beehive_grid());
        assert_eq!(eval.passed, 1);
        assert_eq!(
            eval.mismatches,
            vec![VerificationMismatch {
                checkpoint: "total".into(),
                generation: Generation(10),
                expected: 49,
                actual: 6,
            }]
        );
    }

    #[test]
    fn single_generation_checkpoint() {
        let mut cps = Checkpoints::new();
        cps.insert(Checkpoint::population("gen10", 6).at(Generation(10)));
        cps.insert(Checkpoint::population("gen100", 6).at(Generation(100)));
        let grid = beehive_grid();
        assert_eq!(cps.evaluate(Generation(9), &grid), Evaluation::default());
        assert_eq!(cps.evaluate(Generation(10), &grid).passed, 1);
        assert_eq!(cps.unchecked(), vec!["gen100".to_string()]);
    }

    #[test]
    fn insert_replaces_by_name() {
        let mut cps = Checkpoints::new();
        assert!(cps.insert(Checkpoint::population("p", 1)).is_none());
        let old = cps.insert(Checkpoint::population("p", 2)).unwrap();
        assert_eq!(old.expected, 1);
        assert_eq!(cps.len(), 1);
    }
}

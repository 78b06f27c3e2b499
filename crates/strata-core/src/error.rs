//! Error types for the Strata engine.
//!
//! Organized by how the run reacts to them: configuration errors are
//! fatal before any work starts, communication errors are fatal
//! mid-run, and verification mismatches are reported without stopping
//! the simulation.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::halo::Direction;
use crate::id::{Generation, Rank};

/// Pre-flight errors detected before any band is distributed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The decomposition has no workers.
    ZeroWorkers,
    /// The grid has zero rows or zero columns.
    EmptyGrid {
        /// Configured row count.
        rows: usize,
        /// Configured column count.
        cols: usize,
    },
    /// Row count is not evenly divisible by the worker count.
    IndivisibleRows {
        /// Configured row count.
        rows: usize,
        /// Configured worker count.
        workers: usize,
    },
    /// A pattern placed with [`PlacementPolicy::Reject`](crate::PlacementPolicy)
    /// extends past the grid.
    PatternOutOfBounds {
        /// Requested top-left row.
        row: usize,
        /// Requested top-left column.
        col: usize,
        /// Pattern height.
        height: usize,
        /// Pattern width.
        width: usize,
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
    },
    /// A grid or band buffer could not be allocated.
    AllocationFailed {
        /// Number of cells requested.
        cells: usize,
    },
    /// Gather cadence of zero generations.
    InvalidCadence,
    /// A worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWorkers => write!(f, "worker count must be at least 1"),
            Self::EmptyGrid { rows, cols } => {
                write!(f, "grid must have at least one cell, got {rows}x{cols}")
            }
            Self::IndivisibleRows { rows, workers } => write!(
                f,
                "{rows} rows cannot be split evenly across {workers} workers"
            ),
            Self::PatternOutOfBounds {
                row,
                col,
                height,
                width,
                rows,
                cols,
            } => write!(
                f,
                "{height}x{width} pattern at ({row}, {col}) does not fit in {rows}x{cols} grid"
            ),
            Self::AllocationFailed { cells } => {
                write!(f, "failed to allocate buffer of {cells} cells")
            }
            Self::InvalidCadence => write!(f, "gather cadence must be at least 1 generation"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// A peer exchange or collective operation that did not complete.
///
/// Never retried. Any `CommError` aborts the whole run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommError {
    /// The other end of a link hung up (its thread exited or panicked).
    Disconnected {
        /// Rank that observed the failure, `None` for the coordinator.
        rank: Option<Rank>,
        /// What was on the other side of the link.
        peer: String,
    },
    /// A blocking receive exceeded the configured exchange timeout.
    Timeout {
        /// Rank that was waiting, `None` for the coordinator.
        rank: Option<Rank>,
        /// What it was waiting on.
        peer: String,
        /// How long it waited.
        waited: Duration,
    },
    /// A message arrived tagged with an unexpected generation.
    OutOfOrder {
        /// Rank that received it, `None` for the coordinator.
        rank: Option<Rank>,
        /// Generation the receiver was expecting.
        expected: Generation,
        /// Generation carried by the message.
        got: Generation,
    },
    /// A message payload had the wrong number of cells.
    PayloadSize {
        /// Expected cell count.
        expected: usize,
        /// Received cell count.
        got: usize,
    },
    /// A halo exchange was requested in a direction with no neighbour.
    MissingPeer {
        /// Rank that asked.
        rank: Rank,
        /// Direction with no neighbour.
        direction: Direction,
    },
    /// A collective received a message of the wrong kind.
    Unexpected {
        /// Rank that received it, `None` for the coordinator.
        rank: Option<Rank>,
        /// Kind of message the receiver was waiting for.
        expected: &'static str,
        /// Kind of message that arrived.
        got: &'static str,
    },
    /// A scatter was given the wrong number of parts.
    PartCount {
        /// Number of workers.
        expected: usize,
        /// Number of parts supplied.
        got: usize,
    },
}

fn who(rank: &Option<Rank>) -> String {
    match rank {
        Some(r) => format!("worker {r}"),
        None => "coordinator".to_string(),
    }
}

impl fmt::Display for CommError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected { rank, peer } => {
                write!(f, "{}: {peer} disconnected", who(rank))
            }
            Self::Timeout { rank, peer, waited } => {
                write!(f, "{}: timed out after {waited:?} waiting on {peer}", who(rank))
            }
            Self::OutOfOrder {
                rank,
                expected,
                got,
            } => write!(
                f,
                "{}: expected message for generation {expected}, got {got}",
                who(rank)
            ),
            Self::PayloadSize { expected, got } => {
                write!(f, "payload has {got} cells, expected {expected}")
            }
            Self::MissingPeer { rank, direction } => {
                write!(f, "worker {rank} has no neighbour {direction}")
            }
            Self::Unexpected {
                rank,
                expected,
                got,
            } => write!(f, "{}: expected {expected} message, got {got}", who(rank)),
            Self::PartCount { expected, got } => {
                write!(f, "scatter needs {expected} parts, got {got}")
            }
        }
    }
}

impl Error for CommError {}

/// A checkpoint population that did not match its expected value.
///
/// Not an error in the control-flow sense: the run continues and the
/// mismatch is surfaced in the run report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationMismatch {
    /// Name of the checkpoint.
    pub checkpoint: String,
    /// Generation at which it was evaluated.
    pub generation: Generation,
    /// Expected live-cell count.
    pub expected: u64,
    /// Observed live-cell count.
    pub actual: u64,
}

impl fmt::Display for VerificationMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "checkpoint '{}' at generation {}: population {} (expected {})",
            self.checkpoint, self.generation, self.actual, self.expected
        )
    }
}

/// Any fatal error that aborts a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// Configuration was rejected before the run started.
    Config(ConfigError),
    /// A message exchange failed mid-run.
    Comm(CommError),
    /// A worker thread panicked.
    WorkerPanicked {
        /// Rank of the worker.
        rank: Rank,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Comm(e) => write!(f, "communication: {e}"),
            Self::WorkerPanicked { rank } => write!(f, "worker {rank} panicked"),
        }
    }
}

impl Error for SimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Comm(e) => Some(e),
            Self::WorkerPanicked { .. } => None,
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<CommError> for SimError {
    fn from(e: CommError) -> Self {
        Self::Comm(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indivisible_rows_message_names_both_counts() {
        let e = ConfigError::IndivisibleRows {
            rows: 10,
            workers: 3,
        };
        assert_eq!(
            e.to_string(),
            "10 rows cannot be split evenly across 3 workers"
        );
    }

    #[test]
    fn sim_error_exposes_source() {
        let e: SimError = ConfigError::ZeroWorkers.into();
        assert!(e.source().is_some());
        let e = SimError::WorkerPanicked { rank: Rank(2) };
        assert!(e.source().is_none());
    }

    #[test]
    fn comm_error_names_coordinator_when_rankless() {
        let e = CommError::Disconnected {
            rank: None,
            peer: "worker 1".into(),
        };
        assert_eq!(e.to_string(), "coordinator: worker 1 disconnected");
    }
}

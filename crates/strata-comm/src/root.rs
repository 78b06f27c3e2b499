//! Coordinator-side endpoint: the root of every collective.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use strata_core::{Cell, CommError, Generation, Rank};

use crate::link::{self, worker_label};
use crate::message::Collective;

/// The coordinator's connection to every worker.
///
/// Only the coordinator holds one, so only the coordinator can scatter,
/// gather, or reduce.
///
/// Receives are never timed: a gather waits for as many generations as
/// the caller's cadence, not for a single exchange. Worker-side
/// operations carry the timeout instead. Dropping the endpoint raises
/// the shutdown flag every worker polls once per generation.
#[derive(Debug)]
pub struct RootEndpoint {
    size: usize,
    shutdown: Arc<AtomicBool>,
    to_workers: Vec<Sender<Collective>>,
    from_workers: Vec<Receiver<Collective>>,
}

impl RootEndpoint {
    pub(crate) fn new(
        size: usize,
        shutdown: Arc<AtomicBool>,
        to_workers: Vec<Sender<Collective>>,
        from_workers: Vec<Receiver<Collective>>,
    ) -> Self {
        Self {
            size,
            shutdown,
            to_workers,
            from_workers,
        }
    }

    /// Number of workers.
    pub fn size(&self) -> usize {
        self.size
    }

    fn recv_from(&self, rank: usize) -> Result<Collective, CommError> {
        link::recv(
            &self.from_workers[rank],
            None,
            None,
            &worker_label(Rank(rank)),
        )
    }

    fn send_to(&self, rank: usize, msg: Collective) -> Result<(), CommError> {
        link::send(
            &self.to_workers[rank],
            msg,
            None,
            None,
            &worker_label(Rank(rank)),
        )
    }

    fn expect_generation(msg: &Collective, expected: Generation) -> Result<(), CommError> {
        if msg.generation() != expected {
            return Err(CommError::OutOfOrder {
                rank: None,
                expected,
                got: msg.generation(),
            });
        }
        Ok(())
    }

    /// Send `bands[k]` to worker `k`.
    ///
    /// All parts are validated before anything is sent: the part count
    /// must equal the worker count and every part must have the same
    /// length. A send failure part-way through is returned as an error;
    /// the caller aborts the run, which disconnects every worker.
    pub fn scatter(&self, generation: Generation, bands: Vec<Vec<Cell>>) -> Result<(), CommError> {
        if bands.len() != self.size {
            return Err(CommError::PartCount {
                expected: self.size,
                got: bands.len(),
            });
        }
        if let Some(first) = bands.first() {
            if let Some(bad) = bands.iter().find(|b| b.len() != first.len()) {
                return Err(CommError::PayloadSize {
                    expected: first.len(),
                    got: bad.len(),
                });
            }
        }
        for (rank, cells) in bands.into_iter().enumerate() {
            self.send_to(rank, Collective::Band { generation, cells })?;
        }
        Ok(())
    }

    /// Receive every worker's band, in rank order, into `dest`.
    ///
    /// `dest` is split into `size` equal contiguous parts; worker `k`'s
    /// band must exactly fill part `k`.
    pub fn gather(&self, generation: Generation, dest: &mut [Cell]) -> Result<(), CommError> {
        let part = dest.len() / self.size.max(1);
        if part * self.size != dest.len() {
            return Err(CommError::PayloadSize {
                expected: part * self.size,
                got: dest.len(),
            });
        }
        for (rank, chunk) in dest.chunks_mut(part.max(1)).enumerate() {
            let msg = self.recv_from(rank)?;
            Self::expect_generation(&msg, generation)?;
            match msg {
                Collective::Band { cells, .. } if cells.len() == chunk.len() => {
                    chunk.copy_from_slice(&cells);
                }
                Collective::Band { cells, .. } => {
                    return Err(CommError::PayloadSize {
                        expected: chunk.len(),
                        got: cells.len(),
                    });
                }
                other => {
                    return Err(CommError::Unexpected {
                        rank: None,
                        expected: "band",
                        got: other.kind(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Sum one population contribution from every worker.
    pub fn reduce_sum(&self, generation: Generation) -> Result<u64, CommError> {
        let mut total = 0u64;
        for rank in 0..self.size {
            let msg = self.recv_from(rank)?;
            Self::expect_generation(&msg, generation)?;
            match msg {
                Collective::Population { live, .. } => total += live,
                other => {
                    return Err(CommError::Unexpected {
                        rank: None,
                        expected: "population",
                        got: other.kind(),
                    });
                }
            }
        }
        Ok(total)
    }

    /// Send the same decision to every worker.
    pub fn broadcast_verdict(&self, generation: Generation, proceed: bool) -> Result<(), CommError> {
        for rank in 0..self.size {
            self.send_to(
                rank,
                Collective::Verdict {
                    generation,
                    proceed,
                },
            )?;
        }
        Ok(())
    }
}

impl Drop for RootEndpoint {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
    }
}

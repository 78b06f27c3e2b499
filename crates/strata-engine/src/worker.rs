//! One worker: a band, two halo buffers, and a peer endpoint.
//!
//! The per-generation sequence is fixed:
//!
//! 1. stop if the coordinator has gone away, then exchange halos with
//!    every existing neighbour (tagged with the generation being read),
//! 2. apply the update kernel from current into next,
//! 3. swap buffers,
//! 4. optionally contribute to the extinction reduction,
//! 5. contribute the owned rows to a gather if one is due.
//!
//! Every worker runs the same number of generations; a worker that
//! returns early drops its endpoint and its neighbours observe
//! [`CommError::Disconnected`](strata_core::CommError::Disconnected).

use std::time::Instant;

use strata_comm::PeerEndpoint;
use strata_core::{CommError, ConfigError, Generation, HaloBuffer, PingPong, Rank};
use strata_kernel::update_band;

use crate::config::SimConfig;
use crate::metrics::WorkerMetrics;

/// A worker ready to be moved onto its own thread.
#[derive(Debug)]
pub struct Worker {
    endpoint: PeerEndpoint,
    buffers: PingPong<HaloBuffer>,
    config: SimConfig,
}

impl Worker {
    /// Allocate both buffers for a band of `config.band_rows()` rows.
    ///
    /// Allocation happens here, on the spawning thread, so an oversized
    /// grid fails before any worker starts.
    pub fn new(endpoint: PeerEndpoint, config: &SimConfig) -> Result<Self, ConfigError> {
        let rows = config.band_rows();
        let current = HaloBuffer::new(rows, config.cols)?;
        let next = HaloBuffer::new(rows, config.cols)?;
        Ok(Self {
            endpoint,
            buffers: PingPong::new(current, next),
            config: config.clone(),
        })
    }

    /// This worker's rank.
    pub fn rank(&self) -> Rank {
        self.endpoint.rank()
    }

    /// Receive the initial band, run every generation, and return the
    /// worker's counters.
    pub fn run(mut self) -> Result<WorkerMetrics, CommError> {
        let rank = self.rank();
        let mut metrics = WorkerMetrics::new(rank);
        tracing::debug!(rank = rank.0, "worker waiting for band");

        let band = self.endpoint.recv_band(Generation::ZERO)?;
        self.buffers.current_mut().load_owned(&band)?;

        let neighbours = self.endpoint.neighbours();
        let mut generation = Generation::ZERO;
        while generation.0 < self.config.generations {
            self.endpoint.check_shutdown()?;
            let t0 = Instant::now();
            for &direction in &neighbours {
                let (send, recv) = self.buffers.current_mut().exchange_rows(direction);
                let got = self.endpoint.sendrecv(direction, generation, send, recv)?;
                metrics.halo_cells += got as u64;
            }
            let t1 = Instant::now();
            {
                let (current, next) = self.buffers.split();
                update_band(current, next, self.config.kernel);
            }
            self.buffers.swap();
            metrics.exchange_us += (t1 - t0).as_micros() as u64;
            metrics.update_us += t1.elapsed().as_micros() as u64;

            generation = generation.next();
            metrics.generations = generation.0;

            let mut proceed = true;
            if self.config.stop_on_extinction {
                let live = self.buffers.current().population();
                self.endpoint.send_population(generation, live)?;
                proceed = self.endpoint.recv_verdict(generation)?;
            }
            if !proceed || self.config.gathers_at(generation) {
                self.endpoint
                    .send_band(generation, self.buffers.current().owned())?;
            }
            if !proceed {
                break;
            }
        }

        tracing::debug!(
            rank = rank.0,
            generations = metrics.generations,
            exchange_us = metrics.exchange_us,
            update_us = metrics.update_us,
            "worker finished"
        );
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_comm::Fabric;
    use strata_core::Cell;

    #[test]
    fn single_worker_runs_without_neighbours() {
        let cfg = SimConfig {
            rows: 3,
            cols: 3,
            workers: 1,
            generations: 2,
            gather_every: None,
            ..SimConfig::default()
        };
        let (root, mut peers) = Fabric::new(1).build();
        let worker = Worker::new(peers.remove(0), &cfg).unwrap();

        let handle = std::thread::spawn(move || worker.run());
        // Vertical blinker in the middle column.
        root.scatter(Generation::ZERO, vec![vec![0, 1, 0, 0, 1, 0, 0, 1, 0]])
            .unwrap();
        let mut out: Vec<Cell> = vec![0; 9];
        root.gather(Generation(2), &mut out).unwrap();
        let metrics = handle.join().unwrap().unwrap();

        assert_eq!(out, vec![0, 1, 0, 0, 1, 0, 0, 1, 0]);
        assert_eq!(metrics.generations, 2);
        assert_eq!(metrics.halo_cells, 0);
    }

    #[test]
    fn wrong_band_size_is_rejected() {
        let cfg = SimConfig {
            rows: 2,
            cols: 2,
            workers: 1,
            ..SimConfig::default()
        };
        let (root, mut peers) = Fabric::new(1).build();
        let worker = Worker::new(peers.remove(0), &cfg).unwrap();
        root.scatter(Generation::ZERO, vec![vec![0; 3]]).unwrap();
        assert_eq!(
            worker.run(),
            Err(CommError::PayloadSize {
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn aborted_run_stops_mid_flight() {
        let cfg = SimConfig {
            rows: 4,
            cols: 4,
            workers: 1,
            generations: u64::MAX,
            gather_every: None,
            ..SimConfig::default()
        };
        let (root, mut peers) = Fabric::new(1).build();
        let worker = Worker::new(peers.remove(0), &cfg).unwrap();
        let handle = std::thread::spawn(move || worker.run());
        root.scatter(Generation::ZERO, vec![vec![0; 16]]).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        drop(root);
        assert!(matches!(
            handle.join().unwrap(),
            Err(CommError::Disconnected { .. })
        ));
    }

    #[test]
    fn lost_coordinator_surfaces_as_disconnect() {
        let cfg = SimConfig {
            rows: 2,
            cols: 2,
            workers: 1,
            ..SimConfig::default()
        };
        let (root, mut peers) = Fabric::new(1).build();
        let worker = Worker::new(peers.remove(0), &cfg).unwrap();
        drop(root);
        assert!(matches!(
            worker.run(),
            Err(CommError::Disconnected { .. })
        ));
    }
}

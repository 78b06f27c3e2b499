//! Worker-side endpoint: halo exchange with neighbours and the worker's
//! half of every collective.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use smallvec::SmallVec;
use strata_core::{Cell, CommError, Direction, Generation, Rank};

use crate::link::{self, worker_label, COORDINATOR};
use crate::message::{Collective, HaloRow};

/// One side of the link between two vertically adjacent ranks.
#[derive(Debug)]
pub(crate) struct HaloLink {
    peer: Rank,
    tx: Sender<HaloRow>,
    rx: Receiver<HaloRow>,
}

impl HaloLink {
    pub(crate) fn new(peer: Rank, tx: Sender<HaloRow>, rx: Receiver<HaloRow>) -> Self {
        Self { peer, tx, rx }
    }
}

/// A worker's connection to the rest of the fabric.
///
/// Owned by exactly one worker thread. [`Send`] but not shared.
#[derive(Debug)]
pub struct PeerEndpoint {
    rank: Rank,
    size: usize,
    timeout: Option<Duration>,
    up: Option<HaloLink>,
    down: Option<HaloLink>,
    to_root: Sender<Collective>,
    from_root: Receiver<Collective>,
    shutdown: Arc<AtomicBool>,
}

impl PeerEndpoint {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        rank: Rank,
        size: usize,
        timeout: Option<Duration>,
        up: Option<HaloLink>,
        down: Option<HaloLink>,
        to_root: Sender<Collective>,
        from_root: Receiver<Collective>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            rank,
            size,
            timeout,
            up,
            down,
            to_root,
            from_root,
            shutdown,
        }
    }

    /// This worker's rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Total number of workers.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Fail with [`CommError::Disconnected`] once the coordinator's
    /// endpoint has been dropped.
    ///
    /// Polled by workers at the top of every generation so an aborted
    /// run stops within one generation instead of at the next collective.
    pub fn check_shutdown(&self) -> Result<(), CommError> {
        if self.shutdown.load(Ordering::Acquire) {
            return Err(CommError::Disconnected {
                rank: Some(self.rank),
                peer: COORDINATOR.to_string(),
            });
        }
        Ok(())
    }

    /// Whether a neighbour exists in `direction`.
    pub fn has_neighbour(&self, direction: Direction) -> bool {
        self.link(direction).is_some()
    }

    /// Directions with a neighbour, `Up` first.
    pub fn neighbours(&self) -> SmallVec<[Direction; 2]> {
        [Direction::Up, Direction::Down]
            .into_iter()
            .filter(|&d| self.has_neighbour(d))
            .collect()
    }

    fn link(&self, direction: Direction) -> Option<&HaloLink> {
        match direction {
            Direction::Up => self.up.as_ref(),
            Direction::Down => self.down.as_ref(),
        }
    }

    /// Combined send + receive with the neighbour in `direction`.
    ///
    /// Sends `send` (this worker's boundary row facing that neighbour),
    /// then receives the neighbour's boundary row into `recv`. Both rows
    /// are tagged with `generation`; a row from any other generation is
    /// an [`CommError::OutOfOrder`] error. Returns the number of cells
    /// received.
    pub fn sendrecv(
        &self,
        direction: Direction,
        generation: Generation,
        send: &[Cell],
        recv: &mut [Cell],
    ) -> Result<usize, CommError> {
        let link = self.link(direction).ok_or(CommError::MissingPeer {
            rank: self.rank,
            direction,
        })?;
        let peer = worker_label(link.peer);
        let rank = Some(self.rank);

        link::send(
            &link.tx,
            HaloRow {
                generation,
                cells: send.to_vec(),
            },
            self.timeout,
            rank,
            &peer,
        )?;
        let row = link::recv(&link.rx, self.timeout, rank, &peer)?;

        if row.generation != generation {
            return Err(CommError::OutOfOrder {
                rank,
                expected: generation,
                got: row.generation,
            });
        }
        if row.cells.len() != recv.len() {
            return Err(CommError::PayloadSize {
                expected: recv.len(),
                got: row.cells.len(),
            });
        }
        recv.copy_from_slice(&row.cells);
        tracing::trace!(
            rank = self.rank.0,
            peer = link.peer.0,
            %direction,
            generation = generation.0,
            "halo exchanged"
        );
        Ok(row.cells.len())
    }

    fn recv_collective(&self) -> Result<Collective, CommError> {
        link::recv(&self.from_root, self.timeout, Some(self.rank), COORDINATOR)
    }

    fn send_collective(&self, msg: Collective) -> Result<(), CommError> {
        link::send(&self.to_root, msg, self.timeout, Some(self.rank), COORDINATOR)
    }

    fn check_generation(&self, msg: &Collective, expected: Generation) -> Result<(), CommError> {
        if msg.generation() != expected {
            return Err(CommError::OutOfOrder {
                rank: Some(self.rank),
                expected,
                got: msg.generation(),
            });
        }
        Ok(())
    }

    /// Receive this worker's band from the coordinator's scatter.
    pub fn recv_band(&self, generation: Generation) -> Result<Vec<Cell>, CommError> {
        let msg = self.recv_collective()?;
        self.check_generation(&msg, generation)?;
        match msg {
            Collective::Band { cells, .. } => Ok(cells),
            other => Err(CommError::Unexpected {
                rank: Some(self.rank),
                expected: "band",
                got: other.kind(),
            }),
        }
    }

    /// Contribute this worker's owned rows to the coordinator's gather.
    pub fn send_band(&self, generation: Generation, cells: &[Cell]) -> Result<(), CommError> {
        self.send_collective(Collective::Band {
            generation,
            cells: cells.to_vec(),
        })
    }

    /// Contribute a live-cell count to the coordinator's sum reduction.
    pub fn send_population(&self, generation: Generation, live: u64) -> Result<(), CommError> {
        self.send_collective(Collective::Population { generation, live })
    }

    /// Receive the coordinator's broadcast decision for `generation`.
    pub fn recv_verdict(&self, generation: Generation) -> Result<bool, CommError> {
        let msg = self.recv_collective()?;
        self.check_generation(&msg, generation)?;
        match msg {
            Collective::Verdict { proceed, .. } => Ok(proceed),
            other => Err(CommError::Unexpected {
                rank: Some(self.rank),
                expected: "verdict",
                got: other.kind(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Fabric;
    use std::thread;

    #[test]
    fn neighbours_swap_boundary_rows() {
        let (_root, mut peers) = Fabric::new(2).build();
        let lower = peers.pop().unwrap();
        let upper = peers.pop().unwrap();

        let h = thread::spawn(move || {
            let mut halo = [0u8; 3];
            lower
                .sendrecv(Direction::Up, Generation(0), &[1, 1, 0], &mut halo)
                .unwrap();
            halo
        });
        let mut halo = [0u8; 3];
        upper
            .sendrecv(Direction::Down, Generation(0), &[0, 1, 1], &mut halo)
            .unwrap();

        assert_eq!(halo, [1, 1, 0]);
        assert_eq!(h.join().unwrap(), [0, 1, 1]);
    }

    #[test]
    fn sendrecv_without_neighbour_fails() {
        let (_root, peers) = Fabric::new(2).build();
        let mut halo = [0u8; 2];
        let err = peers[0]
            .sendrecv(Direction::Up, Generation(0), &[1, 1], &mut halo)
            .unwrap_err();
        assert_eq!(
            err,
            CommError::MissingPeer {
                rank: Rank(0),
                direction: Direction::Up
            }
        );
    }

    #[test]
    fn exchange_order_does_not_change_halos() {
        // The middle rank exchanges bottom-then-top; its neighbours
        // exchange with it in the opposite order. Result must match the
        // top-then-bottom order.
        fn run(middle_first: Direction) -> ([u8; 2], [u8; 2]) {
            let (_root, peers) = Fabric::new(3).build();
            let mut it = peers.into_iter();
            let (p0, p1, p2) = (it.next().unwrap(), it.next().unwrap(), it.next().unwrap());
            let t0 = thread::spawn(move || {
                let mut h = [0u8; 2];
                p0.sendrecv(Direction::Down, Generation(4), &[1, 0], &mut h).unwrap();
            });
            let t2 = thread::spawn(move || {
                let mut h = [0u8; 2];
                p2.sendrecv(Direction::Up, Generation(4), &[0, 1], &mut h).unwrap();
            });
            let mut top = [9u8; 2];
            let mut bottom = [9u8; 2];
            for d in [middle_first, middle_first.opposite()] {
                match d {
                    Direction::Up => p1.sendrecv(d, Generation(4), &[1, 1], &mut top),
                    Direction::Down => p1.sendrecv(d, Generation(4), &[0, 0], &mut bottom),
                }
                .unwrap();
            }
            t0.join().unwrap();
            t2.join().unwrap();
            (top, bottom)
        }
        assert_eq!(run(Direction::Up), run(Direction::Down));
        assert_eq!(run(Direction::Up), ([1, 0], [0, 1]));
    }

    #[test]
    fn generation_mismatch_is_detected() {
        let (_root, mut peers) = Fabric::new(2).build();
        let lower = peers.pop().unwrap();
        let upper = peers.pop().unwrap();
        let h = thread::spawn(move || {
            let mut halo = [0u8; 1];
            let _ = lower.sendrecv(Direction::Up, Generation(1), &[1], &mut halo);
        });
        let mut halo = [0u8; 1];
        let err = upper
            .sendrecv(Direction::Down, Generation(2), &[1], &mut halo)
            .unwrap_err();
        h.join().unwrap();
        assert!(matches!(err, CommError::OutOfOrder { .. }));
    }

    #[test]
    fn silent_neighbour_times_out() {
        let (_root, mut peers) = Fabric::new(2)
            .with_timeout(Some(Duration::from_millis(20)))
            .build();
        let _lower = peers.pop().unwrap();
        let upper = peers.pop().unwrap();
        let mut halo = [0u8; 1];
        let err = upper
            .sendrecv(Direction::Down, Generation(0), &[1], &mut halo)
            .unwrap_err();
        assert!(matches!(
            err,
            CommError::Timeout {
                rank: Some(Rank(0)),
                ..
            }
        ));
    }

    #[test]
    fn dropping_root_raises_shutdown() {
        let (root, peers) = Fabric::new(2).build();
        assert!(peers.iter().all(|p| p.check_shutdown().is_ok()));
        drop(root);
        for p in &peers {
            assert!(matches!(
                p.check_shutdown(),
                Err(CommError::Disconnected { .. })
            ));
        }
    }

    #[test]
    fn departed_neighbour_is_a_disconnect() {
        let (_root, mut peers) = Fabric::new(2).build();
        let lower = peers.pop().unwrap();
        let upper = peers.pop().unwrap();
        drop(lower);
        let mut halo = [0u8; 1];
        let err = upper
            .sendrecv(Direction::Down, Generation(0), &[1], &mut halo)
            .unwrap_err();
        assert!(matches!(err, CommError::Disconnected { .. }));
    }
}

//! Wiring the coordinator and workers together.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded};
use strata_core::Rank;

use crate::message::{Collective, HaloRow};
use crate::peer::{HaloLink, PeerEndpoint};
use crate::root::RootEndpoint;

/// Builder for a coordinator plus `workers` ranks arranged in a vertical
/// chain.
///
/// # Examples
///
/// ```
/// use strata_comm::Fabric;
///
/// let (root, peers) = Fabric::new(3).build();
/// assert_eq!(root.size(), 3);
/// assert_eq!(peers.len(), 3);
/// assert_eq!(peers[1].neighbours().len(), 2);
/// assert_eq!(peers[2].neighbours().len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Fabric {
    workers: usize,
    timeout: Option<Duration>,
}

impl Fabric {
    /// A fabric for `workers` ranks with blocking (untimed) receives.
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            timeout: None,
        }
    }

    /// Bound every blocking worker-side send and receive by `timeout`.
    ///
    /// The coordinator's receives stay untimed; see [`RootEndpoint`].
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create all channels and hand out the endpoints, indexed by rank.
    pub fn build(self) -> (RootEndpoint, Vec<PeerEndpoint>) {
        let n = self.workers;
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut to_workers = Vec::with_capacity(n);
        let mut from_workers = Vec::with_capacity(n);
        let mut collective_ends = Vec::with_capacity(n);
        for _ in 0..n {
            let (down_tx, down_rx) = unbounded::<Collective>();
            let (up_tx, up_rx) = unbounded::<Collective>();
            to_workers.push(down_tx);
            from_workers.push(up_rx);
            collective_ends.push((up_tx, down_rx));
        }

        // One pair of capacity-1 channels per adjacent rank pair.
        let mut below_links: Vec<Option<HaloLink>> = (0..n).map(|_| None).collect();
        let mut above_links: Vec<Option<HaloLink>> = (0..n).map(|_| None).collect();
        for r in 1..n {
            let (up_tx, up_rx) = bounded::<HaloRow>(1);
            let (down_tx, down_rx) = bounded::<HaloRow>(1);
            // Rank r sends upward, rank r-1 receives from below.
            above_links[r] = Some(HaloLink::new(Rank(r - 1), up_tx, down_rx));
            below_links[r - 1] = Some(HaloLink::new(Rank(r), down_tx, up_rx));
        }

        let peers = collective_ends
            .into_iter()
            .zip(above_links.into_iter().zip(below_links))
            .enumerate()
            .map(|(r, ((to_root, from_root), (up, down)))| {
                PeerEndpoint::new(
                    Rank(r),
                    n,
                    self.timeout,
                    up,
                    down,
                    to_root,
                    from_root,
                    Arc::clone(&shutdown),
                )
            })
            .collect();

        let root = RootEndpoint::new(n, shutdown, to_workers, from_workers);
        (root, peers)
    }
}

//! Blocking send/receive with optional timeout, mapped onto [`CommError`].

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, SendTimeoutError, Sender};
use strata_core::{CommError, Rank};

/// Endpoint label used in error messages.
pub(crate) fn worker_label(rank: Rank) -> String {
    format!("worker {rank}")
}

pub(crate) const COORDINATOR: &str = "coordinator";

pub(crate) fn send<T>(
    tx: &Sender<T>,
    msg: T,
    timeout: Option<Duration>,
    rank: Option<Rank>,
    peer: &str,
) -> Result<(), CommError> {
    let disconnected = || CommError::Disconnected {
        rank,
        peer: peer.to_string(),
    };
    match timeout {
        None => tx.send(msg).map_err(|_| disconnected()),
        Some(waited) => tx.send_timeout(msg, waited).map_err(|e| match e {
            SendTimeoutError::Timeout(_) => CommError::Timeout {
                rank,
                peer: peer.to_string(),
                waited,
            },
            SendTimeoutError::Disconnected(_) => disconnected(),
        }),
    }
}

pub(crate) fn recv<T>(
    rx: &Receiver<T>,
    timeout: Option<Duration>,
    rank: Option<Rank>,
    peer: &str,
) -> Result<T, CommError> {
    let disconnected = || CommError::Disconnected {
        rank,
        peer: peer.to_string(),
    };
    match timeout {
        None => rx.recv().map_err(|_| disconnected()),
        Some(waited) => rx.recv_timeout(waited).map_err(|e| match e {
            RecvTimeoutError::Timeout => CommError::Timeout {
                rank,
                peer: peer.to_string(),
                waited,
            },
            RecvTimeoutError::Disconnected => disconnected(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recv_times_out() {
        let (_tx, rx) = crossbeam_channel::bounded::<u8>(1);
        let err = recv(&rx, Some(Duration::from_millis(5)), Some(Rank(1)), "worker 0")
            .unwrap_err();
        assert!(matches!(err, CommError::Timeout { rank: Some(Rank(1)), .. }));
    }

    #[test]
    fn recv_reports_disconnect() {
        let (tx, rx) = crossbeam_channel::bounded::<u8>(1);
        drop(tx);
        let err = recv(&rx, None, None, "worker 3").unwrap_err();
        assert_eq!(
            err,
            CommError::Disconnected {
                rank: None,
                peer: "worker 3".into()
            }
        );
    }

    #[test]
    fn send_times_out_when_full() {
        let (tx, _rx) = crossbeam_channel::bounded::<u8>(1);
        send(&tx, 1, Some(Duration::from_millis(5)), None, "worker 0").unwrap();
        let err = send(&tx, 2, Some(Duration::from_millis(5)), None, "worker 0").unwrap_err();
        assert!(matches!(err, CommError::Timeout { .. }));
    }
}

//! Message-passing fabric connecting the coordinator and its workers.
//!
//! Workers are threads standing in for processes: they share nothing
//! mutable and talk only through the channels built here. [`Fabric::build`]
//! wires one [`RootEndpoint`] for the coordinator and one [`PeerEndpoint`]
//! per worker rank:
//!
//! ```text
//!                 RootEndpoint (coordinator)
//!            scatter │ ▲ gather / reduce
//!        ┌───────────┼─┼────────────┐
//!        ▼           ▼ │            ▼
//!    rank 0 ◄──halo──► rank 1 ◄──halo──► rank 2
//! ```
//!
//! Halo links are bounded to one in-flight message per direction, and
//! [`PeerEndpoint::sendrecv`] always sends before it receives, so two
//! neighbours exchanging at the same generation never wait on each other.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod fabric;
mod link;
mod message;
mod peer;
mod root;

pub use fabric::Fabric;
pub use peer::PeerEndpoint;
pub use root::RootEndpoint;

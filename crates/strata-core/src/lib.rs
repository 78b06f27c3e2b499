//! Core types for the Strata distributed cellular-automaton engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the buffers every other crate moves around: the coordinator's
//! [`CellGrid`], a worker's [`HaloBuffer`], the [`PingPong`] double
//! buffer, finite [`Pattern`]s, rectangular [`Rect`] regions, the
//! strongly-typed [`Generation`] and [`Rank`] ids, and the error
//! taxonomy shared by the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod halo;
pub mod id;
pub mod pattern;
pub mod pingpong;
pub mod region;

pub use error::{CommError, ConfigError, SimError, VerificationMismatch};
pub use grid::{Cell, CellGrid, ALIVE, DEAD};
pub use halo::{Direction, HaloBuffer};
pub use id::{Generation, Rank};
pub use pattern::{Pattern, PlacementPolicy};
pub use pingpong::PingPong;
pub use region::Rect;

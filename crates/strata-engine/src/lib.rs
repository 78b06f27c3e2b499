//! Distributed Game of Life engine.
//!
//! A [`Simulation`] splits a global grid into contiguous row bands
//! ([`Partition`]), hands one band to each worker thread, and runs a
//! fixed number of generations. Every generation each worker exchanges
//! halo rows with its vertical neighbours, applies the update kernel to
//! its owned rows, and swaps its buffers. At a caller-chosen cadence the
//! [`Coordinator`] gathers the bands back into the global grid and
//! evaluates population [`Checkpoint`]s.
//!
//! # Roles
//!
//! The global grid exists only inside [`Coordinator`]; workers only ever
//! see their own band plus two halo rows. There is no runtime rank check
//! deciding who touches the global grid: the types don't allow anyone
//! else to.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod checkpoint;
pub mod config;
pub mod coordinator;
pub mod driver;
pub mod metrics;
pub mod partition;
pub mod worker;

pub use checkpoint::{Checkpoint, CheckpointWhen, Checkpoints, Evaluation};
pub use config::SimConfig;
pub use coordinator::Coordinator;
pub use driver::Simulation;
pub use metrics::{RunReport, WorkerMetrics};
pub use partition::{Band, Partition};
pub use strata_kernel::KernelMode;

//! The Local Update Kernel.
//!
//! Pure computation over one worker's [`HaloBuffer`](strata_core::HaloBuffer):
//! given valid halo rows, produce the next generation of the owned rows.
//! No communication happens here.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod kernel;
pub mod rule;

pub use kernel::{update_band, KernelMode};
pub use rule::next_state;

//! Band-local update over a worker's owned rows.
//!
//! Reads the current buffer (owned rows plus halo rows) and writes only
//! the owned rows of the next buffer. Halo rows of the next buffer are
//! left alone; the following halo exchange fills them.
//!
//! Columns use closed boundaries: a neighbour at column `-1` or `cols`
//! does not exist and counts as dead.

use rayon::prelude::*;
use strata_core::{Cell, HaloBuffer, DEAD};

use crate::rule::next_state;

/// How the owned rows are scheduled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum KernelMode {
    /// One row after another on the calling thread.
    #[default]
    Serial,
    /// Rows split across the rayon pool. Rows are write-independent, so
    /// the result is identical to `Serial`.
    Parallel,
}

/// Compute the next generation of `current`'s owned rows into `next`.
///
/// # Panics
///
/// Panics if the two buffers do not have the same shape.
pub fn update_band(current: &HaloBuffer, next: &mut HaloBuffer, mode: KernelMode) {
    assert_eq!(
        (current.internal_rows(), current.cols()),
        (next.internal_rows(), next.cols()),
        "current and next buffers differ in shape"
    );
    let cols = current.cols();
    let owned = next.owned_mut();
    match mode {
        KernelMode::Serial => owned
            .chunks_mut(cols)
            .enumerate()
            .for_each(|(i, out)| update_row(current, i + 1, out)),
        KernelMode::Parallel => owned
            .par_chunks_mut(cols)
            .enumerate()
            .for_each(|(i, out)| update_row(current, i + 1, out)),
    }
}

/// Update local row `row` (1-based into the owned rows) into `out`.
fn update_row(current: &HaloBuffer, row: usize, out: &mut [Cell]) {
    let above = current.row(row - 1);
    let mid = current.row(row);
    let below = current.row(row + 1);
    let last = out.len() - 1;
    for (c, cell) in out.iter_mut().enumerate() {
        let lo = c.saturating_sub(1);
        let hi = (c + 1).min(last);
        let mut live = 0u8;
        for n in lo..=hi {
            live += u8::from(above[n] != DEAD) + u8::from(below[n] != DEAD);
            if n != c {
                live += u8::from(mid[n] != DEAD);
            }
        }
        *cell = next_state(mid[c], live);
    }
}

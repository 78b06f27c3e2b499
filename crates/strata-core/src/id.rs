//! Strongly-typed identifiers for generations and worker ranks.

use std::fmt;

/// Monotonically increasing generation counter.
///
/// Generation 0 is the seeded grid; generation `k` is the state after
/// `k` applications of the update rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(pub u64);

impl Generation {
    /// The seeded, not-yet-updated state.
    pub const ZERO: Self = Self(0);

    /// The generation after this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Generation {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Position of a worker in the decomposition, ordered top to bottom.
///
/// Rank `r` owns the `r`-th band of rows. The coordinator has no rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub usize);

impl Rank {
    /// Rank of the band directly above, if any.
    pub fn above(self) -> Option<Self> {
        self.0.checked_sub(1).map(Self)
    }

    /// Rank of the band directly below, if any, in a decomposition of `size` workers.
    pub fn below(self, size: usize) -> Option<Self> {
        let next = self.0 + 1;
        (next < size).then_some(Self(next))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Rank {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

//! Two-buffer ping-pong with O(1) role swap.
//!
//! One buffer is *current* (readable, last finalized generation), the
//! other is *next* (written by the update). [`PingPong::swap`] flips a
//! flag; no cells are copied.

/// A pair of buffers that alternate between the current and next roles.
#[derive(Clone, Debug)]
pub struct PingPong<T> {
    a: T,
    b: T,
    /// Which buffer is current (false = A current, true = B current).
    b_is_current: bool,
}

impl<T> PingPong<T> {
    /// Start with `current` as the current buffer and `next` as scratch.
    pub fn new(current: T, next: T) -> Self {
        Self {
            a: current,
            b: next,
            b_is_current: false,
        }
    }

    /// The current buffer.
    pub fn current(&self) -> &T {
        if self.b_is_current {
            &self.b
        } else {
            &self.a
        }
    }

    /// Mutable access to the current buffer (halo rows are refreshed here).
    pub fn current_mut(&mut self) -> &mut T {
        if self.b_is_current {
            &mut self.b
        } else {
            &mut self.a
        }
    }

    /// Borrow current for reading and next for writing at the same time.
    pub fn split(&mut self) -> (&T, &mut T) {
        if self.b_is_current {
            (&self.b, &mut self.a)
        } else {
            (&self.a, &mut self.b)
        }
    }

    /// Promote next to current.
    pub fn swap(&mut self) {
        self.b_is_current = !self.b_is_current;
    }

    /// Consume the pair, returning the current buffer.
    pub fn into_current(self) -> T {
        if self.b_is_current {
            self.b
        } else {
            self.a
        }
    }
}

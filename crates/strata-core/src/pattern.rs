//! Finite bit-matrix patterns and how they are placed onto a grid.

use crate::grid::{Cell, ALIVE, DEAD};
use crate::region::Rect;

/// What to do with pattern cells that land outside the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PlacementPolicy {
    /// Refuse the whole placement with
    /// [`ConfigError::PatternOutOfBounds`](crate::ConfigError::PatternOutOfBounds).
    #[default]
    Reject,
    /// Write the in-range part and drop the rest.
    Clip,
}

/// A fixed `height x width` matrix of cell states.
///
/// Patterns are supplied by an external provider (glider, beehive, ...);
/// the engine only needs the dimensions and the cell values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl Pattern {
    /// Build a pattern from a table of rows. Any non-zero entry is alive.
    ///
    /// ```
    /// use strata_core::Pattern;
    ///
    /// let blinker = Pattern::from_rows(&[[1, 1, 1]]);
    /// assert_eq!((blinker.height(), blinker.width()), (1, 3));
    /// assert_eq!(blinker.population(), 3);
    /// ```
    pub fn from_rows<const W: usize>(rows: &[[u8; W]]) -> Self {
        let cells = rows
            .iter()
            .flat_map(|row| row.iter())
            .map(|&v| if v != 0 { ALIVE } else { DEAD })
            .collect();
        Self {
            height: rows.len(),
            width: W,
            cells,
        }
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// State of the cell at pattern-local `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` is outside the pattern.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(row < self.height && col < self.width);
        self.cells[row * self.width + col]
    }

    /// Live cells in the pattern.
    pub fn population(&self) -> u64 {
        self.cells.iter().map(|&c| u64::from(c)).sum()
    }

    /// The rectangle the pattern covers when its top-left corner is at
    /// `(row, col)`.
    pub fn footprint_at(&self, row: usize, col: usize) -> Rect {
        Rect::new(row, col, self.height, self.width)
    }
}

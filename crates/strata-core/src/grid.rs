//! The coordinator-owned global grid.
//!
//! [`CellGrid`] is a single contiguous row-major allocation. Bands of
//! consecutive rows are therefore contiguous slices, which is what makes
//! scatter and gather plain slice copies.

use std::fmt;

use crate::error::ConfigError;
use crate::pattern::{Pattern, PlacementPolicy};
use crate::region::Rect;

/// State of one cell: [`ALIVE`] or [`DEAD`].
pub type Cell = u8;

/// A dead cell.
pub const DEAD: Cell = 0;

/// A live cell.
pub const ALIVE: Cell = 1;

/// Allocate `cells` dead cells, reporting allocation failure instead of
/// aborting.
pub(crate) fn alloc_cells(cells: usize) -> Result<Vec<Cell>, ConfigError> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(cells)
        .map_err(|_| ConfigError::AllocationFailed { cells })?;
    buf.resize(cells, DEAD);
    Ok(buf)
}

/// Product of two dimensions, or `AllocationFailed` on overflow.
pub(crate) fn cell_count(rows: usize, cols: usize) -> Result<usize, ConfigError> {
    rows.checked_mul(cols)
        .ok_or(ConfigError::AllocationFailed { cells: usize::MAX })
}

/// A fixed-size `rows x cols` grid of cells, all dead at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct CellGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Allocate an all-dead grid.
    ///
    /// Returns `Err(ConfigError::EmptyGrid)` if either dimension is zero
    /// and `Err(ConfigError::AllocationFailed)` if the buffer cannot be
    /// allocated.
    pub fn new(rows: usize, cols: usize) -> Result<Self, ConfigError> {
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyGrid { rows, cols });
        }
        let cells = alloc_cells(cell_count(rows, cols)?)?;
        Ok(Self { rows, cols, cells })
    }

    /// Build a grid by evaluating `f(row, col)` for every cell.
    /// Any non-zero value is alive.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut f: impl FnMut(usize, usize) -> Cell,
    ) -> Result<Self, ConfigError> {
        let mut grid = Self::new(rows, cols)?;
        for r in 0..rows {
            for (c, cell) in grid.row_mut(r).iter_mut().enumerate() {
                *cell = u8::from(f(r, c) != DEAD);
            }
        }
        Ok(grid)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// State of the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` is outside the grid.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(row < self.rows && col < self.cols, "({row}, {col}) out of bounds");
        self.cells[row * self.cols + col]
    }

    /// Set the cell at `(row, col)`. Any non-zero value is stored as
    /// [`ALIVE`].
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` is outside the grid.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        assert!(row < self.rows && col < self.cols, "({row}, {col}) out of bounds");
        self.cells[row * self.cols + col] = u8::from(cell != DEAD);
    }

    /// Whether the cell at `(row, col)` is alive.
    pub fn is_alive(&self, row: usize, col: usize) -> bool {
        self.get(row, col) != DEAD
    }

    /// One row as a slice.
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// One row as a mutable slice.
    pub fn row_mut(&mut self, row: usize) -> &mut [Cell] {
        let start = row * self.cols;
        &mut self.cells[start..start + self.cols]
    }

    /// `count` consecutive rows starting at `start` as one contiguous slice.
    pub fn rows_slice(&self, start: usize, count: usize) -> &[Cell] {
        &self.cells[start * self.cols..(start + count) * self.cols]
    }

    /// Mutable variant of [`rows_slice`](Self::rows_slice). Raw writes
    /// are not normalized; readers treat any non-zero cell as alive.
    pub fn rows_slice_mut(&mut self, start: usize, count: usize) -> &mut [Cell] {
        &mut self.cells[start * self.cols..(start + count) * self.cols]
    }

    /// The whole grid in row-major order.
    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }

    /// Mutable row-major view, used as a gather destination. Readers
    /// treat any non-zero cell as alive.
    pub fn as_mut_slice(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Kill every cell.
    pub fn clear(&mut self) {
        self.cells.fill(DEAD);
    }

    /// Total live cells.
    pub fn population(&self) -> u64 {
        self.cells.iter().map(|&c| u64::from(c != DEAD)).sum()
    }

    /// Live cells inside `region`, clipped to the grid.
    pub fn population_in(&self, region: &Rect) -> u64 {
        let Some(r) = region.clipped(self.rows, self.cols) else {
            return 0;
        };
        (r.row..r.row + r.height)
            .map(|row| {
                self.row(row)[r.col..r.col + r.width]
                    .iter()
                    .map(|&c| u64::from(c != DEAD))
                    .sum::<u64>()
            })
            .sum()
    }

    /// Overlay `pattern` with its top-left corner at `(row, col)`.
    ///
    /// Pattern cells overwrite grid cells, dead ones included. Under
    /// [`PlacementPolicy::Reject`] nothing is written unless the whole
    /// pattern fits; under [`PlacementPolicy::Clip`] the out-of-range
    /// part is dropped. Returns the number of cells written.
    pub fn place(
        &mut self,
        pattern: &Pattern,
        row: usize,
        col: usize,
        policy: PlacementPolicy,
    ) -> Result<usize, ConfigError> {
        let footprint = pattern.footprint_at(row, col);
        if !footprint.fits_within(self.rows, self.cols) && policy == PlacementPolicy::Reject {
            return Err(ConfigError::PatternOutOfBounds {
                row,
                col,
                height: pattern.height(),
                width: pattern.width(),
                rows: self.rows,
                cols: self.cols,
            });
        }
        let Some(visible) = footprint.clipped(self.rows, self.cols) else {
            return Ok(0);
        };
        for pr in 0..visible.height {
            let dest = self.row_mut(row + pr);
            for pc in 0..visible.width {
                dest[col + pc] = pattern.get(pr, pc);
            }
        }
        Ok(visible.height * visible.width)
    }
}

impl fmt::Debug for CellGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellGrid")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("population", &self.population())
            .finish()
    }
}

/// Space-separated `0`/`1` rows, one line per grid row.
impl fmt::Display for CellGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for (c, cell) in self.row(r).iter().enumerate() {
                if c > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", u8::from(*cell != DEAD))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn beehive() -> Pattern {
        Pattern::from_rows(&[[0, 1, 1, 0], [1, 0, 0, 1], [0, 1, 1, 0]])
    }

    #[test]
    fn new_rejects_empty() {
        assert_eq!(
            CellGrid::new(0, 5).unwrap_err(),
            ConfigError::EmptyGrid { rows: 0, cols: 5 }
        );
        assert!(CellGrid::new(5, 0).is_err());
    }

    #[test]
    fn new_reports_overflowing_dimensions() {
        let err = CellGrid::new(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, ConfigError::AllocationFailed { .. }));
    }

    #[test]
    fn new_grid_is_dead() {
        let g = CellGrid::new(4, 6).unwrap();
        assert_eq!(g.population(), 0);
        assert_eq!(g.as_slice().len(), 24);
    }

    #[test]
    fn rows_slice_is_contiguous_band() {
        let g = CellGrid::from_fn(4, 3, |r, _| u8::from(r == 2)).unwrap();
        assert_eq!(g.rows_slice(2, 2), &[1, 1, 1, 0, 0, 0]);
        assert_eq!(g.row(2), &[1, 1, 1]);
    }

    #[test]
    fn place_reject_leaves_grid_untouched() {
        let mut g = CellGrid::new(5, 5).unwrap();
        let err = g.place(&beehive(), 3, 3, PlacementPolicy::Reject).unwrap_err();
        assert!(matches!(err, ConfigError::PatternOutOfBounds { .. }));
        assert_eq!(g.population(), 0);
    }

    #[test]
    fn place_clip_drops_overhang() {
        let mut g = CellGrid::new(5, 5).unwrap();
        let written = g.place(&beehive(), 3, 3, PlacementPolicy::Clip).unwrap();
        assert_eq!(written, 4);
        // Visible part: rows 0..2, cols 0..2 of the pattern.
        assert_eq!(g.population(), 2);
        assert!(g.is_alive(3, 4));
        assert!(g.is_alive(4, 3));
    }

    #[test]
    fn place_clip_fully_outside_writes_nothing() {
        let mut g = CellGrid::new(5, 5).unwrap();
        assert_eq!(g.place(&beehive(), 9, 0, PlacementPolicy::Clip).unwrap(), 0);
    }

    #[test]
    fn population_in_counts_footprint() {
        let mut g = CellGrid::new(20, 20).unwrap();
        let p = beehive();
        g.place(&p, 10, 10, PlacementPolicy::Reject).unwrap();
        g.set(0, 0, ALIVE);
        assert_eq!(g.population(), 7);
        assert_eq!(g.population_in(&p.footprint_at(10, 10)), 6);
        assert_eq!(g.population_in(&Rect::new(18, 18, 5, 5)), 0);
    }

    #[test]
    fn set_normalizes_to_alive() {
        let mut g = CellGrid::new(4, 4).unwrap();
        for r in 0..4 {
            for c in 0..4 {
                g.set(r, c, 255);
            }
        }
        assert_eq!(g.get(2, 3), ALIVE);
        assert_eq!(g.population(), 16);
        g.set(2, 3, DEAD);
        assert!(!g.is_alive(2, 3));
        assert_eq!(g.population(), 15);
    }

    #[test]
    fn raw_writes_count_once_per_cell() {
        let mut g = CellGrid::new(2, 3).unwrap();
        g.as_mut_slice().fill(5);
        g.set(0, 0, DEAD);
        assert_eq!(g.population(), 5);
        assert_eq!(g.population_in(&Rect::new(0, 0, 1, 3)), 2);
        assert_eq!(g.to_string(), "0 1 1\n1 1 1\n");
    }

    #[test]
    fn display_matches_row_format() {
        let g = CellGrid::from_fn(2, 3, |r, c| u8::from(r == c)).unwrap();
        assert_eq!(g.to_string(), "1 0 0\n0 1 0\n");
    }

    proptest! {
        #[test]
        fn population_in_whole_grid_equals_population(
            rows in 1usize..12,
            cols in 1usize..12,
            seed in any::<u64>(),
        ) {
            let g = CellGrid::from_fn(rows, cols, |r, c| {
                ((seed >> ((r * cols + c) % 64)) & 1) as u8
            }).unwrap();
            prop_assert_eq!(g.population_in(&Rect::new(0, 0, rows, cols)), g.population());
        }
    }
}

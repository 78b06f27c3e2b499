//! A worker's local buffer: its owned band plus one halo row on each side.
//!
//! # Layout
//!
//! ```text
//! row 0                  top halo      (copy of rank-1's last owned row)
//! rows 1..=internal      owned rows    (authoritative)
//! row internal+1         bottom halo   (copy of rank+1's first owned row)
//! ```
//!
//! At the absolute top and bottom of the grid there is no neighbour; the
//! corresponding halo row stays dead for the lifetime of the buffer.

use std::fmt;

use crate::error::{CommError, ConfigError};
use crate::grid::{alloc_cells, cell_count, Cell, DEAD};

/// Which vertical neighbour a halo row faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward rank `r - 1` (smaller global row indices).
    Up,
    /// Toward rank `r + 1` (larger global row indices).
    Down,
}

impl Direction {
    /// The direction the neighbour sees us in.
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "above"),
            Self::Down => write!(f, "below"),
        }
    }
}

/// `internal_rows + 2` rows of `cols` cells, contiguous and row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HaloBuffer {
    internal_rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl HaloBuffer {
    /// Allocate an all-dead buffer for a band of `internal_rows` rows.
    pub fn new(internal_rows: usize, cols: usize) -> Result<Self, ConfigError> {
        if internal_rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: internal_rows,
                cols,
            });
        }
        let cells = alloc_cells(cell_count(internal_rows + 2, cols)?)?;
        Ok(Self {
            internal_rows,
            cols,
            cells,
        })
    }

    /// Number of owned rows.
    pub fn internal_rows(&self) -> usize {
        self.internal_rows
    }

    /// Owned rows plus both halo rows.
    pub fn local_rows(&self) -> usize {
        self.internal_rows + 2
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Local row `row` (0 is the top halo).
    pub fn row(&self, row: usize) -> &[Cell] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Mutable local row `row` (0 is the top halo).
    pub fn row_mut(&mut self, row: usize) -> &mut [Cell] {
        let start = row * self.cols;
        &mut self.cells[start..start + self.cols]
    }

    /// Cell at local `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.row(row)[col]
    }

    /// The whole buffer, halos included.
    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }

    /// Owned rows as one contiguous slice.
    pub fn owned(&self) -> &[Cell] {
        &self.cells[self.cols..(self.internal_rows + 1) * self.cols]
    }

    /// Owned rows as one contiguous mutable slice. Halo rows are not reachable
    /// through it.
    pub fn owned_mut(&mut self) -> &mut [Cell] {
        let cols = self.cols;
        let end = (self.internal_rows + 1) * cols;
        &mut self.cells[cols..end]
    }

    /// Overwrite the owned rows with a band received from the coordinator.
    pub fn load_owned(&mut self, band: &[Cell]) -> Result<(), CommError> {
        let expected = self.internal_rows * self.cols;
        if band.len() != expected {
            return Err(CommError::PayloadSize {
                expected,
                got: band.len(),
            });
        }
        self.owned_mut().copy_from_slice(band);
        Ok(())
    }

    /// The owned row a neighbour in `direction` needs as its halo:
    /// the first owned row for `Up`, the last for `Down`.
    pub fn boundary_row(&self, direction: Direction) -> &[Cell] {
        match direction {
            Direction::Up => self.row(1),
            Direction::Down => self.row(self.internal_rows),
        }
    }

    /// The halo row facing `direction`.
    pub fn halo(&self, direction: Direction) -> &[Cell] {
        match direction {
            Direction::Up => self.row(0),
            Direction::Down => self.row(self.internal_rows + 1),
        }
    }

    /// Mutable halo row facing `direction`.
    pub fn halo_mut(&mut self, direction: Direction) -> &mut [Cell] {
        match direction {
            Direction::Up => self.row_mut(0),
            Direction::Down => {
                let last = self.internal_rows + 1;
                self.row_mut(last)
            }
        }
    }

    /// The boundary row facing `direction` (to send) together with the
    /// halo row facing `direction` (to receive into), borrowed at once.
    pub fn exchange_rows(&mut self, direction: Direction) -> (&[Cell], &mut [Cell]) {
        let cols = self.cols;
        match direction {
            Direction::Up => {
                let (halo, rest) = self.cells.split_at_mut(cols);
                (&rest[..cols], halo)
            }
            Direction::Down => {
                let split = (self.internal_rows + 1) * cols;
                let (rest, halo) = self.cells.split_at_mut(split);
                (&rest[split - cols..], halo)
            }
        }
    }

    /// Live cells in the owned rows.
    pub fn population(&self) -> u64 {
        self.owned().iter().map(|&c| u64::from(c != DEAD)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ALIVE;

    #[test]
    fn layout_has_two_halo_rows() {
        let b = HaloBuffer::new(4, 5).unwrap();
        assert_eq!(b.local_rows(), 6);
        assert_eq!(b.as_slice().len(), 30);
        assert_eq!(b.owned().len(), 20);
    }

    #[test]
    fn load_owned_skips_halos() {
        let mut b = HaloBuffer::new(2, 3).unwrap();
        b.load_owned(&[1, 0, 1, 0, 1, 0]).unwrap();
        assert_eq!(b.halo(Direction::Up), &[0, 0, 0]);
        assert_eq!(b.boundary_row(Direction::Up), &[1, 0, 1]);
        assert_eq!(b.boundary_row(Direction::Down), &[0, 1, 0]);
        assert_eq!(b.halo(Direction::Down), &[0, 0, 0]);
        assert_eq!(b.population(), 3);
    }

    #[test]
    fn load_owned_checks_length() {
        let mut b = HaloBuffer::new(2, 3).unwrap();
        assert_eq!(
            b.load_owned(&[1, 1]).unwrap_err(),
            CommError::PayloadSize {
                expected: 6,
                got: 2
            }
        );
    }

    #[test]
    fn exchange_rows_pair_boundary_with_halo() {
        let mut b = HaloBuffer::new(2, 2).unwrap();
        b.load_owned(&[1, 0, 0, 1]).unwrap();
        let (send, recv) = b.exchange_rows(Direction::Up);
        assert_eq!(send, &[1, 0]);
        recv.copy_from_slice(&[1, 1]);
        let (send, recv) = b.exchange_rows(Direction::Down);
        assert_eq!(send, &[0, 1]);
        recv.fill(ALIVE);
        assert_eq!(b.halo(Direction::Up), &[1, 1]);
        assert_eq!(b.halo(Direction::Down), &[1, 1]);
        assert_eq!(b.population(), 2);
    }

    #[test]
    fn halo_rows_are_not_counted() {
        let mut b = HaloBuffer::new(1, 2).unwrap();
        b.halo_mut(Direction::Up).fill(ALIVE);
        b.halo_mut(Direction::Down).fill(ALIVE);
        assert_eq!(b.population(), 0);
        assert_eq!(b.get(0, 1), ALIVE);
        assert_eq!(b.get(2, 0), ALIVE);
    }

    #[test]
    fn opposite_direction() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
    }
}

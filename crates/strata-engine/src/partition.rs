//! Row-band decomposition of the global grid.
//!
//! Worker `k` owns global rows `[k * band_rows, (k + 1) * band_rows)`.
//! Bands are disjoint, contiguous, ordered by rank, and cover every row.
//! Uneven splits are refused: there are no partial-row or ragged bands.

use strata_core::{Cell, CellGrid, ConfigError, Rank};

/// The rows owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Band {
    /// Owning worker.
    pub rank: Rank,
    /// First global row (inclusive).
    pub start_row: usize,
    /// Number of rows.
    pub rows: usize,
}

impl Band {
    /// One past the last global row.
    pub fn end_row(&self) -> usize {
        self.start_row + self.rows
    }

    /// Whether global row `row` belongs to this band.
    pub fn contains(&self, row: usize) -> bool {
        (self.start_row..self.end_row()).contains(&row)
    }
}

/// An even split of `rows` global rows across `workers` ranks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Partition {
    rows: usize,
    workers: usize,
    band_rows: usize,
}

impl Partition {
    /// Split `rows` rows across `workers` workers.
    ///
    /// # Errors
    ///
    /// `ZeroWorkers` if `workers == 0`, `EmptyGrid` if `rows == 0`, and
    /// `IndivisibleRows` if `rows % workers != 0`.
    pub fn new(rows: usize, workers: usize) -> Result<Self, ConfigError> {
        if workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if rows == 0 {
            return Err(ConfigError::EmptyGrid { rows, cols: 0 });
        }
        if rows % workers != 0 {
            return Err(ConfigError::IndivisibleRows { rows, workers });
        }
        Ok(Self {
            rows,
            workers,
            band_rows: rows / workers,
        })
    }

    /// Total rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of workers.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Rows per band.
    pub fn band_rows(&self) -> usize {
        self.band_rows
    }

    /// The band owned by `rank`.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is not a worker in this partition.
    pub fn band(&self, rank: Rank) -> Band {
        assert!(rank.0 < self.workers, "rank {rank} out of range");
        Band {
            rank,
            start_row: rank.0 * self.band_rows,
            rows: self.band_rows,
        }
    }

    /// All bands in rank order.
    pub fn bands(&self) -> impl Iterator<Item = Band> + '_ {
        (0..self.workers).map(|r| self.band(Rank(r)))
    }

    /// The rank owning global row `row`, if it is inside the grid.
    pub fn owner_of(&self, row: usize) -> Option<Rank> {
        (row < self.rows).then(|| Rank(row / self.band_rows))
    }

    /// Copy each band's rows out of `grid`, in rank order. No halo rows
    /// are included.
    ///
    /// # Errors
    ///
    /// `AllocationFailed` if a band buffer cannot be allocated. Nothing
    /// is returned unless every band was copied.
    ///
    /// # Panics
    ///
    /// Panics if `grid` does not have this partition's row count.
    pub fn split(&self, grid: &CellGrid) -> Result<Vec<Vec<Cell>>, ConfigError> {
        assert_eq!(grid.rows(), self.rows, "grid does not match partition");
        self.bands()
            .map(|band| {
                let src = grid.rows_slice(band.start_row, band.rows);
                let mut part = Vec::new();
                part.try_reserve_exact(src.len())
                    .map_err(|_| ConfigError::AllocationFailed { cells: src.len() })?;
                part.extend_from_slice(src);
                Ok(part)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strata_test_utils::random_grid;

    #[test]
    fn bands_cover_rows_in_order() {
        let p = Partition::new(12, 3).unwrap();
        let bands: Vec<Band> = p.bands().collect();
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0].start_row, 0);
        assert_eq!(bands[1].start_row, 4);
        assert_eq!(bands[2].end_row(), 12);
        assert!(bands.iter().all(|b| b.rows == 4));
    }

    #[test]
    fn owner_of_maps_rows_to_ranks() {
        let p = Partition::new(12, 3).unwrap();
        assert_eq!(p.owner_of(0), Some(Rank(0)));
        assert_eq!(p.owner_of(3), Some(Rank(0)));
        assert_eq!(p.owner_of(4), Some(Rank(1)));
        assert_eq!(p.owner_of(11), Some(Rank(2)));
        assert_eq!(p.owner_of(12), None);
    }

    #[test]
    fn zero_workers_rejected() {
        assert_eq!(Partition::new(4, 0), Err(ConfigError::ZeroWorkers));
    }

    #[test]
    fn split_copies_band_rows() {
        let grid = CellGrid::from_fn(4, 2, |r, _| u8::from(r % 2 == 0)).unwrap();
        let parts = Partition::new(4, 2).unwrap().split(&grid).unwrap();
        assert_eq!(parts, vec![vec![1, 1, 0, 0], vec![1, 1, 0, 0]]);
    }

    proptest! {
        #[test]
        fn indivisible_rows_always_rejected(rows in 1usize..200, workers in 1usize..32) {
            prop_assume!(rows % workers != 0);
            prop_assert_eq!(
                Partition::new(rows, workers),
                Err(ConfigError::IndivisibleRows { rows, workers })
            );
        }

        #[test]
        fn bands_are_disjoint_and_exhaustive(band_rows in 1usize..10, workers in 1usize..10) {
            let p = Partition::new(band_rows * workers, workers).unwrap();
            for row in 0..p.rows() {
                let owners: Vec<Band> = p.bands().filter(|b| b.contains(row)).collect();
                prop_assert_eq!(owners.len(), 1);
                prop_assert_eq!(Some(owners[0].rank), p.owner_of(row));
            }
        }

        #[test]
        fn split_concatenation_is_the_grid(
            band_rows in 1usize..6,
            workers in 1usize..6,
            cols in 1usize..8,
            seed in any::<u64>(),
        ) {
            let grid = random_grid(band_rows * workers, cols, 50, seed);
            let parts = Partition::new(grid.rows(), workers).unwrap().split(&grid).unwrap();
            prop_assert_eq!(parts.concat(), grid.as_slice().to_vec());
        }
    }
}

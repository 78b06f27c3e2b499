//! Rectangular grid regions.

/// An axis-aligned rectangle of cells, `height` rows by `width` columns,
/// with its top-left corner at `(row, col)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Top row (inclusive).
    pub row: usize,
    /// Left column (inclusive).
    pub col: usize,
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
}

impl Rect {
    /// Create a rectangle.
    pub fn new(row: usize, col: usize, height: usize, width: usize) -> Self {
        Self {
            row,
            col,
            height,
            width,
        }
    }

    /// Whether the rectangle covers no cells.
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Whether `(row, col)` lies inside the rectangle.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row
            && col >= self.col
            && row - self.row < self.height
            && col - self.col < self.width
    }

    /// Whether the rectangle lies entirely inside a `rows x cols` grid.
    pub fn fits_within(&self, rows: usize, cols: usize) -> bool {
        self.row
            .checked_add(self.height)
            .is_some_and(|end| end <= rows)
            && self.col.checked_add(self.width).is_some_and(|end| end <= cols)
    }

    /// The part of the rectangle inside a `rows x cols` grid, or `None`
    /// if nothing remains.
    pub fn clipped(&self, rows: usize, cols: usize) -> Option<Rect> {
        if self.row >= rows || self.col >= cols {
            return None;
        }
        let height = self.height.min(rows - self.row);
        let width = self.width.min(cols - self.col);
        let clipped = Rect::new(self.row, self.col, height, width);
        (!clipped.is_empty()).then_some(clipped)
    }
}

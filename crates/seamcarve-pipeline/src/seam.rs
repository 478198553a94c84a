//! Seam recovery: walk the cost table from the bottom row back to the
//! top, picking one column per row.
//!
//! The seam ends at the first column holding the minimum bottom-row
//! cost. Each row above continues from the cheapest of the (at most
//! three) cells over the column already chosen below it. Ties prefer
//! upper-left over straight up, and straight up over upper-right; this
//! order decides which of several equal-cost seams is removed.

use image::Rgb;

use crate::cost::CostTable;
use crate::types::{BufferKind, CarveError, RgbImage};

/// One column index per row, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seam(Vec<usize>);

impl Seam {
    /// Wrap column indices (one per row, top to bottom).
    ///
    /// No validation is performed; see [`Seam::is_connected`].
    #[must_use]
    pub const fn new(columns: Vec<usize>) -> Self {
        Self(columns)
    }

    /// Column indices, top row first.
    #[must_use]
    pub fn columns(&self) -> &[usize] {
        &self.0
    }

    /// Number of rows the seam covers.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the seam covers no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every column is below `width` and adjacent rows
    /// differ by at most one column.
    #[must_use]
    pub fn is_connected(&self, width: usize) -> bool {
        self.0.iter().all(|&c| c < width) && self.0.windows(2).all(|w| w[0].abs_diff(w[1]) <= 1)
    }

    /// Cumulative cost of the seam: its bottom cell in `table`.
    ///
    /// Returns `None` for an empty seam or one whose last column is out
    /// of range for `table`.
    #[must_use]
    pub fn cost(&self, table: &CostTable) -> Option<f64> {
        let &col = self.0.last()?;
        table.bottom_row().get(col).copied()
    }

    /// Paint the seam's pixels in `image` with `colour`.
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::SeamMismatch`] if the seam does not fit the
    /// image; `image` is left untouched in that case.
    pub fn paint(&self, image: &mut RgbImage, colour: Rgb<u8>) -> Result<(), CarveError> {
        let (width, height) = image.dimensions();
        if self.0.len() != height as usize || self.0.iter().any(|&c| c >= width as usize) {
            return Err(CarveError::SeamMismatch {
                expected_rows: height,
                rows: self.0.len(),
                width,
            });
        }
        for (y, &x) in (0..height).zip(&self.0) {
            #[allow(clippy::cast_possible_truncation)] // x < width, which is a u32
            image.put_pixel(x as u32, y, colour);
        }
        Ok(())
    }
}

/// First column holding the smallest value.
fn first_minimum(row: &[f64]) -> usize {
    let mut best = f64::INFINITY;
    let mut index = 0;
    for (col, &cost) in row.iter().enumerate() {
        if cost < best {
            best = cost;
            index = col;
        }
    }
    index
}

/// Column in row `row` that the seam passes through, given it passes
/// through column `below` in the next row down.
fn step_up(table: &CostTable, row: usize, below: usize) -> usize {
    let width = table.width();
    let center = table.get(row, below);
    let left = if below > 0 {
        table.get(row, below - 1)
    } else {
        f64::INFINITY
    };
    let right = if below + 1 < width {
        table.get(row, below + 1)
    } else {
        f64::INFINITY
    };

    if below > 0 && left <= center && left <= right {
        below - 1
    } else if center <= left && center <= right {
        below
    } else {
        below + 1
    }
}

/// Recover the minimum-cost seam from a completed cost table.
///
/// # Errors
///
/// Returns [`CarveError::EmptyImage`] if the table has no cells and
/// [`CarveError::Allocation`] if the seam cannot be allocated.
pub fn recover(table: &CostTable) -> Result<Seam, CarveError> {
    let (width, height) = (table.width(), table.height());
    if width == 0 || height == 0 {
        return Err(CarveError::EmptyImage);
    }

    let mut columns = Vec::new();
    columns
        .try_reserve_exact(height)
        .map_err(|_| CarveError::Allocation(BufferKind::Seam))?;
    columns.resize(height, 0);

    columns[height - 1] = first_minimum(table.bottom_row());
    for row in (0..height - 1).rev() {
        columns[row] = step_up(table, row, columns[row + 1]);
    }

    Ok(Seam(columns))
}

//! Owned, dense, row-major two-dimensional buffer.
//!
//! Backs both the energy map (`Grid<u8>`) and the cost table
//! (`Grid<f64>`). Construction reserves its storage with
//! [`Vec::try_reserve_exact`] so an allocation failure surfaces as a
//! [`CarveError::Allocation`] instead of aborting the process.

use std::ops::{Index, IndexMut};

use crate::types::{BufferKind, CarveError};

/// A `height` x `width` grid addressed by `(row, col)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Allocate a grid with every cell set to `fill`.
    ///
    /// # Errors
    ///
    /// Returns [`CarveError::Allocation`] tagged with `kind` if the
    /// cell count overflows `usize` or the storage cannot be reserved.
    pub fn try_filled(
        height: usize,
        width: usize,
        fill: T,
        kind: BufferKind,
    ) -> Result<Self, CarveError> {
        let len = height
            .checked_mul(width)
            .ok_or(CarveError::Allocation(kind))?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| CarveError::Allocation(kind))?;
        cells.resize(len, fill);
        Ok(Self {
            width,
            height,
            cells,
        })
    }
}

impl<T> Grid<T> {
    /// Wrap an existing row-major buffer.
    ///
    /// Returns `None` if `cells.len() != height * width`.
    #[must_use]
    pub fn from_cells(height: usize, width: usize, cells: Vec<T>) -> Option<Self> {
        (height.checked_mul(width) == Some(cells.len())).then_some(Self {
            width,
            height,
            cells,
        })
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns `true` if the grid has no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// One row as a slice.
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.height()`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[T] {
        let start = row * self.width;
        &self.cells[start..start + self.width]
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Mutable access to all cells in row-major order.
    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    // Keep the index math in one place.
    const fn offset(&self, row: usize, col: usize) -> usize {
        row * self.width + col
    }
}

impl<T> Index<(usize, usize)> for Grid<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(row < self.height && col < self.width);
        &self.cells[self.offset(row, col)]
    }
}

impl<T> IndexMut<(usize, usize)> for Grid<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(row < self.height && col < self.width);
        let offset = self.offset(row, col);
        &mut self.cells[offset]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn filled_grid_has_requested_shape() {
        let grid = Grid::try_filled(3, 5, 7u8, BufferKind::EnergyMap).unwrap();
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.cells().len(), 15);
        assert!(grid.cells().iter().all(|&c| c == 7));
    }

    #[test]
    fn index_is_row_major() {
        let grid = Grid::from_cells(2, 3, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(grid[(0, 2)], 2);
        assert_eq!(grid[(1, 0)], 3);
        assert_eq!(grid.row(1), &[3, 4, 5]);
    }

    #[test]
    fn index_mut_writes_single_cell() {
        let mut grid = Grid::try_filled(2, 2, 0.0f64, BufferKind::CostTable).unwrap();
        grid[(1, 0)] = 4.5;
        assert_eq!(grid.cells(), &[0.0, 0.0, 4.5, 0.0]);
    }

    #[test]
    fn from_cells_rejects_wrong_length() {
        assert!(Grid::from_cells(2, 3, vec![0u8; 5]).is_none());
    }

    #[test]
    fn overflowing_size_reports_allocation_failure() {
        let result = Grid::try_filled(usize::MAX, 2, 0u8, BufferKind::CostTable);
        assert!(matches!(
            result,
            Err(CarveError::Allocation(BufferKind::CostTable))
        ));
    }

    #[test]
    fn zero_sized_grid_is_empty() {
        let grid = Grid::try_filled(0, 4, 0u8, BufferKind::EnergyMap).unwrap();
        assert!(grid.is_empty());
    }
}

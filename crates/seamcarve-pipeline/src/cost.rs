//! Cumulative minimum-cost table.
//!
//! Cell `(i, j)` holds the least total energy of any path from row 0 to
//! `(i, j)` that moves down one row per step and sideways by at most one
//! column:
//!
//! ```text
//! cost[0][j] = energy[0][j]
//! cost[i][j] = energy[i][j] + min(cost[i-1][j-1], cost[i-1][j], cost[i-1][j+1])
//! ```
//!
//! Out-of-range neighbours at the left and right edges are left out of
//! the minimum rather than padded. Ties do not matter here; the
//! tie-break that decides the seam is applied in [`crate::seam`].

use crate::energy::EnergyMap;
use crate::grid::Grid;
use crate::types::{BufferKind, CarveError};

/// Dynamic-programming table of cumulative seam costs.
#[derive(Debug, Clone, PartialEq)]
pub struct CostTable(Grid<f64>);

impl CostTable {
    /// Wrap a grid of precomputed costs.
    #[must_use]
    pub const fn from_grid(grid: Grid<f64>) -> Self {
        Self(grid)
    }

    /// Cost at `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0[(row, col)]
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.0.width()
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.0.height()
    }

    /// The underlying grid.
    #[must_use]
    pub const fn grid(&self) -> &Grid<f64> {
        &self.0
    }

    /// The last row, where every seam ends.
    #[must_use]
    pub fn bottom_row(&self) -> &[f64] {
        match self.height() {
            0 => &[],
            h => self.0.row(h - 1),
        }
    }
}

/// Smallest of the (up to three) cells above column `col`.
fn min_above(prev: &[f64], col: usize) -> f64 {
    let lo = col.saturating_sub(1);
    let hi = (col + 1).min(prev.len() - 1);
    prev[lo..=hi].iter().copied().fold(f64::INFINITY, f64::min)
}

fn fill_row(prev: &[f64], energy: &[u8], out: &mut [f64]) {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        out.par_iter_mut()
            .enumerate()
            .for_each(|(col, cell)| *cell = f64::from(energy[col]) + min_above(prev, col));
    }
    #[cfg(not(feature = "parallel"))]
    for (col, cell) in out.iter_mut().enumerate() {
        *cell = f64::from(energy[col]) + min_above(prev, col);
    }
}

/// Build the cost table for an energy map.
///
/// # Errors
///
/// Returns [`CarveError::EmptyImage`] if the map has no cells and
/// [`CarveError::Allocation`] if the table cannot be allocated.
pub fn build(energy: &EnergyMap) -> Result<CostTable, CarveError> {
    let (width, height) = (energy.width(), energy.height());
    if width == 0 || height == 0 {
        return Err(CarveError::EmptyImage);
    }
    let mut grid = Grid::try_filled(height, width, 0.0, BufferKind::CostTable)?;
    let cells = grid.cells_mut();

    for (cell, &e) in cells[..width].iter_mut().zip(energy.grid().row(0)) {
        *cell = f64::from(e);
    }

    for row in 1..height {
        let (above, rest) = cells.split_at_mut(row * width);
        let prev = &above[(row - 1) * width..];
        fill_row(prev, energy.grid().row(row), &mut rest[..width]);
    }

    Ok(CostTable(grid))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn energy_map(height: usize, width: usize, cells: &[u8]) -> EnergyMap {
        EnergyMap::from_grid(Grid::from_cells(height, width, cells.to_vec()).unwrap())
    }

    #[test]
    fn first_row_copies_energy() {
        let energy = energy_map(1, 4, &[3, 1, 4, 1]);
        let cost = build(&energy).unwrap();
        assert_eq!(cost.grid().cells(), &[3.0, 1.0, 4.0, 1.0]);
    }

    #[test]
    fn rows_accumulate_minimum_upper_neighbour() {
        let energy = energy_map(3, 3, &[0, 44, 0, 44, 0, 44, 0, 44, 0]);
        let cost = build(&energy).unwrap();
        #[rustfmt::skip]
        let expected = [
            0.0, 44.0, 0.0,
            44.0, 0.0, 44.0,
            0.0, 44.0, 0.0,
        ];
        assert_eq!(cost.grid().cells(), &expected);
    }

    #[test]
    fn edge_columns_ignore_missing_neighbour() {
        // Left edge sees only columns 0 and 1; right edge only W-2 and W-1.
        let energy = energy_map(2, 4, &[9, 5, 7, 1, 0, 0, 0, 0]);
        let cost = build(&energy).unwrap();
        assert_eq!(cost.grid().row(1), &[5.0, 5.0, 1.0, 1.0]);
    }

    #[test]
    fn single_column_sums_straight_down() {
        let energy = energy_map(4, 1, &[1, 2, 3, 4]);
        let cost = build(&energy).unwrap();
        assert_eq!(cost.grid().cells(), &[1.0, 3.0, 6.0, 10.0]);
    }

    #[test]
    fn dimensions_match_energy_map() {
        let energy = energy_map(5, 3, &[1; 15]);
        let cost = build(&energy).unwrap();
        assert_eq!((cost.height(), cost.width()), (5, 3));
    }

    #[test]
    fn bottom_row_is_last_row() {
        let energy = energy_map(2, 2, &[1, 2, 3, 4]);
        let cost = build(&energy).unwrap();
        assert_eq!(cost.bottom_row(), &[4.0, 5.0]);
    }

    #[test]
    fn empty_map_is_rejected() {
        let energy = energy_map(0, 0, &[]);
        assert!(matches!(build(&energy), Err(CarveError::EmptyImage)));
    }
}

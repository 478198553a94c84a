//! Energy estimation: colour image in, per-pixel edge strength out.
//!
//! Each pixel's energy is the magnitude of the colour gradient measured
//! with central differences over its immediate horizontal and vertical
//! neighbours. Neighbours wrap around the image edges, so column 0
//! is compared against column `W-1` and row 0 against row `H-1`.
//!
//! ```text
//! sum_x = Δr_x² + Δg_x² + Δb_x²
//! sum_y = Δr_y² + Δg_y² + Δb_y²
//! e     = sqrt(sum_x + sum_y) / 10
//! ```
//!
//! This is the first step of a carving pass, before the cost table.

use image::{GrayImage, Luma};

use crate::grid::Grid;
use crate::types::{BufferKind, CarveError, RgbImage};

/// Divisor applied to the gradient magnitude before truncation.
pub const ENERGY_DIVISOR: f64 = 10.0;

/// Largest magnitude an 8-bit RGB image can produce:
/// `sqrt(6 * 255²) / 10`, about 62.46. Truncation into `u8` therefore
/// never overflows.
pub const MAX_MAGNITUDE: f64 = 62.461_988_440_971_04;

/// Per-pixel energy, one `u8` per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyMap(Grid<u8>);

impl EnergyMap {
    /// Wrap a grid of precomputed energies.
    #[must_use]
    pub const fn from_grid(grid: Grid<u8>) -> Self {
        Self(grid)
    }

    /// Energy at `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u8 {
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
    pub const fn grid(&self) -> &Grid<u8> {
        &self.0
    }

    /// Largest energy value in the map (0 for an empty map).
    #[must_use]
    pub fn max(&self) -> u8 {
        self.0.cells().iter().copied().max().unwrap_or(0)
    }

    /// Render the map as a grayscale image for inspection.
    ///
    /// Values are stretched so the largest energy becomes 255. An
    /// all-zero map renders black.
    #[must_use = "returns the rendered energy image"]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_gray_image(&self) -> GrayImage {
        let max = u16::from(self.max());
        let width = u32::try_from(self.width()).unwrap_or(u32::MAX);
        let height = u32::try_from(self.height()).unwrap_or(u32::MAX);
        GrayImage::from_fn(width, height, |x, y| {
            let e = u16::from(self.get(y as usize, x as usize));
            // e <= max, so the quotient fits in a u8.
            let v = if max == 0 { 0 } else { e * 255 / max };
            Luma([v as u8])
        })
    }
}

/// Gradient magnitude at `(row, col)` before truncation.
///
/// # Panics
///
/// Panics if `(row, col)` lies outside the image.
#[must_use]
pub fn magnitude(image: &RgbImage, row: u32, col: u32) -> f64 {
    let (w, h) = image.dimensions();
    let x_prev = if col == 0 { w - 1 } else { col - 1 };
    let x_next = if col == w - 1 { 0 } else { col + 1 };
    let y_prev = if row == 0 { h - 1 } else { row - 1 };
    let y_next = if row == h - 1 { 0 } else { row + 1 };

    let sum_x = squared_difference(
        &image.get_pixel(x_next, row).0,
        &image.get_pixel(x_prev, row).0,
    );
    let sum_y = squared_difference(
        &image.get_pixel(col, y_next).0,
        &image.get_pixel(col, y_prev).0,
    );

    f64::from(sum_x + sum_y).sqrt() / ENERGY_DIVISOR
}

/// `Σ (a[c] - b[c])²` over the three channels.
fn squared_difference(a: &[u8; 3], b: &[u8; 3]) -> u32 {
    a.iter()
        .zip(b)
        .map(|(&a, &b)| {
            let d = i32::from(a) - i32::from(b);
            d.unsigned_abs().pow(2)
        })
        .sum()
}

/// Narrow a magnitude into the stored 8-bit energy.
///
/// Truncates toward zero. Float-to-int `as` saturates, though
/// [`MAX_MAGNITUDE`] keeps 8-bit input far below 255.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn truncate(magnitude: f64) -> u8 {
    magnitude as u8
}

fn fill_row(image: &RgbImage, row: usize, out: &mut [u8]) {
    #[allow(clippy::cast_possible_truncation)]
    let row = row as u32;
    for (col, cell) in (0u32..).zip(out.iter_mut()) {
        *cell = truncate(magnitude(image, row, col));
    }
}

/// Compute the energy map of an image.
///
/// The output has the same height and width as `image`.
///
/// # Errors
///
/// Returns [`CarveError::EmptyImage`] if the image has zero width or
/// height, and [`CarveError::Allocation`] if the map cannot be
/// allocated.
pub fn estimate(image: &RgbImage) -> Result<EnergyMap, CarveError> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(CarveError::EmptyImage);
    }
    let (width, height) = (w as usize, h as usize);
    let mut grid = Grid::try_filled(height, width, 0u8, BufferKind::EnergyMap)?;

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        grid.cells_mut()
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(row, out)| fill_row(image, row, out));
    }
    #[cfg(not(feature = "parallel"))]
    for (row, out) in grid.cells_mut().chunks_mut(width).enumerate() {
        fill_row(image, row, out);
    }

    Ok(EnergyMap(grid))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use image::Rgb;

    use super::*;

    /// 3x3 black image with a white centre pixel.
    fn bright_centre() -> RgbImage {
        RgbImage::from_fn(3, 3, |x, y| {
            if (x, y) == (1, 1) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        })
    }

    #[test]
    fn output_dimensions_match_input() {
        let img = RgbImage::new(17, 5);
        let energy = estimate(&img).unwrap();
        assert_eq!(energy.width(), 17);
        assert_eq!(energy.height(), 5);
    }

    #[test]
    fn uniform_image_has_zero_energy() {
        let img = RgbImage::from_pixel(6, 4, Rgb([90, 12, 200]));
        let energy = estimate(&img).unwrap();
        assert!(energy.grid().cells().iter().all(|&e| e == 0));
    }

    #[test]
    fn bright_centre_lights_orthogonal_neighbours() {
        let energy = estimate(&bright_centre()).unwrap();
        // sqrt(3 * 255²) / 10 = 44.17 -> 44
        let expected = [0, 44, 0, 44, 0, 44, 0, 44, 0];
        assert_eq!(energy.grid().cells(), &expected);
    }

    #[test]
    fn differences_wrap_around_edges() {
        // Single row: columns 0 and 2 see each other across the edge.
        let img = RgbImage::from_fn(3, 1, |x, _| Rgb([[0, 100, 200][x as usize], 0, 0]));
        // col 0: next=1 (100), prev=2 (200) -> |Δ| = 100 -> 10.0
        // col 1: next=2 (200), prev=0 (0)   -> |Δ| = 200 -> 20.0
        // col 2: next=0 (0),   prev=1 (100) -> |Δ| = 100 -> 10.0
        let energy = estimate(&img).unwrap();
        assert_eq!(energy.grid().cells(), &[10, 20, 10]);
    }

    #[test]
    fn single_pixel_image_has_zero_energy() {
        let img = RgbImage::from_pixel(1, 1, Rgb([255, 0, 0]));
        let energy = estimate(&img).unwrap();
        assert_eq!(energy.grid().cells(), &[0]);
    }

    #[test]
    fn magnitude_is_not_truncated() {
        let m = magnitude(&bright_centre(), 0, 1);
        let expected = (3.0f64 * 255.0 * 255.0).sqrt() / 10.0;
        assert!((m - expected).abs() < 1e-12);
    }

    #[test]
    fn full_swing_on_both_axes_reaches_max_magnitude() {
        // Centre pixel sees black on its left and top, white on its
        // right and bottom.
        let img = RgbImage::from_fn(3, 3, |x, y| {
            if (x, y) == (2, 1) || (x, y) == (1, 2) {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        let m = magnitude(&img, 1, 1);
        assert!((m - MAX_MAGNITUDE).abs() < 1e-9);
        assert_eq!(estimate(&img).unwrap().get(1, 1), 62);
    }

    #[test]
    fn empty_image_is_rejected() {
        let img = RgbImage::new(0, 3);
        assert!(matches!(estimate(&img), Err(CarveError::EmptyImage)));
    }

    #[test]
    fn gray_rendering_stretches_to_full_range() {
        let energy = estimate(&bright_centre()).unwrap();
        let gray = energy.to_gray_image();
        assert_eq!(gray.dimensions(), (3, 3));
        assert_eq!(gray.get_pixel(1, 0).0[0], 255);
        assert_eq!(gray.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn gray_rendering_of_flat_map_is_black() {
        let energy = estimate(&RgbImage::new(4, 4)).unwrap();
        let gray = energy.to_gray_image();
        assert!(gray.pixels().all(|p| p.0[0] == 0));
    }
}

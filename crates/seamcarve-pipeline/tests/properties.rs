//! Property tests over random images.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::ops::Range;

use image::Rgb;
use proptest::prelude::*;
use seamcarve_pipeline::{CarveConfig, RgbImage, carve_to_width, cost, energy, remove, seam};

/// Random RGB image with the given width and height ranges.
fn rgb_image(widths: Range<u32>, heights: Range<u32>) -> impl Strategy<Value = RgbImage> {
    (widths, heights).prop_flat_map(|(w, h)| {
        prop::collection::vec(any::<u8>(), (w * h * 3) as usize)
            .prop_map(move |raw| RgbImage::from_raw(w, h, raw).unwrap())
    })
}

/// Leftmost column in `lo..=hi` holding the smallest value of `row`.
fn leftmost_min(row: &[f64], lo: usize, hi: usize) -> usize {
    (lo..=hi).fold(lo, |best, c| if row[c] < row[best] { c } else { best })
}

proptest! {
    #[test]
    fn removal_narrows_by_exactly_one(img in rgb_image(2..12, 1..8)) {
        let (w, h) = img.dimensions();
        let table = cost::build(&energy::estimate(&img).unwrap()).unwrap();
        let s = seam::recover(&table).unwrap();
        let out = remove::remove_seam(&img, &s).unwrap();
        prop_assert_eq!(out.dimensions(), (w - 1, h));
    }

    #[test]
    fn recovered_seam_is_connected(img in rgb_image(1..12, 1..10)) {
        let table = cost::build(&energy::estimate(&img).unwrap()).unwrap();
        let s = seam::recover(&table).unwrap();
        prop_assert_eq!(s.len(), img.height() as usize);
        prop_assert!(s.is_connected(img.width() as usize));
    }

    #[test]
    fn seam_is_optimal_with_leftmost_ties(img in rgb_image(1..10, 1..8)) {
        let map = energy::estimate(&img).unwrap();
        let table = cost::build(&map).unwrap();
        let s = seam::recover(&table).unwrap();
        let cols = s.columns();
        let width = table.width();
        let last = table.height() - 1;

        // Ends on the first cheapest bottom cell.
        prop_assert_eq!(cols[last], leftmost_min(table.bottom_row(), 0, width - 1));

        // Each row continues from the leftmost cheapest cell above.
        for r in 0..last {
            let below = cols[r + 1];
            let lo = below.saturating_sub(1);
            let hi = (below + 1).min(width - 1);
            prop_assert_eq!(cols[r], leftmost_min(table.grid().row(r), lo, hi));
        }

        // The seam's energies add up to its cost.
        let sum: f64 = cols
            .iter()
            .enumerate()
            .map(|(r, &c)| f64::from(map.get(r, c)))
            .sum();
        prop_assert_eq!(Some(sum), s.cost(&table));
    }

    #[test]
    fn removal_keeps_every_other_pixel_in_order(img in rgb_image(2..10, 1..8)) {
        let table = cost::build(&energy::estimate(&img).unwrap()).unwrap();
        let s = seam::recover(&table).unwrap();
        let out = remove::remove_seam(&img, &s).unwrap();
        for (y, &skip) in (0..img.height()).zip(s.columns()) {
            let expected: Vec<[u8; 3]> = (0..img.width())
                .filter(|&x| x as usize != skip)
                .map(|x| img.get_pixel(x, y).0)
                .collect();
            let actual: Vec<[u8; 3]> = (0..out.width()).map(|x| out.get_pixel(x, y).0).collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn uniform_image_has_zero_energy(
        w in 1u32..12,
        h in 1u32..12,
        colour in any::<[u8; 3]>(),
    ) {
        let img = RgbImage::from_pixel(w, h, Rgb(colour));
        let map = energy::estimate(&img).unwrap();
        prop_assert!(map.grid().cells().iter().all(|&e| e == 0));
    }

    #[test]
    fn carving_reaches_any_valid_target(img in rgb_image(1..10, 1..6), cut in 0u32..10) {
        let target = img.width().saturating_sub(cut).max(1);
        let result = carve_to_width(&img, &CarveConfig::new(target)).unwrap();
        prop_assert_eq!(result.image.dimensions(), (target, img.height()));
        prop_assert_eq!(result.seams_removed, img.width() - target);
    }
}

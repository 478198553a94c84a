//! Seam removal: copy every pixel except the seam into an image one
//! column narrower.
//!
//! This is the last step of a carving pass. The source image is only
//! read; the output is a freshly allocated buffer.

use crate::seam::Seam;
use crate::types::{BufferKind, CarveError, RgbImage};

/// Reserve the raw byte storage for a `width` x `height` RGB image.
///
/// Returns the empty buffer and the byte length it was reserved for.
fn try_reserve_raw(width: u32, height: u32) -> Result<(Vec<u8>, usize), CarveError> {
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or(CarveError::Allocation(BufferKind::Image))?;
    let mut raw = Vec::new();
    raw.try_reserve_exact(len)
        .map_err(|_| CarveError::Allocation(BufferKind::Image))?;
    Ok((raw, len))
}

/// Allocate a zeroed RGB image, reporting allocation failure.
fn try_new_image(width: u32, height: u32) -> Result<RgbImage, CarveError> {
    let (mut raw, len) = try_reserve_raw(width, height)?;
    raw.resize(len, 0);
    RgbImage::from_raw(width, height, raw).ok_or(CarveError::Allocation(BufferKind::Image))
}

/// Copy `image` into a freshly allocated buffer.
///
/// # Errors
///
/// Returns [`CarveError::Allocation`] if the copy cannot be allocated.
pub fn try_clone_image(image: &RgbImage) -> Result<RgbImage, CarveError> {
    let (width, height) = image.dimensions();
    let (mut raw, len) = try_reserve_raw(width, height)?;
    raw.extend(image.as_raw().iter().take(len));
    RgbImage::from_raw(width, height, raw).ok_or(CarveError::Allocation(BufferKind::Image))
}

/// Remove `seam` from `image`, returning an image one column narrower.
///
/// Row `i` of the output is row `i` of the input with column
/// `seam[i]` deleted and everything to its right shifted left.
///
/// # Errors
///
/// Returns [`CarveError::TooNarrow`] if the image is at most one column
/// wide, [`CarveError::SeamMismatch`] if the seam length differs from
/// the image height or names a column outside the image, and
/// [`CarveError::Allocation`] if the output cannot be allocated.
pub fn remove_seam(image: &RgbImage, seam: &Seam) -> Result<RgbImage, CarveError> {
    let (width, height) = image.dimensions();
    if width <= 1 {
        return Err(CarveError::TooNarrow { width });
    }
    let columns = seam.columns();
    if columns.len() != height as usize || columns.iter().any(|&c| c >= width as usize) {
        return Err(CarveError::SeamMismatch {
            expected_rows: height,
            rows: columns.len(),
            width,
        });
    }

    let mut out = try_new_image(width - 1, height)?;
    let row_bytes = width as usize * 3;
    let out_row_bytes = (width as usize - 1) * 3;

    for ((src, dst), &skip) in image
        .as_raw()
        .chunks_exact(row_bytes)
        .zip(out.chunks_exact_mut(out_row_bytes))
        .zip(columns)
    {
        let cut = skip * 3;
        dst[..cut].copy_from_slice(&src[..cut]);
        dst[cut..].copy_from_slice(&src[cut + 3..]);
    }

    Ok(out)
}

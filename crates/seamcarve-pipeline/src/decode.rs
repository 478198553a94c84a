//! Image decoding into the 3-channel RGB buffer the carver works on.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP). Alpha, if present,
//! is discarded and 16-bit samples are narrowed to 8 bits.

use crate::types::{CarveError, RgbImage};

/// Decode raw image bytes into an 8-bit RGB image.
///
/// # Errors
///
/// Returns [`CarveError::EmptyInput`] if `bytes` is empty.
/// Returns [`CarveError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, CarveError> {
    if bytes.is_empty() {
        return Err(CarveError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgb8())
}

//! Shared types for the seam carving pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Re-export `RgbImage` so downstream crates can hand images to the
/// pipeline without depending on `image` directly.
pub use image::RgbImage;

/// Re-export `GrayImage` for rendered energy maps.
pub use image::GrayImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an RGB image.
    #[must_use]
    pub fn of(image: &RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    /// Total pixel count (`width * height`).
    #[must_use]
    pub const fn pixel_count(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Configuration for a carving run.
///
/// `target_width` must be at least 1 and at most the width of the
/// image being carved. Validation happens in
/// [`carve_to_width`](crate::carve_to_width), where the image width is
/// known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarveConfig {
    /// Width, in pixels, the image is narrowed to.
    pub target_width: u32,
}

impl CarveConfig {
    /// Create a config that narrows to `target_width` columns.
    #[must_use]
    pub const fn new(target_width: u32) -> Self {
        Self { target_width }
    }
}

/// Result of carving an image down to its target width.
#[derive(Debug, Clone)]
pub struct CarveResult {
    /// The narrowed image.
    pub image: RgbImage,
    /// Dimensions of the image before carving.
    pub source: Dimensions,
    /// Number of seams removed (`source.width - image.width()`).
    pub seams_removed: u32,
    /// Sum of the bottom-row cumulative cost of every removed seam.
    pub total_seam_cost: f64,
}

impl CarveResult {
    /// Dimensions of the narrowed image.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.image)
    }
}

/// Which buffer a failed allocation was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BufferKind {
    /// Per-pixel energy map.
    EnergyMap,
    /// Dynamic-programming cost table.
    CostTable,
    /// Seam column indices.
    Seam,
    /// Narrowed output image.
    Image,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnergyMap => f.write_str("energy map"),
            Self::CostTable => f.write_str("cost table"),
            Self::Seam => f.write_str("seam"),
            Self::Image => f.write_str("image"),
        }
    }
}

/// Errors that can occur while carving.
///
/// Uses custom `Serialize`/`Deserialize` because `image::ImageError`
/// does not implement serde traits. The `ImageDecode` variant is
/// serialized as its `Display` string.
#[derive(Debug, thiserror::Error)]
pub enum CarveError {
    /// A buffer could not be allocated.
    #[error("failed to allocate {0} buffer")]
    Allocation(BufferKind),

    /// The image has zero width or zero height.
    #[error("image has no pixels")]
    EmptyImage,

    /// A seam does not fit the image it is being removed from.
    #[error("seam with {rows} rows does not fit a {expected_rows}-row image of width {width}")]
    SeamMismatch {
        /// Image height.
        expected_rows: u32,
        /// Seam length.
        rows: usize,
        /// Image width.
        width: u32,
    },

    /// The image is too narrow to lose another column.
    #[error("cannot remove a seam from an image {width} pixel(s) wide")]
    TooNarrow {
        /// Current image width.
        width: u32,
    },

    /// The requested width is larger than the image.
    #[error("cannot widen a {width} pixel wide image to {target} pixels")]
    Upscale {
        /// Current image width.
        width: u32,
        /// Requested width.
        target: u32,
    },

    /// Carve configuration is invalid.
    #[error("invalid carve configuration: {0}")]
    InvalidConfig(String),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),
}

/// Serde-compatible proxy for `CarveError`.
///
/// A deserialized `ImageDecode` comes back as `InvalidConfig` carrying
/// the original message, since `image::ImageError` cannot be rebuilt.
#[derive(Serialize, Deserialize)]
enum CarveErrorProxy {
    Allocation(BufferKind),
    EmptyImage,
    SeamMismatch {
        expected_rows: u32,
        rows: usize,
        width: u32,
    },
    TooNarrow {
        width: u32,
    },
    Upscale {
        width: u32,
        target: u32,
    },
    InvalidConfig(String),
    EmptyInput,
    ImageDecode(String),
}

impl Serialize for CarveError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let proxy = match self {
            Self::Allocation(kind) => CarveErrorProxy::Allocation(*kind),
            Self::EmptyImage => CarveErrorProxy::EmptyImage,
            Self::SeamMismatch {
                expected_rows,
                rows,
                width,
            } => CarveErrorProxy::SeamMismatch {
                expected_rows: *expected_rows,
                rows: *rows,
                width: *width,
            },
            Self::TooNarrow { width } => CarveErrorProxy::TooNarrow { width: *width },
            Self::Upscale { width, target } => CarveErrorProxy::Upscale {
                width: *width,
                target: *target,
            },
            Self::InvalidConfig(s) => CarveErrorProxy::InvalidConfig(s.clone()),
            Self::EmptyInput => CarveErrorProxy::EmptyInput,
            Self::ImageDecode(e) => CarveErrorProxy::ImageDecode(e.to_string()),
        };
        proxy.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CarveError {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = CarveErrorProxy::deserialize(deserializer)?;
        Ok(match proxy {
            CarveErrorProxy::Allocation(kind) => Self::Allocation(kind),
            CarveErrorProxy::EmptyImage => Self::EmptyImage,
            CarveErrorProxy::SeamMismatch {
                expected_rows,
                rows,
                width,
            } => Self::SeamMismatch {
                expected_rows,
                rows,
                width,
            },
            CarveErrorProxy::TooNarrow { width } => Self::TooNarrow { width },
            CarveErrorProxy::Upscale { width, target } => Self::Upscale { width, target },
            CarveErrorProxy::InvalidConfig(s) => Self::InvalidConfig(s),
            CarveErrorProxy::EmptyInput => Self::EmptyInput,
            CarveErrorProxy::ImageDecode(msg) => {
                Self::InvalidConfig(format!("image decode error: {msg}"))
            }
        })
    }
}

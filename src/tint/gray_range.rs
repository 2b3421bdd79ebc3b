//! Gray intensity range over the masked part of an icon.

use image::RgbaImage;

use crate::colors::ColorKey;
use crate::error::{IconError, Result};

/// Darkest and lightest red-channel value among the masked origin pixels.
///
/// Invariant: `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrayRange {
    pub min: u8,
    pub max: u8,
}

impl GrayRange {
    /// Scans `origin` at every pixel where `mask` equals `mask_color`.
    ///
    /// The origin is expected to be grayscale, so only the red channel is read.
    /// Unmasked pixels are skipped entirely.
    ///
    /// Fails if the images differ in size or no pixel is masked.
    pub fn analyze(origin: &RgbaImage, mask: &RgbaImage, mask_color: ColorKey) -> Result<Self> {
        check_dimensions(origin, mask)?;

        let (min, max) = origin
            .pixels()
            .zip(mask.pixels())
            .filter(|(_, m)| mask_color.matches(m))
            .map(|(o, _)| o[0])
            .fold((u8::MAX, u8::MIN), |(min, max), red| {
                (min.min(red), max.max(red))
            });

        if min > max {
            return Err(IconError::EmptyMask);
        }

        Ok(Self { min, max })
    }

    /// Returns true if `gray` lies within the range.
    pub fn contains(&self, gray: u8) -> bool {
        (self.min..=self.max).contains(&gray)
    }
}

/// Fails with [`IconError::DimensionMismatch`] unless both images have the same size.
fn check_dimensions(origin: &RgbaImage, mask: &RgbaImage) -> Result<()> {
    if origin.dimensions() == mask.dimensions() {
        return Ok(());
    }
    Err(IconError::DimensionMismatch {
        origin_width: origin.width(),
        origin_height: origin.height(),
        mask_width: mask.width(),
        mask_height: mask.height(),
    })
}

//! Mask-driven recoloring of a grayscale icon.
//!
//! The origin image is a grayscale drawing. A same-sized mask marks the pixels
//! that take the tint: every mask pixel equal to the mask color (RGB only) is
//! recolored, every other pixel is copied from the origin unchanged.
//!
//! Recoloring is a two step process:
//!
//! 1. [`GrayRange::analyze`] scans the masked pixels once and records the
//!    darkest and lightest gray.
//! 2. [`render_tinted`] maps each masked pixel's gray to a *shade* in
//!    `[0, max_lightness]` and blends the target color that far toward white.
//!
//! ```
//! use icmd::{render_tinted, ColorKey, GrayRange, TintParams};
//! use image::{Rgba, RgbaImage};
//!
//! let origin = RgbaImage::from_pixel(4, 4, Rgba([128, 128, 128, 255]));
//! let mask = RgbaImage::from_pixel(4, 4, Rgba([255, 0, 255, 255]));
//! let params = TintParams::default();
//!
//! let range = GrayRange::analyze(&origin, &mask, params.mask_color).unwrap();
//! let tinted = render_tinted(&origin, &mask, range, ColorKey::new(100, 0, 0), &params);
//! assert_eq!(tinted.dimensions(), (4, 4));
//! ```

pub mod gray_range;
pub mod render;

pub use gray_range::GrayRange;
pub use render::{render_tinted, shade};

use serde::{Deserialize, Serialize};

use crate::colors::ColorKey;

/// Pixels of this color in the mask are recolored.
pub const MASK_COLOR: ColorKey = ColorKey::new(255, 0, 255);

/// How far the lightest masked pixel drifts from the target color toward white.
pub const MAX_LIGHTNESS: f32 = 0.5;

// ============================================================================
// Normalization
// ============================================================================

/// Divisor used to turn a gray value into a shade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Normalization {
    /// `(gray - min) / max`. Icons rendered by earlier releases use this.
    #[default]
    Peak,
    /// `(gray - min) / (max - min)`, spreading shades over the whole range.
    Span,
}

// ============================================================================
// TintParams
// ============================================================================

/// Parameters shared by every render of one icon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TintParams {
    /// Mask pixels of this color are recolored.
    pub mask_color: ColorKey,

    /// Upper bound of the shade, in `[0, 1]`.
    pub max_lightness: f32,

    /// Divisor for the shade computation.
    pub normalization: Normalization,
}

impl Default for TintParams {
    fn default() -> Self {
        Self {
            mask_color: MASK_COLOR,
            max_lightness: MAX_LIGHTNESS,
            normalization: Normalization::Peak,
        }
    }
}

impl TintParams {
    /// Creates parameters with the given lightness cap.
    ///
    /// The cap is clamped to 0.0-1.0 so blended channels never leave
    /// `[target, 255]`. NaN falls back to [`MAX_LIGHTNESS`].
    pub fn new(mask_color: ColorKey, max_lightness: f32, normalization: Normalization) -> Self {
        let max_lightness = if max_lightness.is_nan() {
            MAX_LIGHTNESS
        } else {
            max_lightness.clamp(0.0, 1.0)
        };
        Self {
            mask_color,
            max_lightness,
            normalization,
        }
    }
}

//! Per-pixel tint rendering.

use image::{Rgba, RgbaImage};

use super::{GrayRange, Normalization, TintParams};
use crate::colors::ColorKey;

/// Maps a gray value to how far its pixel is blended toward white.
///
/// The result lies in `[0, params.max_lightness]`. A zero divisor (`max == 0`
/// for [`Normalization::Peak`], `max == min` for [`Normalization::Span`])
/// yields 0, leaving the pixel at the exact target color.
pub fn shade(gray: u8, range: GrayRange, params: &TintParams) -> f32 {
    let divisor = match params.normalization {
        Normalization::Peak => range.max,
        Normalization::Span => range.max.saturating_sub(range.min),
    };
    if divisor == 0 {
        return 0.0;
    }

    let offset = gray.saturating_sub(range.min) as f32;
    let ratio = (offset / divisor as f32).min(1.0);
    ratio * params.max_lightness
}

/// Renders `origin` tinted toward `color`.
///
/// Masked pixels become `target + (255 - target) * shade` per channel,
/// truncated to `u8`, fully opaque. Unmasked pixels, including any outside
/// the mask's bounds, are copied from `origin` as they are.
pub fn render_tinted(
    origin: &RgbaImage,
    mask: &RgbaImage,
    range: GrayRange,
    color: ColorKey,
    params: &TintParams,
) -> RgbaImage {
    let target = color.channels().map(f32::from);
    let complement = target.map(|c| 255.0 - c);

    RgbaImage::from_fn(origin.width(), origin.height(), |x, y| {
        let pixel = *origin.get_pixel(x, y);
        let masked = mask
            .get_pixel_checked(x, y)
            .is_some_and(|m| params.mask_color.matches(m));
        if !masked {
            return pixel;
        }

        let shade = shade(pixel[0], range, params);
        let blend = |i: usize| (target[i] + complement[i] * shade) as u8;
        Rgba([blend(0), blend(1), blend(2), u8::MAX])
    })
}

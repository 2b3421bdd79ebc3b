//! The colored icon subsystem: tinted renders behind a bounded cache.

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::cache::FifoCache;
use crate::colors::ColorKey;
use crate::error::Result;
use crate::icon::{IcoConverter, IconConverter};
use crate::profile::TintProfile;
use crate::source::ImagePair;
use crate::tint::{GrayRange, TintParams, render_tinted};

/// Owns an origin/mask pair and serves tinted icons for it.
///
/// Construction validates the pair and computes its [`GrayRange`] once, so a
/// value of this type is always ready to render.
/// Icons are memoized per color in a [`FifoCache`], and every handle the
/// cache stores is released through the converter exactly once, on eviction
/// or when the subsystem is dropped.
///
/// # Example
///
/// ```
/// use icmd::{ColorKey, ColoredIcons};
///
/// let mut icons = ColoredIcons::embedded().unwrap();
/// let red = icons.get_icon(ColorKey::new(100, 0, 0)).unwrap();
/// let again = icons.get_icon(ColorKey::new(100, 0, 0)).unwrap();
/// assert!(red.ptr_eq(&again));
/// ```
pub struct ColoredIcons<C: IconConverter = IcoConverter> {
    pair: ImagePair,
    range: GrayRange,
    params: TintParams,
    converter: C,
    cache: FifoCache<ColorKey, C::Handle>,
}

impl ColoredIcons<IcoConverter> {
    /// Builds the subsystem for the builtin console icon with default settings.
    pub fn embedded() -> Result<Self> {
        Self::from_profile(&TintProfile::default())
    }

    /// Builds the subsystem for the builtin console icon with the given settings.
    pub fn from_profile(profile: &TintProfile) -> Result<Self> {
        Self::with_converter(ImagePair::embedded()?, profile, IcoConverter)
    }
}

impl<C: IconConverter> ColoredIcons<C> {
    /// Validates `pair` and computes its gray range.
    ///
    /// Fails if the mask and origin differ in size or the mask has no pixel
    /// of `params.mask_color`.
    pub fn new(pair: ImagePair, params: TintParams, capacity: usize, converter: C) -> Result<Self> {
        let range = GrayRange::analyze(&pair.origin, &pair.mask, params.mask_color)?;

        let (width, height) = pair.dimensions();
        info!(width, height, min = range.min, max = range.max, "colored icon ready");

        Ok(Self {
            pair,
            range,
            params,
            converter,
            cache: FifoCache::new(capacity),
        })
    }

    /// Like [`new`](Self::new), taking parameters and capacity from a profile.
    pub fn with_converter(pair: ImagePair, profile: &TintProfile, converter: C) -> Result<Self> {
        Self::new(pair, profile.tint_params(), profile.cache_capacity, converter)
    }

    pub fn gray_range(&self) -> GrayRange {
        self.range
    }

    pub fn params(&self) -> &TintParams {
        &self.params
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pair.dimensions()
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn converter_mut(&mut self) -> &mut C {
        &mut self.converter
    }

    /// Renders the tinted bitmap for `color`, bypassing the cache.
    pub fn render(&self, color: ColorKey) -> RgbaImage {
        render_tinted(&self.pair.origin, &self.pair.mask, self.range, color, &self.params)
    }

    /// Returns the icon for `color`, rendering and converting it on first use.
    ///
    /// A failed conversion is returned to the caller and leaves the cache
    /// untouched, so the next call for the same color tries again.
    pub fn get_icon(&mut self, color: ColorKey) -> Result<C::Handle> {
        if let Some(handle) = self.cache.get(&color) {
            debug!(%color, "icon cache hit");
            return Ok(handle.clone());
        }

        debug!(%color, "icon cache miss");
        let bitmap = self.render(color);
        let handle = self.converter.convert(&bitmap).inspect_err(|err| {
            warn!(%color, error = %err, "failed to convert tinted icon");
        })?;

        if let Some((evicted, old)) = self.cache.insert(color, handle.clone()) {
            debug!(color = %evicted, "evicting icon");
            self.converter.release(old);
        }
        Ok(handle)
    }

    /// Returns true if an icon for `color` is cached.
    pub fn is_cached(&self, color: ColorKey) -> bool {
        self.cache.contains(&color)
    }

    /// Number of cached icons.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Cached colors, oldest first.
    pub fn cached_colors(&self) -> impl Iterator<Item = &ColorKey> {
        self.cache.keys()
    }

    /// Releases every cached icon.
    pub fn clear_cache(&mut self) {
        let drained = self.cache.drain();
        if !drained.is_empty() {
            debug!(count = drained.len(), "releasing cached icons");
        }
        for (_, handle) in drained {
            self.converter.release(handle);
        }
    }
}

impl<C: IconConverter> Drop for ColoredIcons<C> {
    fn drop(&mut self) {
        self.clear_cache();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IconError;
    use crate::tint::MASK_COLOR;
    use image::Rgba;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Call log shared between a test and the converter it hands over.
    #[derive(Debug, Default)]
    struct Calls {
        converted: usize,
        rendered: Vec<RgbaImage>,
        released: Vec<u32>,
    }

    /// Hands out sequential ids and records every call.
    #[derive(Default)]
    struct CountingConverter {
        calls: Rc<RefCell<Calls>>,
        next_id: u32,
        fail: bool,
    }

    impl IconConverter for CountingConverter {
        type Handle = u32;

        fn convert(&mut self, bitmap: &RgbaImage) -> Result<u32> {
            if self.fail {
                return Err(IconError::TooLarge {
                    width: bitmap.width(),
                    height: bitmap.height(),
                    max: 0,
                });
            }
            let mut calls = self.calls.borrow_mut();
            calls.converted += 1;
            calls.rendered.push(bitmap.clone());
            drop(calls);
            self.next_id += 1;
            Ok(self.next_id)
        }

        fn release(&mut self, handle: u32) {
            self.calls.borrow_mut().released.push(handle);
        }
    }

    fn test_pair() -> ImagePair {
        let origin = RgbaImage::from_fn(4, 4, |x, y| {
            let v = 50 + (x * 40 + y * 10) as u8;
            Rgba([v, v, v, 255])
        });
        let mask = RgbaImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                Rgba([255, 0, 255, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        ImagePair::new(origin, mask)
    }

    fn counting(capacity: usize) -> (ColoredIcons<CountingConverter>, Rc<RefCell<Calls>>) {
        let converter = CountingConverter::default();
        let calls = Rc::clone(&converter.calls);
        let icons = ColoredIcons::new(test_pair(), TintParams::default(), capacity, converter).unwrap();
        (icons, calls)
    }

    #[test]
    fn init_computes_gray_range() {
        let (icons, _) = counting(50);
        // Masked columns are x = 0 and 1: values 50..=120.
        assert_eq!(icons.gray_range(), GrayRange { min: 50, max: 120 });
        assert_eq!(icons.dimensions(), (4, 4));
    }

    #[test]
    fn init_rejects_bad_pairs() {
        let mut pair = test_pair();
        pair.mask = RgbaImage::new(4, 4);
        let err = ColoredIcons::new(pair, TintParams::default(), 50, CountingConverter::default());
        assert!(matches!(err, Err(IconError::EmptyMask)));

        let mut pair = test_pair();
        pair.mask = RgbaImage::new(2, 2);
        let err = ColoredIcons::new(pair, TintParams::default(), 50, CountingConverter::default());
        assert!(matches!(err, Err(IconError::DimensionMismatch { .. })));
    }

    #[test]
    fn second_request_is_a_cache_hit() {
        let (mut icons, calls) = counting(50);
        let color = ColorKey::new(100, 0, 0);

        let first = icons.get_icon(color).unwrap();
        assert_eq!(calls.borrow().converted, 1);

        let second = icons.get_icon(color).unwrap();
        assert_eq!(first, second);
        assert_eq!(calls.borrow().converted, 1);
        assert!(icons.is_cached(color));

        // The converter only ever sees freshly rendered bitmaps, so one
        // recorded bitmap means the hit skipped rendering too.
        let calls = calls.borrow();
        assert_eq!(calls.rendered.len(), 1);
        assert_eq!(calls.rendered[0], icons.render(color));
    }

    #[test]
    fn each_miss_renders_its_own_color() {
        let (mut icons, calls) = counting(50);
        let red = ColorKey::new(100, 0, 0);
        let green = ColorKey::new(0, 100, 0);

        icons.get_icon(red).unwrap();
        icons.get_icon(green).unwrap();
        icons.get_icon(red).unwrap();
        icons.get_icon(green).unwrap();

        let calls = calls.borrow();
        assert_eq!(calls.rendered, [icons.render(red), icons.render(green)]);
    }

    #[test]
    fn fifo_eviction_releases_the_oldest() {
        let (mut icons, calls) = counting(50);
        let colors: Vec<_> = (0..51u8).map(|i| ColorKey::new(i, 0, 0)).collect();

        for &color in &colors {
            icons.get_icon(color).unwrap();
        }

        assert!(!icons.is_cached(colors[0]));
        assert!(colors[1..].iter().all(|&c| icons.is_cached(c)));
        assert_eq!(icons.cached_len(), 50);
        assert_eq!(calls.borrow().released, [1]);
    }

    #[test]
    fn hits_do_not_protect_from_eviction() {
        let (mut icons, calls) = counting(2);
        let a = ColorKey::new(1, 0, 0);
        let b = ColorKey::new(2, 0, 0);
        let c = ColorKey::new(3, 0, 0);

        icons.get_icon(a).unwrap();
        icons.get_icon(b).unwrap();
        icons.get_icon(a).unwrap();
        icons.get_icon(c).unwrap();

        assert!(!icons.is_cached(a));
        assert_eq!(icons.cached_colors().copied().collect::<Vec<_>>(), [b, c]);
        assert_eq!(calls.borrow().released, [1]);
    }

    #[test]
    fn failed_conversion_is_not_cached() {
        let (mut icons, calls) = counting(50);
        let color = ColorKey::new(0, 0, 100);

        icons.converter_mut().fail = true;
        assert!(icons.get_icon(color).is_err());
        assert!(icons.get_icon(color).is_err());
        assert!(!icons.is_cached(color));
        assert_eq!(icons.cached_len(), 0);

        icons.converter_mut().fail = false;
        assert_eq!(icons.get_icon(color).unwrap(), 1);
        assert_eq!(calls.borrow().converted, 1);
    }

    #[test]
    fn drop_releases_every_handle_once() {
        let (mut icons, calls) = counting(3);
        for i in 0..5u8 {
            icons.get_icon(ColorKey::new(0, i, 0)).unwrap();
        }
        assert_eq!(calls.borrow().released, [1, 2]);

        drop(icons);
        assert_eq!(calls.borrow().released, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn clear_cache_then_rerender() {
        let (mut icons, calls) = counting(50);
        let color = ColorKey::new(0, 100, 100);

        icons.get_icon(color).unwrap();
        icons.clear_cache();
        assert_eq!(icons.cached_len(), 0);
        assert_eq!(calls.borrow().released, [1]);

        assert_eq!(icons.get_icon(color).unwrap(), 2);
    }

    #[test]
    fn render_keeps_unmasked_pixels() {
        let (icons, _) = counting(50);
        let out = icons.render(ColorKey::new(100, 0, 0));

        for (x, y, pixel) in out.enumerate_pixels() {
            if x >= 2 {
                assert_eq!(pixel, icons.pair.origin.get_pixel(x, y));
            } else {
                assert_eq!(pixel[3], 255);
                assert!(pixel[0] >= 100);
            }
        }
    }

    #[test]
    fn embedded_icon_serves_palette_colors() {
        let mut icons = ColoredIcons::embedded().unwrap();
        assert_eq!(icons.params().mask_color, MASK_COLOR);

        let red = icons.get_icon(ColorKey::new(100, 0, 0)).unwrap();
        let again = icons.get_icon(ColorKey::new(100, 0, 0)).unwrap();
        assert!(red.ptr_eq(&again));
        assert_eq!((red.width(), red.height()), (32, 32));

        let blue = icons.get_icon(ColorKey::new(0, 0, 100)).unwrap();
        assert_ne!(red.as_bytes(), blue.as_bytes());
    }

    #[test]
    fn held_handle_survives_eviction() {
        let profile = TintProfile {
            cache_capacity: 1,
            ..TintProfile::default()
        };
        let mut icons = ColoredIcons::from_profile(&profile).unwrap();

        let held = icons.get_icon(ColorKey::new(100, 0, 0)).unwrap();
        icons.get_icon(ColorKey::new(0, 100, 0)).unwrap();
        assert!(!icons.is_cached(ColorKey::new(100, 0, 0)));

        let decoded = held.decode().unwrap();
        assert_eq!(decoded.dimensions(), (32, 32));
    }
}

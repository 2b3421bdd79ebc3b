//! Icon handles and the bitmap-to-icon conversion seam.
//!
//! A rendered bitmap only becomes useful once it is turned into something a
//! window or shell can display. [`IconConverter`] is that step; the default
//! [`IcoConverter`] produces an in-memory Windows `.ico` image that can be
//! written to disk or handed to platform code.

use std::io::Cursor;
use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use image::codecs::ico::IcoEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};

use crate::error::{IconError, Result};
use crate::source;

/// Largest width or height an `.ico` entry can hold.
pub const MAX_ICON_SIZE: u32 = 256;

// ============================================================================
// IcoIcon
// ============================================================================

/// An encoded `.ico` image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IcoIcon {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl IcoIcon {
    /// Encodes a bitmap as a single-entry `.ico` image.
    ///
    /// Fails with [`IconError::TooLarge`] for bitmaps over [`MAX_ICON_SIZE`]
    /// in either dimension.
    pub fn encode(bitmap: &RgbaImage) -> Result<Self> {
        let (width, height) = bitmap.dimensions();
        if width > MAX_ICON_SIZE || height > MAX_ICON_SIZE {
            return Err(IconError::TooLarge {
                width,
                height,
                max: MAX_ICON_SIZE,
            });
        }

        let mut bytes = Vec::new();
        IcoEncoder::new(&mut bytes)
            .write_image(bitmap.as_raw(), width, height, ExtendedColorType::Rgba8)
            .map_err(IconError::Encode)?;

        Ok(Self {
            width,
            height,
            bytes,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw `.ico` file contents.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Decodes the icon back into a bitmap.
    pub fn decode(&self) -> Result<RgbaImage> {
        image::load(Cursor::new(&self.bytes), ImageFormat::Ico)
            .map(|img| img.to_rgba8())
            .map_err(|source| IconError::Decode {
                what: "icon".to_string(),
                source,
            })
    }

    /// Writes the `.ico` file to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.bytes).map_err(|source| IconError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ============================================================================
// IconHandle
// ============================================================================

/// A shared handle to an encoded icon.
///
/// Cloning is cheap and every clone refers to the same icon, so a handle a
/// caller holds stays valid after the cache lets go of its own copy.
#[derive(Debug, Clone)]
pub struct IconHandle(Arc<IcoIcon>);

impl IconHandle {
    pub fn new(icon: IcoIcon) -> Self {
        Self(Arc::new(icon))
    }

    /// Returns true if both handles refer to the same icon instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for IconHandle {
    type Target = IcoIcon;

    fn deref(&self) -> &IcoIcon {
        &self.0
    }
}

// ============================================================================
// IconConverter
// ============================================================================

/// Turns rendered bitmaps into displayable icon handles.
///
/// Platform integrations implement this to produce native handles; the cache
/// calls [`release`](Self::release) exactly once for every handle it stored,
/// either on eviction or on teardown.
pub trait IconConverter {
    /// The handle type produced by this converter.
    type Handle: Clone;

    /// Converts a bitmap. May fail if the bitmap is unusable as an icon.
    fn convert(&mut self, bitmap: &RgbaImage) -> Result<Self::Handle>;

    /// Frees the resources behind a handle the cache no longer tracks.
    fn release(&mut self, _handle: Self::Handle) {}
}

/// Converts bitmaps into shared `.ico` images.
#[derive(Debug, Clone, Copy, Default)]
pub struct IcoConverter;

impl IconConverter for IcoConverter {
    type Handle = IconHandle;

    fn convert(&mut self, bitmap: &RgbaImage) -> Result<IconHandle> {
        IcoIcon::encode(bitmap).map(IconHandle::new)
    }
}

// ============================================================================
// External icons
// ============================================================================

/// Shrinks a bitmap to fit within the `.ico` size limit, keeping its aspect ratio.
///
/// Bitmaps that already fit are returned unchanged.
pub fn fit_to_icon(bitmap: RgbaImage) -> RgbaImage {
    let (width, height) = bitmap.dimensions();
    let longest = width.max(height);
    if longest <= MAX_ICON_SIZE {
        return bitmap;
    }

    let scale = MAX_ICON_SIZE as f32 / longest as f32;
    let new_width = ((width as f32 * scale).round() as u32).clamp(1, MAX_ICON_SIZE);
    let new_height = ((height as f32 * scale).round() as u32).clamp(1, MAX_ICON_SIZE);
    imageops::resize(&bitmap, new_width, new_height, FilterType::Lanczos3)
}

/// Loads an image file and converts it into an icon, downscaling if needed.
///
/// These icons are not tinted and bypass the color cache.
pub fn load_icon_file<C: IconConverter>(path: impl AsRef<Path>, converter: &mut C) -> Result<C::Handle> {
    let bitmap = source::load_image_file(path)?;
    converter.convert(&fit_to_icon(bitmap))
}

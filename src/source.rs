//! Loading of the origin/mask image pair and of external image files.

use std::path::Path;

use image::RgbaImage;

use crate::error::{IconError, Result};

/// Grayscale drawing of the builtin console icon.
const CMD_PNG: &[u8] = include_bytes!("../assets/cmd.png");

/// Mask of the builtin console icon; magenta marks the tinted area.
const CMD_MASK_PNG: &[u8] = include_bytes!("../assets/cmd_mask.png");

/// A grayscale origin image and the mask selecting which of its pixels get tinted.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePair {
    pub origin: RgbaImage,
    pub mask: RgbaImage,
}

impl ImagePair {
    /// Wraps two decoded bitmaps. Sizes are validated by the consumer.
    pub fn new(origin: RgbaImage, mask: RgbaImage) -> Self {
        Self { origin, mask }
    }

    /// Decodes the builtin console icon.
    pub fn embedded() -> Result<Self> {
        Self::from_png_bytes(CMD_PNG, CMD_MASK_PNG)
    }

    /// Decodes an origin/mask pair from encoded image bytes (any format `image` detects).
    pub fn from_png_bytes(origin: &[u8], mask: &[u8]) -> Result<Self> {
        Ok(Self {
            origin: decode_image(origin, "origin image")?,
            mask: decode_image(mask, "mask image")?,
        })
    }

    /// Loads an origin/mask pair from two image files.
    pub fn from_files(origin: impl AsRef<Path>, mask: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            origin: load_image_file(origin)?,
            mask: load_image_file(mask)?,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.origin.dimensions()
    }
}

/// Decodes encoded image bytes into an RGBA bitmap.
pub fn decode_image(bytes: &[u8], what: &str) -> Result<RgbaImage> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|source| IconError::Decode {
            what: what.to_string(),
            source,
        })
}

/// Reads and decodes an image file into an RGBA bitmap.
pub fn load_image_file(path: impl AsRef<Path>) -> Result<RgbaImage> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| IconError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_image(&bytes, &path.display().to_string())
}

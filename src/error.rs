//! Error types for icon loading, tinting and conversion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading, tinting or converting icons.
#[derive(Debug, Error)]
pub enum IconError {
    /// An image could not be decoded.
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: image::ImageError,
    },

    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The origin and mask images have different dimensions.
    #[error("mask is {mask_width}x{mask_height} but origin is {origin_width}x{origin_height}")]
    DimensionMismatch {
        origin_width: u32,
        origin_height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    /// The mask has no pixel matching the mask color.
    #[error("mask contains no pixel of the mask color")]
    EmptyMask,

    /// The bitmap is too large to become an icon.
    #[error("{width}x{height} exceeds the {max}px icon limit")]
    TooLarge { width: u32, height: u32, max: u32 },

    /// Icon encoding failed.
    #[error("failed to encode icon: {0}")]
    Encode(#[source] image::ImageError),

    /// No palette entry has the requested name.
    #[error("unknown color: {0}")]
    UnknownColor(String),

    /// A color string is not a valid hex code.
    #[error("invalid color {0:?}, expected #rrggbb")]
    InvalidColor(String),

    /// A profile could not be parsed.
    #[error("invalid profile: {0}")]
    Profile(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IconError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_mismatch_message() {
        let err = IconError::DimensionMismatch {
            origin_width: 32,
            origin_height: 32,
            mask_width: 16,
            mask_height: 16,
        };
        assert_eq!(err.to_string(), "mask is 16x16 but origin is 32x32");
    }

    #[test]
    fn profile_error_converts() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: IconError = json_err.into();
        assert!(matches!(err, IconError::Profile(_)));
    }
}

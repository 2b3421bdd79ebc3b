//! Serializable tint profile.
//!
//! A [`TintProfile`] captures every tunable of the recoloring subsystem in a
//! JSON document, so a custom palette or lightness cap can be kept in a file
//! and passed to the command line with `--profile`.
//!
//! # Example
//!
//! ```
//! use icmd::{Normalization, TintProfile};
//!
//! let profile = TintProfile::from_json(r##"{ "maxLightness": 0.3, "normalization": "span" }"##).unwrap();
//! assert_eq!(profile.normalization, Normalization::Span);
//! assert_eq!(profile.cache_capacity, 50);
//!
//! let json = profile.to_json().unwrap();
//! assert!(json.contains("\"maxLightness\":0.3"));
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CAPACITY;
use crate::colors::{BuiltinPalette, ColorKey};
use crate::error::{IconError, Result};
use crate::tint::{MASK_COLOR, MAX_LIGHTNESS, Normalization, TintParams};

/// All settings of the recoloring subsystem.
///
/// # JSON Format
///
/// ```json
/// {
///   "maxLightness": 0.5,
///   "cacheCapacity": 50,
///   "maskColor": "#ff00ff",
///   "normalization": "peak",
///   "palette": [
///     { "name": "teal", "color": "#008080", "attribute": 3 }
///   ]
/// }
/// ```
///
/// Every field is optional; an omitted `palette` means the builtin one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TintProfile {
    /// Upper bound of the shade (0.0-1.0).
    pub max_lightness: f32,

    /// Number of tinted icons kept alive.
    pub cache_capacity: usize,

    /// Mask pixels of this color are tinted.
    pub mask_color: ColorKey,

    /// Divisor used for shading.
    pub normalization: Normalization,

    /// Replacement palette. `None` means [`BuiltinPalette::default`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<BuiltinPalette>,
}

impl Default for TintProfile {
    fn default() -> Self {
        Self {
            max_lightness: MAX_LIGHTNESS,
            cache_capacity: DEFAULT_CAPACITY,
            mask_color: MASK_COLOR,
            normalization: Normalization::Peak,
            palette: None,
        }
    }
}

impl TintProfile {
    /// Creates a profile with default settings and the builtin palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the palette.
    pub fn with_palette(mut self, palette: BuiltinPalette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Sets the normalization.
    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    /// Render parameters derived from this profile, with the lightness clamped.
    pub fn tint_params(&self) -> TintParams {
        TintParams::new(self.mask_color, self.max_lightness, self.normalization)
    }

    /// The configured palette, or the builtin one.
    pub fn palette(&self) -> BuiltinPalette {
        self.palette.clone().unwrap_or_default()
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a profile from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| IconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

//! icmd: tinted console icons
//!
//! This crate recolors a grayscale icon drawing by name or RGB value and keeps
//! the results in a bounded cache. A mask selects which pixels of the drawing
//! take the tint; everything else (outline, glyphs, transparent background)
//! is kept as drawn.
//!
//! # Example
//!
//! ```
//! use icmd::{BuiltinPalette, ColoredIcons};
//!
//! let palette = BuiltinPalette::default();
//! let mut icons = ColoredIcons::embedded().unwrap();
//!
//! let red = palette.color("red").unwrap();
//! let icon = icons.get_icon(red).unwrap();
//! assert_eq!(icon.width(), 32);
//!
//! // The `.ico` bytes can be written out or passed to platform code.
//! let bytes = icon.as_bytes();
//! assert!(!bytes.is_empty());
//! ```
//!
//! # Profiles
//!
//! Tint settings and the palette can be loaded from JSON with
//! [`TintProfile`]:
//!
//! ```
//! use icmd::{ColoredIcons, TintProfile};
//!
//! let profile = TintProfile::from_json(r#"{ "cacheCapacity": 8 }"#).unwrap();
//! let icons = ColoredIcons::from_profile(&profile).unwrap();
//! assert_eq!(icons.cached_len(), 0);
//! ```

mod cache;
mod colored_icon;
mod colors;
mod error;
mod icon;
mod profile;
mod source;
mod tint;

pub use cache::{DEFAULT_CAPACITY, FifoCache};
pub use colored_icon::ColoredIcons;
pub use colors::{BuiltinPalette, ColorKey, PaletteEntry, TerminalAttribute};
pub use error::{IconError, Result};
pub use icon::{IcoConverter, IcoIcon, IconConverter, IconHandle, MAX_ICON_SIZE, fit_to_icon, load_icon_file};
pub use profile::TintProfile;
pub use source::{ImagePair, decode_image, load_image_file};
pub use tint::{GrayRange, MASK_COLOR, MAX_LIGHTNESS, Normalization, TintParams, render_tinted, shade};

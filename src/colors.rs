//! Color keys, console text attributes and the builtin palette.
//!
//! The palette is the set of names the command line accepts as `:name`
//! switches. Each entry pairs the tint color with the console attribute used
//! to print the name in a matching color.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{IconError, Result};

// ============================================================================
// ColorKey
// ============================================================================

/// A 24-bit RGB color, used both as tint target and as icon cache key.
///
/// The textual form is `#rrggbb`; parsing also accepts the short `#rgb` form
/// and a missing `#`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorKey {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorKey {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the channels as an array in RGB order.
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Returns true if the RGB part of an RGBA pixel equals this color.
    pub fn matches(self, pixel: &image::Rgba<u8>) -> bool {
        pixel[0] == self.r && pixel[1] == self.g && pixel[2] == self.b
    }
}

impl From<Srgb<u8>> for ColorKey {
    fn from(color: Srgb<u8>) -> Self {
        Self::new(color.red, color.green, color.blue)
    }
}

impl From<ColorKey> for Srgb<u8> {
    fn from(key: ColorKey) -> Self {
        Srgb::new(key.r, key.g, key.b)
    }
}

impl FromStr for ColorKey {
    type Err = IconError;

    fn from_str(s: &str) -> Result<Self> {
        let rgb: Srgb<u8> = s
            .trim()
            .parse()
            .map_err(|_| IconError::InvalidColor(s.to_string()))?;
        Ok(rgb.into())
    }
}

impl TryFrom<String> for ColorKey {
    type Error = IconError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ColorKey> for String {
    fn from(key: ColorKey) -> Self {
        key.to_string()
    }
}

impl fmt::Display for ColorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ============================================================================
// TerminalAttribute
// ============================================================================

bitflags::bitflags! {
    /// Console foreground attribute bits.
    ///
    /// Serialized as the raw number; unknown bits are dropped on the way in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TerminalAttribute: u16 {
        const BLUE      = 0x1;
        const GREEN     = 0x2;
        const RED       = 0x4;
        const INTENSITY = 0x8;

        /// Bright white, the attribute a console is restored to after colored output.
        const RESET = Self::BLUE.bits() | Self::GREEN.bits() | Self::RED.bits() | Self::INTENSITY.bits();
    }
}

impl TerminalAttribute {
    /// Returns true for the reset attribute, which prints in the default color.
    pub fn is_reset(self) -> bool {
        self == Self::RESET
    }
}

impl Default for TerminalAttribute {
    fn default() -> Self {
        Self::RESET
    }
}

impl Serialize for TerminalAttribute {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TerminalAttribute {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u16::deserialize(deserializer).map(Self::from_bits_truncate)
    }
}

// ============================================================================
// BuiltinPalette
// ============================================================================

/// A named palette color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteEntry {
    pub name: String,
    pub color: ColorKey,
    #[serde(default)]
    pub attribute: TerminalAttribute,
}

impl PaletteEntry {
    pub fn new(name: impl Into<String>, color: ColorKey, attribute: TerminalAttribute) -> Self {
        Self {
            name: name.into(),
            color,
            attribute,
        }
    }
}

/// Ordered list of named colors, fixed once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuiltinPalette {
    entries: Vec<PaletteEntry>,
}

/// Channel value used by the primary builtin colors.
const V: u8 = 100;

impl Default for BuiltinPalette {
    fn default() -> Self {
        use TerminalAttribute as A;

        Self::new(vec![
            PaletteEntry::new("black", ColorKey::new(0, 0, 0), A::RESET),
            PaletteEntry::new("pink", ColorKey::new(150, 0, 60), A::INTENSITY | A::RED),
            PaletteEntry::new("red", ColorKey::new(V, 0, 0), A::RED),
            PaletteEntry::new("green", ColorKey::new(0, V, 0), A::GREEN),
            PaletteEntry::new("blue", ColorKey::new(0, 0, V), A::BLUE),
            PaletteEntry::new("yellow", ColorKey::new(V, V, 0), A::RED | A::GREEN),
            PaletteEntry::new("purple", ColorKey::new(V, 0, V), A::RED | A::BLUE),
            PaletteEntry::new("cyan", ColorKey::new(0, V, V), A::GREEN | A::BLUE),
        ])
    }
}

impl BuiltinPalette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    /// Finds an entry by exact name.
    pub fn find(&self, name: &str) -> Option<&PaletteEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Looks up a color by name, failing with [`IconError::UnknownColor`].
    pub fn color(&self, name: &str) -> Result<ColorKey> {
        self.find(name)
            .map(|entry| entry.color)
            .ok_or_else(|| IconError::UnknownColor(name.to_string()))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a BuiltinPalette {
    type Item = &'a PaletteEntry;
    type IntoIter = std::slice::Iter<'a, PaletteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

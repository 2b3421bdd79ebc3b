//! Command line arguments.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use icmd::{BuiltinPalette, ColorKey, IconError, Normalization};

pub const USAGE: &str = "\
examples:
  icmd :red
  icmd :browse
  icmd :#3366cc -o blue.ico
  icmd image.png";

/// Tint the console icon by color name or load one from an image file.
#[derive(Debug, Parser)]
#[command(name = "icmd", version, about, after_help = USAGE)]
pub struct Cli {
    /// `:name` from the palette, `:#rrggbb`, `:browse`, or an image file
    pub icon: Option<String>,

    /// Where to write the `.ico` file (a directory when browsing)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// JSON profile with tint settings and palette
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Override the profile's shade normalization
    #[arg(long, value_enum)]
    pub normalization: Option<Normalization>,

    /// Print the palette and exit
    #[arg(long)]
    pub list: bool,
}

/// What the positional argument asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSpec {
    /// Interactive palette browser.
    Browse,
    /// A palette entry.
    Named { name: String, color: ColorKey },
    /// An arbitrary tint color.
    Color(ColorKey),
    /// An image file used as icon as is.
    File(PathBuf),
}

const SWITCH_PREFIX: char = ':';
const BROWSE: &str = "browse";

impl IconSpec {
    /// Interprets the positional argument against `palette`.
    ///
    /// Anything not starting with `:` is a file path; its existence is
    /// checked later.
    pub fn parse(arg: &str, palette: &BuiltinPalette) -> Result<Self, IconError> {
        let Some(switch) = arg.strip_prefix(SWITCH_PREFIX) else {
            return Ok(Self::File(PathBuf::from(arg)));
        };

        if switch == BROWSE {
            return Ok(Self::Browse);
        }
        if let Some(entry) = palette.find(switch) {
            return Ok(Self::Named {
                name: entry.name.clone(),
                color: entry.color,
            });
        }
        if switch.starts_with('#') {
            return switch.parse().map(Self::Color);
        }
        Err(IconError::UnknownColor(switch.to_string()))
    }

    /// File name used when no output is given.
    pub fn default_file_name(&self) -> Option<String> {
        match self {
            Self::Browse => None,
            Self::Named { name, .. } => Some(format!("{name}.ico")),
            Self::Color(color) => Some(format!("icmd-{}.ico", color.to_string().trim_start_matches('#'))),
            Self::File(path) => {
                let stem = path.file_stem()?.to_string_lossy();
                Some(format!("{stem}.ico"))
            }
        }
    }
}

/// Returns true if writing `output` would overwrite `input`.
///
/// Both paths are resolved, so `./icon.ico` and `icon.ico` are the same file.
/// An output that does not exist yet cannot be the input.
pub fn is_same_file(input: &Path, output: &Path) -> io::Result<bool> {
    if !output.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(input)? == fs::canonicalize(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_switches() {
        let palette = BuiltinPalette::default();

        assert_eq!(IconSpec::parse(":browse", &palette).unwrap(), IconSpec::Browse);
        assert_eq!(
            IconSpec::parse(":red", &palette).unwrap(),
            IconSpec::Named {
                name: "red".into(),
                color: ColorKey::new(100, 0, 0)
            }
        );
        assert_eq!(
            IconSpec::parse(":#3366cc", &palette).unwrap(),
            IconSpec::Color(ColorKey::new(0x33, 0x66, 0xcc))
        );
        assert_eq!(
            IconSpec::parse("image.png", &palette).unwrap(),
            IconSpec::File(PathBuf::from("image.png"))
        );
    }

    #[test]
    fn rejects_unknown_switches() {
        let palette = BuiltinPalette::default();
        assert!(matches!(
            IconSpec::parse(":orange", &palette),
            Err(IconError::UnknownColor(name)) if name == "orange"
        ));
        assert!(matches!(
            IconSpec::parse(":#nothex", &palette),
            Err(IconError::InvalidColor(_))
        ));
        assert!(IconSpec::parse(":", &palette).is_err());
    }

    #[test]
    fn default_file_names() {
        let palette = BuiltinPalette::default();
        let name = |arg: &str| IconSpec::parse(arg, &palette).unwrap().default_file_name();

        assert_eq!(name(":cyan").as_deref(), Some("cyan.ico"));
        assert_eq!(name(":#FF8000").as_deref(), Some("icmd-ff8000.ico"));
        assert_eq!(name("art/logo.png").as_deref(), Some("logo.ico"));
        assert_eq!(name(":browse"), None);
    }

    #[test]
    fn same_file_sees_through_path_spelling() {
        let dir = tempfile::tempdir().unwrap();
        let icon = dir.path().join("icon.ico");
        fs::write(&icon, b"ico").unwrap();

        let dotted = dir.path().join(".").join("icon.ico");
        assert!(is_same_file(&dotted, &icon).unwrap());
        assert!(is_same_file(&icon, &dotted).unwrap());

        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        assert!(is_same_file(&icon, &sub.join("..").join("icon.ico")).unwrap());
    }

    #[test]
    fn same_file_is_false_for_other_or_missing_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let icon = dir.path().join("icon.ico");
        let other = dir.path().join("other.ico");
        fs::write(&icon, b"ico").unwrap();
        fs::write(&other, b"ico").unwrap();

        assert!(!is_same_file(&icon, &other).unwrap());
        assert!(!is_same_file(&icon, &dir.path().join("new.ico")).unwrap());
    }

    #[test]
    fn parses_arguments() {
        let cli = Cli::try_parse_from(["icmd", ":red", "-o", "out.ico", "--normalization", "span"]).unwrap();
        assert_eq!(cli.icon.as_deref(), Some(":red"));
        assert_eq!(cli.output, Some(PathBuf::from("out.ico")));
        assert_eq!(cli.normalization, Some(Normalization::Span));
        assert!(!cli.list);
    }
}

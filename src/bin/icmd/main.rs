//! `icmd`: write a tinted console icon, browse the palette, or convert an image.

mod browse;
mod cli;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use icmd::{BuiltinPalette, ColoredIcons, IcoConverter, IconHandle, TintProfile, load_icon_file};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, IconSpec};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("icmd: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut profile = match &cli.profile {
        Some(path) => TintProfile::from_file(path)
            .with_context(|| format!("failed to load profile {}", path.display()))?,
        None => TintProfile::default(),
    };
    if let Some(normalization) = cli.normalization {
        profile.normalization = normalization;
    }
    let palette = profile.palette();

    if cli.list {
        return print_palette(&palette);
    }

    let Some(arg) = cli.icon.as_deref() else {
        print_usage()?;
        bail!("no icon given");
    };
    let spec = match IconSpec::parse(arg, &palette) {
        Ok(spec) => spec,
        Err(err) => {
            print_usage()?;
            return Err(err.into());
        }
    };

    match spec {
        IconSpec::Browse => {
            let out_dir = cli.output.unwrap_or_else(|| PathBuf::from("."));
            let mut icons = load_colored_icons(&profile)?;
            browse::run(&mut icons, &palette, &out_dir)
        }
        IconSpec::Named { color, .. } | IconSpec::Color(color) => {
            let output = output_path(&cli.output, &spec)?;
            let mut icons = load_colored_icons(&profile)?;
            let icon = icons
                .get_icon(color)
                .with_context(|| format!("failed to render {color}"))?;
            save(&icon, &output)
        }
        IconSpec::File(ref path) => {
            if !path.exists() {
                bail!("file not exists: {}", path.display());
            }
            let output = output_path(&cli.output, &spec)?;
            if cli::is_same_file(path, &output)? {
                bail!("refusing to overwrite {}, pass --output", path.display());
            }
            let icon = load_icon_file(path, &mut IcoConverter)
                .with_context(|| format!("failed to load: {}", path.display()))?;
            save(&icon, &output)
        }
    }
}

fn load_colored_icons(profile: &TintProfile) -> Result<ColoredIcons> {
    ColoredIcons::from_profile(profile).context("failed to load the builtin icon")
}

fn output_path(output: &Option<PathBuf>, spec: &IconSpec) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    spec.default_file_name()
        .map(PathBuf::from)
        .context("cannot derive an output file name, pass --output")
}

fn save(icon: &IconHandle, path: &Path) -> Result<()> {
    icon.save(path)?;
    println!("wrote {} ({}x{})", path.display(), icon.width(), icon.height());
    Ok(())
}

fn print_palette(palette: &BuiltinPalette) -> Result<()> {
    let mut stdout = io::stdout();
    for (index, entry) in palette.iter().enumerate() {
        let line = format!("[{:02}]  {:<8} {}", index + 1, entry.name, entry.color);
        browse::print_colored(&mut stdout, entry, &line)?;
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

fn print_usage() -> io::Result<()> {
    Cli::command().print_help()
}

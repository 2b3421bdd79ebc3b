//! Keyboard-driven palette browser.
//!
//! Up/Down cycles through the palette, rendering each selection through the
//! icon cache; Enter saves the selected icon; Esc or Ctrl+C quits.

use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use icmd::{BuiltinPalette, ColoredIcons, PaletteEntry, TerminalAttribute};

/// Maps a console attribute to the closest terminal color.
///
/// The reset attribute maps to `None`, meaning the default foreground.
pub fn console_color(attribute: TerminalAttribute) -> Option<Color> {
    if attribute.is_reset() {
        return None;
    }

    let red = attribute.contains(TerminalAttribute::RED);
    let green = attribute.contains(TerminalAttribute::GREEN);
    let blue = attribute.contains(TerminalAttribute::BLUE);
    let bright = attribute.contains(TerminalAttribute::INTENSITY);

    let color = match (red, green, blue, bright) {
        (false, false, false, false) => Color::Black,
        (false, false, false, true) => Color::DarkGrey,
        (true, false, false, false) => Color::DarkRed,
        (true, false, false, true) => Color::Red,
        (false, true, false, false) => Color::DarkGreen,
        (false, true, false, true) => Color::Green,
        (false, false, true, false) => Color::DarkBlue,
        (false, false, true, true) => Color::Blue,
        (true, true, false, false) => Color::DarkYellow,
        (true, true, false, true) => Color::Yellow,
        (true, false, true, false) => Color::DarkMagenta,
        (true, false, true, true) => Color::Magenta,
        (false, true, true, false) => Color::DarkCyan,
        (false, true, true, true) => Color::Cyan,
        (true, true, true, false) => Color::Grey,
        (true, true, true, true) => Color::White,
    };
    Some(color)
}

/// Prints `text` in the entry's console color.
pub fn print_colored(out: &mut impl Write, entry: &PaletteEntry, text: &str) -> io::Result<()> {
    match console_color(entry.attribute) {
        Some(color) => queue!(out, SetForegroundColor(color), Print(text), ResetColor),
        None => queue!(out, Print(text)),
    }
}

// ============================================================================
// Selection state
// ============================================================================

/// What the browser should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Redraw,
    Save,
    Quit,
    Ignore,
}

/// Cursor over a non-empty palette.
#[derive(Debug)]
pub struct Browser {
    selected: usize,
    total: usize,
}

impl Browser {
    pub fn new(total: usize) -> Self {
        Self { selected: 0, total }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if key.kind != KeyEventKind::Press || self.total == 0 {
            return Action::Ignore;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
            KeyCode::Esc | KeyCode::Char('q') => Action::Quit,
            KeyCode::Up => {
                self.selected = (self.selected + self.total - 1) % self.total;
                Action::Redraw
            }
            KeyCode::Down => {
                self.selected = (self.selected + 1) % self.total;
                Action::Redraw
            }
            KeyCode::Enter => Action::Save,
            _ => Action::Ignore,
        }
    }
}

// ============================================================================
// Terminal loop
// ============================================================================

/// Raw mode for as long as the guard lives.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Runs the browser until the user quits. Saved icons go to `out_dir`.
pub fn run(icons: &mut ColoredIcons, palette: &BuiltinPalette, out_dir: &Path) -> Result<()> {
    if palette.is_empty() {
        bail!("palette is empty");
    }

    let mut browser = Browser::new(palette.len());
    let mut stdout = io::stdout();
    let _raw = RawMode::enable().context("failed to enter raw mode")?;

    let mut status = String::new();
    loop {
        let Some(entry) = palette.get(browser.selected()) else {
            bail!("selection out of range");
        };
        draw(&mut stdout, icons, entry, browser.selected(), &status)?;
        status.clear();

        let Event::Key(key) = event::read()? else {
            continue;
        };
        match browser.handle_key(key) {
            Action::Quit => break,
            Action::Save => {
                let path = out_dir.join(format!("{}.ico", entry.name));
                icons.get_icon(entry.color)?.save(&path)?;
                status = format!("saved {}", path.display());
            }
            Action::Redraw | Action::Ignore => {}
        }
    }

    execute!(stdout, Print("\r\n"))?;
    Ok(())
}

fn draw(
    out: &mut impl Write,
    icons: &mut ColoredIcons,
    entry: &PaletteEntry,
    index: usize,
    status: &str,
) -> Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    queue!(
        out,
        Print("Use Up/Down key to select color, Enter to save, Esc or Ctrl+C to exit.\r\n\r\n")
    )?;
    print_colored(out, entry, &format!("  -> [{:02}]  {}", index + 1, entry.name))?;
    queue!(out, Print("\r\n\r\n"))?;

    let icon = icons
        .get_icon(entry.color)
        .with_context(|| format!("failed to render {}", entry.name))?;
    queue!(
        out,
        Print(format!(
            "{}  {}x{} icon, {} bytes\r\n\r\n",
            entry.color,
            icon.width(),
            icon.height(),
            icon.as_bytes().len()
        )),
        Print(format!("You can use command: \"icmd :{}\"\r\n", entry.name)),
    )?;
    if !status.is_empty() {
        queue!(out, Print(format!("\r\n{status}\r\n")))?;
    }
    out.flush()?;
    Ok(())
}

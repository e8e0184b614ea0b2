//! Terminal output using crossterm

use std::io::{self, Write};
use std::str::FromStr;

use crossterm::{
    queue,
    style::{self, Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
    tty::IsTty,
};
use unicode_width::UnicodeWidthChar;

use lexstyle::error::{Error, Result};
use lexstyle::syntax::{Color, Style};
use lexstyle::Window;

/// Fallback size when stdout is not a terminal
const DEFAULT_SIZE: (u16, u16) = (80, 24);

const TAB_WIDTH: usize = 8;

/// When to emit color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Resolve `Auto` against stdout
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => io::stdout().is_tty(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

impl FromStr for ColorChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(Error::Message(format!(
                "invalid color choice '{}' (expected auto, always or never)",
                s
            ))),
        }
    }
}

/// Terminal size, or 80x24 when it cannot be queried
pub fn size() -> (u16, u16) {
    terminal::size().unwrap_or(DEFAULT_SIZE)
}

/// Styled line printer for stdout
pub struct Terminal {
    colors: bool,
}

impl Terminal {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    /// Switch to `style`, replacing whatever was active
    pub fn apply_style(&mut self, style: &Style) -> Result<()> {
        if !self.colors {
            return Ok(());
        }
        let mut out = io::stdout();
        queue!(out, SetAttribute(Attribute::Reset))?;
        if style.fg != Color::Default {
            queue!(out, SetForegroundColor(to_crossterm(style.fg)))?;
        }
        if style.bg != Color::Default {
            queue!(out, SetBackgroundColor(to_crossterm(style.bg)))?;
        }
        if style.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if style.italic {
            queue!(out, SetAttribute(Attribute::Italic))?;
        }
        if style.underline {
            queue!(out, SetAttribute(Attribute::Underlined))?;
        }
        if style.reverse {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }

    /// Reset all text attributes
    pub fn reset_attributes(&mut self) -> Result<()> {
        if self.colors {
            queue!(io::stdout(), SetAttribute(Attribute::Reset))?;
        }
        Ok(())
    }

    /// Write a string at current cursor position
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        queue!(io::stdout(), Print(s))?;
        Ok(())
    }

    /// Flush output buffer to terminal
    pub fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    /// Print `text`, which starts at absolute offset `base`, styled by the
    /// window's style map and clipped to the window width
    pub fn render(&mut self, text: &str, base: usize, window: &Window) -> Result<()> {
        let max_cols = usize::from(window.columns());
        let mut offset = base;

        for line in text.split_inclusive('\n') {
            let content = line.trim_end_matches(['\n', '\r']);
            let mut col = 0;
            let mut styled = false;

            if let Some(style) = window.style_at(offset) {
                self.apply_style(&style)?;
                styled = true;
            }
            for (i, ch) in content.char_indices() {
                if i > 0 {
                    if let Some(style) = window.highlight_on().get(&(offset + i)) {
                        self.apply_style(style)?;
                        styled = true;
                    }
                }

                if ch == '\t' {
                    let stop = (col / TAB_WIDTH + 1) * TAB_WIDTH;
                    if stop > max_cols {
                        break;
                    }
                    self.write_str(&" ".repeat(stop - col))?;
                    col = stop;
                    continue;
                }

                let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
                if col + ch_width > max_cols {
                    break;
                }
                let mut buf = [0u8; 4];
                self.write_str(ch.encode_utf8(&mut buf))?;
                col += ch_width;
            }

            if styled {
                self.reset_attributes()?;
            }
            self.write_str("\n")?;
            offset += line.len();
        }

        self.flush()
    }
}

/// Map a palette color to crossterm
fn to_crossterm(color: Color) -> style::Color {
    match color {
        Color::Default => style::Color::Reset,
        Color::Black => style::Color::Black,
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::White => style::Color::Grey,
        Color::BrightBlack => style::Color::DarkGrey,
        Color::BrightRed => style::Color::Red,
        Color::BrightGreen => style::Color::Green,
        Color::BrightYellow => style::Color::Yellow,
        Color::BrightBlue => style::Color::Blue,
        Color::BrightMagenta => style::Color::Magenta,
        Color::BrightCyan => style::Color::Cyan,
        Color::BrightWhite => style::Color::White,
    }
}

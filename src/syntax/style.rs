//! Faces: named text styles
//!
//! Token kinds resolve to face names; the face registry turns a face name
//! into the attributes the renderer paints with.

use std::collections::HashMap;

/// Terminal colors (ANSI 16-color palette for compatibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    /// Parse a color from its lowercase name ("green", "brightblack", ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let color = match name.to_ascii_lowercase().replace(['_', '-'], "").as_str() {
            "default" => Color::Default,
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            "brightblack" => Color::BrightBlack,
            "brightred" => Color::BrightRed,
            "brightgreen" => Color::BrightGreen,
            "brightyellow" => Color::BrightYellow,
            "brightblue" => Color::BrightBlue,
            "brightmagenta" => Color::BrightMagenta,
            "brightcyan" => Color::BrightCyan,
            "brightwhite" => Color::BrightWhite,
            _ => return None,
        };
        Some(color)
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Reverse video (swap fg/bg)
    pub reverse: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Builder: set background color
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Registry of named faces
///
/// A face that is registered always counts as styling, even when all of its
/// attributes are defaults: with sparse turn-on spans, a plain face is what
/// resets the colors of the preceding token.
#[derive(Debug, Clone, Default)]
pub struct FaceRegistry {
    faces: HashMap<String, Style>,
}

impl FaceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the standard syntax faces
    pub fn with_defaults() -> Self {
        let mut faces = Self::new();
        faces.define("string", Style::fg(Color::Green));
        faces.define("number", Style::fg(Color::Magenta));
        faces.define("keyword", Style::fg(Color::Cyan).with_bold());
        faces.define("comment", Style::fg(Color::BrightBlack));
        faces.define("function_name", Style::fg(Color::Blue).with_bold());
        faces.define("type", Style::fg(Color::Yellow).with_bold());
        faces.define("constant", Style::fg(Color::Yellow));
        faces.define("variable", Style::default());
        faces.define("builtin", Style::fg(Color::Cyan));
        faces.define("label", Style::fg(Color::Yellow).with_bold());
        faces.define("operator", Style::default());
        faces.define("punctuation", Style::default());
        faces
    }

    /// Define or replace a face
    pub fn define(&mut self, name: &str, style: Style) {
        self.faces.insert(name.to_string(), style);
    }

    /// Look up a face by name
    pub fn get(&self, name: &str) -> Option<Style> {
        self.faces.get(name).copied()
    }

    /// Number of defined faces
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Check if no faces are defined
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}

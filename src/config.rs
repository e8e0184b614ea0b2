//! Configuration file support
//!
//! Loads settings from ~/.lexstyle.toml (or %USERPROFILE%\.lexstyle.toml on Windows)
//!
//! Example:
//! ```toml
//! syntax-highlight = true
//! highlight-buffer-size-limit = 1048576
//! debug = false
//!
//! [token-map]
//! "Name.Builtin" = "builtin"
//!
//! [faces.string]
//! foreground = "green"
//! bold = true
//! ```

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use toml::{Table, Value};

use crate::error::{Error, Result};
use crate::syntax::{Color, FaceRegistry, HighlightSettings, StyleMapping, DEFAULT_SIZE_LIMIT};

/// Environment variable that turns on debug logging
pub const DEBUG_ENV: &str = "LEXSTYLE_DEBUG";

/// Attributes set by a `[faces.NAME]` table; unset ones keep the face's value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceOverride {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub reverse: Option<bool>,
}

/// Configuration settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether syntax highlighting is enabled
    pub syntax_highlight: bool,
    /// Documents smaller than this are lexed whole
    pub size_limit: usize,
    /// Whether debug logging is enabled
    pub debug: bool,
    /// Entries layered over the default token map
    pub token_map: Vec<(String, String)>,
    /// Face overrides by face name
    pub faces: HashMap<String, FaceOverride>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            syntax_highlight: true,
            size_limit: DEFAULT_SIZE_LIMIT,
            debug: false,
            token_map: Vec::new(),
            faces: HashMap::new(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".lexstyle.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".lexstyle.toml"))
        }
    }

    /// Load configuration from the user's config file
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) => Self::load_from(&path)?,
            None => Config::default(),
        };
        if std::env::var(DEBUG_ENV).is_ok_and(|value| parse_bool(&value)) {
            config.debug = true;
        }
        Ok(config)
    }

    /// Load configuration from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        let table: Table = contents
            .parse()
            .map_err(|e: toml::de::Error| Error::Config(e.message().to_string()))?;
        let mut config = Config::default();
        config.apply(&table)?;
        Ok(config)
    }

    /// Apply settings from a parsed table
    fn apply(&mut self, table: &Table) -> Result<()> {
        if let Some(value) = table.get("syntax-highlight") {
            self.syntax_highlight = value_bool("syntax-highlight", value)?;
        }

        if let Some(value) = table.get("highlight-buffer-size-limit") {
            self.size_limit = match value {
                Value::Integer(n) => usize::try_from(*n).map_err(|_| {
                    Error::Config(format!("highlight-buffer-size-limit out of range: {}", n))
                })?,
                Value::String(s) => s.trim().parse().map_err(|_| {
                    Error::Config(format!("highlight-buffer-size-limit is not a number: {}", s))
                })?,
                other => return Err(type_error("highlight-buffer-size-limit", other)),
            };
        }

        if let Some(value) = table.get("debug") {
            self.debug = value_bool("debug", value)?;
        }

        if let Some(value) = table.get("token-map") {
            let Value::Table(entries) = value else {
                return Err(type_error("token-map", value));
            };
            for (kind, face) in entries {
                let Value::String(face) = face else {
                    return Err(type_error(&format!("token-map.{}", kind), face));
                };
                self.token_map.push((kind.clone(), face.clone()));
            }
        }

        if let Some(value) = table.get("faces") {
            let Value::Table(faces) = value else {
                return Err(type_error("faces", value));
            };
            for (name, attrs) in faces {
                let Value::Table(attrs) = attrs else {
                    return Err(type_error(&format!("faces.{}", name), attrs));
                };
                self.faces.insert(name.clone(), parse_face(name, attrs)?);
            }
        }

        Ok(())
    }

    /// The default token map with the configured entries layered on top
    pub fn style_mapping(&self) -> StyleMapping {
        let mut mapping = StyleMapping::default_map();
        for (kind, face) in &self.token_map {
            mapping.insert(kind, face);
        }
        mapping
    }

    /// The default faces with the configured overrides applied
    pub fn face_registry(&self) -> FaceRegistry {
        let mut registry = FaceRegistry::with_defaults();
        for (name, attrs) in &self.faces {
            let mut style = registry.get(name).unwrap_or_default();
            if let Some(color) = attrs.foreground {
                style.fg = color;
            }
            if let Some(color) = attrs.background {
                style.bg = color;
            }
            style.bold = attrs.bold.unwrap_or(style.bold);
            style.italic = attrs.italic.unwrap_or(style.italic);
            style.underline = attrs.underline.unwrap_or(style.underline);
            style.reverse = attrs.reverse.unwrap_or(style.reverse);
            registry.define(name, style);
        }
        registry
    }

    pub fn highlight_settings(&self) -> HighlightSettings {
        HighlightSettings {
            syntax_highlight: self.syntax_highlight,
            size_limit: self.size_limit,
        }
    }
}

fn parse_face(name: &str, attrs: &Table) -> Result<FaceOverride> {
    let mut face = FaceOverride::default();
    for (key, value) in attrs {
        let field = format!("faces.{}.{}", name, key);
        match key.as_str() {
            "foreground" => face.foreground = value_color(&field, value)?,
            "background" => face.background = value_color(&field, value)?,
            "bold" => face.bold = Some(value_bool(&field, value)?),
            "italic" => face.italic = Some(value_bool(&field, value)?),
            "underline" => face.underline = Some(value_bool(&field, value)?),
            "reverse" => face.reverse = Some(value_bool(&field, value)?),
            _ => tracing::debug!(key = %field, "ignoring unknown face attribute"),
        }
    }
    Ok(face)
}

fn value_bool(key: &str, value: &Value) -> Result<bool> {
    match value {
        Value::Boolean(b) => Ok(*b),
        Value::String(s) => Ok(parse_bool(s)),
        other => Err(type_error(key, other)),
    }
}

/// Unknown color names are ignored
fn value_color(key: &str, value: &Value) -> Result<Option<Color>> {
    let Value::String(name) = value else {
        return Err(type_error(key, value));
    };
    let color = Color::from_name(name);
    if color.is_none() {
        tracing::warn!(key, color = %name, "ignoring unknown color");
    }
    Ok(color)
}

fn type_error(key: &str, value: &Value) -> Error {
    Error::Config(format!("{} has unexpected type {}", key, value.type_str()))
}

/// Parse a boolean value from string
fn parse_bool(s: &str) -> bool {
    let s = s.to_lowercase();
    matches!(s.as_str(), "true" | "yes" | "on" | "1")
}

//! Lexer descriptors and the tokenizer seam
//!
//! A lexer catalog enumerates descriptors: an identifier, the file-name
//! patterns the lexer claims, and a factory producing a fresh tokenizer.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use super::tokens::Token;
use crate::error::{Error, Result};

/// Splits text into classified tokens
///
/// The tokens returned for one call must concatenate to exactly `text`.
pub trait Tokenizer: Send {
    /// Lexer identifier, used in diagnostics
    fn name(&self) -> &str;

    /// Tokenize `text` in emission order
    fn lex<'t>(&self, text: &'t str) -> Result<Vec<Token<'t>>>;
}

/// Builds a tokenizer for a descriptor
pub type TokenizerFactory = Arc<dyn Fn() -> Result<Box<dyn Tokenizer>> + Send + Sync>;

/// A file-name pattern claimed by a lexer
#[derive(Debug, Clone)]
pub enum FilePattern {
    /// Exact basename, e.g. `Rakefile`
    Literal(String),
    /// Glob anchored at the end of the name, e.g. `*.rb` or `*_spec.*`
    Glob { source: String, regex: Regex },
}

impl FilePattern {
    /// Parse a catalog pattern
    ///
    /// `*.ext` matches the extension case-insensitively, other patterns with
    /// `*` match any substring there and are anchored at the end of the name,
    /// and anything else must equal the basename.
    pub fn parse(pattern: &str) -> std::result::Result<Self, regex::Error> {
        let body = if let Some(ext) = pattern.strip_prefix("*.") {
            format!(r"\.{}", regex::escape(ext))
        } else if pattern.contains('*') {
            let trimmed = pattern.strip_prefix('*').unwrap_or(pattern);
            regex::escape(trimmed).replace(r"\*", ".*")
        } else {
            return Ok(FilePattern::Literal(pattern.to_string()));
        };

        let regex = RegexBuilder::new(&format!(r"{}\z", body))
            .case_insensitive(true)
            .build()?;
        Ok(FilePattern::Glob {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as written in the catalog
    pub fn as_str(&self) -> &str {
        match self {
            FilePattern::Literal(name) => name,
            FilePattern::Glob { source, .. } => source,
        }
    }

    /// Check a file name (a path's basename is used)
    pub fn matches(&self, filename: &str) -> bool {
        let basename = Path::new(filename)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(filename);
        match self {
            FilePattern::Literal(name) => basename == name,
            FilePattern::Glob { regex, .. } => regex.is_match(basename),
        }
    }
}

/// A lexer known to the catalog
#[derive(Clone)]
pub struct LexerDescriptor {
    id: String,
    patterns: Vec<FilePattern>,
    factory: TokenizerFactory,
}

impl LexerDescriptor {
    /// Create a descriptor from raw catalog patterns
    pub fn new(id: &str, patterns: &[&str], factory: TokenizerFactory) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| FilePattern::parse(pattern))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|source| Error::Build {
                lexer: id.to_string(),
                source,
            })?;
        Ok(Self {
            id: id.to_string(),
            patterns,
            factory,
        })
    }

    /// Lexer identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// File-name patterns, in catalog order
    pub fn patterns(&self) -> &[FilePattern] {
        &self.patterns
    }

    /// Check whether any pattern claims the file name
    pub fn matches(&self, filename: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(filename))
    }

    /// Construct a fresh tokenizer
    pub fn build(&self) -> Result<Box<dyn Tokenizer>> {
        (self.factory)()
    }
}

impl fmt::Debug for LexerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patterns: Vec<_> = self.patterns.iter().map(FilePattern::as_str).collect();
        f.debug_struct("LexerDescriptor")
            .field("id", &self.id)
            .field("patterns", &patterns)
            .finish_non_exhaustive()
    }
}

/// Source of lexer descriptors
pub trait LexerCatalog {
    /// All known lexers, in a fixed enumeration order
    fn lexers(&self) -> Result<Vec<LexerDescriptor>>;
}

//! Token kinds and tokens
//!
//! Lexers classify text with dot-separated hierarchical kinds such as
//! `Literal.String.Double`. Dropping trailing segments yields progressively
//! more general ancestors (`Literal.String`, then `Literal`).

use std::borrow::Cow;
use std::fmt;

/// A hierarchical, dot-separated token kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenKind(Cow<'static, str>);

impl TokenKind {
    /// Kind for text a lexer does not otherwise classify
    pub const TEXT: TokenKind = TokenKind::from_static("Text");

    /// Create a kind from a static name
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// The full qualified name
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The kind itself followed by its ancestors, most specific first
    pub fn chain(&self) -> Chain<'_> {
        Chain {
            rest: Some(self.as_str()),
        }
    }

    /// The immediate ancestor, if any
    pub fn parent(&self) -> Option<&str> {
        self.as_str().rfind('.').map(|idx| &self.as_str()[..idx])
    }
}

impl From<String> for TokenKind {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

impl From<&'static str> for TokenKind {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Iterator over a kind and its ancestors
pub struct Chain<'a> {
    rest: Option<&'a str>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let current = self.rest?;
        self.rest = current.rfind('.').map(|idx| &current[..idx]);
        Some(current)
    }
}

/// A classified slice of lexed text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(kind: impl Into<TokenKind>, text: &'a str) -> Self {
        Self {
            kind: kind.into(),
            text,
        }
    }

    /// Length of the token in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

//! Token kind to face resolution

use std::collections::HashMap;

use super::tokens::TokenKind;

/// Mapping from exact token kind names to face names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMapping {
    entries: HashMap<String, String>,
}

impl StyleMapping {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard mapping used when a mode does not supply its own
    pub fn default_map() -> Self {
        DEFAULT_TOKEN_MAP.iter().copied().collect()
    }

    /// Map a token kind to a face, replacing any previous entry
    pub fn insert(&mut self, kind: impl Into<String>, face: impl Into<String>) {
        self.entries.insert(kind.into(), face.into());
    }

    /// Face for an exact kind name, without ancestor fallback
    pub fn get(&self, kind: &str) -> Option<&str> {
        self.entries.get(kind).map(String::as_str)
    }

    /// Merge another mapping on top of this one
    pub fn extend(&mut self, other: &StyleMapping) {
        for (kind, face) in &other.entries {
            self.entries.insert(kind.clone(), face.clone());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, F: Into<String>> FromIterator<(K, F)> for StyleMapping {
    fn from_iter<I: IntoIterator<Item = (K, F)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (kind, face) in iter {
            mapping.insert(kind, face);
        }
        mapping
    }
}

/// Resolve a token kind to a face name
///
/// Exact match wins; otherwise the most specific ancestor present in the
/// mapping is used. Kinds with no mapped ancestor stay unstyled.
pub fn resolve<'m>(kind: &TokenKind, mapping: &'m StyleMapping) -> Option<&'m str> {
    kind.chain().find_map(|name| mapping.get(name))
}

const DEFAULT_TOKEN_MAP: &[(&str, &str)] = &[
    // String literals
    ("Literal.String", "string"),
    ("Literal.String.Double", "string"),
    ("Literal.String.Single", "string"),
    ("Literal.String.Backtick", "string"),
    ("Literal.String.Heredoc", "string"),
    ("Literal.String.Regex", "string"),
    ("Literal.String.Symbol", "string"),
    // Numeric literals
    ("Literal.Number", "number"),
    ("Literal.Number.Integer", "number"),
    ("Literal.Number.Float", "number"),
    ("Literal.Number.Hex", "number"),
    ("Literal.Number.Oct", "number"),
    ("Literal.Number.Bin", "number"),
    // Keywords
    ("Keyword", "keyword"),
    ("Keyword.Constant", "keyword"),
    ("Keyword.Declaration", "keyword"),
    ("Keyword.Namespace", "keyword"),
    ("Keyword.Pseudo", "keyword"),
    ("Keyword.Reserved", "keyword"),
    ("Keyword.Type", "keyword"),
    // Comments
    ("Comment", "comment"),
    ("Comment.Single", "comment"),
    ("Comment.Multiline", "comment"),
    ("Comment.Doc", "comment"),
    ("Comment.Preproc", "comment"),
    ("Comment.PreprocFile", "comment"),
    // Names
    ("Name.Function", "function_name"),
    ("Name.Class", "type"),
    ("Name.Constant", "constant"),
    ("Name.Variable", "variable"),
    ("Name.Variable.Instance", "variable"),
    ("Name.Variable.Class", "variable"),
    ("Name.Variable.Global", "variable"),
    ("Name.Builtin", "builtin"),
    ("Name.Label", "label"),
    // Operators and punctuation
    ("Operator", "operator"),
    ("Punctuation", "punctuation"),
];

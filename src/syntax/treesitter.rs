//! Tree-sitter tokenizers
//!
//! A grammar's highlight query tags syntax nodes with dot-separated capture
//! names such as `string` or `keyword.function`. The captures of one parse
//! are sorted by start byte and walked once: each capture that does not
//! overlap an earlier one becomes a token whose kind is translated from its
//! capture name, and bytes no capture claims become `Text`.

use parking_lot::Mutex;
use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Parser, Query, QueryCursor};

use super::lexer::Tokenizer;
use super::tokens::{Token, TokenKind};
use crate::error::{Error, Result};

/// A capture entry: (start_byte, end_byte, capture_index)
type CaptureEntry = (usize, usize, u32);

/// Capture names and the token kinds they translate to
///
/// Looked up by exact name first, then by dropping trailing segments.
const CAPTURE_KINDS: &[(&str, &str)] = &[
    ("attribute", "Name.Decorator"),
    ("boolean", "Keyword.Constant"),
    ("comment", "Comment"),
    ("comment.documentation", "Comment.Doc"),
    ("constant", "Name.Constant"),
    ("constant.builtin", "Keyword.Constant"),
    ("constructor", "Name.Class"),
    ("escape", "Literal.String.Escape"),
    ("float", "Literal.Number.Float"),
    ("function", "Name.Function"),
    ("function.builtin", "Name.Builtin"),
    ("function.macro", "Name.Function.Magic"),
    ("keyword", "Keyword"),
    ("label", "Name.Label"),
    ("module", "Name.Namespace"),
    ("namespace", "Name.Namespace"),
    ("number", "Literal.Number"),
    ("operator", "Operator"),
    ("property", "Name.Attribute"),
    ("punctuation", "Punctuation"),
    ("string", "Literal.String"),
    ("string.escape", "Literal.String.Escape"),
    ("string.regex", "Literal.String.Regex"),
    ("string.special", "Literal.String.Other"),
    ("string.special.key", "Name.Tag"),
    ("tag", "Name.Tag"),
    ("type", "Name.Class"),
    ("type.builtin", "Keyword.Type"),
    ("variable", "Name.Variable"),
    ("variable.builtin", "Name.Builtin.Pseudo"),
];

/// Token kind for a highlight capture name; unknown names are `Text`
pub fn capture_kind(name: &str) -> TokenKind {
    let mut prefix = name;
    loop {
        if let Some(&(_, kind)) = CAPTURE_KINDS.iter().find(|(capture, _)| *capture == prefix) {
            return TokenKind::from_static(kind);
        }
        match prefix.rfind('.') {
            Some(idx) => prefix = &prefix[..idx],
            None => return TokenKind::TEXT,
        }
    }
}

/// A tokenizer backed by a tree-sitter grammar and its highlight query
pub struct TreeSitterLexer {
    name: String,
    parser: Mutex<Parser>,
    query: Query,
    /// Token kind per capture index of `query`
    kinds: Vec<TokenKind>,
}

impl TreeSitterLexer {
    /// Load `language` and compile its highlight query
    pub fn new(name: &str, language: &Language, highlights_query: &str) -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(language)
            .map_err(|e| grammar_error(name, e))?;
        let query = Query::new(language, highlights_query).map_err(|e| grammar_error(name, e))?;
        let kinds = query
            .capture_names()
            .iter()
            .map(|capture| capture_kind(capture))
            .collect();

        Ok(Self {
            name: name.to_string(),
            parser: Mutex::new(parser),
            query,
            kinds,
        })
    }

    /// Parse `text` and collect its captures, sorted by start
    fn collect_captures(&self, text: &str) -> Result<Vec<CaptureEntry>> {
        let tree = self
            .parser
            .lock()
            .parse(text, None)
            .ok_or_else(|| Error::Lex {
                lexer: self.name.clone(),
                message: "parse did not complete".to_string(),
            })?;

        let mut buffer = Vec::new();
        let mut cursor = QueryCursor::new();
        let mut captures = cursor.captures(&self.query, tree.root_node(), text.as_bytes());
        while let Some((mat, capture_idx)) = captures.next() {
            let capture = &mat.captures[*capture_idx];
            let node = capture.node;
            buffer.push((node.start_byte(), node.end_byte(), capture.index));
        }

        // Stable, so the earlier pattern wins between captures of one node
        buffer.sort_by_key(|(start, _, _)| *start);
        Ok(buffer)
    }

    fn kind(&self, index: u32) -> TokenKind {
        self.kinds
            .get(index as usize)
            .cloned()
            .unwrap_or(TokenKind::TEXT)
    }
}

impl Tokenizer for TreeSitterLexer {
    fn name(&self) -> &str {
        &self.name
    }

    fn lex<'t>(&self, text: &'t str) -> Result<Vec<Token<'t>>> {
        let mut tokens = Vec::new();
        let mut covered = 0;

        for (start, end, index) in self.collect_captures(text)? {
            let end = end.min(text.len());
            // Nested in or crossing a capture already emitted
            if start < covered || end <= start {
                continue;
            }
            if !text.is_char_boundary(start) || !text.is_char_boundary(end) {
                continue;
            }
            if start > covered {
                tokens.push(Token::new(TokenKind::TEXT, &text[covered..start]));
            }
            tokens.push(Token::new(self.kind(index), &text[start..end]));
            covered = end;
        }

        if covered < text.len() {
            tokens.push(Token::new(TokenKind::TEXT, &text[covered..]));
        }

        Ok(tokens)
    }
}

fn grammar_error(lexer: &str, err: impl std::fmt::Display) -> Error {
    Error::Grammar {
        lexer: lexer.to_string(),
        message: err.to_string(),
    }
}

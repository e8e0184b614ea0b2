//! Syntax highlighting
//!
//! Lexers classify text into hierarchical token kinds (`Literal.String.Double`),
//! a style mapping turns kinds into face names, and the face registry turns
//! face names into the styles the window paints with.
//!
//! The host calls [`Highlighter::highlight`] once per render cycle.
//! [`LexerHighlighter`] drives the document's lexer over the visible
//! viewport and falls back to [`BaselineHighlighter`] when it cannot.

mod builtin;
#[cfg(test)]
mod fixtures;
mod highlighter;
mod lexer;
mod mode;
mod registry;
mod resolve;
mod rules;
mod style;
mod tokens;
mod treesitter;
pub mod viewport;

pub use builtin::BuiltinCatalog;
pub use highlighter::{
    BaselineHighlighter, HighlightSettings, Highlighter, LexerHighlighter, DEFAULT_SIZE_LIMIT,
};
pub use lexer::{FilePattern, LexerCatalog, LexerDescriptor, Tokenizer, TokenizerFactory};
pub use mode::{DocumentMode, HighlightMode};
pub use registry::{LexerRegistry, LexerResolution};
pub use resolve::{resolve, StyleMapping};
pub use rules::{PatternRule, RuleLexer, RuleTable};
pub use style::{Color, FaceRegistry, Style};
pub use tokens::{Chain, Token, TokenKind};
pub use treesitter::{capture_kind, TreeSitterLexer};
pub use viewport::{HighlightSpan, SkipReason, TokenizeOutcome, Viewport};

//! Error types for lexstyle

use thiserror::Error;

/// Result type alias for lexstyle operations
pub type Result<T> = std::result::Result<T, Error>;

/// Highlighting error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("lexer {lexer} failed: {message}")]
    Lex { lexer: String, message: String },

    #[error("failed to build lexer {lexer}: {source}")]
    Build {
        lexer: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to load grammar for {lexer}: {message}")]
    Grammar { lexer: String, message: String },

    #[error("tokens cover {actual} bytes of a {expected} byte window")]
    Coverage { expected: usize, actual: usize },

    #[error("No such lexer: {0}")]
    UnknownLexer(String),

    #[error("Lexer already registered: {0}")]
    DuplicateLexer(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Message(String),
}

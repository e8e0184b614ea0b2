//! lexstyle - lexer-driven syntax highlighting for terminal editors
//!
//! Bridges a catalog of lexers emitting hierarchical token kinds to the
//! named faces an editor window paints with.

pub mod buffer;
pub mod config;
pub mod error;
pub mod logging;
pub mod syntax;
pub mod window;

pub use buffer::{Document, TextBuffer};
pub use config::Config;
pub use error::{Error, Result};
pub use window::Window;

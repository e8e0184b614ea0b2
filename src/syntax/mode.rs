//! Highlight modes
//!
//! A [`HighlightMode`] binds a lexer to a style mapping and is shared by
//! every document of that kind. A [`DocumentMode`] is the per-document view
//! of a mode: it may override the lexer or the mapping for that document
//! alone, and it owns the document's tokenizer once built.

use std::fmt;
use std::sync::Arc;

use super::lexer::{LexerDescriptor, Tokenizer};
use super::registry::LexerRegistry;
use super::resolve::StyleMapping;
use crate::error::Result;

/// A lexer bound to a style mapping
#[derive(Debug)]
pub struct HighlightMode {
    lexer: Option<Arc<LexerDescriptor>>,
    mapping: Arc<StyleMapping>,
}

impl HighlightMode {
    pub fn new(lexer: Option<Arc<LexerDescriptor>>, mapping: Arc<StyleMapping>) -> Self {
        Self { lexer, mapping }
    }

    /// Mode name, derived from the lexer id
    pub fn name(&self) -> String {
        match &self.lexer {
            Some(lexer) => format!("{}-mode", lexer.id()),
            None => "fundamental-mode".to_string(),
        }
    }

    pub fn lexer(&self) -> Option<&Arc<LexerDescriptor>> {
        self.lexer.as_ref()
    }

    pub fn mapping(&self) -> &Arc<StyleMapping> {
        &self.mapping
    }
}

/// Per-document highlighting state
pub struct DocumentMode {
    mode: Arc<HighlightMode>,
    lexer: Option<Arc<LexerDescriptor>>,
    mapping: Option<Arc<StyleMapping>>,
    /// Built on first use, dropped when the lexer changes
    tokenizer: Option<Box<dyn Tokenizer>>,
}

impl DocumentMode {
    pub fn new(mode: Arc<HighlightMode>) -> Self {
        Self {
            mode,
            lexer: None,
            mapping: None,
            tokenizer: None,
        }
    }

    /// Detect the mode for a file name
    ///
    /// Falls back to the registry's plain mode when no lexer claims the
    /// file. It still carries the default mapping, so a lexer set on the
    /// document later has faces to resolve to.
    pub fn for_file(registry: &LexerRegistry, filename: &str) -> Self {
        let mode = registry
            .mode_for_file(filename)
            .unwrap_or_else(|| registry.plain_mode());
        tracing::debug!(filename, mode = %mode.name(), "detected mode");
        Self::new(mode)
    }

    /// Builder: use `lexer` for this document only
    pub fn with_lexer(mut self, lexer: Arc<LexerDescriptor>) -> Self {
        self.set_lexer(lexer);
        self
    }

    /// Builder: use `mapping` for this document only
    pub fn with_mapping(mut self, mapping: Arc<StyleMapping>) -> Self {
        self.set_mapping(mapping);
        self
    }

    pub fn set_lexer(&mut self, lexer: Arc<LexerDescriptor>) {
        self.lexer = Some(lexer);
        self.tokenizer = None;
    }

    pub fn set_mapping(&mut self, mapping: Arc<StyleMapping>) {
        self.mapping = Some(mapping);
    }

    /// The shared mode
    pub fn mode(&self) -> &Arc<HighlightMode> {
        &self.mode
    }

    /// The document's lexer, else the mode's
    pub fn effective_lexer(&self) -> Option<&Arc<LexerDescriptor>> {
        self.lexer.as_ref().or(self.mode.lexer())
    }

    /// The document's mapping, else the mode's
    pub fn effective_mapping(&self) -> &Arc<StyleMapping> {
        self.mapping.as_ref().unwrap_or(self.mode.mapping())
    }

    /// The document's tokenizer, built on first use
    ///
    /// `Ok(None)` when there is no effective lexer. Build failures are not
    /// memoized, so the next cycle retries.
    pub fn tokenizer(&mut self) -> Result<Option<&dyn Tokenizer>> {
        let Some(lexer) = self.effective_lexer().cloned() else {
            return Ok(None);
        };
        if self.tokenizer.is_none() {
            tracing::debug!(lexer = lexer.id(), "building tokenizer");
            self.tokenizer = Some(lexer.build()?);
        }
        Ok(self.tokenizer.as_deref())
    }
}

impl fmt::Debug for DocumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentMode")
            .field("mode", &self.mode.name())
            .field("lexer", &self.effective_lexer().map(|l| l.id()))
            .field("tokenizer_built", &self.tokenizer.is_some())
            .finish()
    }
}

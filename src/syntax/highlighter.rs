//! Highlighters: the entry point the render loop calls each cycle
//!
//! [`LexerHighlighter`] highlights with the document's lexer and hands the
//! cycle to a baseline highlighter when there is no lexer or lexing fails.
//! [`BaselineHighlighter`] is the pattern-based fallback.

use std::sync::Arc;

use regex::Regex;

use super::mode::DocumentMode;
use super::style::{FaceRegistry, Style};
use super::viewport::{self, HighlightSpan, TokenizeOutcome};
use crate::buffer::Document;
use crate::error::Result;
use crate::window::Window;

/// Documents below this many bytes are lexed whole
pub const DEFAULT_SIZE_LIMIT: usize = 1024 * 1024;

/// Computes the style map of a window, once per render cycle
pub trait Highlighter {
    fn highlight(&mut self, doc: &dyn Document, window: &mut Window);
}

/// Settings shared by every highlight cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSettings {
    /// Master switch for syntax highlighting
    pub syntax_highlight: bool,
    /// Size under which documents are lexed whole
    pub size_limit: usize,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            syntax_highlight: true,
            size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}

/// Pattern rules of the baseline highlighter: face name and pattern
///
/// Face names double as capture group names in the combined pattern.
const BASELINE_RULES: &[(&str, &str)] = &[
    ("comment", r"#[^\n]*|//[^\n]*|/\*[\s\S]*?\*/"),
    ("string", r#""(?:[^"\\\n]|\\.)*"|'(?:[^'\\\n]|\\.)*'"#),
    ("number", r"\b\d+(?:\.\d+)?\b"),
];

/// Language-agnostic highlighting of comments, strings and numbers
///
/// Covers the same region the lexer would, and resets the style after each
/// match so unmatched text stays plain.
pub struct BaselineHighlighter {
    faces: Arc<FaceRegistry>,
    size_limit: usize,
    /// Every rule as one alternation; the leftmost match wins and ties go
    /// to the earlier rule
    pattern: Option<Regex>,
}

impl BaselineHighlighter {
    pub fn new(faces: Arc<FaceRegistry>, size_limit: usize) -> Self {
        let source = BASELINE_RULES
            .iter()
            .map(|(face, pattern)| format!("(?P<{}>{})", face, pattern))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = match Regex::new(&source) {
            Ok(regex) => Some(regex),
            Err(err) => {
                tracing::error!(error = %err, "baseline pattern failed to compile");
                None
            }
        };
        Self {
            faces,
            size_limit,
            pattern,
        }
    }

    /// Spans for `text`, which starts at absolute offset `base`
    fn scan(&self, text: &str, base: usize) -> Vec<HighlightSpan> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };
        let mut spans = Vec::new();

        for caps in pattern.captures_iter(text) {
            let matched = BASELINE_RULES
                .iter()
                .find_map(|&(face, _)| caps.name(face).map(|m| (face, m)));
            let Some((face, m)) = matched else {
                continue;
            };
            if let Some(style) = self.faces.get(face) {
                spans.push(HighlightSpan::new(base + m.start(), style));
                spans.push(HighlightSpan::new(base + m.end(), Style::default()));
            }
        }

        spans
    }
}

impl Highlighter for BaselineHighlighter {
    fn highlight(&mut self, doc: &dyn Document, window: &mut Window) {
        let selected = viewport::select(
            doc,
            doc.point(),
            window.columns(),
            window.rows(),
            self.size_limit,
        );
        match selected {
            Ok(view) => {
                let spans = self.scan(view.text, view.base_offset);
                tracing::debug!(spans = spans.len(), "baseline highlight");
                window.set_highlight_on(spans);
            }
            Err(reason) => {
                tracing::debug!(?reason, "baseline skipped");
                window.clear_highlight();
            }
        }
    }
}

/// Highlights with the document's lexer, falling back to a baseline
pub struct LexerHighlighter<B = BaselineHighlighter> {
    mode: DocumentMode,
    faces: Arc<FaceRegistry>,
    settings: HighlightSettings,
    baseline: B,
}

impl LexerHighlighter<BaselineHighlighter> {
    /// Create a highlighter with the pattern-based baseline
    pub fn new(mode: DocumentMode, faces: Arc<FaceRegistry>, settings: HighlightSettings) -> Self {
        let baseline = BaselineHighlighter::new(Arc::clone(&faces), settings.size_limit);
        Self::with_baseline(mode, faces, settings, baseline)
    }
}

impl<B: Highlighter> LexerHighlighter<B> {
    pub fn with_baseline(
        mode: DocumentMode,
        faces: Arc<FaceRegistry>,
        settings: HighlightSettings,
        baseline: B,
    ) -> Self {
        Self {
            mode,
            faces,
            settings,
            baseline,
        }
    }

    pub fn mode(&self) -> &DocumentMode {
        &self.mode
    }

    pub fn mode_mut(&mut self) -> &mut DocumentMode {
        &mut self.mode
    }

    pub fn settings(&self) -> &HighlightSettings {
        &self.settings
    }

    pub fn baseline(&self) -> &B {
        &self.baseline
    }

    /// Whether this cycle should do any highlighting at all
    pub fn should_highlight(&self, doc: &dyn Document, window: &Window) -> bool {
        window.has_colors() && self.settings.syntax_highlight && !doc.is_binary()
    }

    /// Lex the window; `Ok(None)` when the document has no lexer
    fn lex_window(&mut self, doc: &dyn Document, window: &Window) -> Result<Option<TokenizeOutcome>> {
        let mapping = Arc::clone(self.mode.effective_mapping());
        let Some(tokenizer) = self.mode.tokenizer()? else {
            return Ok(None);
        };
        viewport::highlight(
            tokenizer,
            &mapping,
            &self.faces,
            doc,
            window.columns(),
            window.rows(),
            self.settings.size_limit,
        )
        .map(Some)
    }
}

impl<B: Highlighter> Highlighter for LexerHighlighter<B> {
    fn highlight(&mut self, doc: &dyn Document, window: &mut Window) {
        if !self.should_highlight(doc, window) {
            tracing::debug!(doc = doc.name(), "highlighting disabled for this cycle");
            return;
        }

        match self.lex_window(doc, window) {
            Ok(Some(TokenizeOutcome::Highlighted(spans))) => window.set_highlight_on(spans),
            Ok(Some(TokenizeOutcome::Skipped(_))) => window.clear_highlight(),
            Ok(None) => {
                tracing::debug!(doc = doc.name(), "no lexer, using baseline");
                self.baseline.highlight(doc, window);
            }
            Err(err) => {
                tracing::warn!(doc = doc.name(), error = %err, "lexer failed, using baseline");
                self.baseline.highlight(doc, window);
            }
        }
    }
}

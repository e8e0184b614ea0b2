//! Viewport tokenization
//!
//! Picks the part of the document to lex, runs the tokenizer over it and
//! turns the tokens into sparse "turn-on" spans at absolute byte offsets.
//!
//! Small documents are lexed whole. Larger ones are lexed only from the
//! cursor onward, over a window sized from the visible area, so the cost of
//! a cycle stays bounded.

use super::lexer::Tokenizer;
use super::resolve::{resolve, StyleMapping};
use super::style::{FaceRegistry, Style};
use crate::buffer::Document;
use crate::error::{Error, Result};

/// Longest UTF-8 continuation tail a window end can cut off
const MAX_TRUNCATED_TAIL: usize = 3;

/// A style switched on at an absolute byte offset
///
/// The style holds until the next span or the end of the lexed region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    pub start: usize,
    pub style: Style,
}

impl HighlightSpan {
    pub fn new(start: usize, style: Style) -> Self {
        Self { start, style }
    }
}

/// The text handed to the tokenizer in one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport<'d> {
    /// Absolute offset of the first lexed byte
    pub base_offset: usize,
    /// The lexed text
    pub text: &'d str,
}

impl Viewport<'_> {
    /// Absolute offset just past the lexed text
    pub fn end_offset(&self) -> usize {
        self.base_offset + self.text.len()
    }
}

/// Why a cycle lexed nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The window holds bytes that are not valid text
    InvalidEncoding { offset: usize },
}

/// Result of one viewport pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeOutcome {
    /// Tokenized; the spans may be empty when nothing was styled
    Highlighted(Vec<HighlightSpan>),
    /// The window was unusable and nothing was lexed
    Skipped(SkipReason),
}

/// Bytes lexed from the cursor when the document is too large to lex whole
///
/// Half the visible area, tripled for lookahead. The mode line row is not
/// counted.
pub fn window_len(columns: u16, rows: u16) -> usize {
    usize::from(columns) * usize::from(rows).saturating_sub(1) / 2 * 3
}

/// Choose the text to lex
///
/// Documents smaller than `size_limit` bytes are taken whole from
/// `point_min`. Otherwise the window starts at `cursor` and spans
/// [`window_len`] bytes, clamped to the end of the document; a multi-byte
/// sequence cut by the window end is dropped.
pub fn select<'d>(
    doc: &'d dyn Document,
    cursor: usize,
    columns: u16,
    rows: u16,
    size_limit: usize,
) -> std::result::Result<Viewport<'d>, SkipReason> {
    let (start, end) = if doc.byte_size() < size_limit {
        (doc.point_min(), doc.point_max())
    } else {
        let start = cursor.clamp(doc.point_min(), doc.point_max());
        let mut end = start.saturating_add(window_len(columns, rows)).min(doc.point_max());
        // Drop a sequence split by the window end
        let floor = end.saturating_sub(MAX_TRUNCATED_TAIL).max(start);
        while end > floor && !doc.valid_encoding(start..end) {
            end -= 1;
        }
        (start, end)
    };

    let text = std::str::from_utf8(doc.bytes(start..end)).map_err(|e| {
        SkipReason::InvalidEncoding {
            offset: start + e.valid_up_to(),
        }
    })?;
    Ok(Viewport {
        base_offset: start,
        text,
    })
}

/// Lex the viewport and compute its spans
///
/// Offsets come from accumulating token lengths from the viewport base. A
/// token whose range strictly contains `cursor` starts its span at the
/// cursor. Tokens whose kind has no face in `mapping` or `faces` advance the
/// offset without emitting a span.
pub fn tokenize(
    tokenizer: &dyn Tokenizer,
    mapping: &StyleMapping,
    faces: &FaceRegistry,
    viewport: &Viewport<'_>,
    cursor: usize,
) -> Result<Vec<HighlightSpan>> {
    let tokens = tokenizer.lex(viewport.text)?;

    let mut spans = Vec::new();
    let mut position = viewport.base_offset;
    let mut clamped = false;

    for token in &tokens {
        let local = position - viewport.base_offset;
        let contiguous = viewport
            .text
            .get(local..)
            .is_some_and(|rest| rest.starts_with(token.text));
        if !contiguous {
            return Err(Error::Coverage {
                expected: viewport.text.len(),
                actual: local,
            });
        }
        if token.is_empty() {
            continue;
        }

        let end = position + token.len();
        if let Some(style) = resolve(&token.kind, mapping).and_then(|face| faces.get(face)) {
            let start = if !clamped && position < cursor && cursor < end {
                clamped = true;
                cursor
            } else {
                position
            };
            spans.push(HighlightSpan::new(start, style));
        }
        position = end;
    }

    if position != viewport.end_offset() {
        return Err(Error::Coverage {
            expected: viewport.text.len(),
            actual: position - viewport.base_offset,
        });
    }

    tracing::debug!(
        lexer = tokenizer.name(),
        tokens = tokens.len(),
        spans = spans.len(),
        "tokenized viewport"
    );
    Ok(spans)
}

/// Select the viewport and tokenize it
pub fn highlight(
    tokenizer: &dyn Tokenizer,
    mapping: &StyleMapping,
    faces: &FaceRegistry,
    doc: &dyn Document,
    columns: u16,
    rows: u16,
    size_limit: usize,
) -> Result<TokenizeOutcome> {
    let cursor = doc.point();
    let viewport = match select(doc, cursor, columns, rows, size_limit) {
        Ok(viewport) => viewport,
        Err(reason) => {
            tracing::debug!(?reason, "skipping highlight cycle");
            return Ok(TokenizeOutcome::Skipped(reason));
        }
    };
    tracing::debug!(
        base = viewport.base_offset,
        len = viewport.text.len(),
        "selected viewport"
    );
    let spans = tokenize(tokenizer, mapping, faces, &viewport, cursor)?;
    Ok(TokenizeOutcome::Highlighted(spans))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;
    use crate::syntax::fixtures;
    use crate::syntax::style::Color;
    use crate::syntax::tokens::{Token, TokenKind};
    use proptest::prelude::*;

    fn ruby() -> Box<dyn Tokenizer> {
        fixtures::ruby().build().unwrap()
    }

    fn mapping(entries: &[(&str, &str)]) -> StyleMapping {
        entries.iter().copied().collect()
    }

    fn whole(text: &str) -> Viewport<'_> {
        Viewport {
            base_offset: 0,
            text,
        }
    }

    /// Emits fixed tokens regardless of input
    struct Scripted(Vec<(&'static str, &'static str)>);

    impl Tokenizer for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn lex<'t>(&self, _text: &'t str) -> Result<Vec<Token<'t>>> {
            Ok(self
                .0
                .iter()
                .map(|&(kind, text)| Token::new(TokenKind::from_static(kind), text))
                .collect())
        }
    }

    #[test]
    fn test_window_len() {
        assert_eq!(window_len(80, 24), 80 * 23 / 2 * 3);
        assert_eq!(window_len(80, 1), 0);
        assert_eq!(window_len(80, 0), 0);
    }

    #[test]
    fn test_end_to_end_puts_hello() {
        let faces = FaceRegistry::with_defaults();
        let map = mapping(&[
            ("Keyword", "keyword"),
            ("Name.Builtin", "keyword"),
            ("Literal.String", "string"),
        ]);
        let spans = tokenize(ruby().as_ref(), &map, &faces, &whole(r#"puts "hello""#), 0).unwrap();
        assert_eq!(
            spans,
            vec![
                HighlightSpan::new(0, faces.get("keyword").unwrap()),
                HighlightSpan::new(5, faces.get("string").unwrap()),
            ]
        );
    }

    #[test]
    fn test_cursor_clamps_straddling_token() {
        let faces = FaceRegistry::with_defaults();
        let map = mapping(&[("Name.Builtin", "builtin"), ("Literal.String", "string")]);
        let spans = tokenize(ruby().as_ref(), &map, &faces, &whole(r#"puts "hello""#), 8).unwrap();
        assert_eq!(spans[0].start, 0);
        assert_eq!(spans[1].start, 8);
        assert_eq!(spans[1].style, Style::fg(Color::Green));
    }

    #[test]
    fn test_cursor_on_token_boundary_is_not_clamped() {
        let faces = FaceRegistry::with_defaults();
        let map = mapping(&[("Name.Builtin", "builtin"), ("Literal.String", "string")]);
        let spans = tokenize(ruby().as_ref(), &map, &faces, &whole(r#"puts "hello""#), 5).unwrap();
        let starts: Vec<usize> = spans.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 5]);
    }

    #[test]
    fn test_unmapped_tokens_advance_offset() {
        let faces = FaceRegistry::with_defaults();
        let map = mapping(&[("Literal.String", "string")]);
        let spans = tokenize(ruby().as_ref(), &map, &faces, &whole(r#"puts "hello""#), 0).unwrap();
        assert_eq!(spans, vec![HighlightSpan::new(5, Style::fg(Color::Green))]);
    }

    #[test]
    fn test_unknown_face_emits_nothing() {
        let faces = FaceRegistry::with_defaults();
        let map = mapping(&[("Literal.String", "no_such_face")]);
        let spans = tokenize(ruby().as_ref(), &map, &faces, &whole(r#"puts "hello""#), 0).unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_offsets_start_at_base() {
        let faces = FaceRegistry::with_defaults();
        let map = mapping(&[("Literal.String", "string")]);
        let viewport = Viewport {
            base_offset: 100,
            text: r#"puts "hello""#,
        };
        let spans = tokenize(ruby().as_ref(), &map, &faces, &viewport, 0).unwrap();
        assert_eq!(spans[0].start, 105);
    }

    #[test]
    fn test_zero_length_tokens_are_skipped() {
        let faces = FaceRegistry::with_defaults();
        let map = mapping(&[("Keyword", "keyword"), ("Literal.String", "string")]);
        let tokenizer = Scripted(vec![("Keyword", ""), ("Literal.String", "'a'")]);
        let spans = tokenize(&tokenizer, &map, &faces, &whole("'a'"), 0).unwrap();
        assert_eq!(spans, vec![HighlightSpan::new(0, Style::fg(Color::Green))]);
    }

    #[test]
    fn test_short_coverage_is_an_error() {
        let faces = FaceRegistry::with_defaults();
        let tokenizer = Scripted(vec![("Text", "ab")]);
        let err = tokenize(&tokenizer, &StyleMapping::new(), &faces, &whole("abc"), 0).unwrap_err();
        assert!(matches!(err, Error::Coverage { expected: 3, actual: 2 }));
    }

    #[test]
    fn test_mismatched_text_is_an_error() {
        let faces = FaceRegistry::with_defaults();
        let tokenizer = Scripted(vec![("Text", "xyz")]);
        let err = tokenize(&tokenizer, &StyleMapping::new(), &faces, &whole("abc"), 0).unwrap_err();
        assert!(matches!(err, Error::Coverage { .. }));
    }

    #[test]
    fn test_small_document_is_lexed_whole() {
        let mut doc = TextBuffer::new("t.rb", "a = 1\nb = 2\n");
        doc.set_point(6);
        let viewport = select(&doc, doc.point(), 80, 24, 1024).unwrap();
        assert_eq!(viewport.base_offset, 0);
        assert_eq!(viewport.text, "a = 1\nb = 2\n");
    }

    #[test]
    fn test_narrowed_document_starts_at_point_min() {
        let mut doc = TextBuffer::new("t.rb", "skip keep");
        doc.narrow(5..9);
        let viewport = select(&doc, doc.point(), 80, 24, 1024).unwrap();
        assert_eq!(viewport.base_offset, 5);
        assert_eq!(viewport.text, "keep");
    }

    #[test]
    fn test_large_document_is_windowed_at_cursor() {
        let content = "x".repeat(10_000);
        let mut doc = TextBuffer::new("t.rb", content);
        doc.set_point(500);
        let viewport = select(&doc, doc.point(), 10, 5, 1024).unwrap();
        assert_eq!(viewport.base_offset, 500);
        assert_eq!(viewport.text.len(), window_len(10, 5));
    }

    #[test]
    fn test_document_at_limit_is_windowed() {
        let doc = TextBuffer::new("t.rb", "x".repeat(64));
        let viewport = select(&doc, 60, 10, 5, 64).unwrap();
        assert_eq!(viewport.base_offset, 60);
        assert_eq!(viewport.text, "xxxx");
    }

    #[test]
    fn test_window_end_splitting_a_character_is_trimmed() {
        // window_len(2, 2) == 3
        let doc = TextBuffer::new("t", "aébcdef");
        let viewport = select(&doc, 0, 2, 2, 1).unwrap();
        assert_eq!(viewport.text, "aé");

        let doc = TextBuffer::new("t", "abécd");
        let viewport = select(&doc, 0, 2, 2, 1).unwrap();
        assert_eq!(viewport.text, "ab");
    }

    #[test]
    fn test_invalid_window_is_skipped() {
        let doc = TextBuffer::new("t", vec![b'a', 0xff, b'b', b'c']);
        let reason = select(&doc, 0, 80, 24, 1024).unwrap_err();
        assert_eq!(reason, SkipReason::InvalidEncoding { offset: 1 });
    }

    #[test]
    fn test_highlight_reports_skip() {
        let doc = TextBuffer::new("t", vec![0xff, b'a']);
        let faces = FaceRegistry::with_defaults();
        let outcome = highlight(
            ruby().as_ref(),
            &StyleMapping::default_map(),
            &faces,
            &doc,
            80,
            24,
            1024,
        )
        .unwrap();
        assert!(matches!(outcome, TokenizeOutcome::Skipped(_)));
    }

    #[test]
    fn test_highlight_empty_document() {
        let doc = TextBuffer::new("t.rb", "");
        let faces = FaceRegistry::with_defaults();
        let outcome = highlight(
            ruby().as_ref(),
            &StyleMapping::default_map(),
            &faces,
            &doc,
            80,
            24,
            1024,
        )
        .unwrap();
        assert_eq!(outcome, TokenizeOutcome::Highlighted(Vec::new()));
    }

    proptest! {
        #[test]
        fn test_spans_are_ordered_and_in_range(
            text in "[a-z0-9 \"'#:=().\\n\u{e9}]{0,120}",
            cursor in 0usize..140,
            base in 0usize..1000,
        ) {
            let faces = FaceRegistry::with_defaults();
            let map = StyleMapping::default_map();
            let viewport = Viewport { base_offset: base, text: &text };
            let spans = tokenize(ruby().as_ref(), &map, &faces, &viewport, base + cursor).unwrap();
            for pair in spans.windows(2) {
                prop_assert!(pair[0].start < pair[1].start);
            }
            for span in &spans {
                prop_assert!(span.start >= base);
                prop_assert!(span.start < viewport.end_offset());
            }
        }
    }
}

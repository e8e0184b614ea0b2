//! Window representation - the render surface highlighting writes to

use std::collections::BTreeMap;

use crate::syntax::{HighlightSpan, Style};

/// A window displaying a portion of a buffer
#[derive(Debug, Clone)]
pub struct Window {
    /// Visible width in columns
    columns: u16,
    /// Visible height in rows (including the mode line)
    rows: u16,
    /// Whether the terminal can render colors
    has_colors: bool,
    /// Style switched on at each absolute byte offset
    highlight_on: BTreeMap<usize, Style>,
}

impl Window {
    /// Create a new window with color support
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            has_colors: true,
            highlight_on: BTreeMap::new(),
        }
    }

    /// Builder: set color capability
    pub fn with_colors(mut self, has_colors: bool) -> Self {
        self.has_colors = has_colors;
        self
    }

    pub fn columns(&self) -> u16 {
        self.columns
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn has_colors(&self) -> bool {
        self.has_colors
    }

    /// Update size (call after resize event)
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
    }

    /// The current style map
    pub fn highlight_on(&self) -> &BTreeMap<usize, Style> {
        &self.highlight_on
    }

    /// Replace the style map with `spans`
    pub fn set_highlight_on(&mut self, spans: impl IntoIterator<Item = HighlightSpan>) {
        self.highlight_on = spans.into_iter().map(|span| (span.start, span.style)).collect();
    }

    /// Switch a style on at `offset`
    pub fn highlight_at(&mut self, offset: usize, style: Style) {
        self.highlight_on.insert(offset, style);
    }

    /// Drop all highlighting
    pub fn clear_highlight(&mut self) {
        self.highlight_on.clear();
    }

    /// Style in effect at `offset`: the last one switched on at or before it
    pub fn style_at(&self, offset: usize) -> Option<Style> {
        self.highlight_on
            .range(..=offset)
            .next_back()
            .map(|(_, style)| *style)
    }
}

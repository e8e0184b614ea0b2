//! Document access for highlighting
//!
//! Highlighting reads the document through the [`Document`] trait so hosts
//! can expose their own buffer storage. [`TextBuffer`] is a simple
//! byte-backed implementation with a point and optional narrowing.

use std::ops::Range;
use std::path::{Path, PathBuf};

/// Bytes scanned when classifying a document as binary
const BINARY_SNIFF_LEN: usize = 8000;

/// Read access to a document buffer
///
/// Offsets are absolute byte offsets. The accessible region is
/// `point_min()..point_min() + byte_size()`.
pub trait Document {
    /// Buffer name, used for lexer detection
    fn name(&self) -> &str;

    /// Size of the accessible region in bytes
    fn byte_size(&self) -> usize;

    /// First accessible offset
    fn point_min(&self) -> usize;

    /// Cursor offset
    fn point(&self) -> usize;

    /// Bytes in `range`, clamped to the accessible region
    fn bytes(&self, range: Range<usize>) -> &[u8];

    /// Whether the content should be treated as binary
    fn is_binary(&self) -> bool;

    /// End of the accessible region
    fn point_max(&self) -> usize {
        self.point_min() + self.byte_size()
    }

    /// Whether `range` holds valid UTF-8
    fn valid_encoding(&self, range: Range<usize>) -> bool {
        std::str::from_utf8(self.bytes(range)).is_ok()
    }
}

/// A document held in memory
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// Buffer name (e.g., "main.rs", "*scratch*")
    name: String,
    /// Associated file path (None for unnamed buffers)
    filename: Option<PathBuf>,
    /// Raw content
    content: Vec<u8>,
    /// Cursor offset
    point: usize,
    /// Accessible region when narrowed
    narrowed: Option<Range<usize>>,
}

impl TextBuffer {
    /// Create a buffer with the given name and content
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            filename: None,
            content: content.into(),
            point: 0,
            narrowed: None,
        }
    }

    /// Create a buffer from file contents
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());

        Ok(Self {
            filename: Some(path.to_path_buf()),
            ..Self::new(name, content)
        })
    }

    /// Get filename if set
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Move the cursor, clamped to the accessible region
    pub fn set_point(&mut self, point: usize) {
        self.point = point.clamp(self.point_min(), self.point_max());
    }

    /// Restrict the accessible region
    pub fn narrow(&mut self, range: Range<usize>) {
        let end = range.end.min(self.content.len());
        let start = range.start.min(end);
        self.narrowed = Some(start..end);
        self.set_point(self.point);
    }

    /// Make the whole content accessible again
    pub fn widen(&mut self) {
        self.narrowed = None;
    }

    fn region(&self) -> Range<usize> {
        self.narrowed.clone().unwrap_or(0..self.content.len())
    }
}

impl Document for TextBuffer {
    fn name(&self) -> &str {
        &self.name
    }

    fn byte_size(&self) -> usize {
        self.region().len()
    }

    fn point_min(&self) -> usize {
        self.region().start
    }

    fn point(&self) -> usize {
        self.point
    }

    fn bytes(&self, range: Range<usize>) -> &[u8] {
        let region = self.region();
        let end = range.end.clamp(region.start, region.end);
        let start = range.start.clamp(region.start, end);
        &self.content[start..end]
    }

    /// A NUL byte near the start marks the buffer as binary
    fn is_binary(&self) -> bool {
        let sniff = self.content.len().min(BINARY_SNIFF_LEN);
        self.content[..sniff].contains(&0)
    }
}

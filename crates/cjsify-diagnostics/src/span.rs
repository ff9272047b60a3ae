//! File-relative byte spans.

use serde::{Deserialize, Serialize};

/// Index of a file registered in a [`crate::SourceCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl FileId {
    /// Placeholder for spans that do not belong to any cached file.
    pub const DUMMY: FileId = FileId(u32::MAX);
}

/// Half-open byte range `[start, end)` inside one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub file_id: FileId,
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Span with no location; emitters print the message without a snippet.
    pub const DUMMY: Span = Span {
        file_id: FileId::DUMMY,
        start: 0,
        end: 0,
    };

    pub fn new(file_id: FileId, start: u32, end: u32) -> Self {
        Self { file_id, start, end }
    }

    /// Build a span from absolute positions of a parser whose first byte of
    /// this file sits at `base`.
    ///
    /// Positions before `base` clamp to the start of the file.
    pub fn from_absolute(file_id: FileId, base: u32, lo: u32, hi: u32) -> Self {
        let start = lo.saturating_sub(base);
        let end = hi.saturating_sub(base).max(start);
        Self { file_id, start, end }
    }

    /// Whether this span points into no file.
    pub fn is_dummy(&self) -> bool {
        self.file_id == FileId::DUMMY
    }

    /// Length in bytes.
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::DUMMY
    }
}

/// Human-facing position, 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Extra location attached to a diagnostic, e.g. the first default export
/// when reporting an export conflict.
#[derive(Debug, Clone)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub style: LabelStyle,
}

impl Label {
    /// Label drawn like the diagnostic's own span.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Primary,
        }
    }

    /// Label drawn as a note.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            style: LabelStyle::Secondary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Rendered in the diagnostic's severity color
    Primary,
    /// Rendered as a neutral note
    Secondary,
}

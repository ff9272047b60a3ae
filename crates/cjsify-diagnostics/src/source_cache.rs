//! Source text kept around so diagnostics can show locations and snippets.

use crate::span::{FileId, Location, Span};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub id: FileId,
    pub path: PathBuf,
    pub source: String,
    /// Byte offset of the first character of every line
    line_starts: Vec<u32>,
}

impl SourceFile {
    fn new(id: FileId, path: PathBuf, source: String) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .match_indices('\n')
                    .map(|(i, _)| (i + 1) as u32),
            )
            .collect();
        Self {
            id,
            path,
            source,
            line_starts,
        }
    }

    /// 1-indexed (line, column) of a byte offset. Offsets past the end clamp
    /// to the last position.
    pub fn line_column(&self, offset: u32) -> (u32, u32) {
        let offset = offset.min(self.source.len() as u32);
        let line_idx = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let column = offset - self.line_starts[line_idx] + 1;
        ((line_idx + 1) as u32, column)
    }

    /// Text of a 1-indexed line without its terminator.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&e| e as usize)
            .unwrap_or(self.source.len());
        Some(self.source[start..end].trim_end_matches(['\n', '\r']))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Files registered for diagnostic rendering, one entry per path.
#[derive(Debug, Default)]
pub struct SourceCache {
    files: Vec<SourceFile>,
    by_path: HashMap<PathBuf, FileId>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file. Adding the same path twice returns the first id and
    /// keeps the first contents.
    pub fn add_file(&mut self, path: impl AsRef<Path>, source: String) -> FileId {
        let path = path.as_ref().to_path_buf();
        if let Some(&id) = self.by_path.get(&path) {
            return id;
        }

        let id = FileId(self.files.len() as u32);
        self.files.push(SourceFile::new(id, path.clone(), source));
        self.by_path.insert(path, id);
        id
    }

    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        if id == FileId::DUMMY {
            return None;
        }
        self.files.get(id.0 as usize)
    }

    pub fn get_id(&self, path: impl AsRef<Path>) -> Option<FileId> {
        self.by_path.get(path.as_ref()).copied()
    }

    pub fn location(&self, span: Span) -> Option<Location> {
        let file = self.get_file(span.file_id)?;
        let (line, column) = file.line_column(span.start);
        Some(Location {
            file: file.path.to_string_lossy().into_owned(),
            line,
            column,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

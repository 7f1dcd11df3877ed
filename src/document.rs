//! Document access traits and the rope-backed reference implementation.
//!
//! The engine talks to the host buffer exclusively through [`Document`]
//! (read) and [`DocumentMut`] (write + batching). All positions are
//! absolute character offsets; every operation clamps out-of-bounds
//! positions to the nearest valid one instead of failing.
//!
//! [`RopeDocument`] is the bundled implementation, backed by
//! `ropey::Rope` with undo/redo stacks and batched edit grouping so a
//! replicated multi-caret edit lands as a single undoable operation.

use std::ops::Range;

use ropey::Rope;
use tracing::trace;

use crate::util::char_to_byte;

/// A single recorded edit, replayable in either direction.
#[derive(Debug, Clone)]
pub enum EditOperation {
    Insert { position: usize, text: String },
    Delete { position: usize, text: String },
    /// Groups the edits of one replicated operation for atomic undo/redo
    Batch { operations: Vec<EditOperation> },
}

/// Read-only view of the host document.
pub trait Document {
    /// Total length in characters
    fn len_chars(&self) -> usize;

    /// Full content as a String (used for linear lexical scans)
    fn content(&self) -> String;

    /// Text in a character range (clamped)
    fn slice(&self, range: Range<usize>) -> String;

    /// Number of lines (always >= 1)
    fn line_count(&self) -> usize;

    /// Line content without its terminator, None past the last line
    fn line_text(&self, line: usize) -> Option<String>;

    /// Length of a line in characters, excluding the terminator
    fn line_length(&self, line: usize) -> usize;

    /// Offset of the first character of a line
    fn line_start(&self, line: usize) -> usize;

    /// Convert an offset to (line, column)
    fn offset_to_line_col(&self, offset: usize) -> (usize, usize);

    /// Convert (line, column) to an offset, clamping the column
    fn line_col_to_offset(&self, line: usize, column: usize) -> usize;

    /// Find the next occurrence of `needle` at or after `from`.
    /// Returns (start, end) offsets, or None.
    fn find_forward(&self, needle: &str, from: usize) -> Option<(usize, usize)>;

    /// Find the first occurrence in the document
    fn find_from_start(&self, needle: &str) -> Option<(usize, usize)> {
        self.find_forward(needle, 0)
    }

    /// All non-overlapping occurrences, in document order
    fn find_all(&self, needle: &str) -> Vec<(usize, usize)> {
        let mut results = Vec::new();
        let mut from = 0;
        while let Some((start, end)) = self.find_forward(needle, from) {
            results.push((start, end));
            from = end.max(start + 1);
        }
        results
    }

    /// Offset just past the last character of a line (before its terminator)
    fn line_end(&self, line: usize) -> usize {
        self.line_start(line) + self.line_length(line)
    }

    /// Clamp an offset to document bounds
    fn clamp(&self, offset: usize) -> usize {
        offset.min(self.len_chars())
    }
}

/// Mutable document operations. Extends [`Document`].
pub trait DocumentMut: Document {
    /// Insert text at an offset (clamped)
    fn insert_at(&mut self, position: usize, text: &str);

    /// Remove a character range (clamped; empty ranges are no-ops)
    fn remove_range(&mut self, start: usize, end: usize);

    /// Start grouping edits: change notifications are suppressed and no
    /// per-edit undo entries are produced until `end_batch`. A nested
    /// `begin_batch` is a no-op.
    fn begin_batch(&mut self);

    /// Close the group: one undo entry, one revision bump.
    fn end_batch(&mut self);

    /// Change counter; observers refresh when it advances. Inside a
    /// batch it must not move.
    fn revision(&self) -> u64;
}

// =============================================================================
// RopeDocument
// =============================================================================

/// Rope-backed document with undo/redo and batched edit grouping.
#[derive(Debug, Clone, Default)]
pub struct RopeDocument {
    buffer: Rope,
    undo_stack: Vec<EditOperation>,
    redo_stack: Vec<EditOperation>,
    /// Edits collected while a batch is open
    batch: Option<Vec<EditOperation>>,
    revision: u64,
    modified: bool,
}

impl RopeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            buffer: Rope::from_str(text),
            ..Self::default()
        }
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    fn record(&mut self, op: EditOperation) {
        if let Some(batch) = self.batch.as_mut() {
            batch.push(op);
            return;
        }
        self.undo_stack.push(op);
        self.redo_stack.clear();
        self.bump();
    }

    fn bump(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.modified = true;
    }

    /// Apply an operation to the buffer without recording it
    fn apply(&mut self, op: &EditOperation) {
        match op {
            EditOperation::Insert { position, text } => {
                let pos = (*position).min(self.buffer.len_chars());
                self.buffer.insert(pos, text);
            }
            EditOperation::Delete { position, text } => {
                let start = (*position).min(self.buffer.len_chars());
                let end = (start + text.chars().count()).min(self.buffer.len_chars());
                if start < end {
                    self.buffer.remove(start..end);
                }
            }
            EditOperation::Batch { operations } => {
                for op in operations {
                    self.apply(op);
                }
            }
        }
    }

    fn invert(op: &EditOperation) -> EditOperation {
        match op {
            EditOperation::Insert { position, text } => EditOperation::Delete {
                position: *position,
                text: text.clone(),
            },
            EditOperation::Delete { position, text } => EditOperation::Insert {
                position: *position,
                text: text.clone(),
            },
            EditOperation::Batch { operations } => EditOperation::Batch {
                // Undoing a batch replays its members newest-first
                operations: operations.iter().rev().map(Self::invert).collect(),
            },
        }
    }

    /// Undo the most recent operation (or batch). Returns false when
    /// there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(op) = self.undo_stack.pop() else {
            return false;
        };
        let inverse = Self::invert(&op);
        self.apply(&inverse);
        self.redo_stack.push(op);
        self.bump();
        true
    }

    /// Redo the most recently undone operation
    pub fn redo(&mut self) -> bool {
        let Some(op) = self.redo_stack.pop() else {
            return false;
        };
        self.apply(&op);
        self.undo_stack.push(op);
        self.bump();
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }
}

impl Document for RopeDocument {
    fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    fn content(&self) -> String {
        self.buffer.to_string()
    }

    fn slice(&self, range: Range<usize>) -> String {
        let start = range.start.min(self.len_chars());
        let end = range.end.min(self.len_chars());
        if start >= end {
            return String::new();
        }
        self.buffer.slice(start..end).to_string()
    }

    fn line_count(&self) -> usize {
        self.buffer.len_lines().max(1)
    }

    fn line_text(&self, line: usize) -> Option<String> {
        if line >= self.buffer.len_lines() {
            return None;
        }
        let s = self.buffer.line(line).to_string();
        Some(s.trim_end_matches(&['\n', '\r'][..]).to_string())
    }

    fn line_length(&self, line: usize) -> usize {
        if line >= self.buffer.len_lines() {
            return 0;
        }
        let slice = self.buffer.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    fn line_start(&self, line: usize) -> usize {
        if line >= self.buffer.len_lines() {
            return self.len_chars();
        }
        self.buffer.line_to_char(line)
    }

    fn offset_to_line_col(&self, offset: usize) -> (usize, usize) {
        let clamped = offset.min(self.len_chars());
        let line = self.buffer.char_to_line(clamped);
        (line, clamped - self.buffer.line_to_char(line))
    }

    fn line_col_to_offset(&self, line: usize, column: usize) -> usize {
        if line >= self.buffer.len_lines() {
            return self.len_chars();
        }
        self.buffer.line_to_char(line) + column.min(self.line_length(line))
    }

    fn find_forward(&self, needle: &str, from: usize) -> Option<(usize, usize)> {
        if needle.is_empty() {
            return None;
        }
        let text = self.content();
        let from_byte = char_to_byte(&text, from.min(self.len_chars()));
        let rel = text[from_byte..].find(needle)?;
        let match_byte = from_byte + rel;
        let start = text[..match_byte].chars().count();
        Some((start, start + needle.chars().count()))
    }
}

impl DocumentMut for RopeDocument {
    fn insert_at(&mut self, position: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let pos = position.min(self.len_chars());
        self.buffer.insert(pos, text);
        trace!(pos, len = text.chars().count(), "insert");
        self.record(EditOperation::Insert {
            position: pos,
            text: text.to_string(),
        });
    }

    fn remove_range(&mut self, start: usize, end: usize) {
        let start = start.min(self.len_chars());
        let end = end.min(self.len_chars());
        if start >= end {
            return;
        }
        let removed = self.buffer.slice(start..end).to_string();
        self.buffer.remove(start..end);
        trace!(start, end, "remove");
        self.record(EditOperation::Delete {
            position: start,
            text: removed,
        });
    }

    fn begin_batch(&mut self) {
        if self.batch.is_none() {
            self.batch = Some(Vec::new());
        }
    }

    fn end_batch(&mut self) {
        let Some(operations) = self.batch.take() else {
            return;
        };
        if operations.is_empty() {
            return;
        }
        self.undo_stack.push(EditOperation::Batch { operations });
        self.redo_stack.clear();
        self.bump();
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_access() {
        let doc = RopeDocument::from_text("hello\nworld");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.line_text(0).as_deref(), Some("hello"));
        assert_eq!(doc.line_text(1).as_deref(), Some("world"));
        assert_eq!(doc.line_text(2), None);
        assert_eq!(doc.line_length(0), 5);
        assert_eq!(doc.line_start(1), 6);
        assert_eq!(doc.line_end(1), 11);
    }

    #[test]
    fn test_offset_conversions() {
        let doc = RopeDocument::from_text("hello\nworld");
        assert_eq!(doc.offset_to_line_col(0), (0, 0));
        assert_eq!(doc.offset_to_line_col(6), (1, 0));
        assert_eq!(doc.offset_to_line_col(11), (1, 5));
        assert_eq!(doc.line_col_to_offset(1, 0), 6);
        // Column clamps to line length
        assert_eq!(doc.line_col_to_offset(0, 99), 5);
        // Offset clamps to document length
        assert_eq!(doc.offset_to_line_col(999), (1, 5));
    }

    #[test]
    fn test_insert_remove_clamp() {
        let mut doc = RopeDocument::from_text("abc");
        doc.insert_at(999, "!");
        assert_eq!(doc.content(), "abc!");
        doc.remove_range(2, 999);
        assert_eq!(doc.content(), "ab");
        // Inverted range is a no-op
        doc.remove_range(2, 1);
        assert_eq!(doc.content(), "ab");
    }

    #[test]
    fn test_find_forward() {
        let doc = RopeDocument::from_text("foo bar foo");
        assert_eq!(doc.find_forward("foo", 0), Some((0, 3)));
        assert_eq!(doc.find_forward("foo", 1), Some((8, 11)));
        assert_eq!(doc.find_forward("foo", 9), None);
        assert_eq!(doc.find_from_start("bar"), Some((4, 7)));
        assert_eq!(doc.find_forward("", 0), None);
    }

    #[test]
    fn test_find_forward_multibyte() {
        let doc = RopeDocument::from_text("héllo wörld wörld");
        assert_eq!(doc.find_forward("wörld", 0), Some((6, 11)));
        assert_eq!(doc.find_forward("wörld", 7), Some((12, 17)));
    }

    #[test]
    fn test_find_all_disjoint() {
        let doc = RopeDocument::from_text("aaa");
        // Matches do not overlap
        assert_eq!(doc.find_all("aa"), vec![(0, 2)]);
    }

    #[test]
    fn test_batch_suppresses_revision() {
        let mut doc = RopeDocument::from_text("abc");
        let before = doc.revision();
        doc.begin_batch();
        doc.insert_at(0, "x");
        doc.insert_at(2, "y");
        assert_eq!(doc.revision(), before, "no notifications inside a batch");
        doc.end_batch();
        assert_eq!(doc.revision(), before + 1, "one notification per batch");
    }

    #[test]
    fn test_batch_undoes_atomically() {
        let mut doc = RopeDocument::from_text("abc");
        doc.begin_batch();
        doc.insert_at(3, "!");
        doc.insert_at(0, "?");
        doc.end_batch();
        assert_eq!(doc.content(), "?abc!");

        assert!(doc.undo());
        assert_eq!(doc.content(), "abc", "whole batch reverts in one undo");

        assert!(doc.redo());
        assert_eq!(doc.content(), "?abc!");
    }

    #[test]
    fn test_empty_batch_records_nothing() {
        let mut doc = RopeDocument::from_text("abc");
        doc.begin_batch();
        doc.end_batch();
        assert!(!doc.can_undo());
        assert_eq!(doc.revision(), 0);
    }

    #[test]
    fn test_undo_redo_single_edits() {
        let mut doc = RopeDocument::new();
        doc.insert_at(0, "a");
        doc.insert_at(1, "b");
        assert_eq!(doc.content(), "ab");

        assert!(doc.undo());
        assert_eq!(doc.content(), "a");
        assert!(doc.redo());
        assert_eq!(doc.content(), "ab");
        assert!(!doc.redo());
    }
}

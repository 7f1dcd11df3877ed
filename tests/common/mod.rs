//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use multicaret::{
    Caret, CaretEngine, Document, Key, KeyEvent, LanguageProfile, Modifiers, PointerButton,
    PointerEvent, RopeDocument,
};

/// Create a document from text
pub fn doc(text: &str) -> RopeDocument {
    RopeDocument::from_text(text)
}

/// Create an engine with the default (colon-blocks) profile
pub fn engine() -> CaretEngine {
    CaretEngine::new(LanguageProfile::colon_blocks())
}

/// Zero-width caret at a (line, column) position
pub fn caret_at(doc: &RopeDocument, line: usize, column: usize) -> Caret {
    Caret::at(doc.line_col_to_offset(line, column))
}

/// Selection covering the first occurrence of `needle`
pub fn select(doc: &RopeDocument, needle: &str) -> Caret {
    let (start, end) = doc
        .find_from_start(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in test document"));
    Caret::span(start, end)
}

/// Left pointer press/move/release event at an offset
pub fn pointer(modifiers: Modifiers, position: usize) -> PointerEvent {
    PointerEvent::new(PointerButton::Left, modifiers, position)
}

/// Key event shorthand
pub fn key(key: Key, modifiers: Modifiers) -> KeyEvent {
    KeyEvent::new(key, modifiers)
}

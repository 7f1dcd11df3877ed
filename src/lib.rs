//! multicaret - VS Code-style multi-cursor editing for single-caret editors
//!
//! This crate provides the caret collection, edit replication, drag
//! handling, occurrence search, and lexical scope resolution behind
//! multi-cursor editing. The host editor keeps its native (primary)
//! caret and rendering; the engine owns everything secondary.

pub mod caret;
pub mod caret_set;
pub mod clipboard;
pub mod document;
pub mod drag;
pub mod engine;
pub mod input;
pub mod language;
pub mod logging;
pub mod occurrence;
pub mod replicate;
pub mod scope;
pub mod util;

// Re-export commonly used types
pub use caret::Caret;
pub use caret_set::CaretSet;
pub use clipboard::{Clipboard, LocalClipboard, SystemClipboard};
pub use document::{Document, DocumentMut, RopeDocument};
pub use drag::DragState;
pub use engine::{CaretBlink, CaretEngine};
pub use input::{Key, KeyEvent, Modifiers, PointerButton, PointerEvent};
pub use language::LanguageProfile;

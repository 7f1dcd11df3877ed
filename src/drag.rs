//! Pointer-driven caret creation: column drag and free-form range drag.
//!
//! A plain left click clears the whole set and is left for the host's
//! native behavior. Alt+press either toggles/word-selects a caret and
//! arms a column drag, or (when a primary selection already exists)
//! converts it to a secondary and arms a range drag that keeps adjusting
//! one specific caret. Pointer release always returns to `Idle`.

use tracing::debug;

use crate::caret::Caret;
use crate::document::Document;
use crate::engine::CaretEngine;
use crate::input::{PointerButton, PointerEvent};

/// Current drag interaction, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    /// Rectangular multi-caret drag: one caret per line at the anchor column
    Column {
        anchor_line: usize,
        anchor_column: usize,
    },
    /// Free-form selection drag adjusting one secondary caret
    Range {
        anchor: usize,
        /// Index of the caret being adjusted in the secondary list
        target: usize,
    },
}

impl CaretEngine {
    /// Handle a pointer press. Returns true when the engine consumed the
    /// event; false lets the host run its native click behavior.
    pub fn pointer_pressed<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        primary: &mut Caret,
        event: PointerEvent,
    ) -> bool {
        if event.button != PointerButton::Left {
            return false;
        }
        if !event.modifiers.alt() {
            // Plain click: back to a single native caret
            self.clear();
            return false;
        }

        let pos = doc.clamp(event.position);
        let has_primary_selection = primary.has_selection();

        if has_primary_selection && !event.modifiers.shift() {
            // Keep the existing selection as a secondary and start a
            // free-form selection at the press point
            self.set.push_or_merge(*primary);
            self.set.add_at(doc, pos, true, None);
            self.blink.reset();
            self.drag = DragState::Range {
                anchor: pos,
                target: self.set.len().saturating_sub(1),
            };
            *primary = Caret::at(pos);
            debug!(pos, "range drag armed");
            return true;
        }

        let select_word = event.modifiers.shift() || has_primary_selection;
        if select_word {
            self.set.add_at(doc, pos, true, None);
            self.blink.reset();
        } else if self.set.toggle_at(pos) {
            self.blink.reset();
        }
        let (anchor_line, anchor_column) = doc.offset_to_line_col(pos);
        self.drag = DragState::Column {
            anchor_line,
            anchor_column,
        };
        true
    }

    /// Handle a pointer move while a button is held.
    pub fn pointer_moved<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        event: PointerEvent,
    ) -> bool {
        if event.button != PointerButton::Left || !event.modifiers.alt() {
            return false;
        }
        let pos = doc.clamp(event.position);
        match self.drag {
            DragState::Range { anchor, target } => {
                if target < self.set.len() {
                    self.set.set(target, Caret::span(anchor, pos));
                }
                true
            }
            DragState::Column {
                anchor_line,
                anchor_column,
            } => {
                let (current_line, _) = doc.offset_to_line_col(pos);
                let mut carets = Vec::new();
                let (low, high) = if anchor_line <= current_line {
                    (anchor_line, current_line)
                } else {
                    (current_line, anchor_line)
                };
                for line in low..=high {
                    let col = anchor_column.min(doc.line_length(line));
                    carets.push(Caret::at(doc.line_col_to_offset(line, col)));
                }
                // Live preview replaces the whole secondary list
                self.set.replace_all(carets);
                true
            }
            DragState::Idle => false,
        }
    }

    /// Handle a pointer release: any drag ends.
    pub fn pointer_released(&mut self, _event: PointerEvent) -> bool {
        if self.drag == DragState::Idle {
            return false;
        }
        self.drag = DragState::Idle;
        true
    }
}

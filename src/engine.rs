//! The engine facade owned by the host editor view.
//!
//! A [`CaretEngine`] always exists alongside the editor, possibly with an
//! empty caret set, so callers never test for the feature's presence.
//! The host forwards pointer and key events, paints the ranges and caret
//! marks the engine reports back, and drives the blink timer.

use std::ops::Range;
use std::time::Duration;

use tracing::debug;

use crate::caret::Caret;
use crate::caret_set::CaretSet;
use crate::clipboard::Clipboard;
use crate::document::DocumentMut;
use crate::drag::DragState;
use crate::input::{Key, KeyEvent};
use crate::language::LanguageProfile;
use crate::{occurrence, replicate};

/// Minimum blink interval, guarding against degenerate platform settings
const MIN_BLINK_INTERVAL: Duration = Duration::from_millis(200);

/// Fallback when the platform reports no caret flash time
const DEFAULT_BLINK_INTERVAL: Duration = Duration::from_millis(500);

/// Purely visual caret blink phase. Never gates an edit.
#[derive(Debug, Clone)]
pub struct CaretBlink {
    /// Whether carets should currently be painted
    pub visible: bool,
    interval: Duration,
}

impl CaretBlink {
    /// Derive the toggle interval from the platform's caret flash time
    /// (half the flash period, clamped to a sane minimum).
    pub fn from_flash_time(flash_time: Option<Duration>) -> Self {
        let interval = match flash_time {
            Some(t) if !t.is_zero() => (t / 2).max(MIN_BLINK_INTERVAL),
            _ => DEFAULT_BLINK_INTERVAL,
        };
        Self {
            visible: true,
            interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Timer callback: toggle visibility
    pub fn tick(&mut self) {
        self.visible = !self.visible;
    }

    /// Force the visible phase so all carets blink in sync. Called
    /// whenever a caret is added; the host should restart its timer.
    pub fn reset(&mut self) {
        self.visible = true;
    }
}

impl Default for CaretBlink {
    fn default() -> Self {
        Self::from_flash_time(None)
    }
}

/// Multi-caret engine: secondary carets, drag state, blink phase, and the
/// injected language profile.
#[derive(Debug, Default)]
pub struct CaretEngine {
    pub(crate) set: CaretSet,
    pub(crate) drag: DragState,
    pub(crate) blink: CaretBlink,
    profile: LanguageProfile,
}

impl CaretEngine {
    pub fn new(profile: LanguageProfile) -> Self {
        Self {
            profile,
            ..Self::default()
        }
    }

    pub fn with_flash_time(profile: LanguageProfile, flash_time: Option<Duration>) -> Self {
        Self {
            blink: CaretBlink::from_flash_time(flash_time),
            profile,
            ..Self::default()
        }
    }

    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: LanguageProfile) {
        self.profile = profile;
    }

    /// Drop all secondary carets and any drag in progress
    pub fn clear(&mut self) {
        self.set.clear();
        self.drag = DragState::Idle;
        self.blink.reset();
    }

    /// True iff at least one secondary caret exists
    pub fn has_multi(&self) -> bool {
        self.set.has_multi()
    }

    pub fn caret_set(&self) -> &CaretSet {
        &self.set
    }

    pub fn caret_set_mut(&mut self) -> &mut CaretSet {
        &mut self.set
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn blink(&self) -> &CaretBlink {
        &self.blink
    }

    /// Timer callback from the host
    pub fn blink_tick(&mut self) {
        self.blink.tick();
    }

    /// All carets, primary first, deduplicated
    pub fn all_carets(&self, primary: Caret) -> Vec<Caret> {
        self.set.all_with_primary(primary)
    }

    /// Ranges the host should highlight for secondary selections
    pub fn extra_selection_ranges(&self) -> Vec<Range<usize>> {
        self.set
            .carets()
            .iter()
            .filter(|c| c.has_selection())
            .map(|c| c.range())
            .collect()
    }

    /// Offsets the host should paint as blinking caret bars. While multi
    /// is active the primary is included so all carets blink in sync;
    /// empty while the blink phase is off.
    pub fn caret_marks(&self, primary: Caret) -> Vec<usize> {
        if !self.blink.visible {
            return Vec::new();
        }
        let mut marks = Vec::new();
        if self.has_multi() && !primary.has_selection() {
            marks.push(primary.position);
        }
        marks.extend(
            self.set
                .carets()
                .iter()
                .filter(|c| !c.has_selection())
                .map(|c| c.position),
        );
        marks
    }

    /// Handle a key event against the default binding table. Returns
    /// true when the event was consumed.
    pub fn key_pressed<D: DocumentMut + ?Sized>(
        &mut self,
        doc: &mut D,
        primary: &mut Caret,
        event: KeyEvent,
    ) -> bool {
        let mods = event.modifiers;

        // Caret-creation and selection chords work with any caret count
        match event.key {
            Key::ArrowUp if mods.ctrl() && mods.alt() => {
                if self.set.add_above(doc, *primary) {
                    self.blink.reset();
                }
                return true;
            }
            Key::ArrowDown if mods.ctrl() && mods.alt() => {
                if self.set.add_below(doc, *primary) {
                    self.blink.reset();
                }
                return true;
            }
            Key::Char('d') | Key::Char('D') if mods.ctrl() => {
                if occurrence::select_next_occurrence(doc, primary, &mut self.set) {
                    self.blink.reset();
                }
                return true;
            }
            Key::F(2) if mods.ctrl() => {
                if occurrence::select_all_occurrences(doc, primary, &mut self.set) {
                    self.blink.reset();
                }
                return true;
            }
            Key::Char('i') | Key::Char('I') if mods.alt() && mods.shift() => {
                if self.set.add_at_line_ends(doc, *primary) {
                    self.blink.reset();
                }
                return true;
            }
            Key::ArrowRight if mods.alt() && mods.shift() => {
                self.set.expand_selection(doc, primary, &self.profile);
                return true;
            }
            Key::ArrowLeft if mods.alt() && mods.shift() => {
                self.set.shrink_selection(doc, primary, &self.profile);
                return true;
            }
            _ => {}
        }

        // Edits replicate only while secondary carets exist; otherwise
        // the host's native editing applies.
        if !self.has_multi() {
            return false;
        }
        match event.key {
            Key::Enter => {
                replicate::insert_newline(doc, primary, &mut self.set, &self.profile);
                true
            }
            Key::Tab => {
                let unit = self.profile.indent_unit.clone();
                replicate::insert_text(doc, primary, &mut self.set, &unit);
                true
            }
            Key::Backspace => {
                replicate::backspace(doc, primary, &mut self.set);
                true
            }
            Key::Delete => {
                replicate::delete_forward(doc, primary, &mut self.set);
                true
            }
            _ => match event.printable() {
                Some(ch) => {
                    let mut buf = [0u8; 4];
                    replicate::insert_text(doc, primary, &mut self.set, ch.encode_utf8(&mut buf));
                    true
                }
                None => false,
            },
        }
    }

    /// Replicate a paste of `text`. Returns false when no secondary
    /// carets exist (the host pastes natively).
    pub fn paste_text<D: DocumentMut + ?Sized>(
        &mut self,
        doc: &mut D,
        primary: &mut Caret,
        text: &str,
    ) -> bool {
        if !self.has_multi() || text.is_empty() {
            return false;
        }
        replicate::paste(doc, primary, &mut self.set, text);
        true
    }

    /// Replicate a paste from the clipboard
    pub fn paste_from_clipboard<D: DocumentMut + ?Sized>(
        &mut self,
        doc: &mut D,
        primary: &mut Caret,
        clipboard: &mut dyn Clipboard,
    ) -> bool {
        if !self.has_multi() {
            return false;
        }
        match clipboard.get_text() {
            Ok(text) => self.paste_text(doc, primary, &text),
            Err(e) => {
                debug!("clipboard read failed: {e}");
                false
            }
        }
    }
}

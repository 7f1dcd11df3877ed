//! Input contract between the host editor surface and the engine.
//!
//! The host delivers pointer and key events with positions already
//! hit-tested to absolute character offsets; the engine never sees
//! screen coordinates.

/// Modifier keys as a bitfield for efficient storage and comparison
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const CTRL: Modifiers = Modifiers(0b0001);
    pub const SHIFT: Modifiers = Modifiers(0b0010);
    pub const ALT: Modifiers = Modifiers(0b0100);
    pub const META: Modifiers = Modifiers(0b1000);

    /// Create modifiers from individual flags
    pub const fn new(ctrl: bool, shift: bool, alt: bool, meta: bool) -> Self {
        let mut bits = 0u8;
        if ctrl {
            bits |= 0b0001;
        }
        if shift {
            bits |= 0b0010;
        }
        if alt {
            bits |= 0b0100;
        }
        if meta {
            bits |= 0b1000;
        }
        Modifiers(bits)
    }

    #[inline]
    pub const fn ctrl(self) -> bool {
        self.0 & 0b0001 != 0
    }

    #[inline]
    pub const fn shift(self) -> bool {
        self.0 & 0b0010 != 0
    }

    #[inline]
    pub const fn alt(self) -> bool {
        self.0 & 0b0100 != 0
    }

    #[inline]
    pub const fn meta(self) -> bool {
        self.0 & 0b1000 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Combine two modifier sets
    #[inline]
    pub const fn union(self, other: Modifiers) -> Modifiers {
        Modifiers(self.0 | other.0)
    }
}

/// Pointer button that triggered an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// A pointer press/move/release event.
///
/// For move events `button` is the button currently held.
#[derive(Debug, Clone, Copy)]
pub struct PointerEvent {
    pub button: PointerButton,
    pub modifiers: Modifiers,
    /// Character offset under the pointer (host-resolved)
    pub position: usize,
}

impl PointerEvent {
    pub fn new(button: PointerButton, modifiers: Modifiers, position: usize) -> Self {
        Self {
            button,
            modifiers,
            position,
        }
    }
}

/// Key identifier delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Tab,
    Backspace,
    Delete,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// Function keys F1..F12
    F(u8),
    /// A typed character
    Char(char),
}

/// A key event with its modifier state
#[derive(Debug, Clone, Copy)]
pub struct KeyEvent {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    /// Plain printable character, if this event should insert text.
    /// Ctrl/meta chords never insert.
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.ctrl() || self.modifiers.meta() {
            return None;
        }
        match self.key {
            Key::Char(c) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}

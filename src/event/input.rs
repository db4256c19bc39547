//! Host event types fed into the listener module.
//!
//! Defines [`HostEvent`], [`KeyboardEvent`], [`Modifiers`] and [`TouchPhase`].
//! With the `crossterm` feature, crossterm key events convert into
//! [`KeyboardEvent`]s so a terminal host can drive the shortcut dispatcher.

use std::ops::BitOr;

use crate::dom::ElementId;
use crate::geometry::Point;

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask observed on a keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);
    pub const META: Modifiers = Modifiers(8);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyboardEvent
// ---------------------------------------------------------------------------

/// A keydown as the host reports it.
///
/// `key` is the produced key name (`"k"`, `"Enter"`, `"ArrowUp"`), `code` the
/// physical key (`"KeyK"`, `"Digit1"`). Shortcut matching accepts either.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyboardEvent {
    pub key: String,
    pub code: String,
    pub modifiers: Modifiers,
}

impl KeyboardEvent {
    /// Create a keyboard event with no modifiers.
    pub fn new(key: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            code: code.into(),
            modifiers: Modifiers::NONE,
        }
    }

    /// Set the modifier state (builder).
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    pub fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    pub fn meta(&self) -> bool {
        self.modifiers.contains(Modifiers::META)
    }
}

// ---------------------------------------------------------------------------
// TouchPhase / HostEvent
// ---------------------------------------------------------------------------

/// Phase of a single-finger touch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

/// Everything the host forwards to the listener module.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Document-level pointer down on `target`.
    PointerDown { target: ElementId, point: Point },
    /// Document-level pointer move.
    PointerMove { point: Point },
    /// Document-level pointer up.
    PointerUp { point: Point },
    /// A touch on `target`; `point` is the first (changed) touch.
    Touch {
        target: ElementId,
        phase: TouchPhase,
        point: Point,
    },
    /// `target` scrolled; offsets are read from the document.
    Scroll { target: ElementId },
    /// Document-level keydown.
    KeyDown(KeyboardEvent),
    /// The host painted a frame and layout has settled.
    AnimationFrame,
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

#[cfg(feature = "crossterm")]
mod crossterm_keys {
    use super::{KeyboardEvent, Modifiers};
    use crossterm::event::{KeyCode, KeyModifiers};

    fn convert_modifiers(m: KeyModifiers) -> Modifiers {
        let mut out = Modifiers::NONE;
        if m.contains(KeyModifiers::SHIFT) {
            out = out | Modifiers::SHIFT;
        }
        if m.contains(KeyModifiers::CONTROL) {
            out = out | Modifiers::CTRL;
        }
        if m.contains(KeyModifiers::ALT) {
            out = out | Modifiers::ALT;
        }
        if m.contains(KeyModifiers::SUPER) {
            out = out | Modifiers::META;
        }
        out
    }

    fn char_code(c: char) -> String {
        if c.is_ascii_alphabetic() {
            format!("Key{}", c.to_ascii_uppercase())
        } else if c.is_ascii_digit() {
            format!("Digit{c}")
        } else if c == ' ' {
            "Space".to_owned()
        } else {
            String::new()
        }
    }

    impl From<crossterm::event::KeyEvent> for KeyboardEvent {
        fn from(ct: crossterm::event::KeyEvent) -> Self {
            let mut modifiers = convert_modifiers(ct.modifiers);
            let (key, code) = match ct.code {
                KeyCode::Char(c) => (c.to_string(), char_code(c)),
                KeyCode::BackTab => {
                    modifiers = modifiers | Modifiers::SHIFT;
                    ("Tab".to_owned(), "Tab".to_owned())
                }
                KeyCode::Esc => ("Escape".to_owned(), "Escape".to_owned()),
                KeyCode::Left => ("ArrowLeft".to_owned(), "ArrowLeft".to_owned()),
                KeyCode::Right => ("ArrowRight".to_owned(), "ArrowRight".to_owned()),
                KeyCode::Up => ("ArrowUp".to_owned(), "ArrowUp".to_owned()),
                KeyCode::Down => ("ArrowDown".to_owned(), "ArrowDown".to_owned()),
                KeyCode::F(n) => (format!("F{n}"), format!("F{n}")),
                other => {
                    let name = match other {
                        KeyCode::Enter => "Enter",
                        KeyCode::Tab => "Tab",
                        KeyCode::Backspace => "Backspace",
                        KeyCode::Delete => "Delete",
                        KeyCode::Home => "Home",
                        KeyCode::End => "End",
                        KeyCode::PageUp => "PageUp",
                        KeyCode::PageDown => "PageDown",
                        KeyCode::Insert => "Insert",
                        _ => "Unidentified",
                    };
                    (name.to_owned(), name.to_owned())
                }
            };
            KeyboardEvent {
                key,
                code,
                modifiers,
            }
        }
    }

}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_none_is_empty() {
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::META;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::META));
        assert!(!mods.contains(Modifiers::ALT));
    }

    // ── KeyboardEvent ────────────────────────────────────────────────

    #[test]
    fn keyboard_event_accessors() {
        let ke = KeyboardEvent::new("K", "KeyK")
            .with_modifiers(Modifiers::SHIFT | Modifiers::ALT);
        assert!(ke.shift());
        assert!(ke.alt());
        assert!(!ke.ctrl());
        assert!(!ke.meta());
        assert_eq!(ke.key, "K");
        assert_eq!(ke.code, "KeyK");
    }
}

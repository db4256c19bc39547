//! Keyboard shortcuts: combo normalization and first-match-wins dispatch.
//!
//! Combos are written as `modifier+modifier+key` in any order and case:
//! `"Shift+Ctrl+K"` and `"ctrl+shift+k"` both normalize to `"ctrl+shift+k"`.
//! The canonical modifier order is `ctrl, alt, shift, meta`, followed by the
//! key.
//!
//! The dispatcher attaches its keydown listener on the first shortcut and
//! keeps it until [`KeyboardDispatcher::detach`], even when every shortcut
//! has been removed.

use std::fmt;

use crate::error::{InteropError, Result};
use crate::event::{Category, KeyboardEvent, Notification, Outbox, Payload};
use crate::registry::Registry;

// ---------------------------------------------------------------------------
// Combo
// ---------------------------------------------------------------------------

/// A parsed, normalized key combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Combo {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
    /// Lower-cased key token.
    pub key: String,
}

impl Combo {
    /// Parse a combo string, accepting modifiers in any order and case.
    ///
    /// Aliases: `control` → `ctrl`; `option` → `alt`; `cmd`, `command`,
    /// `super`, `win` → `meta`.
    pub fn parse(combo: &str) -> Result<Self> {
        let invalid = || InteropError::InvalidCombo(combo.to_owned());
        let lowered = combo.trim().to_lowercase();
        let mut parsed = Combo::default();
        let mut key = None;

        for token in lowered.split('+').map(str::trim) {
            match token {
                "ctrl" | "control" => parsed.ctrl = true,
                "alt" | "option" => parsed.alt = true,
                "shift" => parsed.shift = true,
                "meta" | "cmd" | "command" | "super" | "win" => parsed.meta = true,
                "" => return Err(invalid()),
                other => {
                    if key.replace(other.to_owned()).is_some() {
                        return Err(invalid());
                    }
                }
            }
        }

        parsed.key = key.ok_or_else(invalid)?;
        Ok(parsed)
    }

    /// Whether `event` triggers this combo.
    ///
    /// `ctrl` accepts either Ctrl or Meta on the event, and must be absent
    /// when neither is held. `alt` and `shift` must match exactly. `meta` is
    /// only required when present. The key matches the event's key name or
    /// physical code, ignoring case.
    pub fn matches(&self, event: &KeyboardEvent) -> bool {
        if self.ctrl != (event.ctrl() || event.meta()) {
            return false;
        }
        if self.alt != event.alt() || self.shift != event.shift() {
            return false;
        }
        if self.meta && !event.meta() {
            return false;
        }
        key_eq(&self.key, &event.key) || key_eq(&self.key, &event.code)
    }
}

/// `token` is already lower-cased; fold `name` with the same Unicode rules.
fn key_eq(token: &str, name: &str) -> bool {
    name.to_lowercase() == token
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (held, name) in [
            (self.ctrl, "ctrl"),
            (self.alt, "alt"),
            (self.shift, "shift"),
            (self.meta, "meta"),
        ] {
            if held {
                write!(f, "{name}+")?;
            }
        }
        f.write_str(&self.key)
    }
}

/// Normalize a combo string to its canonical form.
pub fn normalize_combo(combo: &str) -> Result<String> {
    Combo::parse(combo).map(|c| c.to_string())
}

// ---------------------------------------------------------------------------
// KeyboardDispatcher
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct ShortcutEntry {
    combo: Combo,
    prevent_default: bool,
}

/// Shared keydown listener and its ordered shortcut table.
#[derive(Debug, Default)]
pub struct KeyboardDispatcher {
    attached: bool,
    shortcuts: Registry<ShortcutEntry>,
}

impl KeyboardDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the keydown listener. No-op when already attached.
    pub fn attach(&mut self) {
        if !self.attached {
            self.attached = true;
            tracing::debug!("keyboard listener attached");
        }
    }

    /// Detach the listener and drop every shortcut.
    pub fn detach(&mut self) {
        if self.attached {
            tracing::debug!(shortcuts = self.shortcuts.len(), "keyboard listener detached");
        }
        self.attached = false;
        self.shortcuts.clear();
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Add a shortcut under an opaque `id`, attaching the listener if needed.
    ///
    /// `normalized` may be any combo spelling; it is parsed again here.
    pub fn add_shortcut(&mut self, id: &str, normalized: &str, prevent_default: bool) -> Result<()> {
        let combo = Combo::parse(normalized)?;
        self.attach();
        self.shortcuts.insert(
            id,
            ShortcutEntry {
                combo,
                prevent_default,
            },
        );
        Ok(())
    }

    /// Remove a shortcut. Returns whether it existed.
    pub fn remove_shortcut(&mut self, id: &str) -> bool {
        self.shortcuts.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.shortcuts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortcuts.is_empty()
    }

    /// Dispatch a keydown to the first matching shortcut in registration
    /// order. Returns whether the default action should be suppressed.
    pub fn handle_keydown(&self, event: &KeyboardEvent, outbox: &mut Outbox) -> bool {
        if !self.attached {
            return false;
        }
        let Some((id, entry)) = self
            .shortcuts
            .iter()
            .find(|(_, entry)| entry.combo.matches(event))
        else {
            return false;
        };
        tracing::trace!(id, combo = %entry.combo, "shortcut matched");
        outbox.push(Notification::new(Category::Shortcut, id, Payload::Shortcut));
        entry.prevent_default
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Modifiers;
    use pretty_assertions::assert_eq;

    fn key(key: &str, code: &str, modifiers: Modifiers) -> KeyboardEvent {
        KeyboardEvent::new(key, code).with_modifiers(modifiers)
    }

    // ── Normalization ────────────────────────────────────────────────

    #[test]
    fn modifier_order_is_canonical() {
        assert_eq!(normalize_combo("shift+ctrl+k").unwrap(), "ctrl+shift+k");
        assert_eq!(normalize_combo("ctrl+shift+k").unwrap(), "ctrl+shift+k");
        assert_eq!(
            normalize_combo("Meta + Shift + Alt + Ctrl + P").unwrap(),
            "ctrl+alt+shift+meta+p"
        );
    }

    #[test]
    fn normalization_is_order_independent() {
        let orders = [
            "alt+shift+ctrl+x",
            "ctrl+alt+shift+x",
            "shift+x+alt+ctrl",
            "X+SHIFT+CTRL+ALT",
        ];
        let normalized: Vec<_> = orders.iter().map(|c| normalize_combo(c).unwrap()).collect();
        insta::assert_snapshot!(normalized.join("\n"), @r"
        ctrl+alt+shift+x
        ctrl+alt+shift+x
        ctrl+alt+shift+x
        ctrl+alt+shift+x
        ");
    }

    #[test]
    fn aliases_and_duplicates() {
        assert_eq!(normalize_combo("Control+Option+k").unwrap(), "ctrl+alt+k");
        assert_eq!(normalize_combo("cmd+s").unwrap(), "meta+s");
        assert_eq!(normalize_combo("ctrl+ctrl+s").unwrap(), "ctrl+s");
        assert_eq!(normalize_combo("  Escape ").unwrap(), "escape");
    }

    #[test]
    fn invalid_combos() {
        for bad in ["", "ctrl+", "ctrl+shift", "a+b", "ctrl++k"] {
            assert_eq!(
                normalize_combo(bad),
                Err(InteropError::InvalidCombo(bad.to_owned())),
                "{bad:?} should be rejected"
            );
        }
    }

    // ── Matching ─────────────────────────────────────────────────────

    #[test]
    fn ctrl_token_accepts_ctrl_or_meta() {
        let combo = Combo::parse("ctrl+k").unwrap();
        assert!(combo.matches(&key("k", "KeyK", Modifiers::CTRL)));
        assert!(combo.matches(&key("k", "KeyK", Modifiers::META)));
        assert!(!combo.matches(&key("k", "KeyK", Modifiers::NONE)));
    }

    #[test]
    fn absent_ctrl_rejects_ctrl_or_meta() {
        let combo = Combo::parse("k").unwrap();
        assert!(combo.matches(&key("k", "KeyK", Modifiers::NONE)));
        assert!(!combo.matches(&key("k", "KeyK", Modifiers::CTRL)));
        assert!(!combo.matches(&key("k", "KeyK", Modifiers::META)));
    }

    #[test]
    fn alt_and_shift_are_exact() {
        let combo = Combo::parse("alt+k").unwrap();
        assert!(combo.matches(&key("k", "KeyK", Modifiers::ALT)));
        assert!(!combo.matches(&key("k", "KeyK", Modifiers::ALT | Modifiers::SHIFT)));
        assert!(!combo.matches(&key("k", "KeyK", Modifiers::NONE)));
    }

    #[test]
    fn meta_token_requires_meta() {
        let combo = Combo::parse("ctrl+meta+k").unwrap();
        assert!(combo.matches(&key("k", "KeyK", Modifiers::META)));
        assert!(!combo.matches(&key("k", "KeyK", Modifiers::CTRL)));
    }

    #[test]
    fn key_matches_name_or_code_case_insensitively() {
        let by_name = Combo::parse("shift+K").unwrap();
        assert!(by_name.matches(&key("K", "KeyK", Modifiers::SHIFT)));

        let by_code = Combo::parse("ctrl+keyz").unwrap();
        assert!(by_code.matches(&key("y", "KeyZ", Modifiers::CTRL)));

        let space = Combo::parse("space").unwrap();
        assert!(space.matches(&key(" ", "Space", Modifiers::NONE)));
        assert!(!space.matches(&key("Enter", "Enter", Modifiers::NONE)));

        let umlaut = Combo::parse("ctrl+Ä").unwrap();
        assert_eq!(umlaut.to_string(), "ctrl+ä");
        assert!(umlaut.matches(&key("Ä", "Quote", Modifiers::CTRL)));
        assert!(umlaut.matches(&key("ä", "Quote", Modifiers::CTRL)));
        assert!(!umlaut.matches(&key("a", "KeyA", Modifiers::CTRL)));
    }

    // ── Dispatcher ───────────────────────────────────────────────────

    #[test]
    fn detached_dispatcher_ignores_keys() {
        let dispatcher = KeyboardDispatcher::new();
        let mut outbox = Outbox::new();
        assert!(!dispatcher.handle_keydown(&key("k", "KeyK", Modifiers::CTRL), &mut outbox));
        assert!(outbox.is_empty());
    }

    #[test]
    fn first_registered_wins() {
        let mut dispatcher = KeyboardDispatcher::new();
        dispatcher.add_shortcut("first", "ctrl+k", true).unwrap();
        dispatcher.add_shortcut("second", "k+ctrl", true).unwrap();
        let mut outbox = Outbox::new();

        assert!(dispatcher.handle_keydown(&key("k", "KeyK", Modifiers::CTRL), &mut outbox));
        let fired: Vec<_> = outbox.drain().into_iter().map(|n| n.id).collect();
        assert_eq!(fired, vec!["first"]);
    }

    #[test]
    fn removing_first_lets_second_fire() {
        let mut dispatcher = KeyboardDispatcher::new();
        dispatcher.add_shortcut("first", "ctrl+k", true).unwrap();
        dispatcher.add_shortcut("second", "ctrl+k", false).unwrap();
        assert!(dispatcher.remove_shortcut("first"));
        assert!(!dispatcher.remove_shortcut("first"));

        let mut outbox = Outbox::new();
        assert!(!dispatcher.handle_keydown(&key("k", "KeyK", Modifiers::CTRL), &mut outbox));
        assert_eq!(outbox.pop().unwrap().id, "second");
    }

    #[test]
    fn prevent_default_reflects_registration() {
        let mut dispatcher = KeyboardDispatcher::new();
        dispatcher.add_shortcut("save", "ctrl+s", true).unwrap();
        dispatcher.add_shortcut("help", "f1", false).unwrap();
        let mut outbox = Outbox::new();

        assert!(dispatcher.handle_keydown(&key("s", "KeyS", Modifiers::CTRL), &mut outbox));
        assert!(!dispatcher.handle_keydown(&key("F1", "F1", Modifiers::NONE), &mut outbox));
        assert!(!dispatcher.handle_keydown(&key("q", "KeyQ", Modifiers::NONE), &mut outbox));
        assert_eq!(outbox.pending_count(), 2);
    }

    #[test]
    fn stays_attached_when_empty_until_detach() {
        let mut dispatcher = KeyboardDispatcher::new();
        assert!(!dispatcher.is_attached());
        dispatcher.add_shortcut("a", "ctrl+a", true).unwrap();
        assert!(dispatcher.is_attached());
        dispatcher.remove_shortcut("a");
        assert!(dispatcher.is_empty());
        assert!(dispatcher.is_attached());

        dispatcher.add_shortcut("b", "ctrl+b", true).unwrap();
        dispatcher.detach();
        assert!(!dispatcher.is_attached());
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn invalid_combo_does_not_attach() {
        let mut dispatcher = KeyboardDispatcher::new();
        assert!(dispatcher.add_shortcut("x", "ctrl+", true).is_err());
        assert!(!dispatcher.is_attached());
        assert!(dispatcher.is_empty());
    }
}

//! Keyboard Module - Key events and how they edit the hidden editor
//!
//! The hidden editor is a plain single-line field, so only a handful of keys
//! mean anything to it. [`KeyboardEvent::edit_action`] maps an event to the
//! edit it performs; everything else is left for the host.
//!
//! # Example
//!
//! ```ignore
//! use otp_slots::state::keyboard::{KeyboardEvent, EditAction};
//!
//! assert_eq!(KeyboardEvent::new("4").edit_action(), Some(EditAction::Insert('4')));
//! assert_eq!(KeyboardEvent::new("Backspace").edit_action(), Some(EditAction::DeleteBackward));
//! ```

// =============================================================================
// TYPES
// =============================================================================

/// Keyboard modifier state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Create empty modifiers
    pub fn none() -> Self {
        Self::default()
    }

    /// Create modifiers with ctrl
    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    /// Create modifiers with alt
    pub fn alt() -> Self {
        Self { alt: true, ..Self::default() }
    }

    /// Create modifiers with shift
    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    /// Ctrl, alt or meta held (shift alone still types).
    pub fn is_command(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

/// Key event state (press, repeat, release)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// Keyboard event
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    /// The key that was pressed (e.g., "a", "Enter", "Backspace")
    pub key: String,
    /// Modifier keys state
    pub modifiers: Modifiers,
    /// Press/repeat/release state
    pub state: KeyState,
}

impl KeyboardEvent {
    /// Create a simple key press event
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    /// Create a key press with modifiers
    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    /// Check if this is a press event
    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }

    /// The single character this key types, if any.
    pub fn printable_char(&self) -> Option<char> {
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) if !ch.is_control() => Some(ch),
            _ => None,
        }
    }

    /// What this event does to a single-line editor.
    ///
    /// Releases never edit; repeats behave like presses.
    pub fn edit_action(&self) -> Option<EditAction> {
        if self.state == KeyState::Release {
            return None;
        }

        if self.modifiers.ctrl {
            return match self.key.as_str() {
                "u" | "U" | "w" | "W" | "Backspace" => Some(EditAction::Clear),
                _ => None,
            };
        }

        match self.key.as_str() {
            "Backspace" => Some(EditAction::DeleteBackward),
            "Delete" | "Escape" => Some(EditAction::Clear),
            _ if self.modifiers.is_command() => None,
            _ => self.printable_char().map(EditAction::Insert),
        }
    }
}

/// An edit to the hidden editor's text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditAction {
    /// Append a character at the end.
    Insert(char),
    /// Remove the last character.
    DeleteBackward,
    /// Remove everything.
    Clear,
}

impl EditAction {
    /// Apply to `text`, returning the edited string.
    pub fn apply(&self, text: &str) -> String {
        match self {
            Self::Insert(ch) => {
                let mut next = String::with_capacity(text.len() + ch.len_utf8());
                next.push_str(text);
                next.push(*ch);
                next
            }
            Self::DeleteBackward => {
                let mut next = text.to_string();
                next.pop();
                next
            }
            Self::Clear => String::new(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_keys_insert() {
        assert_eq!(KeyboardEvent::new("7").edit_action(), Some(EditAction::Insert('7')));
        assert_eq!(
            KeyboardEvent::with_modifiers("A", Modifiers::shift()).edit_action(),
            Some(EditAction::Insert('A'))
        );
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(KeyboardEvent::new("Backspace").edit_action(), Some(EditAction::DeleteBackward));
        assert_eq!(KeyboardEvent::new("Delete").edit_action(), Some(EditAction::Clear));
        assert_eq!(KeyboardEvent::new("Enter").edit_action(), None);
        assert_eq!(KeyboardEvent::new("ArrowLeft").edit_action(), None);
        assert_eq!(KeyboardEvent::new("").edit_action(), None);
    }

    #[test]
    fn test_ctrl_combinations() {
        assert_eq!(
            KeyboardEvent::with_modifiers("u", Modifiers::ctrl()).edit_action(),
            Some(EditAction::Clear)
        );
        assert_eq!(KeyboardEvent::with_modifiers("c", Modifiers::ctrl()).edit_action(), None);
        assert_eq!(KeyboardEvent::with_modifiers("x", Modifiers::alt()).edit_action(), None);
    }

    #[test]
    fn test_release_never_edits() {
        let mut event = KeyboardEvent::new("1");
        event.state = KeyState::Release;
        assert!(!event.is_press());
        assert_eq!(event.edit_action(), None);

        event.state = KeyState::Repeat;
        assert_eq!(event.edit_action(), Some(EditAction::Insert('1')));
    }

    #[test]
    fn test_apply() {
        assert_eq!(EditAction::Insert('3').apply("12"), "123");
        assert_eq!(EditAction::DeleteBackward.apply("12"), "1");
        assert_eq!(EditAction::DeleteBackward.apply(""), "");
        assert_eq!(EditAction::DeleteBackward.apply("aé"), "a");
        assert_eq!(EditAction::Clear.apply("123"), "");
    }
}

//! Hidden Editor - The single text field that actually receives input.
//!
//! The slots are only a picture. Keystrokes, pastes and platform autofill all
//! go to one hidden editor, which the host implements with its native text
//! field. The widget talks to it through [`HiddenEditor`]:
//! - `configure` once on mount and again when `disabled` changes
//! - `set_value` after every text event, so rejected edits vanish (controlled input)
//! - `request_focus` / `request_blur` for imperative focus and `blur_on_filled`
//!
//! The editor reports back by calling the widget's `handle_text_change`,
//! `handle_focus` and `handle_blur`.
//!
//! [`MemoryEditor`] is a headless implementation for tests and terminal hosts.

use std::cell::{Cell, RefCell};

use crate::state::keyboard::KeyboardEvent;
use crate::types::{AutofillHint, InputMode, Platform, ONE_TIME_CODE_CONTENT_TYPE};

use super::types::OtpConfig;

/// Test id of every slot.
pub const SLOT_TEST_ID: &str = "otp-input";
/// Test id of the hidden editor.
pub const EDITOR_TEST_ID: &str = "otp-input-hidden";

// =============================================================================
// Editor Props
// =============================================================================

/// Everything the hidden editor needs to be configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorProps {
    pub max_length: usize,
    pub input_mode: InputMode,
    pub secure_text_entry: bool,
    pub autofill: AutofillHint,
    pub content_type: &'static str,
    pub editable: bool,
    pub auto_focus: bool,
    pub test_id: String,
}

impl EditorProps {
    /// Props generated from the config.
    pub fn generate(config: &OtpConfig, platform: Platform, disabled: bool) -> Self {
        Self {
            max_length: config.digit_count,
            input_mode: config.input_class.input_mode(),
            secure_text_entry: config.mask_input,
            autofill: AutofillHint::for_platform(platform),
            content_type: ONE_TIME_CODE_CONTENT_TYPE,
            editable: !disabled,
            auto_focus: config.auto_focus && !disabled,
            test_id: EDITOR_TEST_ID.to_string(),
        }
    }
}

/// Host-supplied values that win over the generated editor props.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorOverrides {
    pub max_length: Option<usize>,
    pub input_mode: Option<InputMode>,
    pub secure_text_entry: Option<bool>,
    pub autofill: Option<AutofillHint>,
    pub editable: Option<bool>,
    pub test_id: Option<String>,
}

impl EditorOverrides {
    pub fn apply(&self, mut props: EditorProps) -> EditorProps {
        if let Some(max_length) = self.max_length {
            props.max_length = max_length;
        }
        if let Some(input_mode) = self.input_mode {
            props.input_mode = input_mode;
        }
        if let Some(secure) = self.secure_text_entry {
            props.secure_text_entry = secure;
        }
        if let Some(autofill) = self.autofill {
            props.autofill = autofill;
        }
        if let Some(editable) = self.editable {
            props.editable = editable;
        }
        if let Some(ref test_id) = self.test_id {
            props.test_id = test_id.clone();
        }
        props
    }
}

// =============================================================================
// Hidden Editor Trait
// =============================================================================

/// The host's hidden text field.
///
/// Methods take `&self`; implementations use interior mutability, the same
/// way native handles do.
pub trait HiddenEditor {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn request_focus(&self);
    fn request_blur(&self);
    fn configure(&self, props: &EditorProps);
}

// =============================================================================
// Memory Editor
// =============================================================================

/// In-memory hidden editor.
///
/// Applies key events and pastes the way a native single-line field would
/// (respecting `editable` and `max_length`) and returns the resulting text,
/// which the host passes on to `handle_text_change`.
#[derive(Debug, Default)]
pub struct MemoryEditor {
    value: RefCell<String>,
    props: RefCell<Option<EditorProps>>,
    focused: Cell<bool>,
    focus_requests: Cell<usize>,
    blur_requests: Cell<usize>,
}

impl MemoryEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Props from the last `configure` call.
    pub fn props(&self) -> Option<EditorProps> {
        self.props.borrow().clone()
    }

    /// Whether the editor currently holds focus.
    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    pub fn focus_requests(&self) -> usize {
        self.focus_requests.get()
    }

    pub fn blur_requests(&self) -> usize {
        self.blur_requests.get()
    }

    fn editable(&self) -> bool {
        self.props.borrow().as_ref().is_none_or(|p| p.editable)
    }

    fn max_length(&self) -> Option<usize> {
        self.props.borrow().as_ref().map(|p| p.max_length)
    }

    fn store(&self, text: String) -> String {
        let text = match self.max_length() {
            Some(max) => text.chars().take(max).collect(),
            None => text,
        };
        *self.value.borrow_mut() = text.clone();
        text
    }

    /// Apply a key event. Returns the new text if the key edited it.
    pub fn apply_key(&self, event: &KeyboardEvent) -> Option<String> {
        if !self.editable() {
            return None;
        }
        let action = event.edit_action()?;
        let next = action.apply(&self.value.borrow());
        Some(self.store(next))
    }

    /// Insert pasted text at the end. Returns the new text.
    pub fn apply_paste(&self, text: &str) -> Option<String> {
        if !self.editable() {
            return None;
        }
        let next = format!("{}{}", self.value.borrow(), text);
        Some(self.store(next))
    }

    /// Replace the whole text, as platform one-time-code autofill does.
    pub fn autofill(&self, code: &str) -> Option<String> {
        if !self.editable() {
            return None;
        }
        Some(self.store(code.to_string()))
    }
}

impl HiddenEditor for MemoryEditor {
    fn value(&self) -> String {
        self.value.borrow().clone()
    }

    fn set_value(&self, value: &str) {
        *self.value.borrow_mut() = value.to_string();
    }

    fn request_focus(&self) {
        self.focus_requests.set(self.focus_requests.get() + 1);
        self.focused.set(true);
    }

    fn request_blur(&self) {
        self.blur_requests.set(self.blur_requests.get() + 1);
        self.focused.set(false);
    }

    fn configure(&self, props: &EditorProps) {
        *self.props.borrow_mut() = Some(props.clone());
    }
}

// =============================================================================
// Tests
// =============================================================================

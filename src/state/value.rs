//! Value Store - The authoritative code string
//!
//! Holds the code in a `Signal<String>` and is the only place it is written.
//! Every edit goes through one validation path:
//!
//! 1. Refused outright while disabled
//! 2. Truncated to `digit_count` characters
//! 3. Rejected wholesale if any character falls outside the input class
//!
//! Accepted edits land in the signal synchronously, so deriveds reading the
//! code (the slot projection, the focused slot index) are fresh on the next
//! read.
//!
//! # Example
//!
//! ```ignore
//! use otp_slots::state::value::ValueStore;
//! use otp_slots::types::InputClass;
//!
//! let store = ValueStore::new(6, InputClass::Numeric);
//! assert_eq!(store.set_text("12"), Ok(true));
//! assert!(store.set_text("12a").is_err());
//! assert_eq!(store.get(), "12");
//! ```

use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::{debug, trace};

use crate::error::CodeRejection;
use crate::types::InputClass;

/// The code plus the rules every edit is checked against.
#[derive(Clone)]
pub struct ValueStore {
    code: Signal<String>,
    digit_count: usize,
    class: InputClass,
    disabled: Rc<dyn Fn() -> bool>,
}

impl ValueStore {
    /// Create an empty, always-enabled store.
    pub fn new(digit_count: usize, class: InputClass) -> Self {
        Self::with_disabled(digit_count, class, Rc::new(|| false))
    }

    /// Create a store whose disabled state is read from `disabled` on every edit.
    pub fn with_disabled(digit_count: usize, class: InputClass, disabled: Rc<dyn Fn() -> bool>) -> Self {
        Self {
            code: signal(String::new()),
            digit_count,
            class,
            disabled,
        }
    }

    /// Current code.
    pub fn get(&self) -> String {
        self.code.get()
    }

    /// Current code length in characters.
    pub fn len(&self) -> usize {
        self.code.with(|code| code.chars().count())
    }

    pub fn is_empty(&self) -> bool {
        self.code.with(|code| code.is_empty())
    }

    /// True once every slot holds a character.
    pub fn is_full(&self) -> bool {
        self.len() >= self.digit_count
    }

    pub fn digit_count(&self) -> usize {
        self.digit_count
    }

    pub fn input_class(&self) -> InputClass {
        self.class
    }

    /// The underlying signal, for deriveds and effects.
    pub fn signal(&self) -> Signal<String> {
        self.code.clone()
    }

    /// Apply raw text coming from the hidden editor.
    ///
    /// Returns `Ok(true)` when the code changed and `Ok(false)` when the
    /// accepted text equals the current code.
    pub fn set_text(&self, candidate: &str) -> Result<bool, CodeRejection> {
        self.ensure_enabled()?;
        let accepted = self.validate(candidate)?;
        Ok(self.commit(accepted))
    }

    /// Programmatic overwrite. Same rules as [`set_text`](Self::set_text).
    pub fn set_value(&self, code: &str) -> Result<bool, CodeRejection> {
        self.set_text(code)
    }

    /// Reset to the empty code. Clearing an empty store is `Ok(false)`.
    pub fn clear(&self) -> Result<bool, CodeRejection> {
        self.ensure_enabled()?;
        Ok(self.commit(String::new()))
    }

    /// Truncate then class-check `candidate` without touching the store.
    pub fn validate(&self, candidate: &str) -> Result<String, CodeRejection> {
        let accepted: String = candidate.chars().take(self.digit_count).collect();
        if accepted.len() < candidate.len() {
            debug!(
                digit_count = self.digit_count,
                dropped = candidate.chars().count() - self.digit_count,
                "truncating over-length code"
            );
        }

        if let Some((position, ch)) = accepted.chars().enumerate().find(|(_, ch)| !self.class.accepts(*ch)) {
            return Err(CodeRejection::InvalidCharacter { ch, position });
        }

        Ok(accepted)
    }

    fn ensure_enabled(&self) -> Result<(), CodeRejection> {
        if (self.disabled)() {
            Err(CodeRejection::Disabled)
        } else {
            Ok(())
        }
    }

    fn commit(&self, next: String) -> bool {
        let changed = self.code.set(next);
        if changed {
            trace!(len = self.len(), "code updated");
        }
        changed
    }
}

// =============================================================================
// TESTS
// =============================================================================

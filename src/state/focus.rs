//! Focus Tracker - Focused/Blurred state of the hidden editor
//!
//! A two-state machine (Blurred, Focused) backed by a `Signal<bool>`, plus
//! focus callbacks fired at the source of every transition:
//! - onBlur callbacks fire before the state flips
//! - onFocus callbacks fire after it
//!
//! Which slot gets highlighted is not stored; it is derived from the code
//! length with [`focused_slot_index`].
//!
//! # Example
//!
//! ```ignore
//! use otp_slots::state::focus::{FocusTracker, FocusCallbacks};
//!
//! let tracker = FocusTracker::new(false);
//! let cleanup = tracker.register_callbacks(FocusCallbacks {
//!     on_focus: Some(Box::new(|| println!("Focused!"))),
//!     on_blur: Some(Box::new(|| println!("Blurred!"))),
//! });
//!
//! tracker.focus();
//! tracker.blur();
//! cleanup();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};
use tracing::debug;

// =============================================================================
// FOCUS STATE
// =============================================================================

/// Snapshot of the focus machine plus the slot it points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusState {
    pub is_focused: bool,
    pub focused_slot_index: usize,
}

/// Index of the slot that receives the next character.
///
/// The next unfilled slot, clamped to the last one once the code is full.
pub fn focused_slot_index(code_len: usize, digit_count: usize) -> usize {
    code_len.min(digit_count.saturating_sub(1))
}

// =============================================================================
// FOCUS CALLBACKS
// =============================================================================

/// Callbacks fired when focus changes
#[derive(Default)]
pub struct FocusCallbacks {
    pub on_focus: Option<Box<dyn Fn()>>,
    pub on_blur: Option<Box<dyn Fn()>>,
}

// Slots keep their position so ids stay valid; removed entries become None
type CallbackList = Rc<RefCell<Vec<Option<Rc<FocusCallbacks>>>>>;

// =============================================================================
// FOCUS TRACKER
// =============================================================================

#[derive(Clone)]
pub struct FocusTracker {
    focused: Signal<bool>,
    callbacks: CallbackList,
}

impl FocusTracker {
    /// Create a tracker in the given initial state. No callbacks fire.
    pub fn new(initially_focused: bool) -> Self {
        Self {
            focused: signal(initially_focused),
            callbacks: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    /// The underlying signal, for deriveds and effects.
    pub fn signal(&self) -> Signal<bool> {
        self.focused.clone()
    }

    /// Snapshot for a code of `code_len` characters out of `digit_count`.
    pub fn state(&self, code_len: usize, digit_count: usize) -> FocusState {
        FocusState {
            is_focused: self.is_focused(),
            focused_slot_index: focused_slot_index(code_len, digit_count),
        }
    }

    /// Blurred -> Focused. Returns false if already focused.
    pub fn focus(&self) -> bool {
        if self.focused.get() {
            return false;
        }
        debug!("otp input focused");
        self.focused.set(true);
        for cb in self.snapshot() {
            if let Some(ref on_focus) = cb.on_focus {
                on_focus();
            }
        }
        true
    }

    /// Focused -> Blurred. Returns false if already blurred.
    pub fn blur(&self) -> bool {
        if !self.focused.get() {
            return false;
        }
        debug!("otp input blurred");
        for cb in self.snapshot() {
            if let Some(ref on_blur) = cb.on_blur {
                on_blur();
            }
        }
        self.focused.set(false);
        true
    }

    /// Register focus callbacks.
    /// Returns cleanup function to unregister.
    pub fn register_callbacks(&self, callbacks: FocusCallbacks) -> impl FnOnce() + use<> {
        let id = {
            let mut list = self.callbacks.borrow_mut();
            list.push(Some(Rc::new(callbacks)));
            list.len() - 1
        };

        let list = Rc::downgrade(&self.callbacks);
        move || {
            if let Some(list) = list.upgrade() {
                let mut list = list.borrow_mut();
                if let Some(slot) = list.get_mut(id) {
                    *slot = None;
                }
                if list.iter().all(Option::is_none) {
                    list.clear();
                }
            }
        }
    }

    /// Number of live callback registrations.
    pub fn callback_count(&self) -> usize {
        self.callbacks.borrow().iter().filter(|cb| cb.is_some()).count()
    }

    // Callbacks may register or unregister while running, so never hold the borrow
    fn snapshot(&self) -> Vec<Rc<FocusCallbacks>> {
        self.callbacks.borrow().iter().flatten().cloned().collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

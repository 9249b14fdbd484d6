//! OTP Input Primitive - N visual slots driven by one hidden editor.
//!
//! Mounting wires the pieces together:
//! - [`ValueStore`] owns the code, [`FocusTracker`] the focus machine
//! - a `Derived` runs the slot projection over both (and the disabled prop)
//! - focus callbacks start and stop the [`CaretBlinkController`]
//! - an effect on `disabled` reconfigures the editor and re-syncs the caret
//!
//! The host feeds editor events in through `handle_*` and draws from
//! [`OtpInput::slots`]. Parent code gets an [`OtpInputHandle`] with exactly
//! `clear`, `focus` and `set_value`; after unmount those are silent no-ops.
//!
//! # Example
//!
//! ```ignore
//! use otp_slots::primitives::{otp_input, OtpInputProps, MemoryEditor};
//! use std::rc::Rc;
//!
//! let editor = Rc::new(MemoryEditor::new());
//! let otp = otp_input(OtpInputProps::default(), editor.clone());
//! let handle = otp.handle();
//!
//! // Hidden editor reported new text
//! otp.handle_text_change("12");
//! assert_eq!(otp.slots()[1].char, Some('2'));
//!
//! // Parent code
//! handle.clear();
//! otp.unmount();
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use spark_signals::{derived, effect, untrack, Derived};
use tracing::{debug, warn};

use crate::state::caret::CaretBlinkController;
use crate::state::focus::{FocusCallbacks, FocusState, FocusTracker};
use crate::state::value::ValueStore;
use crate::error::CodeRejection;
use crate::theme::SlotTheme;
use crate::types::{Platform, Rgba};

use super::editor::{EditorOverrides, EditorProps, HiddenEditor, SLOT_TEST_ID};
use super::slots::{project_slots, SlotView};
use super::types::{
    BlurCallback, Cleanup, FilledCallback, FocusCallback, OtpConfig, OtpInputProps, PropValue,
    SlotPrimitives, TextChangeCallback,
};

// =============================================================================
// Shared state
// =============================================================================

struct UserCallbacks {
    on_text_change: Option<TextChangeCallback>,
    on_filled: Option<FilledCallback>,
    on_focus: Option<FocusCallback>,
    on_blur: Option<BlurCallback>,
}

struct OtpInputInner {
    config: OtpConfig,
    platform: Platform,
    overrides: EditorOverrides,
    disabled: PropValue<bool>,
    store: ValueStore,
    focus: FocusTracker,
    caret: CaretBlinkController,
    editor: Rc<dyn HiddenEditor>,
    slots: Derived<Vec<SlotView>>,
    callbacks: UserCallbacks,
    cleanups: RefCell<Vec<Cleanup>>,
    mounted: Cell<bool>,
    /// Disabled value the editor and caret were last configured for
    seen_disabled: Cell<bool>,
    /// Whether the host editor holds focus, even while disabled
    editor_focused: Cell<bool>,
}

impl OtpInputInner {
    fn is_disabled(&self) -> bool {
        self.disabled.get()
    }

    fn editor_props(&self) -> EditorProps {
        self.overrides
            .apply(EditorProps::generate(&self.config, self.platform, self.is_disabled()))
    }

    fn sync_caret(&self) {
        let active = self.mounted.get()
            && self.focus.is_focused()
            && !self.is_disabled()
            && !self.config.hide_caret;
        self.caret.sync(active);
    }

    // Controlled input: the editor always shows exactly the code
    fn sync_editor(&self) {
        let code = self.store.get();
        if self.editor.value() != code {
            self.editor.set_value(&code);
        }
    }

    fn on_disabled_changed(&self, disabled: bool) {
        debug!(disabled, "otp input disabled state");
        self.seen_disabled.set(disabled);
        self.editor.configure(&self.editor_props());
        // Editor focus that arrived while disabled takes effect now
        if !disabled && self.editor_focused.get() {
            self.focus.focus();
        }
        self.sync_caret();
    }

    /// Re-read `disabled` for props the effect cannot observe (getters over
    /// plain state). Every entry point runs this first.
    fn refresh(&self) {
        let disabled = self.is_disabled();
        if disabled != self.seen_disabled.get() {
            self.on_disabled_changed(disabled);
        } else {
            self.sync_caret();
        }
    }

    /// Shared tail of every mutation: log rejections, re-sync, fire callbacks.
    fn after_edit(&self, result: Result<bool, CodeRejection>) {
        match result {
            Ok(true) => {
                self.sync_editor();
                let code = self.store.get();
                if let Some(ref cb) = self.callbacks.on_text_change {
                    cb(&code);
                }
                if self.store.is_full() {
                    if let Some(ref cb) = self.callbacks.on_filled {
                        cb(&code);
                    }
                    if self.config.blur_on_filled {
                        self.blur_self();
                    }
                }
            }
            Ok(false) => self.sync_editor(),
            Err(rejection) => {
                debug!(%rejection, "edit rejected");
                self.sync_editor();
            }
        }
    }

    fn blur_self(&self) {
        self.editor_focused.set(false);
        self.focus.blur();
        self.editor.request_blur();
    }

    // -------------------------------------------------------------------------
    // Control surface
    // -------------------------------------------------------------------------

    fn clear(&self) {
        if !self.mounted.get() {
            return;
        }
        self.refresh();
        self.after_edit(self.store.clear());
    }

    fn set_value(&self, code: &str) {
        if !self.mounted.get() {
            return;
        }
        self.refresh();
        self.after_edit(self.store.set_value(code));
    }

    fn focus(&self) {
        if !self.mounted.get() {
            return;
        }
        self.refresh();
        if self.is_disabled() {
            debug!("focus refused while disabled");
            return;
        }
        self.editor_focused.set(true);
        self.focus.focus();
        self.editor.request_focus();
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    fn teardown(&self) {
        if !self.mounted.replace(false) {
            return;
        }
        self.caret.dispose();
        let cleanups = std::mem::take(&mut *self.cleanups.borrow_mut());
        for cleanup in cleanups {
            cleanup();
        }
        debug!("otp input unmounted");
    }
}

// =============================================================================
// Imperative handle
// =============================================================================

/// Control surface handed to parent code.
///
/// Holds only a weak reference: it never keeps the widget alive, and every
/// call after unmount does nothing.
#[derive(Clone)]
pub struct OtpInputHandle {
    inner: Weak<OtpInputInner>,
}

impl OtpInputHandle {
    /// Reset the code to empty.
    pub fn clear(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.clear();
        }
    }

    /// Focus the widget and its hidden editor.
    pub fn focus(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.focus();
        }
    }

    /// Overwrite the code (same rules as typed input).
    pub fn set_value(&self, code: &str) {
        if let Some(inner) = self.inner.upgrade() {
            inner.set_value(code);
        }
    }

    /// Whether the widget is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.inner.upgrade().is_some_and(|inner| inner.mounted.get())
    }
}

// =============================================================================
// OTP Input
// =============================================================================

/// A mounted OTP input. Dropping it unmounts.
pub struct OtpInput<S = ()> {
    inner: Rc<OtpInputInner>,
    theme: SlotTheme<S>,
}

/// Mount an OTP input on top of `editor`.
pub fn otp_input<S>(props: OtpInputProps<S>, editor: Rc<dyn HiddenEditor>) -> OtpInput<S> {
    let OtpInputProps {
        mut config,
        disabled,
        theme,
        editor_overrides,
        platform,
        on_text_change,
        on_filled,
        on_focus,
        on_blur,
    } = props;

    if config.digit_count == 0 {
        warn!("digit_count of 0 raised to 1");
        config.digit_count = 1;
    }

    let disabled_for_store = disabled.clone();
    let store = ValueStore::with_disabled(
        config.digit_count,
        config.input_class,
        Rc::new(move || disabled_for_store.get()),
    );
    let focus = FocusTracker::new(false);

    // ==========================================================================
    // SLOT PROJECTION
    // ==========================================================================

    let slots = {
        let code = store.signal();
        let focused = focus.signal();
        let disabled = disabled.clone();
        let config = config.clone();
        derived(move || {
            let code = code.get();
            let is_disabled = disabled.get();
            let state = config.focus_state(focused.get(), code.chars().count());
            project_slots(&code, state, &config.slot_config(is_disabled))
        })
    };

    let inner = Rc::new(OtpInputInner {
        caret: CaretBlinkController::new(config.caret_config()),
        config,
        platform,
        overrides: editor_overrides,
        disabled: disabled.clone(),
        store,
        focus,
        editor,
        slots,
        callbacks: UserCallbacks { on_text_change, on_filled, on_focus, on_blur },
        cleanups: RefCell::new(Vec::new()),
        mounted: Cell::new(true),
        seen_disabled: Cell::new(false),
        editor_focused: Cell::new(false),
    });

    // ==========================================================================
    // FOCUS CALLBACKS
    // ==========================================================================

    let on_focus_inner = Rc::downgrade(&inner);
    let on_blur_inner = Rc::downgrade(&inner);
    let focus_cleanup = inner.focus.register_callbacks(FocusCallbacks {
        on_focus: Some(Box::new(move || {
            if let Some(inner) = on_focus_inner.upgrade() {
                inner.sync_caret();
                if let Some(ref cb) = inner.callbacks.on_focus {
                    cb();
                }
            }
        })),
        on_blur: Some(Box::new(move || {
            if let Some(inner) = on_blur_inner.upgrade() {
                inner.caret.sync(false);
                if let Some(ref cb) = inner.callbacks.on_blur {
                    cb();
                }
            }
        })),
    });
    inner.cleanups.borrow_mut().push(Box::new(focus_cleanup));

    // ==========================================================================
    // DISABLED EFFECT
    // ==========================================================================

    // Runs once now, which also configures the editor
    let weak = Rc::downgrade(&inner);
    let dispose_effect = effect(move || {
        let is_disabled = disabled.get();
        untrack(|| {
            if let Some(inner) = weak.upgrade() {
                inner.on_disabled_changed(is_disabled);
            }
        });
    });
    inner.cleanups.borrow_mut().push(Box::new(dispose_effect));

    inner.sync_editor();

    // ==========================================================================
    // AUTO FOCUS
    // ==========================================================================

    if inner.config.auto_focus {
        inner.focus();
    }

    debug!(digit_count = inner.config.digit_count, "otp input mounted");
    OtpInput { inner, theme }
}

impl<S> OtpInput<S> {
    // ==========================================================================
    // Editor events
    // ==========================================================================

    /// The hidden editor's text changed.
    pub fn handle_text_change(&self, text: &str) {
        let inner = &self.inner;
        if !inner.mounted.get() {
            return;
        }
        inner.refresh();
        inner.after_edit(inner.store.set_text(text));
    }

    /// The hidden editor gained focus.
    ///
    /// Ignored while disabled, but remembered: re-enabling focuses the widget.
    pub fn handle_focus(&self) {
        let inner = &self.inner;
        if !inner.mounted.get() {
            return;
        }
        inner.editor_focused.set(true);
        inner.refresh();
        if inner.is_disabled() {
            return;
        }
        inner.focus.focus();
    }

    /// The hidden editor lost focus.
    pub fn handle_blur(&self) {
        if self.inner.mounted.get() {
            self.inner.editor_focused.set(false);
            self.inner.refresh();
            self.inner.focus.blur();
        }
    }

    /// A slot box was pressed. Any slot focuses the hidden editor.
    pub fn handle_press(&self, slot_index: usize) {
        if slot_index >= self.inner.config.digit_count {
            self.inner.refresh();
            return;
        }
        self.inner.focus();
    }

    // ==========================================================================
    // Control surface
    // ==========================================================================

    pub fn handle(&self) -> OtpInputHandle {
        OtpInputHandle { inner: Rc::downgrade(&self.inner) }
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    pub fn focus(&self) {
        self.inner.focus();
    }

    pub fn set_value(&self, code: &str) {
        self.inner.set_value(code);
    }

    // ==========================================================================
    // Reads
    // ==========================================================================

    pub fn value(&self) -> String {
        self.inner.store.get()
    }

    pub fn focus_state(&self) -> FocusState {
        self.inner.focus.state(self.inner.store.len(), self.inner.config.digit_count)
    }

    /// Current per-slot render state.
    pub fn slots(&self) -> Vec<SlotView> {
        self.inner.slots.get()
    }

    /// The projection as a derived, for reactive hosts.
    pub fn slots_derived(&self) -> Derived<Vec<SlotView>> {
        self.inner.slots.clone()
    }

    /// Whether the caret should be drawn right now.
    ///
    /// Hosts poll this every frame, so it also picks up a `disabled` getter
    /// that changed without any signal firing.
    pub fn caret_visible(&self) -> bool {
        if !self.inner.mounted.get() {
            return false;
        }
        self.inner.refresh();
        !self.inner.is_disabled() && self.inner.caret.is_visible()
    }

    pub fn caret(&self) -> &CaretBlinkController {
        &self.inner.caret
    }

    pub fn is_disabled(&self) -> bool {
        self.inner.is_disabled()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.mounted.get()
    }

    pub fn editor_props(&self) -> EditorProps {
        self.inner.editor_props()
    }

    pub fn slot_test_id(&self) -> &'static str {
        SLOT_TEST_ID
    }

    pub fn slot_primitives(&self) -> SlotPrimitives {
        self.inner.config.slot_primitives
    }

    pub fn focus_color(&self) -> Rgba {
        self.inner.config.focus_rgba()
    }

    pub fn config(&self) -> &OtpConfig {
        &self.inner.config
    }

    pub fn theme(&self) -> &SlotTheme<S> {
        &self.theme
    }

    // ==========================================================================
    // Unmount
    // ==========================================================================

    /// Stop the caret, drop focus callbacks and effects.
    pub fn unmount(self) {
        self.inner.teardown();
    }
}

impl<S> Drop for OtpInput<S> {
    fn drop(&mut self) {
        self.inner.teardown();
    }
}

// =============================================================================
// Tests
// =============================================================================

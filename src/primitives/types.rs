//! Primitive types - Props, configuration and cleanup.
//!
//! These types define the interface for the OTP input's props.
//! Props support static values, signals, and getters for reactivity.

use std::rc::Rc;

use spark_signals::Signal;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::state::caret::{CaretConfig, DEFAULT_BLINK_INTERVAL_MS};
use crate::state::focus::FocusState;
use crate::types::{CursorStyle, InputClass, Platform, Rgba};
use crate::primitives::slots::SlotConfig;
use crate::primitives::editor::EditorOverrides;
use crate::theme::SlotTheme;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function registered during mount, run on unmount.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Callback Types
// =============================================================================

/// Code change callback. Receives the new code.
pub type TextChangeCallback = Rc<dyn Fn(&str)>;

/// Fired once the code reaches its full length.
pub type FilledCallback = Rc<dyn Fn(&str)>;

/// Focus callback (called when the hidden editor gains focus).
pub type FocusCallback = Rc<dyn Fn()>;

/// Blur callback (called when the hidden editor loses focus).
pub type BlurCallback = Rc<dyn Fn()>;

// =============================================================================
// Prop Value - Reactive property wrapper
// =============================================================================

/// A property value that can be static, a signal, or a getter.
#[derive(Clone)]
pub enum PropValue<T: Clone + PartialEq + 'static> {
    /// Static value (not reactive).
    Static(T),
    /// Reactive signal (changes propagate automatically).
    Signal(Signal<T>),
    /// Getter function (called each time value is needed).
    Getter(Rc<dyn Fn() -> T>),
}

impl<T: Clone + PartialEq + 'static> PropValue<T> {
    /// Get the current value (for immediate reads).
    pub fn get(&self) -> T {
        match self {
            PropValue::Static(v) => v.clone(),
            PropValue::Signal(s) => s.get(),
            PropValue::Getter(f) => f(),
        }
    }

    /// Wrap a getter closure.
    pub fn getter(f: impl Fn() -> T + 'static) -> Self {
        PropValue::Getter(Rc::new(f))
    }

    /// True for signals and getters.
    pub fn is_reactive(&self) -> bool {
        !matches!(self, PropValue::Static(_))
    }
}

impl<T: Clone + PartialEq + Default + 'static> Default for PropValue<T> {
    fn default() -> Self {
        PropValue::Static(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> From<T> for PropValue<T> {
    fn from(value: T) -> Self {
        PropValue::Static(value)
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for PropValue<T> {
    fn from(signal: Signal<T>) -> Self {
        PropValue::Signal(signal)
    }
}

// =============================================================================
// Slot Primitives
// =============================================================================

/// Which family of view/text/pressable primitives the host should build the
/// slots from. Carried through untouched; the core behaves the same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SlotPrimitives {
    #[default]
    Plain,
    Animatable,
}

impl SlotPrimitives {
    pub fn from_flag(use_animatable: bool) -> Self {
        if use_animatable { Self::Animatable } else { Self::Plain }
    }
}

// =============================================================================
// OTP Config
// =============================================================================

/// Plain option values of the OTP input.
///
/// Everything here is fixed for the lifetime of a mount. With the `serde`
/// feature it can be loaded from TOML/JSON; missing fields take defaults.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OtpConfig {
    /// Number of slots (default: 6).
    pub digit_count: usize,
    /// Focus the hidden editor on mount (default: true).
    pub auto_focus: bool,
    /// Never show the caret (default: false).
    pub hide_caret: bool,
    /// Border colour of the focused slot as hex (default: `#A4D0A4`).
    pub focus_color: String,
    /// Milliseconds between caret visibility flips; 0 keeps it solid (default: 350).
    pub blink_interval_ms: u64,
    pub caret_style: CursorStyle,
    /// Render every filled slot with the mask glyph (default: false).
    pub mask_input: bool,
    /// Characters the code may contain (default: numeric).
    pub input_class: InputClass,
    /// Drop focus once the code is complete (default: false).
    pub blur_on_filled: bool,
    pub slot_primitives: SlotPrimitives,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            digit_count: 6,
            auto_focus: true,
            hide_caret: false,
            focus_color: "#A4D0A4".to_string(),
            blink_interval_ms: DEFAULT_BLINK_INTERVAL_MS,
            caret_style: CursorStyle::Bar,
            mask_input: false,
            input_class: InputClass::Numeric,
            blur_on_filled: false,
            slot_primitives: SlotPrimitives::Plain,
        }
    }
}

impl OtpConfig {
    /// Config with `digit_count` slots and every other option at its default.
    pub fn with_digits(digit_count: usize) -> Self {
        Self { digit_count, ..Default::default() }
    }

    /// Parsed focus colour, falling back to the default green.
    pub fn focus_rgba(&self) -> Rgba {
        Rgba::from_hex(&self.focus_color).unwrap_or(Rgba::FOCUS_GREEN)
    }

    pub fn caret_config(&self) -> CaretConfig {
        CaretConfig {
            style: self.caret_style,
            char: None,
            blink: self.blink_interval_ms > 0,
            interval_ms: self.blink_interval_ms,
        }
    }

    pub(crate) fn slot_config(&self, disabled: bool) -> SlotConfig {
        SlotConfig {
            digit_count: self.digit_count,
            disabled,
            hide_caret: self.hide_caret,
            mask_input: self.mask_input,
        }
    }

    pub(crate) fn focus_state(&self, is_focused: bool, code_len: usize) -> FocusState {
        FocusState {
            is_focused,
            focused_slot_index: crate::state::focus::focused_slot_index(code_len, self.digit_count),
        }
    }
}

// =============================================================================
// OTP Input Props
// =============================================================================

/// Properties for the OTP input.
///
/// `S` is the host's style handle type. The core never looks inside it.
///
/// # Example
///
/// ```ignore
/// use otp_slots::primitives::{otp_input, OtpInputProps, OtpConfig, MemoryEditor};
/// use std::rc::Rc;
///
/// let otp = otp_input(
///     OtpInputProps {
///         config: OtpConfig { digit_count: 4, ..Default::default() },
///         on_filled: Some(Rc::new(|code| println!("code: {code}"))),
///         ..Default::default()
///     },
///     Rc::new(MemoryEditor::new()),
/// );
/// ```
pub struct OtpInputProps<S = ()> {
    pub config: OtpConfig,

    /// Disable editing and focus (default: false).
    pub disabled: PropValue<bool>,

    /// Per-slot style overrides.
    pub theme: SlotTheme<S>,

    /// Extra props merged over the generated hidden editor props.
    pub editor_overrides: EditorOverrides,

    /// Platform used to pick the autofill hint.
    pub platform: Platform,

    // =========================================================================
    // Callbacks
    // =========================================================================

    /// Called after every accepted code change, including clear and set_value.
    pub on_text_change: Option<TextChangeCallback>,

    /// Called when a change fills every slot.
    pub on_filled: Option<FilledCallback>,

    pub on_focus: Option<FocusCallback>,

    pub on_blur: Option<BlurCallback>,
}

impl<S> Default for OtpInputProps<S> {
    fn default() -> Self {
        Self {
            config: OtpConfig::default(),
            disabled: PropValue::Static(false),
            theme: SlotTheme::default(),
            editor_overrides: EditorOverrides::default(),
            platform: Platform::current(),
            on_text_change: None,
            on_filled: None,
            on_focus: None,
            on_blur: None,
        }
    }
}

impl<S> OtpInputProps<S> {
    /// Props with the given config and everything else defaulted.
    pub fn new(config: OtpConfig) -> Self {
        Self { config, ..Default::default() }
    }
}

// =============================================================================
// Tests
// =============================================================================

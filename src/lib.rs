//! # otp-slots
//!
//! Segmented one-time-passcode input.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for fine-grained reactivity.
//!
//! ## Architecture
//!
//! The widget shows N separate slots but owns a single text value. One hidden
//! editor receives all typing, paste and autofill; the slots are a pure
//! projection of `(code, focus, config)`:
//!
//! ```text
//! hidden editor → ValueStore ─┐
//!                 FocusTracker ┼→ slots derived → theme layers → renderer
//!        disabled (PropValue) ─┘
//! ```
//!
//! The caret of the focused empty slot blinks off a shared clock thread that
//! only runs while some slot is focused.
//!
//! ## Modules
//!
//! - [`types`] - Colors, caret styles, input classes, platform
//! - [`state`] - Value store, focus tracker, caret blink, keyboard and terminal events
//! - [`primitives`] - The OTP input widget, slot projection, hidden editor boundary
//! - [`theme`] - Per-slot style layering
//! - [`layout`] - Taffy layout of the slot row
//! - [`renderer`] - Differential terminal renderer
//! - [`error`] - Error types

pub mod error;
pub mod layout;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod theme;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{CodeRejection, OtpError, Result};

pub use primitives::{
    collect_code, otp_input, project_slots, EditorOverrides, EditorProps, HiddenEditor,
    MemoryEditor, OtpConfig, OtpInput, OtpInputHandle, OtpInputProps, PropValue, SlotConfig,
    SlotFlags, SlotPrimitives, SlotView, EDITOR_TEST_ID, SLOT_TEST_ID,
};

pub use state::{
    focused_slot_index, CaretBlinkController, CaretConfig, EditAction, FocusState, FocusTracker,
    KeyboardEvent, ValueStore, DEFAULT_BLINK_INTERVAL_MS,
};

pub use theme::{CellStyle, SlotTheme};

pub use layout::{compute_slot_row, SlotRowConfig, SlotRowLayout};

pub use renderer::{build_frame, frame_for, TerminalRenderer};

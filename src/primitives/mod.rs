//! OTP Primitives - The widget and its building blocks.
//!
//! - [`otp_input`] - Mounts the widget over a hidden editor
//! - [`project_slots`] - Pure per-slot projection
//! - [`HiddenEditor`] / [`MemoryEditor`] - The text field boundary
//!
//! # Reactivity
//!
//! `disabled` can be:
//! - Static: `disabled: true.into()`
//! - Signal: `disabled: my_signal.into()` (stays connected!)
//! - Getter: `disabled: PropValue::getter(|| form_locked())`
//!
//! A getter over plain (non-signal) state has nothing to react to, so it is
//! re-read at every editor event, control call and `caret_visible` poll.
//!
//! Pass signals directly - don't extract values before mounting:
//!
//! ```ignore
//! // CORRECT - signal stays connected
//! otp_input(OtpInputProps { disabled: locked.clone().into(), ..Default::default() }, editor);
//!
//! // WRONG - extracts value, breaks reactivity
//! otp_input(OtpInputProps { disabled: locked.get().into(), ..Default::default() }, editor);
//! ```

pub mod editor;
pub mod otp_input;
pub mod slots;
mod types;

pub use editor::{EditorOverrides, EditorProps, HiddenEditor, MemoryEditor, EDITOR_TEST_ID, SLOT_TEST_ID};
pub use otp_input::{otp_input, OtpInput, OtpInputHandle};
pub use slots::{collect_code, project_slots, SlotConfig, SlotFlags, SlotView};
pub use types::*;

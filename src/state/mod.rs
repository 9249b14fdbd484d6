//! State Module - Runtime state behind the widget
//!
//! - **Value** - The authoritative code and its edit rules
//! - **Focus** - Focused/Blurred machine, callbacks, focused slot index
//! - **Animate** - Shared blink clocks
//! - **Caret** - Blink controller bound to focus
//! - **Keyboard** - Key events and the edits they perform
//! - **Input** - crossterm event conversion

pub mod animate;
pub mod caret;
pub mod focus;
pub mod input;
pub mod keyboard;
pub mod value;

pub use caret::{CaretBlinkController, CaretConfig, DEFAULT_BLINK_INTERVAL_MS};
pub use focus::{focused_slot_index, FocusCallbacks, FocusState, FocusTracker};
pub use input::InputEvent;
pub use keyboard::{EditAction, KeyState, KeyboardEvent, Modifiers};
pub use value::ValueStore;

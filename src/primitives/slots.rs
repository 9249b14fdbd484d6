//! Slot Projector - Per-slot render state from code and focus.
//!
//! [`project_slots`] is a pure function. The widget wraps it in a `Derived`
//! so the projection is recomputed whenever the code, the focus state or the
//! disabled prop changes; there is no per-slot state to fall out of sync.
//!
//! For slot `i` of `N`:
//!
//! ```text
//! char                = code[i] if i < len(code)
//! focused input       = i == focused_slot_index && focused && !disabled
//! last filled         = len(code) == N && i == N - 1
//! focused container   = focused input || (last filled && focused)
//! caret               = focused input && empty && !hide_caret
//! ```

use crate::state::focus::FocusState;
use crate::types::MASK_CHAR;

bitflags::bitflags! {
    /// Derived state of one slot.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SlotFlags: u8 {
        /// The next character lands here
        const FOCUSED_INPUT = 1 << 0;
        /// Draw with the focus border
        const FOCUSED_CONTAINER = 1 << 1;
        const FILLED = 1 << 2;
        /// Last slot of a complete code
        const LAST_FILLED = 1 << 3;
        const DISABLED = 1 << 4;
        /// Draw the caret instead of a character
        const CARET = 1 << 5;
        /// Filled characters render as the mask glyph
        const MASKED = 1 << 6;
    }
}

/// Configuration the projection depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotConfig {
    pub digit_count: usize,
    pub disabled: bool,
    pub hide_caret: bool,
    pub mask_input: bool,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            digit_count: 6,
            disabled: false,
            hide_caret: false,
            mask_input: false,
        }
    }
}

/// Render state of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotView {
    pub index: usize,
    /// The stored character, never masked.
    pub char: Option<char>,
    pub flags: SlotFlags,
}

impl SlotView {
    pub fn is_focused_input(&self) -> bool {
        self.flags.contains(SlotFlags::FOCUSED_INPUT)
    }

    pub fn is_focused_container(&self) -> bool {
        self.flags.contains(SlotFlags::FOCUSED_CONTAINER)
    }

    pub fn is_filled(&self) -> bool {
        self.flags.contains(SlotFlags::FILLED)
    }

    pub fn is_last_filled(&self) -> bool {
        self.flags.contains(SlotFlags::LAST_FILLED)
    }

    pub fn is_disabled(&self) -> bool {
        self.flags.contains(SlotFlags::DISABLED)
    }

    /// Whether the caret belongs in this slot (blink phase aside).
    pub fn shows_caret(&self) -> bool {
        self.flags.contains(SlotFlags::CARET)
    }

    /// Character to draw, with masking applied.
    pub fn rendered_char(&self) -> Option<char> {
        if self.flags.contains(SlotFlags::MASKED) {
            self.char.map(|_| MASK_CHAR)
        } else {
            self.char
        }
    }
}

/// Project the code and focus state onto `config.digit_count` slots.
pub fn project_slots(code: &str, focus: FocusState, config: &SlotConfig) -> Vec<SlotView> {
    let n = config.digit_count;
    let chars: Vec<char> = code.chars().take(n).collect();
    let complete = n > 0 && chars.len() == n;

    (0..n)
        .map(|index| {
            let char = chars.get(index).copied();
            let mut flags = SlotFlags::empty();

            if index == focus.focused_slot_index && focus.is_focused && !config.disabled {
                flags |= SlotFlags::FOCUSED_INPUT;
            }
            if complete && index == n - 1 {
                flags |= SlotFlags::LAST_FILLED;
            }
            if flags.contains(SlotFlags::FOCUSED_INPUT)
                || (flags.contains(SlotFlags::LAST_FILLED) && focus.is_focused)
            {
                flags |= SlotFlags::FOCUSED_CONTAINER;
            }
            if char.is_some() {
                flags |= SlotFlags::FILLED;
            }
            if config.disabled {
                flags |= SlotFlags::DISABLED;
            }
            if flags.contains(SlotFlags::FOCUSED_INPUT) && char.is_none() && !config.hide_caret {
                flags |= SlotFlags::CARET;
            }
            if config.mask_input {
                flags |= SlotFlags::MASKED;
            }

            SlotView { index, char, flags }
        })
        .collect()
}

/// Stored characters of a projection, in slot order.
pub fn collect_code(slots: &[SlotView]) -> String {
    slots.iter().filter_map(|slot| slot.char).collect()
}

// =============================================================================
// Tests
// =============================================================================

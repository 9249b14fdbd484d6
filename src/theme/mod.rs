//! Slot theming.
//!
//! Styles are opaque to the core. A [`SlotTheme<S>`] carries whatever style
//! handle the host uses (`S`), and the core only decides *which* handles apply
//! to a slot and in what order, using the slot's derived state.
//!
//! The container stack, lowest priority first:
//!
//! 1. the built-in slot style
//! 2. `pin_code_container`
//! 3. the focus border colour, if the slot is a focused container
//! 4. `focused_container`, if focused
//! 5. `filled_container`, if the slot holds a character
//! 6. `disabled_container`, if disabled
//!
//! [`CellStyle`] is a ready-made `S` for terminal hosts; its stack folds into
//! one resolved style with [`resolve_container`].
//!
//! # Example
//!
//! ```ignore
//! use otp_slots::theme::{SlotTheme, CellStyle, resolve_container};
//!
//! let theme = SlotTheme {
//!     filled_container: Some(CellStyle { border_color: Some(Rgba::WHITE), ..Default::default() }),
//!     ..Default::default()
//! };
//! let style = resolve_container(&theme.container_layers(&slot, focus_color, false));
//! ```

use crate::primitives::SlotView;
use crate::types::{Attr, BorderStyle, Rgba};

// =============================================================================
// SlotTheme
// =============================================================================

/// Per-slot style overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotTheme<S> {
    /// Outer wrapper around the whole widget.
    pub container: Option<S>,
    /// Row holding the slots.
    pub inputs_container: Option<S>,
    /// Every slot box.
    pub pin_code_container: Option<S>,
    /// Character inside a slot.
    pub pin_code_text: Option<S>,
    /// The caret.
    pub focus_stick: Option<S>,
    pub focused_container: Option<S>,
    pub filled_container: Option<S>,
    pub disabled_container: Option<S>,
}

impl<S> Default for SlotTheme<S> {
    fn default() -> Self {
        Self {
            container: None,
            inputs_container: None,
            pin_code_container: None,
            pin_code_text: None,
            focus_stick: None,
            focused_container: None,
            filled_container: None,
            disabled_container: None,
        }
    }
}

/// One entry in a style stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleLayer<'a, S> {
    /// Built-in style for the element.
    Default,
    /// Border colour of a focused slot.
    FocusBorder(Rgba),
    /// A host style handle.
    Custom(&'a S),
}

impl<S> SlotTheme<S> {
    /// Ordered style stack for a slot box.
    pub fn container_layers(&self, slot: &SlotView, focus_color: Rgba, disabled: bool) -> Vec<StyleLayer<'_, S>> {
        let mut layers = vec![StyleLayer::Default];
        if let Some(ref base) = self.pin_code_container {
            layers.push(StyleLayer::Custom(base));
        }
        if slot.is_focused_container() {
            layers.push(StyleLayer::FocusBorder(focus_color));
            if let Some(ref focused) = self.focused_container {
                layers.push(StyleLayer::Custom(focused));
            }
        }
        if slot.is_filled() {
            if let Some(ref filled) = self.filled_container {
                layers.push(StyleLayer::Custom(filled));
            }
        }
        if disabled {
            if let Some(ref off) = self.disabled_container {
                layers.push(StyleLayer::Custom(off));
            }
        }
        layers
    }

    /// Style stack for a slot's character.
    pub fn text_layers(&self) -> Vec<StyleLayer<'_, S>> {
        layers_over_default(self.pin_code_text.as_ref())
    }

    /// Style stack for the caret.
    pub fn caret_layers(&self) -> Vec<StyleLayer<'_, S>> {
        layers_over_default(self.focus_stick.as_ref())
    }
}

fn layers_over_default<S>(custom: Option<&S>) -> Vec<StyleLayer<'_, S>> {
    let mut layers = vec![StyleLayer::Default];
    layers.extend(custom.map(StyleLayer::Custom));
    layers
}

// =============================================================================
// CellStyle - terminal style handle
// =============================================================================

/// Partial terminal style. `None` fields inherit from lower layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellStyle {
    pub border: Option<BorderStyle>,
    pub border_color: Option<Rgba>,
    pub fg: Option<Rgba>,
    pub attrs: Option<Attr>,
}

impl CellStyle {
    /// Overlay `top` on `self`.
    pub fn merge(self, top: &CellStyle) -> CellStyle {
        CellStyle {
            border: top.border.or(self.border),
            border_color: top.border_color.or(self.border_color),
            fg: top.fg.or(self.fg),
            attrs: top.attrs.or(self.attrs),
        }
    }
}

/// Fully resolved terminal style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub border: BorderStyle,
    pub border_color: Rgba,
    pub fg: Rgba,
    pub attrs: Attr,
}

/// Built-in slot box: rounded gray border.
pub const DEFAULT_CONTAINER: ResolvedStyle = ResolvedStyle {
    border: BorderStyle::Rounded,
    border_color: Rgba::DARK_GRAY,
    fg: Rgba::TERMINAL_DEFAULT,
    attrs: Attr::NONE,
};

/// Built-in character style.
pub const DEFAULT_TEXT: ResolvedStyle = ResolvedStyle {
    border: BorderStyle::None,
    border_color: Rgba::TERMINAL_DEFAULT,
    fg: Rgba::TERMINAL_DEFAULT,
    attrs: Attr::BOLD,
};

fn resolve(base: ResolvedStyle, layers: &[StyleLayer<'_, CellStyle>]) -> ResolvedStyle {
    let merged = layers.iter().fold(CellStyle::default(), |acc, layer| match layer {
        StyleLayer::Default => acc,
        StyleLayer::FocusBorder(color) => acc.merge(&CellStyle {
            border_color: Some(*color),
            ..Default::default()
        }),
        StyleLayer::Custom(style) => acc.merge(style),
    });
    ResolvedStyle {
        border: merged.border.unwrap_or(base.border),
        border_color: merged.border_color.unwrap_or(base.border_color),
        fg: merged.fg.unwrap_or(base.fg),
        attrs: merged.attrs.unwrap_or(base.attrs),
    }
}

/// Fold a container stack over [`DEFAULT_CONTAINER`].
pub fn resolve_container(layers: &[StyleLayer<'_, CellStyle>]) -> ResolvedStyle {
    resolve(DEFAULT_CONTAINER, layers)
}

/// Fold a text or caret stack over [`DEFAULT_TEXT`].
pub fn resolve_text(layers: &[StyleLayer<'_, CellStyle>]) -> ResolvedStyle {
    resolve(DEFAULT_TEXT, layers)
}

// =============================================================================
// Tests
// =============================================================================

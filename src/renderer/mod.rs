//! Terminal renderer for the slot row.
//!
//! Rendering is two steps:
//!
//! 1. [`build_frame`] turns slot state, layout and theme into a small cell
//!    grid covering the row (pure, testable)
//! 2. [`TerminalRenderer::render`] diffs that grid against the previous one
//!    and writes only changed cells, inside a synchronized update
//!
//! The caret blinking without any other change is just a one-cell diff.

use std::io::Write;

use crossterm::cursor::MoveTo;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetForegroundColor};
use crossterm::terminal::{BeginSynchronizedUpdate, EndSynchronizedUpdate};
use crossterm::queue;

use crate::error::Result;
use crate::layout::{CellRect, SlotRowLayout};
use crate::primitives::{OtpInput, SlotView};
use crate::theme::{resolve_container, resolve_text, CellStyle, ResolvedStyle, SlotTheme};
use crate::types::{Attr, Rgba};

// =============================================================================
// Frame
// =============================================================================

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgba,
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }
}

/// Cells covering the slot row, anchored at the row's origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFrame {
    origin: (u16, u16),
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl SlotFrame {
    pub fn new(area: CellRect) -> Self {
        Self {
            origin: (area.x, area.y),
            width: area.width,
            height: area.height,
            cells: vec![Cell::default(); area.width as usize * area.height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Cell at absolute terminal coordinates.
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        let (ox, oy) = self.origin;
        if x < ox || y < oy {
            return None;
        }
        let (dx, dy) = (x - ox, y - oy);
        if dx >= self.width || dy >= self.height {
            return None;
        }
        Some(dy as usize * self.width as usize + dx as usize)
    }

    fn put(&mut self, x: u16, y: u16, ch: char, style: &ResolvedStyle, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = Cell { ch, fg: color, attrs: style.attrs };
        }
    }

    /// Same-sized frames at the same origin can be diffed cell by cell.
    fn same_area(&self, other: &SlotFrame) -> bool {
        self.origin == other.origin && self.width == other.width && self.height == other.height
    }

    fn draw_box(&mut self, rect: &CellRect, style: &ResolvedStyle) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let (h, v, tl, tr, br, bl) = style.border.chars();
        let first = |s: &str| s.chars().next().unwrap_or(' ');
        let (h, v, tl, tr, br, bl) = (first(h), first(v), first(tl), first(tr), first(br), first(bl));
        let right = rect.x.saturating_add(rect.width - 1);
        let bottom = rect.y.saturating_add(rect.height - 1);
        let color = style.border_color;

        for x in rect.x.saturating_add(1)..right {
            self.put(x, rect.y, h, style, color);
            self.put(x, bottom, h, style, color);
        }
        for y in rect.y.saturating_add(1)..bottom {
            self.put(rect.x, y, v, style, color);
            self.put(right, y, v, style, color);
        }
        self.put(rect.x, rect.y, tl, style, color);
        self.put(right, rect.y, tr, style, color);
        self.put(right, bottom, br, style, color);
        self.put(rect.x, bottom, bl, style, color);
    }
}

/// Draw the slot row.
///
/// `caret` is the glyph to draw in the caret slot, or `None` while the caret
/// is hidden (blink-off phase, blurred, disabled).
pub fn build_frame(
    slots: &[SlotView],
    layout: &SlotRowLayout,
    theme: &SlotTheme<CellStyle>,
    focus_color: Rgba,
    disabled: bool,
    caret: Option<char>,
) -> SlotFrame {
    let mut frame = SlotFrame::new(layout.row);
    let text_style = resolve_text(&theme.text_layers());
    let caret_style = resolve_text(&theme.caret_layers());

    for (slot, rect) in slots.iter().zip(&layout.slots) {
        let container = resolve_container(&theme.container_layers(slot, focus_color, disabled));
        frame.draw_box(rect, &container);

        let (cx, cy) = rect.center();
        match (slot.shows_caret(), caret, slot.rendered_char()) {
            (true, Some(glyph), _) => {
                let color = if caret_style.fg.is_terminal_default() { focus_color } else { caret_style.fg };
                frame.put(cx, cy, glyph, &caret_style, color);
            }
            (_, _, Some(ch)) => frame.put(cx, cy, ch, &text_style, text_style.fg),
            _ => {}
        }
    }

    frame
}

/// [`build_frame`] for a mounted widget.
pub fn frame_for(otp: &OtpInput<CellStyle>, layout: &SlotRowLayout) -> SlotFrame {
    let caret = otp.caret_visible().then(|| otp.caret().glyph());
    build_frame(&otp.slots(), layout, otp.theme(), otp.focus_color(), otp.is_disabled(), caret)
}

// =============================================================================
// Terminal output
// =============================================================================

fn to_color(color: Rgba) -> Color {
    if color.is_terminal_default() {
        Color::Reset
    } else {
        Color::Rgb {
            r: color.r as u8,
            g: color.g as u8,
            b: color.b as u8,
        }
    }
}

fn queue_attrs<W: Write>(out: &mut W, attrs: Attr) -> std::io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset))?;
    if attrs.contains(Attr::BOLD) {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if attrs.contains(Attr::DIM) {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    if attrs.contains(Attr::UNDERLINE) {
        queue!(out, SetAttribute(Attribute::Underlined))?;
    }
    if attrs.contains(Attr::INVERSE) {
        queue!(out, SetAttribute(Attribute::Reverse))?;
    }
    Ok(())
}

/// Differential renderer for the slot row.
///
/// Keeps the previous frame; only changed cells are written.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    previous: Option<SlotFrame>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the previous frame so the next render redraws everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    /// Render a frame. Returns the number of cells written.
    pub fn render<W: Write>(&mut self, out: &mut W, frame: SlotFrame) -> Result<usize> {
        let previous = self.previous.as_ref().filter(|prev| prev.same_area(&frame));
        let (ox, oy) = frame.origin;

        queue!(out, BeginSynchronizedUpdate)?;
        let mut written = 0;
        let mut current: Option<(Rgba, Attr)> = None;

        for (i, cell) in frame.cells.iter().enumerate() {
            if previous.is_some_and(|prev| prev.cells[i] == *cell) {
                continue;
            }
            // Cells past the last terminal column or row are never drawn
            let (Some(x), Some(y)) = (
                ox.checked_add((i % frame.width as usize) as u16),
                oy.checked_add((i / frame.width as usize) as u16),
            ) else {
                continue;
            };

            if current != Some((cell.fg, cell.attrs)) {
                queue_attrs(out, cell.attrs)?;
                queue!(out, SetForegroundColor(to_color(cell.fg)))?;
                current = Some((cell.fg, cell.attrs));
            }
            queue!(out, MoveTo(x, y), Print(cell.ch))?;
            written += 1;
        }

        queue!(out, SetAttribute(Attribute::Reset), EndSynchronizedUpdate)?;
        out.flush()?;

        self.previous = Some(frame);
        Ok(written)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{compute_slot_row, SlotRowConfig};
    use crate::primitives::{project_slots, SlotConfig};
    use crate::state::FocusState;

    fn row(n: usize) -> SlotRowLayout {
        compute_slot_row(&SlotRowConfig::new(n)).unwrap()
    }

    fn slots(code: &str, focused_slot_index: usize, mask_input: bool) -> Vec<SlotView> {
        project_slots(
            code,
            FocusState { is_focused: true, focused_slot_index },
            &SlotConfig { digit_count: 3, mask_input, ..Default::default() },
        )
    }

    #[test]
    fn test_frame_draws_boxes_and_chars() {
        let layout = row(3);
        let frame = build_frame(&slots("4", 1, false), &layout, &SlotTheme::default(), Rgba::FOCUS_GREEN, false, None);

        assert_eq!(frame.width(), 17);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.get(0, 0).unwrap().ch, '╭');
        assert_eq!(frame.get(4, 2).unwrap().ch, '╯');
        assert_eq!(frame.get(2, 1).unwrap().ch, '4');
        assert_eq!(frame.get(5, 1).unwrap().ch, ' ');
    }

    #[test]
    fn test_focused_slot_border_uses_focus_color() {
        let layout = row(3);
        let frame = build_frame(&slots("4", 1, false), &layout, &SlotTheme::default(), Rgba::FOCUS_GREEN, false, None);

        assert_eq!(frame.get(6, 0).unwrap().fg, Rgba::FOCUS_GREEN);
        assert_ne!(frame.get(0, 0).unwrap().fg, Rgba::FOCUS_GREEN);
    }

    #[test]
    fn test_caret_only_when_visible() {
        let layout = row(3);
        let s = slots("4", 1, false);
        let on = build_frame(&s, &layout, &SlotTheme::default(), Rgba::FOCUS_GREEN, false, Some('│'));
        let off = build_frame(&s, &layout, &SlotTheme::default(), Rgba::FOCUS_GREEN, false, None);

        assert_eq!(on.get(8, 1).unwrap().ch, '│');
        assert_eq!(off.get(8, 1).unwrap().ch, ' ');
    }

    #[test]
    fn test_masked_frame_never_shows_digits() {
        let layout = row(3);
        let frame = build_frame(&slots("123", 2, true), &layout, &SlotTheme::default(), Rgba::FOCUS_GREEN, false, None);
        for x in [2, 8, 14] {
            assert_eq!(frame.get(x, 1).unwrap().ch, '•');
        }
    }

    #[test]
    fn test_row_at_terminal_edge_renders_without_overflow() {
        let config = SlotRowConfig { origin: (u16::MAX - 8, u16::MAX - 1), ..SlotRowConfig::new(3) };
        let layout = compute_slot_row(&config).unwrap();
        let frame = build_frame(&slots("4", 1, false), &layout, &SlotTheme::default(), Rgba::FOCUS_GREEN, false, Some('│'));

        let mut out = Vec::new();
        let written = TerminalRenderer::new().render(&mut out, frame).unwrap();
        assert!(written > 0);
        assert!(written < 17 * 3);
    }

    #[test]
    fn test_diff_renderer_writes_only_changes() {
        let layout = row(3);
        let s = slots("4", 1, false);
        let mut renderer = TerminalRenderer::new();
        let mut out = Vec::new();

        let first = renderer
            .render(&mut out, build_frame(&s, &layout, &SlotTheme::default(), Rgba::FOCUS_GREEN, false, Some('│')))
            .unwrap();
        assert_eq!(first, 17 * 3);

        let blink = renderer
            .render(&mut out, build_frame(&s, &layout, &SlotTheme::default(), Rgba::FOCUS_GREEN, false, None))
            .unwrap();
        assert_eq!(blink, 1);

        renderer.invalidate();
        let full = renderer
            .render(&mut out, build_frame(&s, &layout, &SlotTheme::default(), Rgba::FOCUS_GREEN, false, None))
            .unwrap();
        assert_eq!(full, 17 * 3);
        assert!(!out.is_empty());
    }
}

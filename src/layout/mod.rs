//! Slot row layout.
//!
//! Lays out the N slot boxes as a flex row with [Taffy](https://github.com/DioxusLabs/taffy):
//! fixed-size bordered boxes, spread with `space-between` when the row has a
//! fixed width, packed with a gap otherwise. Coordinates are terminal cells.
//!
//! # Example
//!
//! ```ignore
//! use otp_slots::layout::{compute_slot_row, SlotRowConfig};
//!
//! let row = compute_slot_row(&SlotRowConfig::new(6))?;
//! let pressed = row.hit_test(12, 1); // Some(slot index) if a box was hit
//! ```

use taffy::{
    AlignItems, AvailableSpace, Dimension as TaffyDimension, Display, FlexDirection,
    JustifyContent, LengthPercentage, Rect, Size, Style, TaffyTree,
};

use crate::error::Result;

// =============================================================================
// Types
// =============================================================================

/// A box in cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && y >= self.y
            && (x - self.x) < self.width
            && (y - self.y) < self.height
    }

    /// Center cell, where the glyph goes.
    pub fn center(&self) -> (u16, u16) {
        (self.x.saturating_add(self.width / 2), self.y.saturating_add(self.height / 2))
    }
}

/// Row geometry input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotRowConfig {
    pub digit_count: usize,
    /// Box width including borders (default: 5)
    pub slot_width: u16,
    /// Box height including borders (default: 3)
    pub slot_height: u16,
    /// Gap between boxes when the row is packed (default: 1)
    pub gap: u16,
    /// Fixed row width; boxes spread across it
    pub row_width: Option<u16>,
    /// Top-left corner of the row
    pub origin: (u16, u16),
}

impl SlotRowConfig {
    pub fn new(digit_count: usize) -> Self {
        Self {
            digit_count,
            slot_width: 5,
            slot_height: 3,
            gap: 1,
            row_width: None,
            origin: (0, 0),
        }
    }
}

/// Computed geometry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotRowLayout {
    pub row: CellRect,
    pub slots: Vec<CellRect>,
}

impl SlotRowLayout {
    /// Index of the slot box containing (x, y).
    pub fn hit_test(&self, x: u16, y: u16) -> Option<usize> {
        self.slots.iter().position(|rect| rect.contains(x, y))
    }
}

// =============================================================================
// Layout
// =============================================================================

fn slot_style(config: &SlotRowConfig) -> Style {
    Style {
        display: Display::Flex,
        size: Size {
            width: TaffyDimension::Length(config.slot_width as f32),
            height: TaffyDimension::Length(config.slot_height as f32),
        },
        flex_shrink: 0.0,
        border: Rect {
            top: LengthPercentage::Length(1.0),
            right: LengthPercentage::Length(1.0),
            bottom: LengthPercentage::Length(1.0),
            left: LengthPercentage::Length(1.0),
        },
        justify_content: Some(JustifyContent::Center),
        align_items: Some(AlignItems::Center),
        ..Default::default()
    }
}

fn row_style(config: &SlotRowConfig) -> Style {
    let (width, justify, gap) = match config.row_width {
        Some(w) => (TaffyDimension::Length(w as f32), JustifyContent::SpaceBetween, 0.0),
        None => (TaffyDimension::Auto, JustifyContent::FlexStart, config.gap as f32),
    };
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Row,
        justify_content: Some(justify),
        size: Size { width, height: TaffyDimension::Auto },
        gap: Size {
            width: LengthPercentage::Length(gap),
            height: LengthPercentage::Length(0.0),
        },
        ..Default::default()
    }
}

/// Compute the slot row.
pub fn compute_slot_row(config: &SlotRowConfig) -> Result<SlotRowLayout> {
    let mut tree: TaffyTree<()> = TaffyTree::new();

    let children = (0..config.digit_count)
        .map(|_| tree.new_leaf(slot_style(config)))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let root = tree.new_with_children(row_style(config), &children)?;

    tree.compute_layout(root, Size {
        width: AvailableSpace::MaxContent,
        height: AvailableSpace::MaxContent,
    })?;

    let (ox, oy) = config.origin;
    let to_rect = |layout: &taffy::Layout, base_x: u16, base_y: u16| CellRect {
        x: base_x.saturating_add(layout.location.x.round() as u16),
        y: base_y.saturating_add(layout.location.y.round() as u16),
        width: layout.size.width.round() as u16,
        height: layout.size.height.round() as u16,
    };

    let row = to_rect(tree.layout(root)?, ox, oy);
    let slots = children
        .iter()
        .map(|&node| tree.layout(node).map(|l| to_rect(l, row.x, row.y)))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(SlotRowLayout { row, slots })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_row() {
        let layout = compute_slot_row(&SlotRowConfig::new(4)).unwrap();
        assert_eq!(layout.slots.len(), 4);
        assert_eq!(layout.slots[0], CellRect { x: 0, y: 0, width: 5, height: 3 });
        assert_eq!(layout.slots[1].x, 6);
        assert_eq!(layout.slots[3].x, 18);
        assert_eq!(layout.row.width, 23);
        assert_eq!(layout.row.height, 3);
    }

    #[test]
    fn test_spread_row() {
        let config = SlotRowConfig { row_width: Some(40), ..SlotRowConfig::new(6) };
        let layout = compute_slot_row(&config).unwrap();
        assert_eq!(layout.row.width, 40);
        assert_eq!(layout.slots[0].x, 0);
        assert_eq!(layout.slots[5].x + layout.slots[5].width, 40);
    }

    #[test]
    fn test_origin_offsets_everything() {
        let config = SlotRowConfig { origin: (2, 3), ..SlotRowConfig::new(2) };
        let layout = compute_slot_row(&config).unwrap();
        assert_eq!((layout.row.x, layout.row.y), (2, 3));
        assert_eq!((layout.slots[1].x, layout.slots[1].y), (8, 3));
    }

    #[test]
    fn test_hit_test() {
        let layout = compute_slot_row(&SlotRowConfig::new(3)).unwrap();
        assert_eq!(layout.hit_test(0, 0), Some(0));
        assert_eq!(layout.hit_test(7, 2), Some(1));
        assert_eq!(layout.hit_test(5, 1), None); // gap
        assert_eq!(layout.hit_test(7, 3), None); // below
    }

    #[test]
    fn test_origin_at_terminal_edge_saturates() {
        let config = SlotRowConfig { origin: (u16::MAX - 3, u16::MAX - 1), ..SlotRowConfig::new(4) };
        let layout = compute_slot_row(&config).unwrap();
        assert_eq!(layout.row.x, u16::MAX - 3);
        assert_eq!(layout.slots[3].x, u16::MAX);
        assert_eq!(layout.slots[3].center(), (u16::MAX, u16::MAX));
    }

    #[test]
    fn test_center() {
        let rect = CellRect { x: 6, y: 0, width: 5, height: 3 };
        assert_eq!(rect.center(), (8, 1));
    }
}

//! Core types for otp-slots.
//!
//! Plain value types shared by the state machine, the slot projector and
//! the presentation helpers. Nothing here holds reactive state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Color
// =============================================================================

/// RGBA color with 8-bit channels (0-255).
///
/// Using integers for exact comparison - no floating point epsilon needed.
/// Special value: r=-1 means "terminal default" (let terminal pick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const GRAY: Self = Self::rgb(128, 128, 128);
    pub const DARK_GRAY: Self = Self::rgb(64, 64, 64);

    /// Default border colour of a focused slot (`#A4D0A4`).
    pub const FOCUS_GREEN: Self = Self::rgb(0xA4, 0xD0, 0xA4);

    /// Check if this is the terminal default color.
    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    /// Create from a packed `0xRRGGBB` integer.
    pub const fn from_rgb_int(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        )
    }

    /// Parse hex color string (#RGB, #RRGGBB, #RRGGBBAA).
    ///
    /// Returns None for invalid format.
    ///
    /// ```
    /// use otp_slots::types::Rgba;
    ///
    /// assert_eq!(Rgba::from_hex("#A4D0A4"), Some(Rgba::FOCUS_GREEN));
    /// assert_eq!(Rgba::from_hex("#fff"), Some(Rgba::WHITE));
    /// assert_eq!(Rgba::from_hex("nope"), None);
    /// ```
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn hex_digit(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        fn hex_byte(s: &[u8], i: usize) -> Option<u8> {
            Some((hex_digit(s[i])? << 4) | hex_digit(s[i + 1])?)
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = hex_digit(bytes[0])?;
                let g = hex_digit(bytes[1])?;
                let b = hex_digit(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::rgb(
                hex_byte(bytes, 0)?,
                hex_byte(bytes, 2)?,
                hex_byte(bytes, 4)?,
            )),
            8 => Some(Self::new(
                hex_byte(bytes, 0)?,
                hex_byte(bytes, 2)?,
                hex_byte(bytes, 4)?,
                hex_byte(bytes, 6)?,
            )),
            _ => None,
        }
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes applied to a slot's glyph.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::DIM`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const UNDERLINE = 1 << 2;
        const INVERSE = 1 << 3;
    }
}

// =============================================================================
// Border Styles
// =============================================================================

/// Border drawn around each slot box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BorderStyle {
    None,
    /// ─ │ ┌ ┐ └ ┘
    Single,
    /// ═ ║ ╔ ╗ ╚ ╝
    Double,
    /// ─ │ ╭ ╮ ╰ ╯
    #[default]
    Rounded,
    /// ━ ┃ ┏ ┓ ┗ ┛
    Bold,
    /// - | + + + +
    Ascii,
}

impl BorderStyle {
    /// Get the border characters for this style.
    ///
    /// Returns: (horizontal, vertical, top_left, top_right, bottom_right, bottom_left)
    pub const fn chars(&self) -> (&'static str, &'static str, &'static str, &'static str, &'static str, &'static str) {
        match self {
            Self::None => (" ", " ", " ", " ", " ", " "),
            Self::Single => ("─", "│", "┌", "┐", "┘", "└"),
            Self::Double => ("═", "║", "╔", "╗", "╝", "╚"),
            Self::Rounded => ("─", "│", "╭", "╮", "╯", "╰"),
            Self::Bold => ("━", "┃", "┏", "┓", "┛", "┗"),
            Self::Ascii => ("-", "|", "+", "+", "+", "+"),
        }
    }
}

// =============================================================================
// Caret
// =============================================================================

/// Caret glyph shown in the focused empty slot.
pub const CARET_CHAR_BAR: char = '\u{2502}';
/// Underscore caret.
pub const CARET_CHAR_UNDERLINE: char = '_';
/// Full block caret.
pub const CARET_CHAR_BLOCK: char = '\u{2588}';

/// Glyph that replaces every filled character when masking is on.
pub const MASK_CHAR: char = '\u{2022}';

/// Caret style preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CursorStyle {
    Block,
    #[default]
    Bar,
    Underline,
}

impl CursorStyle {
    /// The glyph drawn for this style.
    pub const fn glyph(&self) -> char {
        match self {
            Self::Block => CARET_CHAR_BLOCK,
            Self::Bar => CARET_CHAR_BAR,
            Self::Underline => CARET_CHAR_UNDERLINE,
        }
    }
}

// =============================================================================
// Input Class
// =============================================================================

/// Characters a code may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InputClass {
    /// ASCII digits `0-9`.
    #[default]
    Numeric,
    /// ASCII letters.
    Alpha,
    /// ASCII letters and digits.
    Alphanumeric,
    /// Any non-control character.
    Text,
}

impl InputClass {
    /// Whether `ch` belongs to this class.
    pub fn accepts(&self, ch: char) -> bool {
        match self {
            Self::Numeric => ch.is_ascii_digit(),
            Self::Alpha => ch.is_ascii_alphabetic(),
            Self::Alphanumeric => ch.is_ascii_alphanumeric(),
            Self::Text => !ch.is_control(),
        }
    }

    /// Keyboard hint handed to the hidden editor.
    pub fn input_mode(&self) -> InputMode {
        match self {
            Self::Numeric => InputMode::Numeric,
            _ => InputMode::Text,
        }
    }
}

/// Virtual keyboard hint for the hidden editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Numeric,
    Text,
}

impl InputMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Text => "text",
        }
    }
}

// =============================================================================
// Platform / Autofill
// =============================================================================

/// Host platform, used only to choose the autofill hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Android,
    Ios,
    Other,
}

impl Platform {
    /// Platform the crate was compiled for.
    pub const fn current() -> Self {
        if cfg!(target_os = "android") {
            Self::Android
        } else if cfg!(target_os = "ios") {
            Self::Ios
        } else {
            Self::Other
        }
    }
}

/// Autofill hint that lets the platform offer a received one-time code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutofillHint {
    /// `"sms-otp"`, the SMS retriever hint.
    SmsOtp,
    /// `"one-time-code"`.
    OneTimeCode,
}

impl AutofillHint {
    pub const fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Android => Self::SmsOtp,
            _ => Self::OneTimeCode,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SmsOtp => "sms-otp",
            Self::OneTimeCode => "one-time-code",
        }
    }
}

/// Content type the hidden editor advertises (`textContentType`).
pub const ONE_TIME_CODE_CONTENT_TYPE: &str = "oneTimeCode";

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgba::from_hex("#a4d0a4"), Some(Rgba::FOCUS_GREEN));
        assert_eq!(Rgba::from_hex("A4D0A480"), Some(Rgba::new(0xA4, 0xD0, 0xA4, 0x80)));
        assert_eq!(Rgba::from_hex("#12"), None);
        assert_eq!(Rgba::from_hex("#zzzzzz"), None);
        assert_eq!(Rgba::from_rgb_int(0xA4D0A4), Rgba::FOCUS_GREEN);
    }

    #[test]
    fn test_input_class_accepts() {
        assert!(InputClass::Numeric.accepts('7'));
        assert!(!InputClass::Numeric.accepts('a'));
        assert!(!InputClass::Numeric.accepts('٣')); // non-ASCII digit
        assert!(InputClass::Alpha.accepts('Q'));
        assert!(!InputClass::Alpha.accepts('1'));
        assert!(InputClass::Alphanumeric.accepts('z'));
        assert!(InputClass::Alphanumeric.accepts('0'));
        assert!(!InputClass::Alphanumeric.accepts('-'));
        assert!(InputClass::Text.accepts('é'));
        assert!(!InputClass::Text.accepts('\n'));
    }

    #[test]
    fn test_input_mode_from_class() {
        assert_eq!(InputClass::Numeric.input_mode(), InputMode::Numeric);
        assert_eq!(InputClass::Text.input_mode(), InputMode::Text);
        assert_eq!(InputClass::Alphanumeric.input_mode().as_str(), "text");
    }

    #[test]
    fn test_autofill_hint_per_platform() {
        assert_eq!(AutofillHint::for_platform(Platform::Android).as_str(), "sms-otp");
        assert_eq!(AutofillHint::for_platform(Platform::Ios).as_str(), "one-time-code");
        assert_eq!(AutofillHint::for_platform(Platform::Other), AutofillHint::OneTimeCode);
    }

    #[test]
    fn test_cursor_glyphs() {
        assert_eq!(CursorStyle::default().glyph(), '│');
        assert_eq!(CursorStyle::Underline.glyph(), '_');
        assert_eq!(BorderStyle::Rounded.chars().2, "╭");
    }
}

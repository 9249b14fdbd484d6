//! Input Module - Terminal event conversion and polling
//!
//! Bridges crossterm's event system with the hidden editor's event model.
//! Terminal focus reporting maps onto editor focus/blur, bracketed paste onto
//! autofill-style whole-code pastes, and left clicks onto slot presses.
//!
//! # API
//!
//! - `convert_key_event` - Convert crossterm KeyEvent to our KeyboardEvent
//! - `convert_event` - Convert any crossterm Event to an InputEvent
//! - `poll_event` - Non-blocking event check with timeout
//! - `read_event` - Blocking event read
//! - `enable_reporting` / `disable_reporting` - Paste, focus and mouse capture
//!
//! # Example
//!
//! ```ignore
//! use otp_slots::state::input::{poll_event, InputEvent};
//! use std::time::Duration;
//!
//! loop {
//!     if let Ok(Some(InputEvent::Paste(text))) = poll_event(Duration::from_millis(16)) {
//!         otp.handle_text_change(&text);
//!     }
//! }
//! ```

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    poll, read, DisableBracketedPaste, DisableFocusChange, DisableMouseCapture,
    EnableBracketedPaste, EnableFocusChange, EnableMouseCapture, Event as CrosstermEvent,
    KeyCode, KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEventKind,
};
use crossterm::execute;

use super::keyboard::{KeyState, KeyboardEvent, Modifiers};

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Terminal events the widget cares about
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Keyboard event (key press, release, etc.)
    Key(KeyboardEvent),
    /// Bracketed paste: the whole pasted text at once
    Paste(String),
    /// Left button pressed at (column, row)
    Click(u16, u16),
    /// Terminal window gained focus
    FocusGained,
    /// Terminal window lost focus
    FocusLost,
    /// Terminal resize event (new width, height)
    Resize(u16, u16),
    /// No event or unhandled event type
    None,
}

// =============================================================================
// KEY EVENT CONVERSION
// =============================================================================

/// Convert crossterm KeyEvent to our KeyboardEvent
pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        _ => String::new(),
    };

    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key,
        modifiers: convert_modifiers(event.modifiers),
        state,
    }
}

/// Convert crossterm KeyModifiers to our Modifiers
fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER),
    }
}

// =============================================================================
// EVENT CONVERSION
// =============================================================================

/// Convert any crossterm event.
pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Key(key) => InputEvent::Key(convert_key_event(key)),
        CrosstermEvent::Paste(text) => InputEvent::Paste(text),
        CrosstermEvent::Mouse(mouse) => match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => InputEvent::Click(mouse.column, mouse.row),
            _ => InputEvent::None,
        },
        CrosstermEvent::FocusGained => InputEvent::FocusGained,
        CrosstermEvent::FocusLost => InputEvent::FocusLost,
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event()?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event() -> std::io::Result<InputEvent> {
    Ok(convert_event(read()?))
}

// =============================================================================
// TERMINAL REPORTING
// =============================================================================

/// Enable bracketed paste, focus change reporting and mouse capture.
pub fn enable_reporting() -> std::io::Result<()> {
    execute!(stdout(), EnableBracketedPaste, EnableFocusChange, EnableMouseCapture)
}

/// Undo [`enable_reporting`].
pub fn disable_reporting() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture, DisableFocusChange, DisableBracketedPaste)
}

// =============================================================================
// TESTS
// =============================================================================

//! Terminal Demo - A six-slot code prompt
//!
//! - Type digits, Backspace deletes, Escape clears
//! - Paste a code (bracketed paste) to fill several slots at once
//! - Click any slot to focus
//! - Ctrl+D toggles disabled, Ctrl+R fills in "123456"
//! - Enter or Ctrl+C quits
//!
//! Run with: cargo run --example terminal
//! Logs go to stderr when RUST_LOG is set, e.g. RUST_LOG=otp_slots=debug

use std::io::{stdout, Write};
use std::rc::Rc;
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use spark_signals::signal;
use tracing_subscriber::EnvFilter;

use otp_slots::state::input::{disable_reporting, enable_reporting, poll_event, InputEvent};
use otp_slots::{
    compute_slot_row, frame_for, otp_input, CellStyle, MemoryEditor, OtpConfig, OtpInputProps,
    Rgba, SlotRowConfig, SlotTheme, TerminalRenderer,
};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn main() -> otp_slots::Result<()> {
    init_tracing();

    let disabled = signal(false);
    let editor = Rc::new(MemoryEditor::new());

    let otp = otp_input(
        OtpInputProps {
            config: OtpConfig::with_digits(6),
            disabled: disabled.clone().into(),
            theme: SlotTheme {
                filled_container: Some(CellStyle { border_color: Some(Rgba::GRAY), ..Default::default() }),
                disabled_container: Some(CellStyle { border_color: Some(Rgba::DARK_GRAY), ..Default::default() }),
                ..Default::default()
            },
            on_filled: Some(Rc::new(|code: &str| tracing::info!(code, "code complete"))),
            ..Default::default()
        },
        editor.clone(),
    );
    let handle = otp.handle();

    let layout = compute_slot_row(&SlotRowConfig { origin: (2, 2), ..SlotRowConfig::new(6) })?;
    let mut renderer = TerminalRenderer::new();
    let mut out = stdout();

    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
    enable_reporting()?;
    execute!(out, MoveTo(2, 0), Print("Enter the 6-digit code"))?;

    let result = (|| -> otp_slots::Result<()> {
        loop {
            renderer.render(&mut out, frame_for(&otp, &layout))?;

            let Some(event) = poll_event(Duration::from_millis(30))? else {
                continue;
            };
            match event {
                InputEvent::Key(key) if key.is_press() && key.key == "Enter" => break,
                InputEvent::Key(key) if key.is_press() && key.modifiers.ctrl => match key.key.as_str() {
                    "c" => break,
                    "d" => {
                        disabled.update(|d| *d = !*d);
                    }
                    "r" => handle.set_value("123456"),
                    _ => {
                        if let Some(text) = editor.apply_key(&key) {
                            otp.handle_text_change(&text);
                        }
                    }
                },
                InputEvent::Key(key) => {
                    if let Some(text) = editor.apply_key(&key) {
                        otp.handle_text_change(&text);
                    }
                }
                InputEvent::Paste(text) => {
                    if let Some(text) = editor.apply_paste(&text) {
                        otp.handle_text_change(&text);
                    }
                }
                InputEvent::Click(x, y) => {
                    if let Some(index) = layout.hit_test(x, y) {
                        otp.handle_press(index);
                    }
                }
                InputEvent::FocusGained => otp.handle_focus(),
                InputEvent::FocusLost => otp.handle_blur(),
                InputEvent::Resize(..) => {
                    execute!(out, Clear(ClearType::All), MoveTo(2, 0), Print("Enter the 6-digit code"))?;
                    renderer.invalidate();
                }
                InputEvent::None => {}
            }
        }
        Ok(())
    })();

    disable_reporting()?;
    execute!(out, Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    out.flush()?;

    result?;
    println!("code: {}", otp.value());
    otp.unmount();
    Ok(())
}

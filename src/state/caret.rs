//! Caret Blink Controller - Blinking caret for the focused empty slot
//!
//! The caret is drawn by the presentation layer; this module only owns its
//! timing. A controller is either active (subscribed to a shared blink clock
//! from [`animate`](super::animate)) or inactive (no subscription, caret not
//! shown).
//!
//! # Pattern
//!
//! The owner computes `active = focused && !disabled && !hide_caret` and calls
//! [`CaretBlinkController::sync`] whenever any input changes:
//! - Becoming active subscribes and records the clock's tick, so the caret
//!   always starts visible even on a clock that is already running
//! - Joining a clock mid-interval, its first tick lands inside the caret's
//!   first period and is skipped, so the first visible period is never
//!   shorter than one interval
//! - Becoming inactive unsubscribes, which stops the clock if nobody else uses it
//!
//! Visibility is evaluated on read:
//! 1. Inactive - hidden
//! 2. Manual override (show/hide) - wins while active
//! 3. Blink disabled - visible
//! 4. Otherwise the blink phase since activation
//!
//! # Example
//!
//! ```ignore
//! use otp_slots::state::caret::{CaretBlinkController, CaretConfig};
//!
//! let caret = CaretBlinkController::new(CaretConfig::default());
//! caret.sync(true);
//! assert!(caret.is_visible());
//!
//! caret.sync(false);
//! caret.dispose();
//! ```

use std::cell::{Cell, RefCell};

use spark_signals::{signal, Signal};
use tracing::trace;

use crate::state::animate;
use crate::types::CursorStyle;

/// Default time between visibility flips.
pub const DEFAULT_BLINK_INTERVAL_MS: u64 = 350;

// =============================================================================
// CONFIGURATION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaretConfig {
    /// Caret style preset (default: Bar)
    pub style: CursorStyle,
    /// Custom caret character (overrides style if Some)
    pub char: Option<char>,
    /// Enable blinking (default: true)
    pub blink: bool,
    /// Milliseconds between visibility flips (default: 350)
    pub interval_ms: u64,
}

impl Default for CaretConfig {
    fn default() -> Self {
        Self {
            style: CursorStyle::Bar,
            char: None,
            blink: true,
            interval_ms: DEFAULT_BLINK_INTERVAL_MS,
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct CaretBlinkController {
    config: CaretConfig,
    active: Cell<bool>,
    disposed: Cell<bool>,
    /// Clock tick at activation; phase is counted from here
    start_tick: Cell<u64>,
    /// Ticks ignored after activation (1 when joining a running clock)
    skip_ticks: Cell<u64>,
    /// Some while subscribed to the blink clock
    unsubscribe_blink: RefCell<Option<Box<dyn FnOnce()>>>,
    /// None = blink controlled, Some(v) = pinned
    manual_visible: Signal<Option<bool>>,
}

impl CaretBlinkController {
    pub fn new(config: CaretConfig) -> Self {
        Self {
            config,
            active: Cell::new(false),
            disposed: Cell::new(false),
            start_tick: Cell::new(0),
            skip_ticks: Cell::new(0),
            unsubscribe_blink: RefCell::new(None),
            manual_visible: signal(None),
        }
    }

    fn blinks(&self) -> bool {
        self.config.blink && self.config.interval_ms > 0
    }

    /// Move to the active or inactive state. Returns true on a transition.
    ///
    /// Does nothing once disposed.
    pub fn sync(&self, active: bool) -> bool {
        if self.disposed.get() || self.active.get() == active {
            return false;
        }

        if active {
            if self.blinks() {
                let interval_ms = self.config.interval_ms;
                let unsub = animate::subscribe_to_blink(interval_ms);
                let joined_running = animate::get_subscriber_count(interval_ms) > 1;
                self.start_tick.set(animate::get_blink_ticks(interval_ms));
                self.skip_ticks.set(u64::from(joined_running));
                *self.unsubscribe_blink.borrow_mut() = Some(unsub);
            }
            self.active.set(true);
            trace!(interval_ms = self.config.interval_ms, "caret started");
        } else {
            self.release();
            trace!("caret stopped");
        }
        true
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// True while this controller holds a blink clock subscription.
    pub fn is_blinking(&self) -> bool {
        self.unsubscribe_blink.borrow().is_some()
    }

    /// Check if the caret should be drawn right now.
    pub fn is_visible(&self) -> bool {
        if !self.active.get() {
            return false;
        }
        if let Some(manual) = self.manual_visible.get() {
            return manual;
        }
        if !self.blinks() {
            return true;
        }
        let elapsed = animate::get_blink_ticks(self.config.interval_ms).wrapping_sub(self.start_tick.get());
        elapsed.saturating_sub(self.skip_ticks.get()) % 2 == 0
    }

    /// Glyph to draw.
    pub fn glyph(&self) -> char {
        self.config.char.unwrap_or_else(|| self.config.style.glyph())
    }

    pub fn config(&self) -> &CaretConfig {
        &self.config
    }

    /// Manually show caret (override blink).
    pub fn show(&self) {
        self.manual_visible.set(Some(true));
    }

    /// Manually hide caret (override blink).
    pub fn hide(&self) {
        self.manual_visible.set(Some(false));
    }

    /// Clear manual override, return to blink-controlled visibility.
    pub fn clear_override(&self) {
        self.manual_visible.set(None);
    }

    /// Release the timer and refuse further activation.
    ///
    /// This is idempotent - safe to call multiple times.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.release();
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    fn release(&self) {
        let unsub = self.unsubscribe_blink.borrow_mut().take();
        if let Some(unsub) = unsub {
            unsub();
        }
        self.active.set(false);
    }
}

impl Drop for CaretBlinkController {
    fn drop(&mut self) {
        self.dispose();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    fn setup() {
        animate::reset_blink_clocks();
    }

    fn fast() -> CaretConfig {
        CaretConfig { interval_ms: 15, ..Default::default() }
    }

    #[test]
    fn test_inactive_caret_is_hidden() {
        setup();
        let caret = CaretBlinkController::new(CaretConfig::default());
        assert!(!caret.is_active());
        assert!(!caret.is_visible());
        assert!(!caret.is_blinking());
    }

    #[test]
    fn test_activation_starts_visible_and_subscribes() {
        setup();
        let caret = CaretBlinkController::new(CaretConfig::default());

        assert!(caret.sync(true));
        assert!(caret.is_visible());
        assert!(caret.is_blinking());
        assert_eq!(animate::get_subscriber_count(DEFAULT_BLINK_INTERVAL_MS), 1);

        // Repeated sync is not a transition
        assert!(!caret.sync(true));
        assert_eq!(animate::get_subscriber_count(DEFAULT_BLINK_INTERVAL_MS), 1);
    }

    #[test]
    fn test_deactivation_releases_clock() {
        setup();
        let caret = CaretBlinkController::new(CaretConfig::default());
        caret.sync(true);

        assert!(caret.sync(false));
        assert!(!caret.is_visible());
        assert!(!animate::is_blink_running(DEFAULT_BLINK_INTERVAL_MS));
    }

    #[test]
    fn test_caret_toggles_while_active() {
        setup();
        let caret = CaretBlinkController::new(fast());
        caret.sync(true);

        let mut saw_hidden = false;
        for _ in 0..40 {
            thread::sleep(Duration::from_millis(5));
            if !caret.is_visible() {
                saw_hidden = true;
                break;
            }
        }
        assert!(saw_hidden, "caret should blink off at some point");
    }

    #[test]
    fn test_reactivation_on_shared_clock_starts_visible() {
        setup();
        let other = CaretBlinkController::new(fast());
        other.sync(true);
        thread::sleep(Duration::from_millis(50));

        let caret = CaretBlinkController::new(fast());
        caret.sync(true);
        assert!(caret.is_visible());
    }

    #[test]
    fn test_joining_running_clock_keeps_full_first_period() {
        setup();
        let slow = CaretConfig { interval_ms: 50, ..Default::default() };
        let first = CaretBlinkController::new(slow.clone());
        first.sync(true);

        // Ticks land around 50ms and 100ms; join halfway through the second interval
        thread::sleep(Duration::from_millis(75));
        let late = CaretBlinkController::new(slow);
        late.sync(true);

        // Past the 100ms tick but well inside the late caret's first interval
        thread::sleep(Duration::from_millis(40));
        assert_eq!(animate::get_blink_ticks(50), 2);
        assert!(late.is_visible());
        assert!(first.is_visible());
    }

    #[test]
    fn test_no_blink_config_is_steady() {
        setup();
        let caret = CaretBlinkController::new(CaretConfig { blink: false, ..fast() });
        caret.sync(true);
        assert!(!caret.is_blinking());
        thread::sleep(Duration::from_millis(40));
        assert!(caret.is_visible());
        assert_eq!(animate::running_clock_count(), 0);
    }

    #[test]
    fn test_manual_override() {
        setup();
        let caret = CaretBlinkController::new(CaretConfig::default());
        caret.sync(true);

        caret.hide();
        assert!(!caret.is_visible());
        caret.show();
        assert!(caret.is_visible());
        caret.clear_override();
        assert!(caret.is_visible());

        // Override never shows an inactive caret
        caret.show();
        caret.sync(false);
        assert!(!caret.is_visible());
    }

    #[test]
    fn test_dispose_is_idempotent_and_final() {
        setup();
        let caret = CaretBlinkController::new(CaretConfig::default());
        caret.sync(true);

        caret.dispose();
        caret.dispose();
        assert!(caret.is_disposed());
        assert!(!caret.is_visible());
        assert!(!caret.sync(true));
        assert_eq!(animate::running_clock_count(), 0);
    }

    #[test]
    fn test_drop_releases_clock() {
        setup();
        {
            let caret = CaretBlinkController::new(CaretConfig::default());
            caret.sync(true);
            assert_eq!(animate::running_clock_count(), 1);
        }
        assert_eq!(animate::running_clock_count(), 0);
    }

    #[test]
    fn test_glyph() {
        let caret = CaretBlinkController::new(CaretConfig::default());
        assert_eq!(caret.glyph(), '│');
        let custom = CaretBlinkController::new(CaretConfig { char: Some('▏'), ..Default::default() });
        assert_eq!(custom.glyph(), '▏');
    }
}

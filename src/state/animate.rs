//! Blink Clocks - Shared caret timers per interval
//!
//! Every caret blinking at the same interval shares one background clock, so
//! carets stay in step and only one thread runs per interval.
//!
//! # Pattern
//!
//! - A clock starts with its first subscriber
//! - Each interval the clock bumps a tick counter; odd/even is the phase
//! - When the last subscriber leaves the clock thread is stopped AND joined,
//!   so no tick can land after the unsubscribe returns
//!
//! # Example
//!
//! ```ignore
//! use otp_slots::state::animate::{subscribe_to_blink, get_blink_ticks};
//!
//! let unsubscribe = subscribe_to_blink(350);
//! let start = get_blink_ticks(350);
//!
//! // ... later
//! let visible = (get_blink_ticks(350) - start) % 2 == 0;
//!
//! unsubscribe();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

// =============================================================================
// BLINK CLOCK REGISTRY
// =============================================================================

/// One shared timer.
struct BlinkClock {
    /// Identity of this clock instance, so stale unsubscribes are ignored
    generation: u64,
    /// Flips counted since the clock started
    ticks: Arc<AtomicU64>,
    /// Dropping or sending on this stops the thread
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
    subscribers: usize,
}

impl BlinkClock {
    fn start(interval_ms: u64, generation: u64) -> Self {
        let ticks = Arc::new(AtomicU64::new(0));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let interval = Duration::from_millis(interval_ms);
        let thread_ticks = ticks.clone();

        let handle = thread::Builder::new()
            .name(format!("otp-blink-{interval_ms}ms"))
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        thread_ticks.fetch_add(1, Ordering::SeqCst);
                    }
                    // Stop requested or sender dropped
                    _ => break,
                }
            });

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                // The caret just stays solid
                warn!(%err, interval_ms, "could not spawn blink clock");
                None
            }
        };

        debug!(interval_ms, "blink clock started");
        Self {
            generation,
            ticks,
            stop: Some(stop_tx),
            handle,
            subscribers: 0,
        }
    }

    fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

thread_local! {
    /// Map from interval (ms) to its clock
    static BLINK_CLOCKS: RefCell<HashMap<u64, BlinkClock>> = RefCell::new(HashMap::new());
    static NEXT_GENERATION: Cell<u64> = const { Cell::new(0) };
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to the blink clock for `interval_ms`.
///
/// Returns an unsubscribe function that must be called when done. An
/// interval of 0 disables blinking and returns a no-op.
pub fn subscribe_to_blink(interval_ms: u64) -> Box<dyn FnOnce()> {
    if interval_ms == 0 {
        return Box::new(|| {});
    }

    let generation = BLINK_CLOCKS.with(|clocks| {
        let mut clocks = clocks.borrow_mut();
        let clock = clocks.entry(interval_ms).or_insert_with(|| {
            let generation = NEXT_GENERATION.with(|g| {
                let next = g.get();
                g.set(next + 1);
                next
            });
            BlinkClock::start(interval_ms, generation)
        });
        clock.subscribers += 1;
        clock.generation
    });

    Box::new(move || unsubscribe(interval_ms, generation))
}

fn unsubscribe(interval_ms: u64, generation: u64) {
    let finished = BLINK_CLOCKS.with(|clocks| {
        let mut clocks = clocks.borrow_mut();
        let last = match clocks.get_mut(&interval_ms) {
            Some(clock) if clock.generation == generation => {
                clock.subscribers = clock.subscribers.saturating_sub(1);
                clock.subscribers == 0
            }
            _ => false,
        };
        if last { clocks.remove(&interval_ms) } else { None }
    });

    // Joined outside the registry borrow
    if let Some(clock) = finished {
        clock.stop();
        debug!(interval_ms, "blink clock stopped");
    }
}

/// Ticks counted by the clock for `interval_ms` (0 if none is running).
pub fn get_blink_ticks(interval_ms: u64) -> u64 {
    BLINK_CLOCKS.with(|clocks| {
        clocks
            .borrow()
            .get(&interval_ms)
            .map(|c| c.ticks.load(Ordering::SeqCst))
            .unwrap_or(0)
    })
}

/// Phase of the clock: true on even ticks. True if no clock exists.
pub fn get_blink_phase(interval_ms: u64) -> bool {
    get_blink_ticks(interval_ms) % 2 == 0
}

/// Check if a blink clock is currently running for the given interval.
pub fn is_blink_running(interval_ms: u64) -> bool {
    BLINK_CLOCKS.with(|clocks| {
        clocks
            .borrow()
            .get(&interval_ms)
            .map(|c| c.subscribers > 0 && c.handle.is_some())
            .unwrap_or(false)
    })
}

/// Get the number of subscribers for a given interval.
pub fn get_subscriber_count(interval_ms: u64) -> usize {
    BLINK_CLOCKS.with(|clocks| {
        clocks.borrow().get(&interval_ms).map(|c| c.subscribers).unwrap_or(0)
    })
}

/// Number of clocks alive on this thread.
pub fn running_clock_count() -> usize {
    BLINK_CLOCKS.with(|clocks| clocks.borrow().len())
}

/// Stop every clock and clear the registry (for testing).
///
/// Unsubscribe closures handed out before the reset become no-ops.
pub fn reset_blink_clocks() {
    let drained: Vec<BlinkClock> = BLINK_CLOCKS.with(|clocks| {
        clocks.borrow_mut().drain().map(|(_, clock)| clock).collect()
    });
    for clock in drained {
        clock.stop();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() {
        reset_blink_clocks();
    }

    #[test]
    fn test_subscribe_returns_unsubscribe() {
        setup();

        let unsubscribe = subscribe_to_blink(500);
        assert_eq!(get_subscriber_count(500), 1);
        assert!(is_blink_running(500));

        unsubscribe();
        assert_eq!(get_subscriber_count(500), 0);
        assert!(!is_blink_running(500));
    }

    #[test]
    fn test_shared_clock_same_interval() {
        setup();

        let unsub1 = subscribe_to_blink(500);
        let unsub2 = subscribe_to_blink(500);
        assert_eq!(get_subscriber_count(500), 2);
        assert_eq!(running_clock_count(), 1);

        unsub1();
        assert_eq!(get_subscriber_count(500), 1);
        assert!(is_blink_running(500));

        unsub2();
        assert_eq!(running_clock_count(), 0);
    }

    #[test]
    fn test_different_intervals_separate_clocks() {
        setup();

        let unsub1 = subscribe_to_blink(500);
        let unsub2 = subscribe_to_blink(250);
        assert_eq!(running_clock_count(), 2);

        unsub1();
        unsub2();
    }

    #[test]
    fn test_ticks_advance() {
        setup();

        let unsub = subscribe_to_blink(10);
        assert!(get_blink_phase(10));

        thread::sleep(Duration::from_millis(80));
        assert!(get_blink_ticks(10) >= 1);

        unsub();
    }

    #[test]
    fn test_no_ticks_after_last_unsubscribe() {
        setup();

        let unsub = subscribe_to_blink(10);
        thread::sleep(Duration::from_millis(30));
        unsub();

        assert_eq!(get_blink_ticks(10), 0);
        thread::sleep(Duration::from_millis(40));
        assert_eq!(get_blink_ticks(10), 0);
        assert_eq!(running_clock_count(), 0);
    }

    #[test]
    fn test_resubscribe_restarts_clock() {
        setup();

        let unsub1 = subscribe_to_blink(500);
        unsub1();
        assert!(!is_blink_running(500));

        let unsub2 = subscribe_to_blink(500);
        assert!(is_blink_running(500));
        unsub2();
    }

    #[test]
    fn test_stale_unsubscribe_after_reset_is_ignored() {
        setup();

        let stale = subscribe_to_blink(500);
        reset_blink_clocks();

        let fresh = subscribe_to_blink(500);
        stale();
        assert_eq!(get_subscriber_count(500), 1);

        fresh();
        assert_eq!(get_subscriber_count(500), 0);
    }

    #[test]
    fn test_zero_interval_noop() {
        setup();

        let unsub = subscribe_to_blink(0);
        assert_eq!(running_clock_count(), 0);
        assert!(get_blink_phase(0));
        unsub();
    }
}

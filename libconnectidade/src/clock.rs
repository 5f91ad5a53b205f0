//! Time source and cancelable scheduled tasks
//!
//! Everything time-based in the app (toast expiry, debounced settings
//! writes, simulated dialing and replies) is a [`Timer`] polled against a
//! [`Clock`]. Production code uses [`SystemClock`]; tests drive a
//! [`ManualClock`] forward explicitly, so no test ever sleeps.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Monotonic millisecond clock
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Milliseconds elapsed since the clock was created
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle while the
/// navigator owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// A single pending task carrying `T`
///
/// Scheduling while a task is pending replaces it: the earlier payload is
/// returned to the caller and will never fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer<T> {
    pending: Option<(u64, T)>,
}

impl<T> Default for Timer<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Timer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64, payload: T) -> Option<T> {
        let due = now_ms.saturating_add(delay_ms);
        self.pending.replace((due, payload)).map(|(_, old)| old)
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, payload)| payload)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due_at(&self) -> Option<u64> {
        self.pending.as_ref().map(|(due, _)| *due)
    }

    pub fn payload(&self) -> Option<&T> {
        self.pending.as_ref().map(|(_, payload)| payload)
    }

    /// Take the payload if its deadline has passed
    pub fn fire(&mut self, now_ms: u64) -> Option<T> {
        if self.due_at().is_some_and(|due| due <= now_ms) {
            self.cancel()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        handle.advance(250);
        assert_eq!(clock.now_ms(), 250);
        clock.set(1000);
        assert_eq!(handle.now_ms(), 1000);
    }

    #[test]
    fn test_timer_fires_once_at_deadline() {
        let mut timer = Timer::new();
        timer.schedule(100, 50, "expire");

        assert_eq!(timer.fire(149), None);
        assert_eq!(timer.fire(150), Some("expire"));
        assert_eq!(timer.fire(500), None);
        assert!(!timer.is_pending());
    }

    #[test]
    fn test_reschedule_replaces_pending_task() {
        let mut timer = Timer::new();
        assert_eq!(timer.schedule(0, 1000, 1), None);
        assert_eq!(timer.schedule(400, 1000, 2), Some(1));

        assert_eq!(timer.fire(1000), None);
        assert_eq!(timer.due_at(), Some(1400));
        assert_eq!(timer.fire(1400), Some(2));
    }

    #[test]
    fn test_cancel() {
        let mut timer = Timer::new();
        timer.schedule(0, 10, ());
        assert_eq!(timer.cancel(), Some(()));
        assert_eq!(timer.fire(100), None);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}

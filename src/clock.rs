//! Clocks
//!
//! Wall-clock time is injected into the session so that lifecycle and quota
//! decisions can be driven deterministically in tests.

use std::{cell::Cell, rc::Rc};

use jiff::{SignedDuration, Timestamp};

/// A source of wall-clock time.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Timestamp;
}

/// Production clock backed by the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A manually driven clock.
///
/// Clones share the same underlying instant, so a test can keep one handle
/// and advance time while a session owns the other.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualClock {
    /// Creates a clock frozen at the given instant.
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    /// Moves the clock to the given instant.
    pub fn set(&self, to: Timestamp) {
        self.now.set(to);
    }

    /// Advances the clock by the given duration, saturating at the
    /// representable bounds.
    pub fn advance(&self, by: SignedDuration) {
        let now = self.now.get();
        self.now.set(now.saturating_add(by).unwrap_or(now));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Timestamp::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

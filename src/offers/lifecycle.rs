//! Offer Lifecycle
//!
//! The pure transition function that advances an offer's status against
//! wall-clock time, and the cooperative tick gate that paces whole-store
//! sweeps.
//!
//! Evaluation is polled, not event-driven: a status becomes visible up to
//! one tick interval after the boundary instant it reflects. An offer whose
//! whole window elapsed between evaluations jumps straight from `Scheduled`
//! to `Expired`.

use jiff::{SignedDuration, Timestamp};

use crate::offers::OfferStatus;

/// Default cadence of lifecycle sweeps.
pub const TICK_INTERVAL: SignedDuration = SignedDuration::from_secs(60);

/// Advances a status against the offer's window and the current instant.
///
/// Terminal statuses are returned unchanged; cancellation happens only
/// through the explicit cancel command, never here.
#[must_use]
pub fn evaluate(
    status: OfferStatus,
    starts_at: Timestamp,
    ends_at: Timestamp,
    now: Timestamp,
) -> OfferStatus {
    match status {
        OfferStatus::Scheduled if now >= ends_at => OfferStatus::Expired,
        OfferStatus::Scheduled if now >= starts_at => OfferStatus::Active,
        OfferStatus::Active if now >= ends_at => OfferStatus::Expired,
        unchanged => unchanged,
    }
}

/// Fixed-interval gate for cooperative polling.
///
/// The owning session calls [`Ticker::poll`] from the host's event loop; the
/// ticker reports whether a sweep is due and re-arms itself past `now`, so a
/// delayed poll triggers a single catch-up sweep rather than one per missed
/// interval. Teardown is plain ownership: dropping the session drops the
/// ticker and nothing can fire afterwards.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: SignedDuration,
    next_due: Timestamp,
}

impl Ticker {
    /// Creates a ticker that first fires one `interval` after `now`.
    ///
    /// Non-positive intervals fall back to [`TICK_INTERVAL`].
    #[must_use]
    pub fn new(interval: SignedDuration, now: Timestamp) -> Self {
        let interval = if interval.is_positive() {
            interval
        } else {
            TICK_INTERVAL
        };

        Self {
            interval,
            next_due: now.saturating_add(interval).unwrap_or(now),
        }
    }

    /// Creates a ticker with the default cadence.
    #[must_use]
    pub fn every_minute(now: Timestamp) -> Self {
        Self::new(TICK_INTERVAL, now)
    }

    /// The instant of the next due sweep.
    #[must_use]
    pub const fn next_due(&self) -> Timestamp {
        self.next_due
    }

    /// Reports whether a sweep is due at `now` and re-arms past it.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        if now < self.next_due {
            return false;
        }

        while self.next_due <= now {
            let bumped = self
                .next_due
                .saturating_add(self.interval)
                .unwrap_or(self.next_due);

            if bumped == self.next_due {
                break;
            }

            self.next_due = bumped;
        }

        true
    }
}

//! Store Session
//!
//! One session per store, owning the offer collection, the plan limits, the
//! clock and the tick gate. Sessions are never shared across stores; offers
//! live only as long as the session. Dropping the session deterministically
//! tears the ticker down with it.

use jiff::{SignedDuration, tz::TimeZone};
use tracing::{debug, info};

use crate::{
    clock::{Clock, SystemClock},
    offers::{
        CreateOfferError, DiscountKind, FlashOffer, OfferDraft, OfferKey, OfferStatus,
        RedemptionError,
        lifecycle::Ticker,
        quota::{self, QuotaView},
        store::OfferStore,
    },
    plans::PlanLimits,
};

/// Delay before a non-immediate offer starts.
pub const SCHEDULE_LEAD: SignedDuration = SignedDuration::from_mins(5);

/// A store's flash-offer session.
#[derive(Debug)]
pub struct StoreSession<C: Clock = SystemClock> {
    plan: PlanLimits,
    store: OfferStore,
    clock: C,
    time_zone: TimeZone,
    ticker: Ticker,
}

impl StoreSession<SystemClock> {
    /// Opens a session on the system clock, with quota months taken in the
    /// system time zone.
    #[must_use]
    pub fn new(plan: PlanLimits) -> Self {
        Self::with_clock(plan, SystemClock).in_time_zone(TimeZone::system())
    }
}

impl<C: Clock> StoreSession<C> {
    /// Opens a session on the given clock, with quota months taken in UTC.
    #[must_use]
    pub fn with_clock(plan: PlanLimits, clock: C) -> Self {
        let now = clock.now();

        Self {
            plan,
            store: OfferStore::new(),
            clock,
            time_zone: TimeZone::UTC,
            ticker: Ticker::every_minute(now),
        }
    }

    /// Sets the time zone used for calendar-month quota bucketing.
    #[must_use]
    pub fn in_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// The plan limits this session enforces.
    #[must_use]
    pub const fn plan(&self) -> &PlanLimits {
        &self.plan
    }

    /// Validates a draft and, if the plan permits, records the offer.
    ///
    /// Immediate offers start now and are created `Active`; otherwise the
    /// offer starts after [`SCHEDULE_LEAD`] and is created `Scheduled`. The
    /// offer runs for the draft's duration from its start. On rejection
    /// nothing is recorded.
    ///
    /// # Errors
    ///
    /// Returns a [`CreateOfferError`] describing the failed validation or
    /// policy check; these are expected business outcomes for the caller to
    /// present, not faults.
    pub fn create_flash_offer(
        &mut self,
        draft: OfferDraft,
    ) -> Result<OfferKey, CreateOfferError> {
        let now = self.clock.now();

        // Policy first: a store over quota sees the quota message even if
        // the draft is also malformed.
        quota::authorize(
            &self.plan,
            self.store.history(),
            now,
            &self.time_zone,
            draft.radius_km,
        )
        .inspect_err(|rejection| {
            debug!(%rejection, title = %draft.title, "flash offer rejected");
        })?;

        validate(&draft)?;

        let starts_at = if draft.start_immediately {
            now
        } else {
            now.checked_add(SCHEDULE_LEAD)?
        };

        let ends_at = starts_at.checked_add(SignedDuration::from_hours(i64::from(
            draft.duration_hours,
        )))?;

        let status = if draft.start_immediately {
            OfferStatus::Active
        } else {
            OfferStatus::Scheduled
        };

        let offer = FlashOffer::from_draft(draft, starts_at, ends_at, now, status);
        let key = self.store.insert(offer);

        info!(offer = ?key, status = status.as_str(), "flash offer created");

        Ok(key)
    }

    /// Cancels a scheduled or active offer.
    ///
    /// Cancelling a terminal or unknown offer silently does nothing, so the
    /// command is idempotent.
    pub fn cancel_flash_offer(&mut self, key: OfferKey) {
        if self.store.cancel(key) {
            info!(offer = ?key, "flash offer cancelled");
        } else {
            debug!(offer = ?key, "cancel ignored; offer unknown or terminal");
        }
    }

    /// Runs a lifecycle sweep at the clock's current instant, regardless of
    /// the tick cadence. Returns the number of transitions.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();

        self.store.sweep(now)
    }

    /// Runs a lifecycle sweep only if the tick interval has elapsed.
    ///
    /// Intended to be called from the host's event loop; between polls a
    /// status may lag its boundary by up to one interval.
    pub fn poll(&mut self) -> usize {
        let now = self.clock.now();

        if self.ticker.poll(now) {
            self.store.sweep(now)
        } else {
            0
        }
    }

    /// The derived quota view, recomputed from the plan and the collection.
    #[must_use]
    pub fn quota(&self) -> QuotaView {
        quota::view(
            &self.plan,
            self.store.history(),
            self.clock.now(),
            &self.time_zone,
        )
    }

    /// All offers, most recently created first.
    pub fn offers(&self) -> impl Iterator<Item = &FlashOffer> {
        self.store.history()
    }

    /// Currently active offers.
    pub fn active_offers(&self) -> impl Iterator<Item = &FlashOffer> {
        self.store.active()
    }

    /// Offers shoppers should see: active and not exhausted.
    pub fn discoverable_offers(&self) -> impl Iterator<Item = &FlashOffer> {
        self.store.discoverable()
    }

    /// Looks up one offer.
    #[must_use]
    pub fn offer(&self, key: OfferKey) -> Option<&FlashOffer> {
        self.store.get(key)
    }

    /// Records a redemption against an offer and returns the new count.
    ///
    /// # Errors
    ///
    /// Returns [`RedemptionError::UnknownOffer`] for keys this session never
    /// issued, [`RedemptionError::NotRedeemable`] for non-active offers and
    /// [`RedemptionError::Exhausted`] once the cap is reached.
    pub fn record_redemption(&mut self, key: OfferKey) -> Result<u32, RedemptionError> {
        let offer = self
            .store
            .get_mut(key)
            .ok_or(RedemptionError::UnknownOffer)?;

        offer.record_redemption()
    }

    /// Records a notification sent for an offer by the external side-channel.
    ///
    /// Returns the new count, or `None` for an unknown offer.
    pub fn record_notification(&mut self, key: OfferKey) -> Option<u32> {
        self.store.get_mut(key).map(FlashOffer::record_notification)
    }
}

/// Structural draft checks, applied before any policy decision.
fn validate(draft: &OfferDraft) -> Result<(), CreateOfferError> {
    if draft.products.is_empty() {
        return Err(CreateOfferError::NoProducts);
    }

    if draft.title.trim().is_empty() {
        return Err(CreateOfferError::EmptyTitle);
    }

    if draft.duration_hours == 0 {
        return Err(CreateOfferError::ZeroDuration);
    }

    if draft.radius_km == 0 {
        return Err(CreateOfferError::ZeroRadius);
    }

    if draft.max_redemptions == Some(0) {
        return Err(CreateOfferError::ZeroRedemptionCap);
    }

    match &draft.discount {
        DiscountKind::Percentage(percent) => {
            if percent.is_sign_negative()
                || percent.is_zero()
                || *percent > rust_decimal::Decimal::ONE_HUNDRED
            {
                return Err(CreateOfferError::InvalidPercentage(*percent));
            }
        }
        DiscountKind::FixedAmount(amount) => {
            if amount.to_minor_units() <= 0 {
                return Err(CreateOfferError::NonPositiveDiscount);
            }
        }
    }

    Ok(())
}

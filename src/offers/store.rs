//! Offer Store
//!
//! The session-scoped collection of offers. Most-recent-created-first
//! ordering is an observable contract for history display, and offers are
//! never deleted: terminal offers stay in the collection.

use std::collections::VecDeque;

use jiff::Timestamp;
use slotmap::SlotMap;
use tracing::debug;

use crate::offers::{FlashOffer, OfferKey, OfferStatus, lifecycle};

/// Ordered, in-memory collection of one store's offers.
#[derive(Debug, Clone, Default)]
pub struct OfferStore {
    offers: SlotMap<OfferKey, FlashOffer>,
    // Keys, most recently created first.
    order: VecDeque<OfferKey>,
}

impl OfferStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of offers ever created in this session.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offers.len()
    }

    /// Whether the store holds no offers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Looks up an offer by key.
    #[must_use]
    pub fn get(&self, key: OfferKey) -> Option<&FlashOffer> {
        self.offers.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: OfferKey) -> Option<&mut FlashOffer> {
        self.offers.get_mut(key)
    }

    /// Appends a new offer at the front of the history.
    pub(crate) fn insert(&mut self, offer: FlashOffer) -> OfferKey {
        let key = self.offers.insert(offer);

        self.order.push_front(key);

        key
    }

    /// All offers, most recently created first. Re-queryable at any time.
    pub fn history(&self) -> impl Iterator<Item = &FlashOffer> {
        self.order.iter().filter_map(|key| self.offers.get(*key))
    }

    /// Offer keys in history order, most recently created first.
    pub fn keys(&self) -> impl Iterator<Item = OfferKey> + '_ {
        self.order.iter().copied()
    }

    /// Currently active offers, in history order.
    pub fn active(&self) -> impl Iterator<Item = &FlashOffer> {
        self.history()
            .filter(|offer| offer.status() == OfferStatus::Active)
    }

    /// Offers shoppers should see: active and not at their redemption cap.
    pub fn discoverable(&self) -> impl Iterator<Item = &FlashOffer> {
        self.history().filter(|offer| offer.is_discoverable())
    }

    /// Moves a scheduled or active offer to `Cancelled`.
    ///
    /// Returns whether the status changed; cancelling a terminal or unknown
    /// offer is a silent no-op, so the operation is idempotent.
    pub(crate) fn cancel(&mut self, key: OfferKey) -> bool {
        if let Some(offer) = self.offers.get_mut(key)
            && !offer.status().is_terminal()
        {
            offer.set_status(OfferStatus::Cancelled);
            return true;
        }

        false
    }

    /// Re-evaluates every non-terminal offer against `now`.
    ///
    /// Returns the number of offers whose status changed.
    pub fn sweep(&mut self, now: Timestamp) -> usize {
        let mut transitions = 0;

        for (key, offer) in &mut self.offers {
            let before = offer.status();

            if before.is_terminal() {
                continue;
            }

            let after = lifecycle::evaluate(before, offer.starts_at, offer.ends_at, now);

            if after != before {
                offer.set_status(after);
                transitions += 1;

                debug!(
                    offer = ?key,
                    from = before.as_str(),
                    to = after.as_str(),
                    "offer lifecycle transition"
                );
            }
        }

        transitions
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        offers::{DiscountKind, OfferDraft, OfferStatus},
        products::ProductKey,
    };

    use super::*;

    fn draft(title: &str) -> OfferDraft {
        OfferDraft::new(
            title,
            [ProductKey::default()],
            DiscountKind::Percentage(Decimal::from(10u32)),
            2,
            5,
        )
    }

    fn offer(title: &str, starts_at: &str, hours: i64, status: OfferStatus) -> TestResult<FlashOffer> {
        let starts_at: Timestamp = starts_at.parse()?;
        let ends_at = starts_at.saturating_add(SignedDuration::from_hours(hours))?;

        Ok(FlashOffer::from_draft(
            draft(title),
            starts_at,
            ends_at,
            starts_at,
            status,
        ))
    }

    #[test]
    fn newest_offers_come_first() -> TestResult {
        let mut store = OfferStore::new();

        store.insert(offer("first", "2026-03-01T10:00:00Z", 2, OfferStatus::Active)?);
        store.insert(offer("second", "2026-03-01T11:00:00Z", 2, OfferStatus::Active)?);
        store.insert(offer("third", "2026-03-01T12:00:00Z", 2, OfferStatus::Active)?);

        let titles: Vec<&str> = store.history().map(|o| o.title.as_str()).collect();

        assert_eq!(titles, ["third", "second", "first"]);

        Ok(())
    }

    #[test]
    fn sweep_advances_due_offers_and_counts_transitions() -> TestResult {
        let mut store = OfferStore::new();

        let due = store.insert(offer(
            "due",
            "2026-03-01T10:00:00Z",
            2,
            OfferStatus::Scheduled,
        )?);

        let pending = store.insert(offer(
            "pending",
            "2026-03-01T18:00:00Z",
            2,
            OfferStatus::Scheduled,
        )?);

        let transitions = store.sweep("2026-03-01T10:30:00Z".parse()?);

        assert_eq!(transitions, 1);
        assert_eq!(store.get(due).map(FlashOffer::status), Some(OfferStatus::Active));

        assert_eq!(
            store.get(pending).map(FlashOffer::status),
            Some(OfferStatus::Scheduled)
        );

        Ok(())
    }

    #[test]
    fn sweep_leaves_terminal_offers_alone() -> TestResult {
        let mut store = OfferStore::new();

        let cancelled = store.insert(offer(
            "cancelled",
            "2026-03-01T10:00:00Z",
            2,
            OfferStatus::Cancelled,
        )?);

        let transitions = store.sweep("2026-03-02T00:00:00Z".parse()?);

        assert_eq!(transitions, 0);

        assert_eq!(
            store.get(cancelled).map(FlashOffer::status),
            Some(OfferStatus::Cancelled)
        );

        Ok(())
    }

    #[test]
    fn cancel_is_idempotent() -> TestResult {
        let mut store = OfferStore::new();
        let key = store.insert(offer("offer", "2026-03-01T10:00:00Z", 2, OfferStatus::Active)?);

        assert!(store.cancel(key));
        assert!(!store.cancel(key));

        assert_eq!(
            store.get(key).map(FlashOffer::status),
            Some(OfferStatus::Cancelled)
        );
        assert_eq!(store.len(), 1);

        Ok(())
    }

    #[test]
    fn cancel_of_unknown_key_is_a_no_op() {
        let mut store = OfferStore::new();

        assert!(!store.cancel(OfferKey::default()));
        assert!(store.is_empty());
    }

    #[test]
    fn filters_follow_status_and_exhaustion() -> TestResult {
        let mut store = OfferStore::new();

        store.insert(offer("active", "2026-03-01T10:00:00Z", 2, OfferStatus::Active)?);

        store.insert(offer(
            "scheduled",
            "2026-03-01T18:00:00Z",
            2,
            OfferStatus::Scheduled,
        )?);

        let mut capped = offer("capped", "2026-03-01T10:00:00Z", 2, OfferStatus::Active)?;
        capped.max_redemptions = Some(1);
        capped.record_redemption()?;
        store.insert(capped);

        let active: Vec<&str> = store.active().map(|o| o.title.as_str()).collect();
        let discoverable: Vec<&str> = store.discoverable().map(|o| o.title.as_str()).collect();

        assert_eq!(active, ["capped", "active"]);
        assert_eq!(discoverable, ["active"]);

        Ok(())
    }
}

//! Flash Offers
//!
//! Time-boxed discount campaigns scoped to a single store: the offer record
//! itself, its lifecycle states, and redemption accounting. The surrounding
//! machinery lives in the submodules: the pure [`lifecycle`] transition
//! function and tick gate, the pure [`quota`] policy, the session-owned
//! [`store`], and the [`session`] command surface.

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use slotmap::new_key_type;
use smallvec::SmallVec;
use thiserror::Error;

use crate::products::ProductKey;

pub mod lifecycle;
pub mod quota;
pub mod session;
pub mod store;

new_key_type! {
    /// Offer Key
    pub struct OfferKey;
}

/// Lifecycle status of a flash offer.
///
/// `Expired` and `Cancelled` are terminal; `Scheduled` and `Active` advance
/// with wall-clock time via [`lifecycle::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferStatus {
    /// Created but not yet started.
    Scheduled,

    /// Currently running and visible to shoppers.
    Active,

    /// The offer window has elapsed.
    Expired,

    /// Withdrawn by the store before its window elapsed.
    Cancelled,
}

impl OfferStatus {
    /// Whether this status can never change again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Expired | Self::Cancelled)
    }

    /// Stable lowercase name, used for logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Active => "active",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The discount an offer applies to each of its products.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscountKind {
    /// Percentage off the product price, expressed as 0–100.
    Percentage(Decimal),

    /// Absolute amount off the product price.
    FixedAmount(Money<'static, iso::Currency>),
}

/// Why a create command was refused.
///
/// These are expected business outcomes, not faults: callers branch on them
/// to drive upgrade prompts and inline validation messages. Nothing is
/// mutated when a create is refused.
#[derive(Debug, Error)]
pub enum CreateOfferError {
    /// The subscription tier does not include flash offers.
    #[error("the current plan does not include flash offers")]
    FeatureNotAvailable,

    /// The monthly creation allowance is used up.
    #[error("monthly flash-offer limit reached ({used} of {limit} used)")]
    QuotaExceeded {
        /// Offers already created this calendar month.
        used: u32,

        /// The plan's monthly cap.
        limit: u32,
    },

    /// The requested radius exceeds the plan ceiling.
    #[error("radius of {requested_km} km exceeds the plan maximum of {max_km} km")]
    RadiusExceeded {
        /// The requested radius in kilometres.
        requested_km: u32,

        /// The plan's radius ceiling in kilometres.
        max_km: u32,
    },

    /// The draft names no products.
    #[error("an offer must apply to at least one product")]
    NoProducts,

    /// The draft title is empty or whitespace.
    #[error("an offer needs a non-empty title")]
    EmptyTitle,

    /// The draft duration is zero hours.
    #[error("an offer must run for at least one hour")]
    ZeroDuration,

    /// The draft radius is zero kilometres.
    #[error("an offer must have a positive broadcast radius")]
    ZeroRadius,

    /// A percentage discount outside the 0–100 range.
    #[error("percentage discount must be greater than 0 and at most 100, got {0}")]
    InvalidPercentage(Decimal),

    /// A fixed discount of zero or a negative amount.
    #[error("fixed discount must be a positive amount")]
    NonPositiveDiscount,

    /// A redemption cap of zero.
    #[error("a redemption cap must be positive")]
    ZeroRedemptionCap,

    /// The offer window could not be represented.
    #[error(transparent)]
    TimeArithmetic(#[from] jiff::Error),
}

/// Errors from redemption accounting.
#[derive(Debug, Error)]
pub enum RedemptionError {
    /// The key does not refer to any offer in this session.
    #[error("offer not found")]
    UnknownOffer,

    /// Only active offers can be redeemed.
    #[error("offer is {0}; only active offers can be redeemed")]
    NotRedeemable(OfferStatus),

    /// The redemption cap has been reached.
    #[error("redemption cap of {cap} reached")]
    Exhausted {
        /// The configured cap.
        cap: u32,
    },
}

/// Input for creating a flash offer.
#[derive(Debug, Clone)]
pub struct OfferDraft {
    /// Display title.
    pub title: String,

    /// Optional display description.
    pub description: Option<String>,

    /// Products the discount applies to.
    pub products: SmallVec<[ProductKey; 4]>,

    /// The discount to apply.
    pub discount: DiscountKind,

    /// How long the offer runs once started.
    pub duration_hours: u32,

    /// Broadcast radius in kilometres.
    pub radius_km: u32,

    /// Optional cap on redemptions.
    pub max_redemptions: Option<u32>,

    /// Start now rather than after the scheduling lead time.
    pub start_immediately: bool,
}

impl OfferDraft {
    /// Creates a draft that starts after the scheduling lead time, with no
    /// description and no redemption cap.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        products: impl IntoIterator<Item = ProductKey>,
        discount: DiscountKind,
        duration_hours: u32,
        radius_km: u32,
    ) -> Self {
        Self {
            title: title.into(),
            description: None,
            products: products.into_iter().collect(),
            discount,
            duration_hours,
            radius_km,
            max_redemptions: None,
            start_immediately: false,
        }
    }

    /// Adds a display description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Caps the number of redemptions.
    #[must_use]
    pub fn with_max_redemptions(mut self, cap: u32) -> Self {
        self.max_redemptions = Some(cap);
        self
    }

    /// Starts the offer immediately on creation.
    #[must_use]
    pub fn starting_immediately(mut self) -> Self {
        self.start_immediately = true;
        self
    }
}

/// One time-boxed discount campaign.
///
/// Offers are never deleted; terminal offers remain in the store for history
/// display. The status and the redemption counter are only mutated through
/// the session and store, which uphold the lifecycle and monotonicity
/// invariants.
#[derive(Debug, Clone)]
pub struct FlashOffer {
    /// Display title.
    pub title: String,

    /// Optional display description.
    pub description: Option<String>,

    /// Products the discount applies to.
    pub products: SmallVec<[ProductKey; 4]>,

    /// The discount applied to each product.
    pub discount: DiscountKind,

    /// When the offer starts.
    pub starts_at: Timestamp,

    /// When the offer ends; always after `starts_at`.
    pub ends_at: Timestamp,

    /// Broadcast radius in kilometres.
    pub radius_km: u32,

    /// Optional cap on redemptions.
    pub max_redemptions: Option<u32>,

    /// When the offer was created; buckets the offer for quota accounting.
    pub created_at: Timestamp,

    status: OfferStatus,
    redemptions: u32,
    notifications_sent: u32,
}

impl FlashOffer {
    pub(crate) fn from_draft(
        draft: OfferDraft,
        starts_at: Timestamp,
        ends_at: Timestamp,
        created_at: Timestamp,
        status: OfferStatus,
    ) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            products: draft.products,
            discount: draft.discount,
            starts_at,
            ends_at,
            radius_km: draft.radius_km,
            max_redemptions: draft.max_redemptions,
            created_at,
            status,
            redemptions: 0,
            notifications_sent: 0,
        }
    }

    /// Current lifecycle status.
    #[must_use]
    pub const fn status(&self) -> OfferStatus {
        self.status
    }

    /// How many times the offer has been redeemed.
    #[must_use]
    pub const fn redemptions(&self) -> u32 {
        self.redemptions
    }

    /// How many notifications the external side-channel has sent.
    #[must_use]
    pub const fn notifications_sent(&self) -> u32 {
        self.notifications_sent
    }

    /// Whether the redemption cap, if any, has been reached.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.max_redemptions
            .is_some_and(|cap| self.redemptions >= cap)
    }

    /// Whether shoppers should see this offer.
    ///
    /// Exhaustion gates discoverability without touching the lifecycle: an
    /// offer at its cap stays `Active` but is hidden from listings.
    #[must_use]
    pub fn is_discoverable(&self) -> bool {
        self.status == OfferStatus::Active && !self.is_exhausted()
    }

    /// Records one redemption and returns the new count.
    ///
    /// The counter never decreases and never passes the cap.
    ///
    /// # Errors
    ///
    /// Returns [`RedemptionError::NotRedeemable`] unless the offer is active,
    /// and [`RedemptionError::Exhausted`] once the cap is reached.
    pub fn record_redemption(&mut self) -> Result<u32, RedemptionError> {
        if self.status != OfferStatus::Active {
            return Err(RedemptionError::NotRedeemable(self.status));
        }

        if let Some(cap) = self.max_redemptions
            && self.redemptions >= cap
        {
            return Err(RedemptionError::Exhausted { cap });
        }

        self.redemptions = self.redemptions.saturating_add(1);

        Ok(self.redemptions)
    }

    /// Records one sent notification and returns the new count.
    ///
    /// Notifications are dispatched by an external collaborator; this only
    /// keeps the counter.
    pub fn record_notification(&mut self) -> u32 {
        self.notifications_sent = self.notifications_sent.saturating_add(1);
        self.notifications_sent
    }

    pub(crate) fn set_status(&mut self, status: OfferStatus) {
        self.status = status;
    }
}

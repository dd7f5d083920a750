//! Plan Limits
//!
//! Subscription tiers gate the flash-offer feature and bound how many offers
//! a store may create per calendar month and how far they may broadcast.

use std::fmt;

/// How many offers a plan allows per calendar month.
///
/// A closed type rather than a `-1` sentinel, so exhaustion checks are
/// explicit at every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyAllowance {
    /// No cap on creations within a month.
    Unlimited,

    /// At most this many creations within a month.
    Limited(u32),
}

impl MonthlyAllowance {
    /// Whether another creation is permitted after `used` creations this
    /// month.
    #[must_use]
    pub const fn permits(self, used: u32) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Limited(cap) => used < cap,
        }
    }

    /// The allowance left after `used` creations, floored at zero.
    #[must_use]
    pub const fn minus(self, used: u32) -> Self {
        match self {
            Self::Unlimited => Self::Unlimited,
            Self::Limited(cap) => Self::Limited(cap.saturating_sub(used)),
        }
    }
}

impl fmt::Display for MonthlyAllowance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str("unlimited"),
            Self::Limited(n) => write!(f, "{n}"),
        }
    }
}

/// Flash-offer entitlements for one subscription tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    /// Whether the tier includes flash offers at all.
    pub flash_offers: bool,

    /// Creation allowance per calendar month.
    pub offers_per_month: MonthlyAllowance,

    /// Maximum broadcast radius in kilometres.
    pub max_radius_km: u32,
}

impl PlanLimits {
    /// A tier without the flash-offer feature.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            flash_offers: false,
            offers_per_month: MonthlyAllowance::Limited(0),
            max_radius_km: 0,
        }
    }

    /// A tier with a monthly creation cap.
    #[must_use]
    pub const fn per_month(cap: u32, max_radius_km: u32) -> Self {
        Self {
            flash_offers: true,
            offers_per_month: MonthlyAllowance::Limited(cap),
            max_radius_km,
        }
    }

    /// A tier with unlimited monthly creations.
    #[must_use]
    pub const fn unlimited(max_radius_km: u32) -> Self {
        Self {
            flash_offers: true,
            offers_per_month: MonthlyAllowance::Unlimited,
            max_radius_km,
        }
    }
}

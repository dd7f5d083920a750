//! Quota Policy
//!
//! Pure decisions over the plan limits and the existing offer collection:
//! whether a new offer may be created, and how much allowance is left for
//! display. No function here mutates anything.
//!
//! Quota buckets are calendar months in the session's time zone, not rolling
//! 30-day windows: an offer created on the last day of a month and one
//! created the next day land in different buckets. Cancelled and expired
//! offers still consume their month's allowance.

use jiff::{Timestamp, tz::TimeZone};

use crate::{
    offers::{CreateOfferError, FlashOffer},
    plans::{MonthlyAllowance, PlanLimits},
};

/// Remaining allowance for display, recomputed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaView {
    /// Whether another offer may be created this month.
    pub can_create: bool,

    /// Allowance left this calendar month.
    pub remaining: MonthlyAllowance,

    /// The plan's radius ceiling in kilometres.
    pub max_radius_km: u32,
}

/// Whether two instants fall in the same calendar month of `tz`.
fn same_calendar_month(a: Timestamp, b: Timestamp, tz: &TimeZone) -> bool {
    let a = a.to_zoned(tz.clone());
    let b = b.to_zoned(tz.clone());

    a.year() == b.year() && a.month() == b.month()
}

/// Counts offers created in the calendar month of `now`.
pub fn used_this_month<'a>(
    offers: impl IntoIterator<Item = &'a FlashOffer>,
    now: Timestamp,
    tz: &TimeZone,
) -> u32 {
    let used = offers
        .into_iter()
        .filter(|offer| same_calendar_month(offer.created_at, now, tz))
        .count();

    u32::try_from(used).unwrap_or(u32::MAX)
}

/// Computes the derived quota view for the given plan and collection.
pub fn view<'a>(
    limits: &PlanLimits,
    offers: impl IntoIterator<Item = &'a FlashOffer>,
    now: Timestamp,
    tz: &TimeZone,
) -> QuotaView {
    let used = used_this_month(offers, now, tz);
    let remaining = limits.offers_per_month.minus(used);

    QuotaView {
        can_create: limits.flash_offers && limits.offers_per_month.permits(used),
        remaining,
        max_radius_km: limits.max_radius_km,
    }
}

/// Decides whether a new offer with the proposed radius may be created.
///
/// Checks run in a fixed order: feature gate, then monthly allowance, then
/// radius ceiling.
///
/// # Errors
///
/// Returns [`CreateOfferError::FeatureNotAvailable`],
/// [`CreateOfferError::QuotaExceeded`] or [`CreateOfferError::RadiusExceeded`]
/// when the corresponding check fails.
pub fn authorize<'a>(
    limits: &PlanLimits,
    offers: impl IntoIterator<Item = &'a FlashOffer>,
    now: Timestamp,
    tz: &TimeZone,
    radius_km: u32,
) -> Result<(), CreateOfferError> {
    if !limits.flash_offers {
        return Err(CreateOfferError::FeatureNotAvailable);
    }

    let used = used_this_month(offers, now, tz);

    if let MonthlyAllowance::Limited(limit) = limits.offers_per_month
        && used >= limit
    {
        return Err(CreateOfferError::QuotaExceeded { used, limit });
    }

    if radius_km > limits.max_radius_km {
        return Err(CreateOfferError::RadiusExceeded {
            requested_km: radius_km,
            max_km: limits.max_radius_km,
        });
    }

    Ok(())
}

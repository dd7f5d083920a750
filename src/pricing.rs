//! Pricing
//!
//! Shopper-visible price computation for products under an offer. Display
//! only; the quota and lifecycle policies never consult prices.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::offers::DiscountKind;

/// Errors specific to offer price calculations.
#[derive(Debug, Error)]
pub enum PriceError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the discounted price of a product under an offer.
///
/// Percentage discounts round to whole minor units, midpoint away from zero.
/// Fixed-amount discounts floor at zero rather than going negative.
///
/// # Errors
///
/// Returns an error if:
/// - a percentage calculation cannot be safely represented in minor units
///   (`PriceError::PercentConversion`).
/// - underlying money arithmetic fails (for example, due to currency
///   mismatch) (`PriceError::Money`).
pub fn offer_price(
    discount: &DiscountKind,
    price: &Money<'static, Currency>,
) -> Result<Money<'static, Currency>, PriceError> {
    match discount {
        DiscountKind::Percentage(percent) => {
            let off = percent_of_minor(*percent, price.to_minor_units())?;

            Ok(Money::from_minor(
                price.to_minor_units().saturating_sub(off),
                price.currency(),
            ))
        }
        DiscountKind::FixedAmount(amount) => {
            let discounted = price.sub(*amount)?;

            if discounted.to_minor_units() < 0 {
                Ok(Money::from_minor(0, price.currency()))
            } else {
                Ok(discounted)
            }
        }
    }
}

/// Calculate the discount amount in minor units for a 0–100 percentage.
fn percent_of_minor(percent: Decimal, minor: i64) -> Result<i64, PriceError> {
    let Some(fraction) = percent.checked_div(Decimal::ONE_HUNDRED) else {
        return Err(PriceError::PercentConversion);
    };

    let Some(minor) = Decimal::from_i64(minor) else {
        unreachable!("always returns `Some` for every `i64`")
    };

    let Some(applied) = fraction.checked_mul(minor) else {
        return Err(PriceError::PercentConversion);
    };

    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let Some(rounded) = rounded.to_i64() else {
        return Err(PriceError::PercentConversion);
    };

    Ok(rounded)
}

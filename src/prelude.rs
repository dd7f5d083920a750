//! Flare prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    clock::{Clock, ManualClock, SystemClock},
    fixtures::{FixtureError, plans::PlanCatalog, products::load_catalog},
    offers::{
        CreateOfferError, DiscountKind, FlashOffer, OfferDraft, OfferKey, OfferStatus,
        RedemptionError,
        lifecycle::{TICK_INTERVAL, Ticker},
        quota::QuotaView,
        session::{SCHEDULE_LEAD, StoreSession},
        store::OfferStore,
    },
    plans::{MonthlyAllowance, PlanLimits},
    pricing::{PriceError, offer_price},
    products::{Catalog, Product, ProductKey},
};

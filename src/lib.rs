//! Flare
//!
//! Flare is an in-memory flash-offer engine for local-commerce storefronts:
//! a session-scoped offer store with a polled lifecycle state machine,
//! plan-based quota and radius enforcement, redemption accounting, and the
//! derived views a storefront UI renders from.

pub mod clock;
pub mod fixtures;
pub mod offers;
pub mod plans;
pub mod prelude;
pub mod pricing;
pub mod products;

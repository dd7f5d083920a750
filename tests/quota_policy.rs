//! Integration tests for plan quotas and the radius ceiling.

use jiff::SignedDuration;
use rust_decimal::Decimal;
use testresult::TestResult;

use flare::{
    clock::{Clock, ManualClock},
    fixtures::plans::PlanCatalog,
    offers::{CreateOfferError, DiscountKind, OfferDraft, OfferStatus, session::StoreSession},
    plans::{MonthlyAllowance, PlanLimits},
    products::ProductKey,
};

fn profesional() -> TestResult<PlanLimits> {
    // Two offers per month, 5 km ceiling, from the shipped tier catalog.
    Ok(*PlanCatalog::load("./fixtures", "tiers")?.plan("profesional")?)
}

fn session_at(
    plan: PlanLimits,
    start: &str,
) -> TestResult<(StoreSession<ManualClock>, ManualClock)> {
    let clock = ManualClock::new(start.parse()?);
    let session = StoreSession::with_clock(plan, clock.clone());

    Ok((session, clock))
}

fn draft(radius_km: u32) -> OfferDraft {
    OfferDraft::new(
        "Oferta relámpago",
        [ProductKey::default()],
        DiscountKind::Percentage(Decimal::from(30u32)),
        2,
        radius_km,
    )
}

#[test]
fn immediate_create_within_the_plan_succeeds() -> TestResult {
    let (mut session, clock) = session_at(profesional()?, "2026-03-10T10:00:00Z")?;

    let key = session.create_flash_offer(draft(5).starting_immediately())?;
    let offer = session.offer(key).ok_or("offer missing")?;

    assert_eq!(offer.status(), OfferStatus::Active);
    assert_eq!(offer.starts_at, clock.now());

    assert_eq!(
        offer.ends_at.duration_since(offer.starts_at),
        SignedDuration::from_hours(2)
    );

    assert_eq!(session.quota().remaining, MonthlyAllowance::Limited(1));

    Ok(())
}

#[test]
fn third_create_in_a_month_is_refused_without_mutation() -> TestResult {
    let (mut session, _clock) = session_at(profesional()?, "2026-03-10T10:00:00Z")?;

    session.create_flash_offer(draft(5))?;
    session.create_flash_offer(draft(5))?;

    let result = session.create_flash_offer(draft(5));

    assert!(matches!(
        result,
        Err(CreateOfferError::QuotaExceeded { used: 2, limit: 2 })
    ));

    assert_eq!(session.offers().count(), 2);
    assert_eq!(session.quota().remaining, MonthlyAllowance::Limited(0));
    assert!(!session.quota().can_create);

    Ok(())
}

#[test]
fn radius_over_the_plan_ceiling_is_refused() -> TestResult {
    let (mut session, _clock) = session_at(profesional()?, "2026-03-10T10:00:00Z")?;

    let result = session.create_flash_offer(draft(10));

    assert!(matches!(
        result,
        Err(CreateOfferError::RadiusExceeded {
            requested_km: 10,
            max_km: 5
        })
    ));

    assert_eq!(session.offers().count(), 0);

    Ok(())
}

#[test]
fn radius_boundary_is_inclusive() -> TestResult {
    let (mut session, _clock) = session_at(profesional()?, "2026-03-10T10:00:00Z")?;

    assert!(session.create_flash_offer(draft(4)).is_ok());
    assert!(session.create_flash_offer(draft(5)).is_ok());

    assert!(matches!(
        session.create_flash_offer(draft(6)),
        Err(CreateOfferError::RadiusExceeded { .. })
    ));

    Ok(())
}

#[test]
fn remaining_decreases_by_one_per_successful_create() -> TestResult {
    let plan = PlanLimits::per_month(3, 5);
    let (mut session, _clock) = session_at(plan, "2026-03-10T10:00:00Z")?;

    assert_eq!(session.quota().remaining, MonthlyAllowance::Limited(3));

    for expected in (0..3).rev() {
        session.create_flash_offer(draft(5))?;

        assert_eq!(
            session.quota().remaining,
            MonthlyAllowance::Limited(expected)
        );
    }

    Ok(())
}

#[test]
fn quota_resets_at_the_calendar_month_boundary() -> TestResult {
    let (mut session, clock) = session_at(profesional()?, "2026-03-31T22:00:00Z")?;

    session.create_flash_offer(draft(5))?;
    session.create_flash_offer(draft(5))?;

    assert!(matches!(
        session.create_flash_offer(draft(5)),
        Err(CreateOfferError::QuotaExceeded { .. })
    ));

    // One day later is a new bucket, even though fewer than 30 days passed.
    clock.advance(SignedDuration::from_hours(26));

    assert_eq!(session.quota().remaining, MonthlyAllowance::Limited(2));
    assert!(session.create_flash_offer(draft(5)).is_ok());

    Ok(())
}

#[test]
fn plans_without_the_feature_reject_every_create() -> TestResult {
    let catalog = PlanCatalog::load("./fixtures", "tiers")?;
    let basico = *catalog.plan("basico")?;

    let (mut session, _clock) = session_at(basico, "2026-03-10T10:00:00Z")?;

    assert!(matches!(
        session.create_flash_offer(draft(1)),
        Err(CreateOfferError::FeatureNotAvailable)
    ));

    assert!(!session.quota().can_create);

    Ok(())
}

#[test]
fn unlimited_tier_reports_unlimited_remaining() -> TestResult {
    let catalog = PlanCatalog::load("./fixtures", "tiers")?;
    let premium = *catalog.plan("premium")?;

    let (mut session, _clock) = session_at(premium, "2026-03-10T10:00:00Z")?;

    for _ in 0..5 {
        session.create_flash_offer(draft(20))?;
    }

    assert_eq!(session.quota().remaining, MonthlyAllowance::Unlimited);
    assert!(session.quota().can_create);

    Ok(())
}

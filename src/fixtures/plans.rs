//! Plan Catalog Fixtures
//!
//! Subscription tiers are data, not code: a YAML plan catalog maps tier
//! names to their flash-offer entitlements. The monthly allowance uses the
//! wire convention of `-1` for unlimited, converted here into
//! [`MonthlyAllowance`].

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    plans::{MonthlyAllowance, PlanLimits},
};

/// Wrapper for plans in YAML
#[derive(Debug, Deserialize)]
pub struct PlansFixture {
    /// Map of tier name -> plan fixture
    pub plans: FxHashMap<String, PlanFixture>,
}

/// Plan fixture from YAML
#[derive(Debug, Deserialize)]
pub struct PlanFixture {
    /// Whether the tier includes flash offers
    pub flash_offers: bool,

    /// Offers per calendar month; `-1` means unlimited
    pub offers_per_month: i64,

    /// Radius ceiling in kilometres
    pub max_radius_km: u32,
}

impl TryFrom<PlanFixture> for PlanLimits {
    type Error = FixtureError;

    fn try_from(fixture: PlanFixture) -> Result<Self, Self::Error> {
        let offers_per_month = match fixture.offers_per_month {
            -1 => MonthlyAllowance::Unlimited,
            n => {
                let cap =
                    u32::try_from(n).map_err(|_err| FixtureError::InvalidAllowance(n))?;

                MonthlyAllowance::Limited(cap)
            }
        };

        Ok(Self {
            flash_offers: fixture.flash_offers,
            offers_per_month,
            max_radius_km: fixture.max_radius_km,
        })
    }
}

/// Plan catalog keyed by tier name.
#[derive(Debug, Clone, Default)]
pub struct PlanCatalog {
    plans: FxHashMap<String, PlanLimits>,
}

impl PlanCatalog {
    /// Loads a plan catalog from `<base>/plans/<name>.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if an
    /// allowance is outside the wire convention.
    pub fn load(base_path: impl AsRef<Path>, name: &str) -> Result<Self, FixtureError> {
        let file_path = base_path.as_ref().join("plans").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: PlansFixture = serde_norway::from_str(&contents)?;

        let mut plans = FxHashMap::default();

        for (tier, plan) in fixture.plans {
            plans.insert(tier, PlanLimits::try_from(plan)?);
        }

        Ok(Self { plans })
    }

    /// Looks up a tier by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the tier is not in the catalog.
    pub fn plan(&self, tier: &str) -> Result<&PlanLimits, FixtureError> {
        self.plans
            .get(tier)
            .ok_or_else(|| FixtureError::PlanNotFound(tier.to_string()))
    }

    /// Number of tiers in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plans.len()
    }

    /// Whether the catalog holds no tiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

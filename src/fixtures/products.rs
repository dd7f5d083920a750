//! Product Fixtures

use std::{fs, path::Path};

use rustc_hash::FxHashMap;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Catalog, Product},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product handle -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product fixture from YAML
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Price string, e.g. `"2.50 EUR"`
    pub price: String,
}

/// Parses a `"2.50 EUR"`-style price into minor units and a currency.
///
/// # Errors
///
/// Returns an error for malformed amounts or unknown currency codes.
pub fn parse_price(input: &str) -> Result<(i64, &'static iso::Currency), FixtureError> {
    let mut parts = input.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(input.to_string()));
    };

    let currency =
        iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?;

    let amount: Decimal = amount
        .parse()
        .map_err(|_err| FixtureError::InvalidPrice(input.to_string()))?;

    let scale = Decimal::from(10u32.pow(currency.exponent));

    let minor = amount
        .checked_mul(scale)
        .and_then(|minor| minor.to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(input.to_string()))?;

    Ok((minor, currency))
}

/// Loads a product set into a [`Catalog`] from `<base>/products/<name>.yml`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if a price is
/// malformed.
pub fn load_catalog(base_path: impl AsRef<Path>, name: &str) -> Result<Catalog, FixtureError> {
    let file_path = base_path
        .as_ref()
        .join("products")
        .join(format!("{name}.yml"));

    let contents = fs::read_to_string(&file_path)?;
    let fixture: ProductsFixture = serde_norway::from_str(&contents)?;

    let mut catalog = Catalog::new();

    for (handle, product) in fixture.products {
        let (minor, currency) = parse_price(&product.price)?;

        catalog.insert(handle, Product::new(product.name, Money::from_minor(minor, currency)));
    }

    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_reads_minor_units_and_currency() -> TestResult {
        let (minor, currency) = parse_price("2.50 EUR")?;

        assert_eq!(minor, 250);
        assert_eq!(currency, iso::EUR);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_malformed_input() {
        assert!(matches!(
            parse_price("2.50"),
            Err(FixtureError::InvalidPrice(_))
        ));

        assert!(matches!(
            parse_price("two EUR"),
            Err(FixtureError::InvalidPrice(_))
        ));

        assert!(matches!(
            parse_price("2.50 EUR extra"),
            Err(FixtureError::InvalidPrice(_))
        ));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        assert!(matches!(
            parse_price("2.50 ZZZ"),
            Err(FixtureError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn load_catalog_builds_a_catalog_from_yaml() -> TestResult {
        let dir = tempfile::tempdir()?;

        fs::create_dir_all(dir.path().join("products"))?;

        fs::write(
            dir.path().join("products").join("market.yml"),
            "products:\n  empanada:\n    name: Empanada\n    price: 2.50 EUR\n  cafe:\n    name: Café\n    price: 1.20 EUR\n",
        )?;

        let catalog = load_catalog(dir.path(), "market")?;

        assert_eq!(catalog.len(), 2);

        assert_eq!(
            catalog.product("empanada").map(|p| p.price.to_minor_units()),
            Some(250)
        );

        Ok(())
    }

    #[test]
    fn load_catalog_surfaces_missing_files() {
        let result = load_catalog("./does-not-exist", "market");

        assert!(matches!(result, Err(FixtureError::Io(_))));
    }
}

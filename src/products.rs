//! Products
//!
//! A minimal product catalog used to resolve the product keys carried by an
//! offer into display data. Policy decisions never consult the catalog.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso};
use slotmap::{SlotMap, new_key_type};

use crate::offers::FlashOffer;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Product
#[derive(Debug, Clone)]
pub struct Product {
    /// Product name
    pub name: String,

    /// Product price
    pub price: Money<'static, iso::Currency>,
}

impl Product {
    /// Creates a product with the given name and price.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Money<'static, iso::Currency>) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// Product catalog with string-handle lookups.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: SlotMap<ProductKey, Product>,
    handles: FxHashMap<String, ProductKey>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a product under a string handle and returns its key.
    ///
    /// Re-using a handle re-points it at the new product; the old product
    /// stays reachable by key.
    pub fn insert(&mut self, handle: impl Into<String>, product: Product) -> ProductKey {
        let key = self.products.insert(product);

        self.handles.insert(handle.into(), key);

        key
    }

    /// Looks up a product by key.
    #[must_use]
    pub fn get(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Looks up a product key by its string handle.
    #[must_use]
    pub fn key(&self, handle: &str) -> Option<ProductKey> {
        self.handles.get(handle).copied()
    }

    /// Looks up a product by its string handle.
    #[must_use]
    pub fn product(&self, handle: &str) -> Option<&Product> {
        self.key(handle).and_then(|key| self.get(key))
    }

    /// Number of products in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Resolves an offer's product keys to products, skipping keys the
    /// catalog no longer knows.
    pub fn products_for<'a>(&'a self, offer: &'a FlashOffer) -> impl Iterator<Item = &'a Product> {
        offer.products.iter().filter_map(|key| self.get(*key))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::EUR;

    use super::*;

    #[test]
    fn catalog_resolves_handles_and_keys() {
        let mut catalog = Catalog::new();

        let key = catalog.insert(
            "empanada",
            Product::new("Empanada", Money::from_minor(250, EUR)),
        );

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.key("empanada"), Some(key));

        assert_eq!(
            catalog.product("empanada").map(|p| p.name.as_str()),
            Some("Empanada")
        );

        assert_eq!(
            catalog.get(key).map(|p| p.price.to_minor_units()),
            Some(250)
        );
    }

    #[test]
    fn catalog_misses_return_none() {
        let catalog = Catalog::new();

        assert!(catalog.is_empty());
        assert!(catalog.key("missing").is_none());
        assert!(catalog.product("missing").is_none());
        assert!(catalog.get(ProductKey::default()).is_none());
    }
}

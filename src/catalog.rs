//! Catalog
//!
//! The immutable SKU to unit-price lookup a pricing calculation runs
//! against. Built once from priced entries and never mutated afterwards.

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::sku::Sku;

/// Errors related to catalog construction.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The same SKU appears in more than one entry.
    #[error("SKU '{0}' is listed more than once")]
    DuplicateSku(Sku),

    /// An entry's currency differs from the catalog currency (index, entry currency, catalog currency).
    #[error("Entry {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),

    /// An entry carries a negative unit price.
    #[error("SKU '{0}' has a negative unit price")]
    NegativePrice(Sku),
}

/// A single priced catalog line.
#[derive(Debug, Clone)]
pub struct CatalogEntry<'a> {
    sku: Sku,
    price: Money<'a, Currency>,
}

impl<'a> CatalogEntry<'a> {
    /// Creates a new catalog entry with the given SKU and unit price.
    pub fn new(sku: impl Into<Sku>, price: Money<'a, Currency>) -> Self {
        Self {
            sku: sku.into(),
            price,
        }
    }

    /// Returns the SKU of the entry.
    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Returns the unit price of the entry.
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }
}

/// SKU to unit price lookup.
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    prices: FxHashMap<Sku, Money<'a, Currency>>,
    currency: &'static Currency,
}

impl<'a> Catalog<'a> {
    /// Create a new empty catalog in the given currency.
    pub fn new(currency: &'static Currency) -> Self {
        Catalog {
            prices: FxHashMap::default(),
            currency,
        }
    }

    /// Create a catalog from the given entries.
    ///
    /// # Errors
    ///
    /// Returns a `CatalogError` if a SKU is listed twice, an entry's
    /// currency differs from the catalog currency, or a unit price is
    /// negative.
    pub fn with_entries(
        entries: impl IntoIterator<Item = CatalogEntry<'a>>,
        currency: &'static Currency,
    ) -> Result<Self, CatalogError> {
        let mut prices = FxHashMap::default();

        for (i, entry) in entries.into_iter().enumerate() {
            let entry_currency = entry.price.currency();
            if entry_currency != currency {
                return Err(CatalogError::CurrencyMismatch(
                    i,
                    entry_currency.iso_alpha_code,
                    currency.iso_alpha_code,
                ));
            }

            if entry.price.to_minor_units() < 0 {
                return Err(CatalogError::NegativePrice(entry.sku));
            }

            if prices.insert(entry.sku.clone(), entry.price).is_some() {
                return Err(CatalogError::DuplicateSku(entry.sku));
            }
        }

        Ok(Catalog { prices, currency })
    }

    /// Look up the unit price for a SKU.
    pub fn price(&self, sku: &Sku) -> Option<&Money<'a, Currency>> {
        self.prices.get(sku)
    }

    /// Check whether the catalog lists a SKU.
    pub fn contains(&self, sku: &Sku) -> bool {
        self.prices.contains_key(sku)
    }

    /// Get the number of listed SKUs.
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Get the currency of the catalog.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

//! Fixtures
//!
//! YAML-backed fixture sets for catalogs, promotion rules and named orders,
//! loaded from a `fixtures/` directory. Used by the examples and the
//! integration tests; the engine itself never touches the filesystem.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::Money;
use thiserror::Error;

use crate::{
    catalog::{Catalog, CatalogEntry, CatalogError},
    fixtures::{catalogs::CatalogFixture, orders::OrdersFixture, promotions::PromotionsFixture},
    orders::{Order, OrderLine},
    pricing::{ConfigError, PricingEngine},
    promotions::{Promotion, PromotionError},
};

pub mod catalogs;
pub mod orders;
pub mod promotions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency mismatch between catalog prices
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Catalog fixture lists no prices
    #[error("No catalog prices loaded; currency unknown")]
    NoCurrency,

    /// No catalog loaded yet
    #[error("No catalog loaded yet")]
    NoCatalog,

    /// Order not found
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Catalog construction error
    #[error("Failed to build catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Promotion construction error
    #[error("Failed to build promotion: {0}")]
    Promotion(#[from] PromotionError),

    /// Engine configuration error
    #[error("Failed to configure engine: {0}")]
    Config(#[from] ConfigError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Loaded catalog
    catalog: Option<Catalog<'a>>,

    /// Loaded promotion rules, in application order
    promotions: Vec<Promotion<'a>>,

    /// Loaded orders by name
    orders: FxHashMap<String, Order>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with the default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            catalog: None,
            promotions: Vec::new(),
            orders: FxHashMap::default(),
        }
    }

    /// Load a catalog from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, if prices mix
    /// currencies, or if the catalog itself is invalid.
    pub fn load_catalog(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("catalogs").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CatalogFixture = serde_norway::from_str(&contents)?;

        let mut currency: Option<&'static rusty_money::iso::Currency> = None;
        let mut entries = Vec::new();

        for (sku, price) in fixture.catalog {
            let (minor_units, price_currency) = catalogs::parse_price(&price)?;

            if let Some(existing) = currency {
                if existing != price_currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        price_currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                currency = Some(price_currency);
            }

            entries.push(CatalogEntry::new(
                sku,
                Money::from_minor(minor_units, price_currency),
            ));
        }

        let currency = currency.ok_or(FixtureError::NoCurrency)?;

        self.catalog = Some(Catalog::with_entries(entries, currency)?);

        Ok(self)
    }

    /// Load promotion rules from a YAML fixture file, preserving file order
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a rule
    /// definition is invalid.
    pub fn load_promotions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self
            .base_path
            .join("promotions")
            .join(format!("{name}.yml"));

        let contents = fs::read_to_string(&file_path)?;
        let fixture: PromotionsFixture = serde_norway::from_str(&contents)?;

        for promotion_fixture in fixture.promotions {
            self.promotions.push(promotion_fixture.try_into()?);
        }

        Ok(self)
    }

    /// Load named orders from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_orders(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("orders").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: OrdersFixture = serde_norway::from_str(&contents)?;

        for (order_name, lines) in fixture.orders {
            let lines: Vec<OrderLine> = lines.into_iter().map(OrderLine::from).collect();

            self.orders.insert(order_name, Order::with_lines(lines));
        }

        Ok(self)
    }

    /// Load a complete fixture set (catalog, promotions and orders with the
    /// same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_catalog(name)?
            .load_promotions(name)?
            .load_orders(name)?;

        Ok(fixture)
    }

    /// Get the loaded catalog
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded yet.
    pub fn catalog(&self) -> Result<&Catalog<'a>, FixtureError> {
        self.catalog.as_ref().ok_or(FixtureError::NoCatalog)
    }

    /// Get all promotion rules, in application order
    pub fn promotions(&self) -> &[Promotion<'a>] {
        &self.promotions
    }

    /// Get a named order
    ///
    /// # Errors
    ///
    /// Returns an error if no order with that name was loaded.
    pub fn order(&self, name: &str) -> Result<&Order, FixtureError> {
        self.orders
            .get(name)
            .ok_or_else(|| FixtureError::OrderNotFound(name.to_string()))
    }

    /// Get the loaded order names, sorted
    pub fn order_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.orders.keys().map(String::as_str).collect();

        names.sort_unstable();
        names
    }

    /// Assemble a pricing engine from the loaded catalog and promotions
    ///
    /// # Errors
    ///
    /// Returns an error if no catalog has been loaded or the engine rejects
    /// the configuration.
    pub fn engine(&self) -> Result<PricingEngine<'a>, FixtureError> {
        let catalog = self.catalog()?.clone();

        Ok(PricingEngine::new(
            catalog,
            self.promotions.iter().cloned(),
        )?)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

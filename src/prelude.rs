//! Tally prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    catalog::{Catalog, CatalogEntry, CatalogError},
    fixtures::{Fixture, FixtureError},
    orders::{Order, OrderLine},
    pricing::{ConfigError, PricingEngine, PricingError},
    promotions::{
        BundleComponent, PriceComponent, Promotion, PromotionError, PromotionKey, firings::Firing,
    },
    receipt::{FullPriceLine, Receipt, ReceiptError},
    sku::Sku,
};

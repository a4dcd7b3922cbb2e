//! Promotions
//!
//! A promotion rule bundles a set of required SKU quantities with the price
//! charged when the bundle is taken: a flat base price plus any number of
//! percentage-of-catalog-price components. Rules are validated on
//! construction so that a firing always consumes at least one unit.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use slotmap::new_key_type;
use smallvec::SmallVec;
use thiserror::Error;

use crate::sku::Sku;

pub mod firings;

new_key_type! {
    /// Promotion Key
    pub struct PromotionKey;
}

/// Errors related to promotion rule construction.
#[derive(Debug, Error, PartialEq)]
pub enum PromotionError {
    /// The rule has no bundle components, so it could never consume anything.
    #[error("promotion has no bundle components")]
    NoComponents,

    /// A bundle component requires a quantity of zero.
    #[error("component for SKU '{0}' requires a quantity of zero")]
    ZeroQuantityComponent(Sku),

    /// The same SKU appears in more than one bundle component.
    #[error("SKU '{0}' appears in more than one bundle component")]
    DuplicateComponent(Sku),

    /// The base price is negative.
    #[error("promotion base price is negative")]
    NegativeBasePrice,

    /// A price component uses a negative percentage.
    #[error("price component for SKU '{0}' has a negative percentage")]
    NegativePercentage(Sku),
}

/// A required part of a promotion bundle: a SKU and the quantity of it one
/// firing consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleComponent {
    sku: Sku,
    quantity: u32,
}

impl BundleComponent {
    /// Creates a new bundle component.
    pub fn new(sku: impl Into<Sku>, quantity: u32) -> Self {
        Self {
            sku: sku.into(),
            quantity,
        }
    }

    /// Returns the SKU this component consumes.
    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Returns the quantity one firing consumes.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// A percentage-of-catalog-price part of a promotion's charge.
///
/// The percentage is relative to the SKU's full catalog price: 100 charges
/// the full price, 50 half of it, 0 nothing. Values above 100 are legal and
/// charge a multiple of the catalog price.
#[derive(Debug, Clone)]
pub struct PriceComponent {
    sku: Sku,
    portion: Percentage,
}

impl PriceComponent {
    /// Creates a new price component from a percent-of-catalog-price figure.
    ///
    /// # Errors
    ///
    /// Returns [`PromotionError::NegativePercentage`] if `percentage` is
    /// negative.
    pub fn new(sku: impl Into<Sku>, percentage: Decimal) -> Result<Self, PromotionError> {
        let sku = sku.into();

        if percentage < Decimal::ZERO {
            return Err(PromotionError::NegativePercentage(sku));
        }

        Ok(Self {
            sku,
            portion: Percentage::from(percentage / Decimal::ONE_HUNDRED),
        })
    }

    /// Returns the SKU whose catalog price the component is based on.
    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Returns the portion of the catalog price this component charges.
    pub fn portion(&self) -> Percentage {
        self.portion
    }
}

/// A promotion rule.
#[derive(Debug, Clone)]
pub struct Promotion<'a> {
    label: String,
    components: SmallVec<[BundleComponent; 2]>,
    base_price: Money<'a, Currency>,
    price_components: SmallVec<[PriceComponent; 2]>,
}

impl<'a> Promotion<'a> {
    /// Create a new promotion rule.
    ///
    /// # Errors
    ///
    /// Returns a `PromotionError` if the rule has no bundle components, a
    /// component consumes a quantity of zero, the same SKU appears in two
    /// components, or the base price is negative.
    pub fn new(
        label: impl Into<String>,
        components: impl IntoIterator<Item = BundleComponent>,
        base_price: Money<'a, Currency>,
        price_components: impl IntoIterator<Item = PriceComponent>,
    ) -> Result<Self, PromotionError> {
        let components: SmallVec<[BundleComponent; 2]> = components.into_iter().collect();

        if components.is_empty() {
            return Err(PromotionError::NoComponents);
        }

        for (i, component) in components.iter().enumerate() {
            if component.quantity == 0 {
                return Err(PromotionError::ZeroQuantityComponent(component.sku.clone()));
            }

            if components
                .iter()
                .take(i)
                .any(|earlier| earlier.sku == component.sku)
            {
                return Err(PromotionError::DuplicateComponent(component.sku.clone()));
            }
        }

        if base_price.to_minor_units() < 0 {
            return Err(PromotionError::NegativeBasePrice);
        }

        Ok(Self {
            label: label.into(),
            components,
            base_price,
            price_components: price_components.into_iter().collect(),
        })
    }

    /// Return the human-readable label of the rule.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Return the bundle components one firing consumes.
    pub fn components(&self) -> &[BundleComponent] {
        &self.components
    }

    /// Return the flat price charged per firing.
    pub fn base_price(&self) -> &Money<'a, Currency> {
        &self.base_price
    }

    /// Return the percentage-of-catalog-price components charged per firing.
    pub fn price_components(&self) -> &[PriceComponent] {
        &self.price_components
    }
}

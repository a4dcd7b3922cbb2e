//! Pricing
//!
//! The pricing engine applies promotion rules to an order in a greedy
//! single forward pass, then prices whatever the rules did not consume at
//! full catalog price.

use decimal_percentage::Percentage;
use num_traits::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use slotmap::SlotMap;
use thiserror::Error;

use crate::{
    catalog::Catalog,
    orders::Order,
    promotions::{BundleComponent, Promotion, PromotionKey, firings::Firing},
    receipt::{FullPriceLine, Receipt},
    sku::Sku,
};

/// Errors raised while assembling a pricing engine.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A promotion's base-price currency differs from the catalog currency
    /// (index, promotion currency, catalog currency).
    #[error("Promotion {0} has currency {1}, but catalog has currency {2}")]
    CurrencyMismatch(usize, &'static str, &'static str),
}

/// Errors that can occur while pricing an order.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// Pricing required a SKU the catalog does not list.
    #[error("SKU '{0}' is not listed in the catalog")]
    UnknownSku(Sku),

    /// A monetary amount exceeded the representable range.
    #[error("monetary amount exceeded the representable range")]
    AmountOverflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// The pricing engine: a catalog plus an ordered list of promotion rules.
///
/// Read-only once constructed, so an engine can be shared freely; every call
/// to [`PricingEngine::price`] works on its own quantity ledger and never
/// mutates the order it is given.
#[derive(Debug)]
pub struct PricingEngine<'a> {
    catalog: Catalog<'a>,
    promotions: SlotMap<PromotionKey, Promotion<'a>>,
    sequence: Vec<PromotionKey>,
}

impl<'a> PricingEngine<'a> {
    /// Create a new engine from a catalog and promotion rules.
    ///
    /// The supplied rule order is preserved and decides which rules get
    /// first claim on order quantities.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a promotion's base-price currency
    /// differs from the catalog currency.
    pub fn new(
        catalog: Catalog<'a>,
        promotions: impl IntoIterator<Item = Promotion<'a>>,
    ) -> Result<Self, ConfigError> {
        let mut keyed = SlotMap::with_key();
        let mut sequence = Vec::new();

        for (i, promotion) in promotions.into_iter().enumerate() {
            let promotion_currency = promotion.base_price().currency();
            if promotion_currency != catalog.currency() {
                return Err(ConfigError::CurrencyMismatch(
                    i,
                    promotion_currency.iso_alpha_code,
                    catalog.currency().iso_alpha_code,
                ));
            }

            sequence.push(keyed.insert(promotion));
        }

        Ok(Self {
            catalog,
            promotions: keyed,
            sequence,
        })
    }

    /// Get the catalog the engine prices against.
    pub fn catalog(&self) -> &Catalog<'a> {
        &self.catalog
    }

    /// Look up a promotion rule by its key.
    pub fn promotion(&self, key: PromotionKey) -> Option<&Promotion<'a>> {
        self.promotions.get(key)
    }

    /// Get the number of promotion rules the engine applies.
    pub fn promotion_count(&self) -> usize {
        self.sequence.len()
    }

    /// Price an order into a full receipt.
    ///
    /// Each rule is applied repeatedly until the working quantities no
    /// longer satisfy all of its components, then the next rule is tried;
    /// earlier rules are never revisited. Whatever remains unconsumed is
    /// charged at catalog price.
    ///
    /// Catalog lookups happen only when an amount is actually charged, so a
    /// SKU that promotions fully consume never needs a listing.
    ///
    /// # Errors
    ///
    /// - [`PricingError::UnknownSku`]: a leftover line or a promotion price
    ///   component referenced a SKU the catalog does not list.
    /// - [`PricingError::AmountOverflow`]: an amount exceeded the
    ///   representable minor-unit range.
    /// - [`PricingError::Money`]: wrapped money arithmetic error.
    pub fn price(&self, order: &Order) -> Result<Receipt<'a>, PricingError> {
        let currency = self.catalog.currency();
        let mut ledger = QuantityLedger::from_order(order);

        let mut fired: Vec<PromotionKey> = Vec::new();

        for &key in &self.sequence {
            let Some(promotion) = self.promotions.get(key) else {
                continue;
            };

            while ledger.try_consume(promotion.components()) {
                fired.push(key);
            }
        }

        let mut firings = Vec::with_capacity(fired.len());
        let mut promotions_minor = 0i64;

        for key in fired {
            let Some(promotion) = self.promotions.get(key) else {
                continue;
            };

            let charge = self.promotion_charge(promotion)?;

            promotions_minor = promotions_minor
                .checked_add(charge)
                .ok_or(PricingError::AmountOverflow)?;

            firings.push(Firing::new(key, Money::from_minor(charge, currency)));
        }

        let mut full_price = Vec::new();
        let mut full_price_minor = 0i64;

        for (sku, quantity) in ledger.leftovers() {
            let listed = self
                .catalog
                .price(sku)
                .ok_or_else(|| PricingError::UnknownSku(sku.clone()))?;

            let line_minor = listed
                .to_minor_units()
                .checked_mul(i64::from(quantity))
                .ok_or(PricingError::AmountOverflow)?;

            full_price_minor = full_price_minor
                .checked_add(line_minor)
                .ok_or(PricingError::AmountOverflow)?;

            full_price.push(FullPriceLine::new(
                sku.clone(),
                quantity,
                Money::from_minor(line_minor, currency),
            ));
        }

        let promotions_total = Money::from_minor(promotions_minor, currency);
        let full_price_total = Money::from_minor(full_price_minor, currency);
        let total = promotions_total.add(full_price_total)?;

        Ok(Receipt::new(
            firings,
            full_price,
            promotions_total,
            full_price_total,
            total,
            currency,
        ))
    }

    /// Calculate the total price of an order.
    ///
    /// # Errors
    ///
    /// See [`PricingEngine::price`].
    pub fn total(&self, order: &Order) -> Result<Money<'a, Currency>, PricingError> {
        Ok(self.price(order)?.total())
    }

    /// Price one firing of a rule: the base price plus every
    /// percentage-of-catalog-price component.
    fn promotion_charge(&self, promotion: &Promotion<'a>) -> Result<i64, PricingError> {
        let mut charge = promotion.base_price().to_minor_units();

        for component in promotion.price_components() {
            let listed = self
                .catalog
                .price(component.sku())
                .ok_or_else(|| PricingError::UnknownSku(component.sku().clone()))?;

            let amount = portion_of_minor(component.portion(), listed.to_minor_units())?;

            charge = charge
                .checked_add(amount)
                .ok_or(PricingError::AmountOverflow)?;
        }

        Ok(charge)
    }
}

/// Working quantities for a single calculation: what the rules have not yet
/// consumed, keyed by SKU. Leftovers are reported in the order SKUs first
/// appeared so receipts come out deterministic.
#[derive(Debug)]
struct QuantityLedger {
    remaining: FxHashMap<Sku, u32>,
    sequence: Vec<Sku>,
}

impl QuantityLedger {
    /// Build a ledger from an order, merging duplicate SKUs across lines.
    fn from_order(order: &Order) -> Self {
        let mut remaining: FxHashMap<Sku, u32> = FxHashMap::default();
        let mut sequence = Vec::new();

        for line in order.lines() {
            if let Some(quantity) = remaining.get_mut(line.sku()) {
                *quantity = quantity.saturating_add(line.quantity());
            } else {
                remaining.insert(line.sku().clone(), line.quantity());
                sequence.push(line.sku().clone());
            }
        }

        QuantityLedger {
            remaining,
            sequence,
        }
    }

    /// Check whether every component's quantity is still available.
    /// A SKU with no ledger entry counts as zero.
    fn satisfies(&self, components: &[BundleComponent]) -> bool {
        components.iter().all(|component| {
            self.remaining
                .get(component.sku())
                .copied()
                .unwrap_or(0)
                >= component.quantity()
        })
    }

    /// Consume one firing's worth of quantities if every component is
    /// satisfied. Returns whether anything was consumed.
    fn try_consume(&mut self, components: &[BundleComponent]) -> bool {
        if !self.satisfies(components) {
            return false;
        }

        for component in components {
            if let Some(quantity) = self.remaining.get_mut(component.sku()) {
                *quantity = quantity.saturating_sub(component.quantity());
            }
        }

        true
    }

    /// Iterate over the SKUs with quantity still unconsumed, in first-seen
    /// order.
    fn leftovers(&self) -> impl Iterator<Item = (&Sku, u32)> {
        self.sequence.iter().filter_map(|sku| {
            let quantity = self.remaining.get(sku).copied().unwrap_or(0);

            (quantity > 0).then_some((sku, quantity))
        })
    }
}

/// Calculate a portion of a minor-unit amount, rounded half away from zero.
fn portion_of_minor(portion: Percentage, minor: i64) -> Result<i64, PricingError> {
    let Some(minor) = Decimal::from_i64(minor) else {
        unreachable!("always returns `Some` for every `i64`")
    };

    let applied = portion * minor;
    let rounded = applied.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

    rounded.to_i64().ok_or(PricingError::AmountOverflow)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::{
        catalog::CatalogEntry,
        orders::OrderLine,
        promotions::PriceComponent,
    };

    use super::*;

    fn test_catalog<'a>() -> Result<Catalog<'a>, crate::catalog::CatalogError> {
        Catalog::with_entries(
            [
                CatalogEntry::new("A", Money::from_minor(5000, iso::GBP)),
                CatalogEntry::new("B", Money::from_minor(3000, iso::GBP)),
                CatalogEntry::new("C", Money::from_minor(2000, iso::GBP)),
            ],
            iso::GBP,
        )
    }

    #[test]
    fn ledger_merges_duplicate_lines() {
        let order = Order::with_lines([
            OrderLine::new("A", 2),
            OrderLine::new("B", 1),
            OrderLine::new("A", 3),
        ]);

        let ledger = QuantityLedger::from_order(&order);

        assert!(ledger.satisfies(&[BundleComponent::new("A", 5)]));
        assert!(!ledger.satisfies(&[BundleComponent::new("A", 6)]));
    }

    #[test]
    fn ledger_counts_missing_sku_as_zero() {
        let order = Order::with_lines([OrderLine::new("A", 2)]);
        let ledger = QuantityLedger::from_order(&order);

        assert!(!ledger.satisfies(&[BundleComponent::new("Z", 1)]));
    }

    #[test]
    fn ledger_try_consume_decrements_until_exhausted() {
        let order = Order::with_lines([OrderLine::new("A", 5)]);
        let mut ledger = QuantityLedger::from_order(&order);
        let components = [BundleComponent::new("A", 2)];

        assert!(ledger.try_consume(&components));
        assert!(ledger.try_consume(&components));
        assert!(!ledger.try_consume(&components));

        let leftovers: Vec<(&Sku, u32)> = ledger.leftovers().collect();

        assert_eq!(leftovers, vec![(&Sku::from("A"), 1)]);
    }

    #[test]
    fn ledger_leftovers_keep_first_seen_order_and_skip_consumed() {
        let order = Order::with_lines([
            OrderLine::new("B", 1),
            OrderLine::new("A", 2),
            OrderLine::new("C", 1),
        ]);

        let mut ledger = QuantityLedger::from_order(&order);

        assert!(ledger.try_consume(&[BundleComponent::new("A", 2)]));

        let leftovers: Vec<(&Sku, u32)> = ledger.leftovers().collect();

        assert_eq!(leftovers, vec![(&Sku::from("B"), 1), (&Sku::from("C"), 1)]);
    }

    #[test]
    fn portion_of_minor_scales_exactly() -> TestResult {
        let component = PriceComponent::new("C", Decimal::from(200))?;

        assert_eq!(portion_of_minor(component.portion(), 2000)?, 4000);

        Ok(())
    }

    #[test]
    fn portion_of_minor_zero_percent_contributes_nothing() -> TestResult {
        let component = PriceComponent::new("C", Decimal::ZERO)?;

        assert_eq!(portion_of_minor(component.portion(), 2000)?, 0);

        Ok(())
    }

    #[test]
    fn portion_of_minor_rounds_half_away_from_zero() -> TestResult {
        let component = PriceComponent::new("C", Decimal::from(50))?;

        // 50% of 25 minor units is 12.5, which rounds to 13.
        assert_eq!(portion_of_minor(component.portion(), 25)?, 13);

        Ok(())
    }

    #[test]
    fn new_rejects_promotion_currency_mismatch() -> TestResult {
        let catalog = test_catalog()?;

        let promotion = Promotion::new(
            "Dollar bundle",
            [BundleComponent::new("A", 1)],
            Money::from_minor(100, iso::USD),
            [],
        )?;

        let result = PricingEngine::new(catalog, [promotion]);

        match result {
            Err(ConfigError::CurrencyMismatch(idx, promotion_currency, catalog_currency)) => {
                assert_eq!(idx, 0);
                assert_eq!(promotion_currency, iso::USD.iso_alpha_code);
                assert_eq!(catalog_currency, iso::GBP.iso_alpha_code);
            }
            other => panic!("expected CurrencyMismatch error, got {other:?}"),
        }

        Ok(())
    }

    #[test]
    fn total_without_promotions_is_catalog_sum() -> TestResult {
        let engine = PricingEngine::new(test_catalog()?, [])?;

        let order = Order::with_lines([OrderLine::new("A", 2), OrderLine::new("C", 1)]);

        assert_eq!(engine.total(&order)?, Money::from_minor(12000, iso::GBP));

        Ok(())
    }

    #[test]
    fn unknown_leftover_sku_fails_pricing() -> TestResult {
        let engine = PricingEngine::new(test_catalog()?, [])?;

        let order = Order::with_lines([OrderLine::new("Z", 1)]);

        assert_eq!(
            engine.total(&order),
            Err(PricingError::UnknownSku(Sku::from("Z")))
        );

        Ok(())
    }

    #[test]
    fn unknown_price_component_sku_fails_pricing() -> TestResult {
        let promotion = Promotion::new(
            "Priced off a ghost",
            [BundleComponent::new("A", 1)],
            Money::from_minor(0, iso::GBP),
            [PriceComponent::new("Z", Decimal::from(100))?],
        )?;

        let engine = PricingEngine::new(test_catalog()?, [promotion])?;

        let order = Order::with_lines([OrderLine::new("A", 1)]);

        assert_eq!(
            engine.total(&order),
            Err(PricingError::UnknownSku(Sku::from("Z")))
        );

        Ok(())
    }

    #[test]
    fn unlisted_sku_consumed_by_bundle_component_still_prices() -> TestResult {
        // "Z" has no catalog listing, but the rule consumes all of it as a
        // plain quantity requirement, so pricing never needs to look it up.
        let promotion = Promotion::new(
            "A with a freebie",
            [BundleComponent::new("A", 1), BundleComponent::new("Z", 1)],
            Money::from_minor(5500, iso::GBP),
            [],
        )?;

        let engine = PricingEngine::new(test_catalog()?, [promotion])?;

        let order = Order::with_lines([OrderLine::new("A", 1), OrderLine::new("Z", 1)]);

        assert_eq!(engine.total(&order)?, Money::from_minor(5500, iso::GBP));

        Ok(())
    }
}

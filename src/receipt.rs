//! Receipt

use std::io;

use decimal_percentage::Percentage;
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    pricing::PricingEngine,
    promotions::{PromotionKey, firings::Firing},
    sku::Sku,
};

/// Errors that can occur when rendering a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A firing references a promotion the engine does not know.
    #[error("Missing promotion")]
    MissingPromotion(PromotionKey),

    /// IO error
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// An order line (or merged set of lines) charged at full catalog price
/// because no promotion consumed it.
#[derive(Debug, Clone)]
pub struct FullPriceLine<'a> {
    sku: Sku,
    quantity: u32,
    charge: Money<'a, Currency>,
}

impl<'a> FullPriceLine<'a> {
    /// Creates a new full-price line.
    pub fn new(sku: Sku, quantity: u32, charge: Money<'a, Currency>) -> Self {
        Self {
            sku,
            quantity,
            charge,
        }
    }

    /// Return the SKU charged at full price.
    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Return the unconsumed quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Return the charge for the line (unit price times quantity).
    pub fn charge(&self) -> Money<'a, Currency> {
        self.charge
    }
}

/// Final receipt for a priced order.
#[derive(Debug, Clone)]
pub struct Receipt<'a> {
    /// Every promotion firing, in the order the rules were applied
    firings: Vec<Firing<'a>>,

    /// Quantities no promotion consumed, charged at catalog price
    full_price: Vec<FullPriceLine<'a>>,

    /// Sum of all firing charges
    promotions_total: Money<'a, Currency>,

    /// Sum of all full-price line charges
    full_price_total: Money<'a, Currency>,

    /// Total amount payable for the order
    total: Money<'a, Currency>,

    /// Currency used for all monetary values
    currency: &'static Currency,
}

impl<'a> Receipt<'a> {
    /// Create a new receipt with the given details.
    pub fn new(
        firings: Vec<Firing<'a>>,
        full_price: Vec<FullPriceLine<'a>>,
        promotions_total: Money<'a, Currency>,
        full_price_total: Money<'a, Currency>,
        total: Money<'a, Currency>,
        currency: &'static Currency,
    ) -> Self {
        Self {
            firings,
            full_price,
            promotions_total,
            full_price_total,
            total,
            currency,
        }
    }

    /// The promotion firings, in application order.
    pub fn firings(&self) -> &[Firing<'a>] {
        &self.firings
    }

    /// The lines charged at full catalog price.
    pub fn full_price_lines(&self) -> &[FullPriceLine<'a>] {
        &self.full_price
    }

    /// Sum of all firing charges.
    pub fn promotions_total(&self) -> Money<'a, Currency> {
        self.promotions_total
    }

    /// Sum of all full-price line charges.
    pub fn full_price_total(&self) -> Money<'a, Currency> {
        self.full_price_total
    }

    /// Total amount payable for the order.
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Currency of every amount on the receipt.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// The fraction of the total covered by promotion charges.
    ///
    /// A zero total yields a zero share.
    pub fn promotion_share(&self) -> Percentage {
        let promotions_minor = self.promotions_total.to_minor_units();
        let total_minor = self.total.to_minor_units();

        if total_minor == 0 {
            return Percentage::from(0.0);
        }

        let promotions_dec = Decimal::from_i64(promotions_minor).unwrap_or(Decimal::ZERO);
        let total_dec = Decimal::from_i64(total_minor).unwrap_or(Decimal::ZERO);

        Percentage::from(promotions_dec / total_dec)
    }

    /// Render the receipt as a table followed by a totals summary.
    ///
    /// Promotion labels are resolved through the engine that produced the
    /// receipt.
    ///
    /// # Errors
    ///
    /// Returns a [`ReceiptError`] if a firing references a promotion the
    /// engine does not know, or if writing to `out` fails.
    pub fn write_to(
        &self,
        mut out: impl io::Write,
        engine: &PricingEngine<'_>,
    ) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["Line", "Qty", "Charge"]);

        for firing in &self.firings {
            let promotion = engine
                .promotion(firing.promotion())
                .ok_or(ReceiptError::MissingPromotion(firing.promotion()))?;

            builder.push_record([
                promotion.label().to_string(),
                String::new(),
                firing.charge().to_string(),
            ]);
        }

        for line in &self.full_price {
            builder.push_record([
                line.sku().to_string(),
                line.quantity().to_string(),
                line.charge().to_string(),
            ]);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Alignment::center());
        table.modify(Columns::last(), Alignment::right());

        writeln!(out, "{table}")?;
        writeln!(out, " Promotions: {}", self.promotions_total)?;
        writeln!(out, " Full price: {}", self.full_price_total)?;
        writeln!(out, " Total:      {}", self.total)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso;
    use testresult::TestResult;

    use crate::{
        catalog::{Catalog, CatalogEntry},
        orders::{Order, OrderLine},
        promotions::{BundleComponent, Promotion},
    };

    use super::*;

    fn test_receipt<'a>() -> Receipt<'a> {
        Receipt::new(
            Vec::new(),
            vec![FullPriceLine::new(
                Sku::from("B"),
                1,
                Money::from_minor(3000, iso::GBP),
            )],
            Money::from_minor(13000, iso::GBP),
            Money::from_minor(3000, iso::GBP),
            Money::from_minor(16000, iso::GBP),
            iso::GBP,
        )
    }

    #[test]
    fn accessors_return_values_from_constructor() {
        let receipt = test_receipt();

        assert_eq!(
            receipt.promotions_total(),
            Money::from_minor(13000, iso::GBP)
        );
        assert_eq!(receipt.full_price_total(), Money::from_minor(3000, iso::GBP));
        assert_eq!(receipt.total(), Money::from_minor(16000, iso::GBP));
        assert_eq!(receipt.currency(), iso::GBP);
        assert!(receipt.firings().is_empty());
        assert_eq!(receipt.full_price_lines().len(), 1);
    }

    #[test]
    fn full_price_line_accessors() {
        let line = FullPriceLine::new(Sku::from("B"), 2, Money::from_minor(6000, iso::GBP));

        assert_eq!(line.sku(), &Sku::from("B"));
        assert_eq!(line.quantity(), 2);
        assert_eq!(line.charge(), Money::from_minor(6000, iso::GBP));
    }

    #[test]
    fn promotion_share_is_ratio_of_promotions_to_total() {
        let receipt = test_receipt();

        assert_eq!(receipt.promotion_share(), Percentage::from(0.8125));
    }

    #[test]
    fn promotion_share_is_zero_for_zero_total() {
        let receipt = Receipt::new(
            Vec::new(),
            Vec::new(),
            Money::from_minor(0, iso::GBP),
            Money::from_minor(0, iso::GBP),
            Money::from_minor(0, iso::GBP),
            iso::GBP,
        );

        assert_eq!(receipt.promotion_share(), Percentage::from(0.0));
    }

    #[test]
    fn write_to_renders_firings_and_full_price_lines() -> TestResult {
        let catalog = Catalog::with_entries(
            [
                CatalogEntry::new("A", Money::from_minor(5000, iso::GBP)),
                CatalogEntry::new("B", Money::from_minor(3000, iso::GBP)),
            ],
            iso::GBP,
        )?;

        let promotion = Promotion::new(
            "Three A for 130",
            [BundleComponent::new("A", 3)],
            Money::from_minor(13000, iso::GBP),
            [],
        )?;

        let engine = PricingEngine::new(catalog, [promotion])?;

        let order = Order::with_lines([OrderLine::new("A", 3), OrderLine::new("B", 1)]);
        let receipt = engine.price(&order)?;

        let mut out = Vec::new();
        receipt.write_to(&mut out, &engine)?;

        let output = String::from_utf8(out)?;

        assert!(output.contains("Three A for 130"));
        assert!(output.contains("B"));
        assert!(output.contains("Promotions:"));
        assert!(output.contains("Total:"));

        Ok(())
    }

    #[test]
    fn write_to_errors_on_missing_promotion() -> TestResult {
        let catalog = Catalog::with_entries(
            [CatalogEntry::new("A", Money::from_minor(5000, iso::GBP))],
            iso::GBP,
        )?;

        let engine = PricingEngine::new(catalog, [])?;

        let receipt = Receipt::new(
            vec![Firing::new(
                PromotionKey::default(),
                Money::from_minor(100, iso::GBP),
            )],
            Vec::new(),
            Money::from_minor(100, iso::GBP),
            Money::from_minor(0, iso::GBP),
            Money::from_minor(100, iso::GBP),
            iso::GBP,
        );

        let result = receipt.write_to(Vec::new(), &engine);

        assert!(matches!(result, Err(ReceiptError::MissingPromotion(_))));

        Ok(())
    }
}

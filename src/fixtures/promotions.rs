//! Promotion Fixtures

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use rusty_money::Money;
use serde::Deserialize;

use crate::{
    fixtures::{FixtureError, catalogs::parse_price},
    promotions::{BundleComponent, PriceComponent, Promotion},
};

/// Wrapper for promotions in YAML
#[derive(Debug, Deserialize)]
pub struct PromotionsFixture {
    /// Promotion rules, in application order
    pub promotions: Vec<PromotionFixture>,
}

/// Promotion Fixture
#[derive(Debug, Deserialize)]
pub struct PromotionFixture {
    /// Human-readable rule label
    pub label: String,

    /// Required SKU quantities per firing
    pub components: FxHashMap<String, u32>,

    /// Flat price charged per firing (e.g., "130.00 GBP")
    pub base_price: String,

    /// Percent-of-catalog-price components (SKU -> percentage, 100 = full price)
    #[serde(default)]
    pub price_components: FxHashMap<String, Decimal>,
}

impl TryFrom<PromotionFixture> for Promotion<'_> {
    type Error = FixtureError;

    fn try_from(fixture: PromotionFixture) -> Result<Self, Self::Error> {
        let (minor_units, currency) = parse_price(&fixture.base_price)?;
        let base_price = Money::from_minor(minor_units, currency);

        let components: Vec<BundleComponent> = fixture
            .components
            .into_iter()
            .map(|(sku, quantity)| BundleComponent::new(sku, quantity))
            .collect();

        let price_components = fixture
            .price_components
            .into_iter()
            .map(|(sku, percentage)| PriceComponent::new(sku, percentage))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Promotion::new(
            fixture.label,
            components,
            base_price,
            price_components,
        )?)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn try_from_builds_a_promotion() -> TestResult {
        let yaml = "\
promotions:
  - label: Three A for 130
    components:
      A: 3
    base_price: 130.00 GBP
";

        let fixture: PromotionsFixture = serde_norway::from_str(yaml)?;
        let Some(parsed) = fixture.promotions.into_iter().next() else {
            panic!("fixture should contain one promotion");
        };

        let promotion = Promotion::try_from(parsed)?;

        assert_eq!(promotion.label(), "Three A for 130");
        assert_eq!(promotion.components().len(), 1);
        assert_eq!(promotion.base_price().to_minor_units(), 13000);
        assert!(promotion.price_components().is_empty());

        Ok(())
    }

    #[test]
    fn try_from_carries_price_components() -> TestResult {
        let yaml = "\
promotions:
  - label: Three C for the price of two
    components:
      C: 3
    base_price: 0.00 GBP
    price_components:
      C: 200
";

        let fixture: PromotionsFixture = serde_norway::from_str(yaml)?;
        let Some(parsed) = fixture.promotions.into_iter().next() else {
            panic!("fixture should contain one promotion");
        };

        let promotion = Promotion::try_from(parsed)?;

        assert_eq!(promotion.price_components().len(), 1);
        assert_eq!(
            promotion
                .price_components()
                .first()
                .map(|component| component.portion() * Decimal::from(2000)),
            Some(Decimal::from(4000))
        );

        Ok(())
    }

    #[test]
    fn try_from_rejects_empty_components() -> TestResult {
        let yaml = "\
promotions:
  - label: Empty
    components: {}
    base_price: 1.00 GBP
";

        let fixture: PromotionsFixture = serde_norway::from_str(yaml)?;
        let Some(parsed) = fixture.promotions.into_iter().next() else {
            panic!("fixture should contain one promotion");
        };

        let result = Promotion::try_from(parsed);

        assert!(matches!(result, Err(FixtureError::Promotion(_))));

        Ok(())
    }
}

//! Promotion Firings

use rusty_money::{Money, iso::Currency};

use crate::promotions::PromotionKey;

/// One successful application of a promotion rule against an order.
#[derive(Debug, Clone)]
pub struct Firing<'a> {
    /// Key of the promotion that fired
    promotion: PromotionKey,

    /// Price this firing contributed to the order total
    charge: Money<'a, Currency>,
}

impl<'a> Firing<'a> {
    /// Creates a new firing record.
    pub fn new(promotion: PromotionKey, charge: Money<'a, Currency>) -> Self {
        Self { promotion, charge }
    }

    /// Return the key of the promotion that fired.
    pub fn promotion(&self) -> PromotionKey {
        self.promotion
    }

    /// Return the price this firing contributed.
    pub fn charge(&self) -> Money<'a, Currency> {
        self.charge
    }
}

//! Order Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::orders::OrderLine;

/// Wrapper for named orders in YAML
#[derive(Debug, Deserialize)]
pub struct OrdersFixture {
    /// Map of order name -> order lines
    pub orders: FxHashMap<String, Vec<OrderLineFixture>>,
}

/// One order line in YAML
#[derive(Debug, Deserialize)]
pub struct OrderLineFixture {
    /// SKU ordered
    pub sku: String,

    /// Quantity ordered
    pub quantity: u32,
}

impl From<OrderLineFixture> for OrderLine {
    fn from(fixture: OrderLineFixture) -> Self {
        OrderLine::new(fixture.sku, fixture.quantity)
    }
}

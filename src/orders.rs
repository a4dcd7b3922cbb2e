//! Orders

use crate::sku::Sku;

/// One line of a customer order: a SKU and how many of it were ordered.
///
/// The same SKU may appear on several lines; lines are merged into a single
/// working quantity when the order is priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    sku: Sku,
    quantity: u32,
}

impl OrderLine {
    /// Creates a new order line.
    pub fn new(sku: impl Into<Sku>, quantity: u32) -> Self {
        Self {
            sku: sku.into(),
            quantity,
        }
    }

    /// Returns the SKU of the line.
    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Returns the ordered quantity.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// A customer order: an ordered sequence of lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Order {
    lines: Vec<OrderLine>,
}

impl Order {
    /// Create a new empty order.
    pub fn new() -> Self {
        Order { lines: Vec::new() }
    }

    /// Create an order with the given lines.
    pub fn with_lines(lines: impl Into<Vec<OrderLine>>) -> Self {
        Order {
            lines: lines.into(),
        }
    }

    /// Append a line to the order.
    pub fn add_line(&mut self, line: OrderLine) -> &mut Self {
        self.lines.push(line);
        self
    }

    /// Get the order lines in the sequence they were supplied.
    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Get the number of lines in the order.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the order has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_lines() -> [OrderLine; 3] {
        [
            OrderLine::new("A", 1),
            OrderLine::new("B", 2),
            OrderLine::new("A", 3),
        ]
    }

    #[test]
    fn new_order_is_empty() {
        let order = Order::new();

        assert!(order.is_empty());
        assert_eq!(order.len(), 0);
    }

    #[test]
    fn with_lines_preserves_sequence() {
        let order = Order::with_lines(test_lines());

        assert_eq!(order.len(), 3);
        assert_eq!(order.lines().first(), Some(&OrderLine::new("A", 1)));
        assert_eq!(order.lines().last(), Some(&OrderLine::new("A", 3)));
    }

    #[test]
    fn add_line_appends() {
        let mut order = Order::new();

        order
            .add_line(OrderLine::new("C", 1))
            .add_line(OrderLine::new("D", 1));

        assert_eq!(order.len(), 2);
        assert_eq!(order.lines().last(), Some(&OrderLine::new("D", 1)));
    }

    #[test]
    fn line_accessors_return_constructor_values() {
        let line = OrderLine::new("B", 5);

        assert_eq!(line.sku(), &Sku::from("B"));
        assert_eq!(line.quantity(), 5);
    }
}

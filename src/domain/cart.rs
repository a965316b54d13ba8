//! Session cart value type.
//!
//! A [`CartState`] is a plain value owned by one visitor session. The core
//! never stores carts itself: the surrounding session layer reads a cart,
//! mutates it through these operations, and writes it back.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::product::Product;
use crate::{Result, StorefrontError};

/// One cart entry. Name and price are snapshots taken when the product was
/// first added; later catalog edits do not reach into existing carts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: u64,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartState {
    lines: HashMap<u64, CartLine>,
}

impl CartState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
        self.lines.values()
    }

    pub fn line(&self, product_id: u64) -> Option<&CartLine> {
        self.lines.get(&product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines, not units.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Adds one unit of `product`, merging into an existing line when the
    /// product is already in the cart.
    pub fn add(&mut self, product: &Product) {
        self.lines
            .entry(product.id)
            .and_modify(|line| line.quantity += 1)
            .or_insert_with(|| CartLine {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                quantity: 1,
            });
    }

    /// Sets the line quantity to exactly `quantity`. Zero or negative removes
    /// the line; that is a deletion, not an error.
    pub fn set_quantity(&mut self, product_id: u64, quantity: i64) -> Result<()> {
        let line = self
            .lines
            .get_mut(&product_id)
            .ok_or(StorefrontError::NotInCart)?;
        if quantity > 0 {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        } else {
            self.lines.remove(&product_id);
        }
        Ok(())
    }

    pub fn remove(&mut self, product_id: u64) -> Result<()> {
        self.lines
            .remove(&product_id)
            .map(|_| ())
            .ok_or(StorefrontError::NotInCart)
    }

    /// Sum of `price * quantity` over every line.
    pub fn total(&self) -> Decimal {
        self.lines.values().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over every line.
    pub fn item_count(&self) -> u32 {
        self.lines.values().map(|line| line.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::ProductStatus;
    use chrono::Utc;

    fn product(id: u64, name: &str, price: Decimal) -> Product {
        let now = Utc::now();
        Product {
            id,
            name: name.into(),
            price,
            image: None,
            status: ProductStatus::Active,
            created_by: 1,
            updated_by: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_add_merges_lines() {
        let mut cart = CartState::new();
        let widget = product(1, "Widget", Decimal::new(1000, 2));
        cart.add(&widget);
        cart.add(&widget);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.line(1).unwrap().quantity, 2);
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_item_count_sums_quantities_across_lines() {
        let mut cart = CartState::new();
        cart.add(&product(1, "A", Decimal::ONE));
        cart.add(&product(1, "A", Decimal::ONE));
        cart.add(&product(2, "B", Decimal::ONE));
        assert_eq!(cart.len(), 2);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_set_quantity_is_absolute() {
        let mut cart = CartState::new();
        cart.add(&product(1, "A", Decimal::ONE));
        cart.set_quantity(1, 7).unwrap();
        assert_eq!(cart.line(1).unwrap().quantity, 7);
        cart.set_quantity(1, 3).unwrap();
        assert_eq!(cart.line(1).unwrap().quantity, 3);
    }

    #[test]
    fn test_zero_and_negative_quantity_remove_line() {
        let mut cart = CartState::new();
        cart.add(&product(1, "A", Decimal::ONE));
        cart.set_quantity(1, 0).unwrap();
        assert!(cart.is_empty());

        cart.add(&product(1, "A", Decimal::ONE));
        cart.set_quantity(1, -5).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_mutating_missing_line_fails() {
        let mut cart = CartState::new();
        assert_eq!(cart.set_quantity(9, 1), Err(StorefrontError::NotInCart));
        assert_eq!(cart.remove(9), Err(StorefrontError::NotInCart));
    }

    #[test]
    fn test_total_uses_price_snapshot() {
        let mut cart = CartState::new();
        let mut p = product(1, "A", Decimal::new(1050, 2)); // 10.50
        cart.add(&p);
        cart.set_quantity(1, 2).unwrap();

        // A later catalog price change must not affect the line.
        p.price = Decimal::new(9999, 2);
        assert_eq!(cart.total(), Decimal::new(2100, 2));
        assert_eq!(cart.line(1).unwrap().price, Decimal::new(1050, 2));
    }
}

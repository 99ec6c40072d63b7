use rust_decimal::Decimal;
use uuid::Uuid;

use super::CartItem;
use crate::{entity::DeliveryType, models::Product};

/// The cart's contents without any persistence. Items are keyed by product id
/// and keep insertion order; no line ever holds a zero quantity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartLines {
    items: Vec<CartItem>,
}

impl CartLines {
    /// Build from stored items, dropping empty lines and merging repeated ids.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut lines = Self::default();
        for item in items.into_iter().filter(|i| i.quantity > 0) {
            match lines.position(item.product_id) {
                Some(idx) => {
                    let existing = &mut lines.items[idx];
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => lines.items.push(item),
            }
        }
        lines
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, product_id: Uuid) -> Option<usize> {
        self.items.iter().position(|i| i.product_id == product_id)
    }

    pub fn add(&mut self, product: &Product) {
        match self.position(product.id) {
            Some(idx) => {
                let item = &mut self.items[idx];
                item.quantity = item.quantity.saturating_add(1);
            }
            None => self.items.push(CartItem::from_product(product)),
        }
    }

    /// Returns `false` when the product is not in the cart.
    pub fn update_quantity(&mut self, product_id: Uuid, delta: i64) -> bool {
        let Some(idx) = self.position(product_id) else {
            return false;
        };
        let next = i64::from(self.items[idx].quantity) + delta;
        if next <= 0 {
            self.items.remove(idx);
        } else {
            self.items[idx].quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
        true
    }

    pub fn update_notes(&mut self, product_id: Uuid, notes: &str) -> bool {
        match self.position(product_id) {
            Some(idx) => {
                self.items[idx].notes = notes.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, product_id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn total_price(&self, delivery_type: DeliveryType, delivery_fee: Decimal) -> Decimal {
        match delivery_type {
            DeliveryType::Delivery => self.subtotal() + delivery_fee,
            DeliveryType::Pickup => self.subtotal(),
        }
    }

    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}

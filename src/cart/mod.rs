//! Client-side cart.
//!
//! The storefront keeps the cart on the customer's device and only sends it to
//! the server at checkout. This module is that client half: an ordered list of
//! line items persisted to a local key/value store with debounced writes, plus
//! reconciliation against the live catalog.

pub mod catalog;
mod lines;
pub mod storage;
pub mod store;
pub mod sync;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::Product;

pub use catalog::CatalogProvider;
pub use lines::CartLines;
pub use storage::{CartStorage, FileStorage, MemoryStorage};
pub use store::{CartOptions, CartStore, STORAGE_KEY};
pub use sync::{SyncOutcome, synchronize};

#[derive(Debug, Error)]
pub enum CartError {
    #[error("storage failure: {0}")]
    Storage(#[from] std::io::Error),
    #[error("could not encode cart: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("catalog unavailable: {0}")]
    Catalog(String),
}

/// One cart line. Product details are a snapshot taken when the item was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub image: Option<String>,
    pub category_name: Option<String>,
    pub preparation_time: i32,
    pub quantity: u32,
    #[serde(default)]
    pub notes: String,
}

impl CartItem {
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            category_name: product.category_name.clone(),
            preparation_time: product.preparation_time,
            quantity: 1,
            notes: String::new(),
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::models::Product;

    pub fn product(name: &str, cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            price: Decimal::new(cents, 2),
            category_id: Uuid::nil(),
            category_name: Some("Lanches".into()),
            image: None,
            available: true,
            preparation_time: 15,
            ingredients: None,
            created_at: now,
            updated_at: now,
        }
    }
}

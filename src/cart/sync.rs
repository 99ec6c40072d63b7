use std::collections::HashMap;

use uuid::Uuid;

use super::CartItem;
use crate::models::Product;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyncOutcome {
    pub synchronized: Vec<CartItem>,
    /// Stored names of entries with no available catalog product.
    pub unmatched: Vec<String>,
}

fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Match cart entries against the catalog by product id, falling back to a
/// case-insensitive name match only when the id is gone. Matched entries pick
/// up current catalog details and keep their quantity and notes.
pub fn synchronize(items: &[CartItem], catalog: &[Product]) -> SyncOutcome {
    let by_id: HashMap<Uuid, &Product> = catalog.iter().map(|p| (p.id, p)).collect();
    let mut by_name: HashMap<String, &Product> = HashMap::new();
    for product in catalog {
        by_name.entry(name_key(&product.name)).or_insert(product);
    }

    let mut outcome = SyncOutcome::default();
    for item in items {
        let matched = by_id
            .get(&item.product_id)
            .or_else(|| by_name.get(&name_key(&item.name)))
            .filter(|p| p.available);

        let Some(product) = matched else {
            outcome.unmatched.push(item.name.clone());
            continue;
        };

        if let Some(existing) = outcome
            .synchronized
            .iter_mut()
            .find(|i| i.product_id == product.id)
        {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
            continue;
        }

        let mut refreshed = CartItem::from_product(product);
        refreshed.quantity = item.quantity;
        refreshed.notes = item.notes.clone();
        outcome.synchronized.push(refreshed);
    }
    outcome
}

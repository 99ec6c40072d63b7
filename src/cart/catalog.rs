use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use super::CartError;
use crate::models::Product;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Deserialize)]
struct Envelope {
    data: Option<ProductPage>,
}

#[derive(Deserialize)]
struct ProductPage {
    items: Vec<Product>,
}

/// Reads the storefront catalog from the API, with a static list to fall back on.
#[derive(Debug, Clone)]
pub struct CatalogProvider {
    client: Client,
    base_url: String,
    fallback: Vec<Product>,
}

impl CatalogProvider {
    pub fn new(base_url: impl Into<String>, fallback: Vec<Product>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default http client");
                Client::new()
            });
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            fallback,
        }
    }

    /// Available products, or the fallback catalog when the API cannot be reached.
    pub async fn products(&self) -> Vec<Product> {
        match self.fetch().await {
            Ok(products) => products,
            Err(err) => {
                tracing::warn!(error = %err, base_url = %self.base_url, "catalog fetch failed, using fallback");
                self.fallback.clone()
            }
        }
    }

    pub async fn fetch(&self) -> Result<Vec<Product>, CartError> {
        let url = format!("{}/api/products", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CartError::Catalog(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CartError::Catalog(format!("{url} returned {status}")));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| CartError::Catalog(e.to_string()))?;
        Ok(envelope.data.map(|page| page.items).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::test_support::product;

    #[tokio::test]
    async fn unreachable_api_uses_fallback() {
        // Port 9 (discard) is closed on any sane test host.
        let provider = CatalogProvider::new("http://127.0.0.1:9/", vec![product("X-Burger", 3590)]);
        assert!(provider.fetch().await.is_err());

        let products = provider.products().await;
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "X-Burger");
    }

    #[test]
    fn envelope_parses_api_shape() {
        let body = serde_json::json!({
            "message": "Products",
            "data": { "items": [{
                "id": "6f1c2f5e-0000-4000-8000-000000000001",
                "name": "X-Burger",
                "description": null,
                "price": "35.90",
                "categoryId": "6f1c2f5e-0000-4000-8000-000000000002",
                "categoryName": "Lanches",
                "image": null,
                "available": true,
                "preparationTime": 15,
                "ingredients": null,
                "createdAt": "2026-10-18T12:00:00Z",
                "updatedAt": "2026-10-18T12:00:00Z"
            }]},
            "meta": { "page": 1, "limit": 1, "total": 1, "pages": 1 }
        });
        let envelope: Envelope = serde_json::from_value(body).unwrap();
        let items = envelope.data.unwrap().items;
        assert_eq!(items[0].price, rust_decimal::Decimal::new(3590, 2));
        assert_eq!(items[0].category_name.as_deref(), Some("Lanches"));
    }
}

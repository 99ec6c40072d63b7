use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use validator::{Validate, ValidationErrors};

use super::{non_negative, not_blank};
use crate::models::Product;

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "35.90")]
    #[validate(custom(function = "non_negative"))]
    pub price: Decimal,
    pub category_id: Uuid,
    pub image: Option<String>,
    pub available: Option<bool>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub preparation_time: Option<i32>,
    pub ingredients: Option<String>,
}

/// `PUT /api/admin/products/{id}` accepts either a full edit or a bare
/// availability toggle.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum UpdateProductRequest {
    Full(FullProductUpdate),
    Availability(AvailabilityUpdate),
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FullProductUpdate {
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "35.90")]
    #[validate(custom(function = "non_negative"))]
    pub price: Decimal,
    pub category_id: Uuid,
    pub image: Option<String>,
    pub available: Option<bool>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub preparation_time: Option<i32>,
    pub ingredients: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct AvailabilityUpdate {
    pub available: bool,
}

impl Validate for UpdateProductRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            UpdateProductRequest::Full(full) => full.validate(),
            UpdateProductRequest::Availability(_) => Ok(()),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ProductList {
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductResult {
    pub id: Uuid,
    /// `true` when the product is still referenced by orders and was only disabled.
    pub soft_deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_only_body_is_a_toggle() {
        let req: UpdateProductRequest = serde_json::from_str(r#"{"available": false}"#).unwrap();
        assert!(matches!(
            req,
            UpdateProductRequest::Availability(AvailabilityUpdate { available: false })
        ));
    }

    #[test]
    fn full_body_is_a_full_update() {
        let body = format!(
            r#"{{"name": "X-Burger", "price": "29.90", "categoryId": "{}", "available": true}}"#,
            Uuid::nil()
        );
        let req: UpdateProductRequest = serde_json::from_str(&body).unwrap();
        match req {
            UpdateProductRequest::Full(full) => {
                assert_eq!(full.name, "X-Burger");
                assert_eq!(full.price, Decimal::new(2990, 2));
                assert_eq!(full.available, Some(true));
            }
            other => panic!("expected full update, got {other:?}"),
        }
    }

    #[test]
    fn partial_edits_are_rejected() {
        let req = serde_json::from_str::<UpdateProductRequest>(r#"{"name": "X-Burger"}"#);
        assert!(req.is_err());
        let req = serde_json::from_str::<UpdateProductRequest>(r#"{"available": true, "name": "x"}"#);
        assert!(req.is_err());
    }

    #[test]
    fn negative_price_fails_validation() {
        let req = CreateProductRequest {
            name: "Suco".into(),
            description: None,
            price: Decimal::new(-100, 2),
            category_id: Uuid::nil(),
            image: None,
            available: None,
            preparation_time: None,
            ingredients: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn full_update_is_validated_and_toggle_is_not() {
        let body = format!(
            r#"{{"name": " ", "price": "29.90", "categoryId": "{}"}}"#,
            Uuid::nil()
        );
        let blank: UpdateProductRequest = serde_json::from_str(&body).unwrap();
        assert!(blank.validate().is_err());

        let toggle: UpdateProductRequest = serde_json::from_str(r#"{"available": true}"#).unwrap();
        assert!(toggle.validate().is_ok());
    }
}

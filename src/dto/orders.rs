use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use validator::{Validate, ValidationError};

use super::{non_negative, not_blank};
use crate::{
    entity::{DeliveryType, OrderStatus, PaymentMethod, PaymentStatus},
    models::{Order, OrderItem, Product},
};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(required(message = "is required"))]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    #[validate(nested)]
    pub items: Vec<CreateOrderItem>,
    pub delivery_type: DeliveryType,
    pub payment_method: PaymentMethod,
    pub delivery_address: Option<String>,
    pub customer_phone: Option<String>,
    pub notes: Option<String>,
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "non_negative"))]
    pub discount_amount: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub quantity: i32,
    /// Price the client saw; informational only, the catalog price is charged.
    #[schema(value_type = Option<String>)]
    pub unit_price: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub item: OrderItem,
    pub product: Option<Product>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub order: Order,
    pub customer: Option<CustomerSummary>,
    pub items: Vec<OrderLine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderDetail>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "requires_change"))]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub note: Option<String>,
}

fn requires_change(request: &UpdateOrderRequest) -> Result<(), ValidationError> {
    let has_note = request.note.as_deref().is_some_and(|n| !n.trim().is_empty());
    if request.status.is_none() && request.payment_status.is_none() && !has_note {
        return Err(ValidationError::new("empty_update")
            .with_message("one of status, paymentStatus or note is required".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoticeTemplate {
    #[default]
    OrderSummary,
    StatusUpdate,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppNoticeRequest {
    pub message: Option<NoticeTemplate>,
    #[validate(custom(function = "not_blank"))]
    pub custom_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WhatsAppNoticeResult {
    pub phone: String,
    pub message: String,
    /// `true` when the provider accepted the message.
    pub sent: bool,
    /// Click-to-chat link, returned when no provider is configured.
    pub link: Option<String>,
    pub order: Order,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(user_id: Option<Uuid>, items: Vec<CreateOrderItem>) -> CreateOrderRequest {
        CreateOrderRequest {
            user_id,
            items,
            delivery_type: DeliveryType::Delivery,
            payment_method: PaymentMethod::Pix,
            delivery_address: Some("Rua A, 1".into()),
            customer_phone: Some("11987654321".into()),
            notes: None,
            discount_amount: None,
        }
    }

    fn item(quantity: i32) -> CreateOrderItem {
        CreateOrderItem {
            product_id: Uuid::new_v4(),
            quantity,
            unit_price: Some(Decimal::new(3590, 2)),
            notes: None,
        }
    }

    #[test]
    fn missing_user_is_rejected() {
        let errors = request(None, vec![item(1)]).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("user_id"));
    }

    #[test]
    fn empty_items_are_rejected() {
        let errors = request(Some(Uuid::new_v4()), vec![]).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("items"));
    }

    #[test]
    fn zero_quantity_is_rejected() {
        let result = request(Some(Uuid::new_v4()), vec![item(1), item(0)]).validate();
        assert!(result.is_err());
    }

    #[test]
    fn negative_discount_is_rejected() {
        let mut req = request(Some(Uuid::new_v4()), vec![item(1)]);
        req.discount_amount = Some(Decimal::new(-500, 2));
        assert!(req.validate().is_err());
        req.discount_amount = Some(Decimal::new(500, 2));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn blank_custom_message_is_rejected() {
        let notice = WhatsAppNoticeRequest {
            custom_message: Some("   ".into()),
            ..Default::default()
        };
        assert!(notice.validate().is_err());
        assert!(WhatsAppNoticeRequest::default().validate().is_ok());
    }

    #[test]
    fn well_formed_request_passes() {
        assert!(request(Some(Uuid::new_v4()), vec![item(2)]).validate().is_ok());
    }

    #[test]
    fn wire_format_is_camel_case() {
        let body = format!(
            r#"{{"userId":"{}","items":[{{"productId":"{}","quantity":1,"unitPrice":35.90}}],"deliveryType":"DELIVERY","paymentMethod":"PIX","customerPhone":"11987654321"}}"#,
            Uuid::new_v4(),
            Uuid::new_v4()
        );
        let req: CreateOrderRequest = serde_json::from_str(&body).unwrap();
        assert_eq!(req.delivery_type, DeliveryType::Delivery);
        assert_eq!(req.items[0].unit_price, Some(Decimal::new(3590, 2)));
    }

    #[test]
    fn update_needs_at_least_one_field() {
        assert!(UpdateOrderRequest::default().validate().is_err());
        let blank_note = UpdateOrderRequest {
            note: Some("  ".into()),
            ..Default::default()
        };
        assert!(blank_note.validate().is_err());
        let status_only = UpdateOrderRequest {
            status: Some(OrderStatus::Confirmed),
            ..Default::default()
        };
        assert!(status_only.validate().is_ok());
    }
}

//! WhatsApp notices for customers.
//!
//! Messages go out through an HTTP messaging gateway when one is configured.
//! Without a gateway the caller gets a click-to-chat link instead, which an
//! operator can open by hand.

use std::time::Duration;

use reqwest::{Client, Url};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{
    config::WhatsAppConfig,
    dto::orders::{NoticeTemplate, OrderDetail},
    entity::{DeliveryType, OrderStatus},
};

const CLICK_TO_CHAT_BASE: &str = "https://api.whatsapp.com/send";
const BRAZIL_COUNTRY_CODE: &str = "55";
const MIN_PHONE_DIGITS: usize = 10;
const GATEWAY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum WhatsAppError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Sent,
    Link(String),
}

#[derive(Clone)]
pub enum WhatsAppClient {
    Gateway(GatewayClient),
    LinkOnly,
}

#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    api_url: String,
    api_token: SecretString,
}

impl std::fmt::Debug for WhatsAppClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WhatsAppClient::Gateway(gateway) => f
                .debug_struct("Gateway")
                .field("api_url", &gateway.api_url)
                .field("api_token", &"[REDACTED]")
                .finish(),
            WhatsAppClient::LinkOnly => f.write_str("LinkOnly"),
        }
    }
}

#[derive(Serialize)]
struct GatewayMessage<'a> {
    phone: &'a str,
    message: &'a str,
}

impl WhatsAppClient {
    pub fn from_config(config: Option<&WhatsAppConfig>) -> Self {
        match config {
            Some(cfg) => Self::gateway(&cfg.api_url, cfg.api_token.clone(), GATEWAY_TIMEOUT),
            None => WhatsAppClient::LinkOnly,
        }
    }

    /// Gateway client whose requests give up after `timeout`.
    pub fn gateway(api_url: &str, api_token: SecretString, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "falling back to default http client");
                Client::new()
            });
        WhatsAppClient::Gateway(GatewayClient {
            client,
            api_url: api_url.to_string(),
            api_token,
        })
    }

    /// Deliver `message` to an already normalized phone number.
    #[instrument(skip(self, message), fields(phone = %phone))]
    pub async fn send(&self, phone: &str, message: &str) -> Result<Dispatch, WhatsAppError> {
        match self {
            WhatsAppClient::LinkOnly => Ok(Dispatch::Link(click_to_chat_link(phone, message))),
            WhatsAppClient::Gateway(gateway) => {
                let response = gateway
                    .client
                    .post(&gateway.api_url)
                    .bearer_auth(gateway.api_token.expose_secret())
                    .json(&GatewayMessage { phone, message })
                    .send()
                    .await
                    .map_err(|e| WhatsAppError::Request(e.to_string()))?;

                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    return Err(WhatsAppError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }

                debug!("message accepted by gateway");
                Ok(Dispatch::Sent)
            }
        }
    }
}

/// Keep digits only; an 11-digit national number (DDD + mobile) gets the
/// Brazilian country code. Anything shorter than 10 digits is unusable.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < MIN_PHONE_DIGITS {
        return None;
    }
    if digits.len() == 11 {
        return Some(format!("{BRAZIL_COUNTRY_CODE}{digits}"));
    }
    Some(digits)
}

pub fn click_to_chat_link(phone: &str, message: &str) -> String {
    match Url::parse_with_params(CLICK_TO_CHAT_BASE, &[("phone", phone), ("text", message)]) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{CLICK_TO_CHAT_BASE}?phone={phone}"),
    }
}

pub fn format_brl(value: Decimal) -> String {
    format!("R$ {:.2}", value.round_dp(2)).replace('.', ",")
}

pub fn status_label(status: OrderStatus, delivery_type: DeliveryType) -> &'static str {
    match (status, delivery_type) {
        (OrderStatus::Pending, _) => "aguardando confirmação",
        (OrderStatus::Confirmed, _) => "confirmado",
        (OrderStatus::Preparing, _) => "em preparo",
        (OrderStatus::Ready, DeliveryType::Delivery) => "pronto e saindo para entrega",
        (OrderStatus::Ready, DeliveryType::Pickup) => "pronto para retirada",
        (OrderStatus::Delivered, _) => "entregue",
        (OrderStatus::Cancelled, _) => "cancelado",
    }
}

/// Build the notice text for an order. A custom message replaces the template.
pub fn compose_message(
    template: NoticeTemplate,
    custom_message: Option<&str>,
    detail: &OrderDetail,
) -> String {
    if let Some(custom) = custom_message.map(str::trim).filter(|m| !m.is_empty()) {
        return custom.to_string();
    }

    let order = &detail.order;
    let greeting = match detail.customer.as_ref().and_then(|c| c.name.as_deref()) {
        Some(name) if !name.trim().is_empty() => format!("Olá, {}!", name.trim()),
        _ => "Olá!".to_string(),
    };
    let status = status_label(order.status, order.delivery_type);

    match template {
        NoticeTemplate::StatusUpdate => format!(
            "{greeting} Seu pedido #{} está {status}.",
            order.order_number
        ),
        NoticeTemplate::OrderSummary => {
            let mut lines = vec![
                greeting,
                format!("Recebemos seu pedido #{}.", order.order_number),
                String::new(),
                "Itens:".to_string(),
            ];
            for line in &detail.items {
                let name = line
                    .product
                    .as_ref()
                    .map(|p| p.name.as_str())
                    .unwrap_or("Produto");
                let mut entry = format!(
                    "- {}x {} ({})",
                    line.item.quantity,
                    name,
                    format_brl(line.item.total_price)
                );
                if let Some(notes) = line.item.notes.as_deref().filter(|n| !n.trim().is_empty()) {
                    entry.push_str(&format!(" - obs: {}", notes.trim()));
                }
                lines.push(entry);
            }
            lines.push(String::new());
            lines.push(format!("Subtotal: {}", format_brl(order.total_amount)));
            if order.delivery_fee > Decimal::ZERO {
                lines.push(format!("Taxa de entrega: {}", format_brl(order.delivery_fee)));
            }
            if order.discount_amount > Decimal::ZERO {
                lines.push(format!("Desconto: -{}", format_brl(order.discount_amount)));
            }
            lines.push(format!("Total: {}", format_brl(order.final_amount)));
            lines.push(format!("Pagamento: {}", order.payment_method.label()));
            match order.delivery_type {
                DeliveryType::Delivery => lines.push(format!(
                    "Entrega em: {}",
                    order.delivery_address.as_deref().unwrap_or("endereço não informado")
                )),
                DeliveryType::Pickup => lines.push("Retirada no local".to_string()),
            }
            lines.push(format!("Status: {status}"));
            lines.join("\n")
        }
    }
}

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    dto::orders::{CreateOrderRequest, CustomerSummary, OrderDetail, OrderLine},
    entity::{
        DeliveryType, OrderStatus, PaymentStatus,
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult, is_unique_violation},
    models::{Order, OrderItem, Product},
    response::{ApiResponse, Meta},
    services::product_service::with_category_names,
    state::AppState,
};

pub const ORDER_NUMBER_PREFIX: &str = "AERO";
const ORDER_NUMBER_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub total_amount: Decimal,
    pub delivery_fee: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
}

/// `lines` are `(unit_price, quantity)` pairs.
pub fn compute_totals(
    lines: &[(Decimal, i32)],
    delivery_type: DeliveryType,
    delivery_fee: Decimal,
    discount_amount: Decimal,
) -> OrderTotals {
    let total_amount: Decimal = lines
        .iter()
        .map(|(unit_price, quantity)| *unit_price * Decimal::from(*quantity))
        .sum();
    let delivery_fee = match delivery_type {
        DeliveryType::Delivery => delivery_fee,
        DeliveryType::Pickup => Decimal::ZERO,
    };
    OrderTotals {
        total_amount,
        delivery_fee,
        discount_amount,
        final_amount: total_amount + delivery_fee - discount_amount,
    }
}

/// `AERO` + last six digits of the millisecond clock + three-digit suffix.
pub fn format_order_number(timestamp_millis: i64, suffix: u16) -> String {
    let tail = timestamp_millis.rem_euclid(1_000_000);
    format!("{ORDER_NUMBER_PREFIX}{tail:06}{:03}", suffix % 1000)
}

pub fn generate_order_number() -> String {
    let suffix = rand::rng().random_range(0..1000u16);
    format_order_number(Utc::now().timestamp_millis(), suffix)
}

/// Insert the order under a fresh number, retrying inside a savepoint when the
/// number is already taken. The unique index on `order_number` is the arbiter.
async fn insert_with_order_number(
    txn: &DatabaseTransaction,
    mut order: OrderActive,
) -> AppResult<OrderModel> {
    for _ in 0..ORDER_NUMBER_ATTEMPTS {
        let candidate = generate_order_number();
        order.order_number = Set(candidate.clone());
        let savepoint = txn.begin().await?;
        match order.clone().insert(&savepoint).await {
            Ok(model) => {
                savepoint.commit().await?;
                return Ok(model);
            }
            Err(err) if is_unique_violation(&err) => {
                savepoint.rollback().await?;
                tracing::warn!(order_number = %candidate, "order number collision, regenerating");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(AppError::Conflict("could not allocate an order number".into()))
}

pub fn note_line(now: DateTime<Utc>, text: &str) -> String {
    format!("[{}] {}", now.format("%Y-%m-%d %H:%M UTC"), text.trim())
}

/// Notes are an append-only log: existing lines are kept verbatim.
pub fn append_note(existing: Option<&str>, now: DateTime<Utc>, text: &str) -> String {
    let line = note_line(now, text);
    match existing.map(str::trim_end).filter(|n| !n.is_empty()) {
        Some(previous) => format!("{previous}\n{line}"),
        None => line,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

struct PricedLine {
    product_id: Uuid,
    quantity: i32,
    unit_price: Decimal,
    notes: Option<String>,
}

pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderDetail>> {
    let user_id = payload
        .user_id
        .ok_or_else(|| AppError::validation("userId is required"))?;
    if payload.items.is_empty() {
        return Err(AppError::validation("items must not be empty"));
    }

    let txn = state.orm.begin().await?;

    let user = Users::find_by_id(user_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut product_ids: Vec<Uuid> = payload.items.iter().map(|i| i.product_id).collect();
    product_ids.sort();
    product_ids.dedup();
    let products: HashMap<Uuid, _> = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut lines = Vec::with_capacity(payload.items.len());
    for item in &payload.items {
        let product = products.get(&item.product_id).ok_or_else(|| {
            AppError::validation(format!("product {} does not exist", item.product_id))
        })?;
        if !product.available {
            return Err(AppError::validation(format!(
                "{} is currently unavailable",
                product.name
            )));
        }
        if let Some(client_price) = item.unit_price {
            if client_price.round_dp(2) != product.price {
                tracing::debug!(
                    product_id = %product.id,
                    client_price = %client_price,
                    catalog_price = %product.price,
                    "client price differs from catalog, charging catalog price"
                );
            }
        }
        lines.push(PricedLine {
            product_id: product.id,
            quantity: item.quantity,
            unit_price: product.price,
            notes: non_blank(item.notes.clone()),
        });
    }

    let priced: Vec<(Decimal, i32)> = lines.iter().map(|l| (l.unit_price, l.quantity)).collect();
    let totals = compute_totals(
        &priced,
        payload.delivery_type,
        state.config.delivery_fee,
        payload.discount_amount.unwrap_or(Decimal::ZERO),
    );
    if totals.final_amount.is_sign_negative() {
        return Err(AppError::validation(
            "discountAmount exceeds the order total",
        ));
    }

    let delivery_address = match payload.delivery_type {
        DeliveryType::Delivery => non_blank(payload.delivery_address).or(user.address.clone()),
        DeliveryType::Pickup => non_blank(payload.delivery_address),
    };
    let customer_phone = non_blank(payload.customer_phone).or(user.phone.clone());
    let now = Utc::now();
    let notes = non_blank(payload.notes).map(|n| note_line(now, &format!("Customer note: {n}")));

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        order_number: NotSet,
        user_id: Set(user.id),
        status: Set(OrderStatus::Pending),
        payment_status: Set(PaymentStatus::Pending),
        payment_method: Set(payload.payment_method),
        delivery_type: Set(payload.delivery_type),
        total_amount: Set(totals.total_amount),
        delivery_fee: Set(totals.delivery_fee),
        discount_amount: Set(totals.discount_amount),
        final_amount: Set(totals.final_amount),
        delivery_address: Set(delivery_address),
        customer_phone: Set(customer_phone),
        notes: Set(notes),
        created_at: NotSet,
        updated_at: NotSet,
    };
    let order = insert_with_order_number(&txn, order).await?;

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            total_price: Set(line.unit_price * Decimal::from(line.quantity)),
            notes: Set(line.notes),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(item);
    }

    txn.commit().await?;

    tracing::info!(
        order_id = %order.id,
        order_number = %order.order_number,
        user_id = %user.id,
        items = items.len(),
        final_amount = %order.final_amount,
        "order created"
    );

    let catalog = with_category_names(&state.orm, products.into_values().collect()).await?;
    let catalog: HashMap<Uuid, Product> = catalog.into_iter().map(|p| (p.id, p)).collect();
    let detail = OrderDetail {
        customer: Some(customer_summary(&user)),
        items: items
            .into_iter()
            .map(|item| OrderLine {
                product: catalog.get(&item.product_id).cloned(),
                item: OrderItem::from(item),
            })
            .collect(),
        order: Order::from(order),
    };

    Ok(ApiResponse::success("Order created", detail, Some(Meta::empty())))
}

fn customer_summary(user: &crate::entity::users::Model) -> CustomerSummary {
    CustomerSummary {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        phone: user.phone.clone(),
    }
}

/// Attach customers, items and products to a page of orders with one query per table.
pub(crate) async fn load_order_details<C: ConnectionTrait>(
    conn: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<OrderDetail>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut user_ids: Vec<Uuid> = orders.iter().map(|o| o.user_id).collect();
    user_ids.sort();
    user_ids.dedup();

    let customers: HashMap<Uuid, CustomerSummary> = Users::find()
        .filter(UserCol::Id.is_in(user_ids))
        .all(conn)
        .await?
        .iter()
        .map(|u| (u.id, customer_summary(u)))
        .collect();

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(order_ids))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(conn)
        .await?;

    let mut product_ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
    product_ids.sort();
    product_ids.dedup();
    let products = if product_ids.is_empty() {
        Vec::new()
    } else {
        Products::find()
            .filter(ProdCol::Id.is_in(product_ids))
            .all(conn)
            .await?
    };
    let products: HashMap<Uuid, Product> = with_category_names(conn, products)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut lines_by_order: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
    for item in items {
        lines_by_order.entry(item.order_id).or_default().push(OrderLine {
            product: products.get(&item.product_id).cloned(),
            item: OrderItem::from(item),
        });
    }

    Ok(orders
        .into_iter()
        .map(|order| OrderDetail {
            customer: customers.get(&order.user_id).cloned(),
            items: lines_by_order.remove(&order.id).unwrap_or_default(),
            order: Order::from(order),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dec(value: i64, scale: u32) -> Decimal {
        Decimal::new(value, scale)
    }

    #[test]
    fn delivery_adds_the_fee() {
        let totals = compute_totals(
            &[(dec(3590, 2), 1)],
            DeliveryType::Delivery,
            dec(800, 2),
            Decimal::ZERO,
        );
        assert_eq!(totals.total_amount, dec(3590, 2));
        assert_eq!(totals.delivery_fee, dec(800, 2));
        assert_eq!(totals.final_amount, dec(4390, 2));
    }

    #[test]
    fn pickup_has_no_fee() {
        let totals = compute_totals(
            &[(dec(1250, 2), 2), (dec(500, 2), 3)],
            DeliveryType::Pickup,
            dec(800, 2),
            dec(200, 2),
        );
        assert_eq!(totals.total_amount, dec(4000, 2));
        assert_eq!(totals.delivery_fee, Decimal::ZERO);
        assert_eq!(totals.final_amount, dec(3800, 2));
    }

    #[test]
    fn final_amount_identity_holds() {
        for (lines, kind, discount) in [
            (vec![(dec(999, 2), 4)], DeliveryType::Delivery, dec(100, 2)),
            (vec![(dec(1, 2), 1), (dec(4500, 2), 2)], DeliveryType::Pickup, Decimal::ZERO),
        ] {
            let t = compute_totals(&lines, kind, dec(800, 2), discount);
            assert_eq!(t.final_amount, t.total_amount + t.delivery_fee - t.discount_amount);
        }
    }

    #[test]
    fn order_number_shape() {
        assert_eq!(format_order_number(1_760_000_123_456, 7), "AERO123456007");
        assert_eq!(format_order_number(42, 999), "AERO000042999");

        let generated = generate_order_number();
        assert_eq!(generated.len(), 13);
        assert!(generated.starts_with("AERO"));
        assert!(generated[4..].chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn notes_are_appended_not_replaced() {
        let t1 = Utc.with_ymd_and_hms(2026, 10, 18, 12, 30, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 10, 18, 12, 45, 0).unwrap();
        let first = append_note(None, t1, "Status: PENDING -> CONFIRMED");
        assert_eq!(first, "[2026-10-18 12:30 UTC] Status: PENDING -> CONFIRMED");
        let second = append_note(Some(&first), t2, "WhatsApp sent to 5511987654321");
        assert_eq!(
            second,
            "[2026-10-18 12:30 UTC] Status: PENDING -> CONFIRMED\n[2026-10-18 12:45 UTC] WhatsApp sent to 5511987654321"
        );
        assert_eq!(append_note(Some("  "), t1, "x"), "[2026-10-18 12:30 UTC] x");
    }
}

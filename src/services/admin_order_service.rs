use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        OrderDetail, OrderList, UpdateOrderRequest, WhatsAppNoticeRequest, WhatsAppNoticeResult,
    },
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::AdminPrincipal,
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::order_service::{append_note, load_order_details},
    state::AppState,
    whatsapp::{self, Dispatch},
};

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status));
    }
    if let Some(user_id) = query.user_id {
        condition = condition.add(OrderCol::UserId.eq(user_id));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = load_order_details(&state.orm, orders).await?;

    Ok(ApiResponse::success(
        "Orders",
        OrderList { items },
        Some(Meta::new(page, limit, total)),
    ))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<OrderDetail>> {
    let detail = order_detail(state, id).await?;
    Ok(ApiResponse::success("Order", detail, None))
}

async fn order_detail(state: &AppState, id: Uuid) -> AppResult<OrderDetail> {
    let order = find_order(state, id).await?;
    load_order_details(&state.orm, vec![order])
        .await?
        .pop()
        .ok_or(AppError::NotFound)
}

async fn find_order(state: &AppState, id: Uuid) -> AppResult<OrderModel> {
    Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

/// Apply a status and/or payment change. Every change is recorded as a note line.
pub async fn update_order(
    state: &AppState,
    principal: &AdminPrincipal,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<OrderDetail>> {
    let order = find_order(state, id).await?;
    let now = Utc::now();

    let mut notes = order.notes.clone();
    let mut active: OrderActive = order.clone().into();

    if let Some(next) = payload.status {
        if !order.status.can_transition_to(next) {
            return Err(AppError::validation(format!(
                "cannot move order from {} to {}",
                order.status.as_str(),
                next.as_str()
            )));
        }
        if next != order.status {
            let line = format!(
                "Status: {} -> {} (by {})",
                order.status.as_str(),
                next.as_str(),
                principal.email
            );
            notes = Some(append_note(notes.as_deref(), now, &line));
            active.status = Set(next);
        }
    }

    if let Some(payment) = payload.payment_status {
        if payment != order.payment_status {
            let line = format!(
                "Payment: {} -> {} (by {})",
                order.payment_status.as_str(),
                payment.as_str(),
                principal.email
            );
            notes = Some(append_note(notes.as_deref(), now, &line));
            active.payment_status = Set(payment);
        }
    }

    if let Some(note) = payload.note.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        let line = format!("{note} (by {})", principal.email);
        notes = Some(append_note(notes.as_deref(), now, &line));
    }

    if notes != order.notes {
        active.notes = Set(notes);
        active.updated_at = Set(now.into());
        let updated = active.update(&state.orm).await?;
        tracing::info!(
            order_id = %updated.id,
            status = updated.status.as_str(),
            payment_status = updated.payment_status.as_str(),
            admin = %principal.email,
            "order updated"
        );
    }

    let detail = order_detail(state, id).await?;
    Ok(ApiResponse::success("Order updated", detail, Some(Meta::empty())))
}

/// Compose and dispatch a customer notice for the order, then log it on the order.
pub async fn send_whatsapp_notice(
    state: &AppState,
    principal: &AdminPrincipal,
    id: Uuid,
    payload: WhatsAppNoticeRequest,
) -> AppResult<ApiResponse<WhatsAppNoticeResult>> {
    let order = find_order(state, id).await?;

    let raw_phone = match order.customer_phone.clone().filter(|p| !p.trim().is_empty()) {
        Some(phone) => Some(phone),
        None => Users::find_by_id(order.user_id)
            .one(&state.orm)
            .await?
            .and_then(|u| u.phone),
    };
    let phone = raw_phone
        .as_deref()
        .and_then(whatsapp::normalize_phone)
        .ok_or_else(|| AppError::validation("order has no usable phone number"))?;

    let detail = load_order_details(&state.orm, vec![order.clone()])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;
    let template = payload.message.unwrap_or_default();
    let message = whatsapp::compose_message(template, payload.custom_message.as_deref(), &detail);

    let dispatch = state.whatsapp.send(&phone, &message).await.map_err(|e| {
        tracing::error!(order_id = %order.id, error = %e, "whatsapp dispatch failed");
        AppError::Notification(e.to_string())
    })?;

    let (sent, link, line) = match dispatch {
        Dispatch::Sent => (true, None, format!("WhatsApp sent to {phone} (by {})", principal.email)),
        Dispatch::Link(link) => (
            false,
            Some(link),
            format!("WhatsApp link generated for {phone} (by {})", principal.email),
        ),
    };

    let now = Utc::now();
    let mut active: OrderActive = order.clone().into();
    active.notes = Set(Some(append_note(order.notes.as_deref(), now, &line)));
    active.updated_at = Set(now.into());
    let updated = active.update(&state.orm).await?;

    tracing::info!(order_id = %updated.id, sent, "whatsapp notice recorded");
    Ok(ApiResponse::success(
        if sent { "Notice sent" } else { "Notice link generated" },
        WhatsAppNoticeResult {
            phone,
            message,
            sent,
            link,
            order: Order::from(updated),
        },
        Some(Meta::empty()),
    ))
}

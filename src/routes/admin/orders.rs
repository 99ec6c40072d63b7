use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        OrderDetail, OrderList, UpdateOrderRequest, WhatsAppNoticeRequest, WhatsAppNoticeResult,
    },
    error::AppResult,
    extract::ValidatedJson,
    middleware::auth::AdminPrincipal,
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::admin_order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/{id}", get(get_order).put(update_order))
        .route("/{id}/whatsapp", post(send_whatsapp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders, newest first", body = ApiResponse<OrderList>)
    ),
    security(("admin_session" = [])),
    tag = "Admin"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_order_service::list_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with customer and items", body = ApiResponse<OrderDetail>),
        (status = 404, description = "Order not found"),
    ),
    security(("admin_session" = [])),
    tag = "Admin"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let resp = admin_order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<OrderDetail>),
        (status = 400, description = "Empty update or disallowed status change"),
        (status = 404, description = "Order not found"),
    ),
    security(("admin_session" = [])),
    tag = "Admin"
)]
pub async fn update_order(
    State(state): State<AppState>,
    principal: AdminPrincipal,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateOrderRequest>,
) -> AppResult<Json<ApiResponse<OrderDetail>>> {
    let resp = admin_order_service::update_order(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/orders/{id}/whatsapp",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = WhatsAppNoticeRequest,
    responses(
        (status = 200, description = "Notice sent, or click-to-chat link returned", body = ApiResponse<WhatsAppNoticeResult>),
        (status = 400, description = "No usable phone number"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Messaging provider failed"),
    ),
    security(("admin_session" = [])),
    tag = "Admin"
)]
pub async fn send_whatsapp(
    State(state): State<AppState>,
    principal: AdminPrincipal,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<WhatsAppNoticeRequest>,
) -> AppResult<Json<ApiResponse<WhatsAppNoticeResult>>> {
    let resp = admin_order_service::send_whatsapp_notice(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

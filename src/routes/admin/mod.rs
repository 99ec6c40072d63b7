//! Back-office API. Everything nested here sits behind the session gate.

use axum::{Json, Router, middleware, routing::get};

use crate::{
    middleware::auth::{AdminPrincipal, require_admin},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod admins;
pub mod categories;
pub mod orders;
pub mod pix;
pub mod products;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .nest("/products", products::router())
        .nest("/categories", categories::router())
        .nest("/orders", orders::router())
        .nest("/admins", admins::router())
        .nest("/pix", pix::router())
        .layer(middleware::from_fn_with_state(state, require_admin))
}

#[utoipa::path(
    get,
    path = "/api/admin/me",
    responses(
        (status = 200, description = "Current admin session", body = ApiResponse<AdminPrincipal>),
        (status = 401, description = "No valid session"),
    ),
    security(("admin_session" = [])),
    tag = "Admin"
)]
pub async fn me(principal: AdminPrincipal) -> Json<ApiResponse<AdminPrincipal>> {
    Json(ApiResponse::success("Session", principal, Some(Meta::empty())))
}

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::admins::{AdminList, CreateAdminRequest, UpdateAdminRequest},
    error::AppResult,
    extract::ValidatedJson,
    middleware::auth::AdminPrincipal,
    models::AdminProfile,
    response::ApiResponse,
    services::admin_account_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route("/{id}", put(update_admin).delete(delete_admin))
}

#[utoipa::path(
    get,
    path = "/api/admin/admins",
    responses(
        (status = 200, description = "Admin accounts", body = ApiResponse<AdminList>),
        (status = 403, description = "Master admin only"),
    ),
    security(("admin_session" = [])),
    tag = "Admin accounts"
)]
pub async fn list_admins(
    State(state): State<AppState>,
    principal: AdminPrincipal,
) -> AppResult<Json<ApiResponse<AdminList>>> {
    let resp = admin_account_service::list_admins(&state, &principal).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/admins",
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = ApiResponse<AdminProfile>),
        (status = 403, description = "Master admin only"),
        (status = 409, description = "Email already in use"),
    ),
    security(("admin_session" = [])),
    tag = "Admin accounts"
)]
pub async fn create_admin(
    State(state): State<AppState>,
    principal: AdminPrincipal,
    ValidatedJson(payload): ValidatedJson<CreateAdminRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AdminProfile>>)> {
    let resp = admin_account_service::create_admin(&state, &principal, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/admins/{id}",
    params(("id" = Uuid, Path, description = "Admin ID")),
    request_body = UpdateAdminRequest,
    responses(
        (status = 200, description = "Admin updated", body = ApiResponse<AdminProfile>),
        (status = 403, description = "Master admin only"),
        (status = 404, description = "Admin not found"),
        (status = 409, description = "Email already in use"),
    ),
    security(("admin_session" = [])),
    tag = "Admin accounts"
)]
pub async fn update_admin(
    State(state): State<AppState>,
    principal: AdminPrincipal,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateAdminRequest>,
) -> AppResult<Json<ApiResponse<AdminProfile>>> {
    let resp = admin_account_service::update_admin(&state, &principal, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/admins/{id}",
    params(("id" = Uuid, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Admin deleted", body = ApiResponse<AdminProfile>),
        (status = 403, description = "Master admin only, and the master account cannot be deleted"),
        (status = 404, description = "Admin not found"),
    ),
    security(("admin_session" = [])),
    tag = "Admin accounts"
)]
pub async fn delete_admin(
    State(state): State<AppState>,
    principal: AdminPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<AdminProfile>>> {
    let resp = admin_account_service::delete_admin(&state, &principal, id).await?;
    Ok(Json(resp))
}

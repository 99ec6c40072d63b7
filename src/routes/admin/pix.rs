use axum::{
    Json, Router,
    extract::{Path, State},
    routing::put,
};

use crate::{
    dto::pix::UpsertPixRequest, error::AppResult, extract::ValidatedJson, models::PixConfig,
    response::ApiResponse, services::pix_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{key}", put(upsert_pix))
}

#[utoipa::path(
    put,
    path = "/api/admin/pix/{key}",
    params(("key" = String, Path, description = "Configuration key")),
    request_body = UpsertPixRequest,
    responses(
        (status = 200, description = "Saved PIX configuration", body = ApiResponse<PixConfig>),
        (status = 400, description = "Missing fields"),
    ),
    security(("admin_session" = [])),
    tag = "Admin"
)]
pub async fn upsert_pix(
    State(state): State<AppState>,
    Path(key): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpsertPixRequest>,
) -> AppResult<Json<ApiResponse<PixConfig>>> {
    let resp = pix_service::upsert(&state, &key, payload).await?;
    Ok(Json(resp))
}

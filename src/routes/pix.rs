use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};

use crate::{
    error::AppResult, models::PixConfig, response::ApiResponse, services::pix_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/{key}", get(get_pix))
}

#[utoipa::path(
    get,
    path = "/api/pix/{key}",
    params(
        ("key" = String, Path, description = "Configuration key, e.g. `default`")
    ),
    responses(
        (status = 200, description = "Active PIX configuration", body = ApiResponse<PixConfig>),
        (status = 404, description = "No active configuration for the key"),
    ),
    tag = "Payments"
)]
pub async fn get_pix(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<ApiResponse<PixConfig>>> {
    let resp = pix_service::get_active(&state, &key).await?;
    Ok(Json(resp))
}

use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::users::UpsertUserRequest, error::AppResult, extract::ValidatedJson, models::User,
    response::ApiResponse, services::user_service, state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(upsert_user))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UpsertUserRequest,
    responses(
        (status = 200, description = "Existing or newly created user", body = ApiResponse<User>),
        (status = 400, description = "Missing or invalid email"),
    ),
    tag = "Users"
)]
pub async fn upsert_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpsertUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::upsert_user(&state, payload).await?;
    Ok(Json(resp))
}

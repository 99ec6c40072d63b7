use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderName, header::SET_COOKIE},
    response::AppendHeaders,
    routing::post,
};

use crate::{
    dto::auth::LoginRequest,
    error::AppResult,
    extract::ValidatedJson,
    models::AdminProfile,
    response::{ApiResponse, Meta},
    services::auth_service,
    state::AppState,
};

type SetCookie = AppendHeaders<[(HeaderName, String); 1]>;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; sets the `admin_session` cookie", body = ApiResponse<AdminProfile>),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials"),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(SetCookie, Json<ApiResponse<AdminProfile>>)> {
    let (resp, cookie) = auth_service::login(&state, payload).await?;
    Ok((AppendHeaders([(SET_COOKIE, cookie)]), Json(resp)))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session revoked and cookie cleared"),
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (SetCookie, Json<ApiResponse<serde_json::Value>>) {
    let cookie = auth_service::logout(&state, &headers).await;
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(ApiResponse::success(
            "Logged out",
            serde_json::json!({}),
            Some(Meta::empty()),
        )),
    )
}

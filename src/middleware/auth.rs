use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{error::AppError, services::auth_service, state::AppState};

/// Admin resolved from a verified session cookie.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminPrincipal {
    pub admin_id: Uuid,
    pub email: String,
    pub role: String,
    #[serde(skip)]
    pub jti: String,
}

/// Gate for the admin namespace: requests without a valid session never reach a handler.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = auth_service::verify_session(&state, request.headers()).ok_or_else(|| {
        tracing::debug!(path = %request.uri().path(), "admin request without valid session");
        AppError::Unauthorized
    })?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AdminPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AdminPrincipal>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

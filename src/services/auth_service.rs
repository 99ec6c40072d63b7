use std::time::Duration as StdDuration;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use axum::http::{HeaderMap, header};
use chrono::{DateTime, Duration, Utc};
use cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use moka::future::Cache;
use password_hash::rand_core::OsRng;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use secrecy::ExposeSecret;
use uuid::Uuid;

use crate::{
    dto::{auth::{Claims, LoginRequest}, normalize_email},
    entity::admins::{self, Column as AdminCol, Entity as Admins},
    error::{AppError, AppResult},
    middleware::auth::AdminPrincipal,
    models::AdminProfile,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const SESSION_COOKIE: &str = "admin_session";
pub const SESSION_TTL_DAYS: i64 = 7;

/// Token ids invalidated by logout, plus deleted admins whose tokens must stop
/// working. Entries outlive the tokens they refer to.
#[derive(Clone)]
pub struct RevokedSessions {
    cache: Cache<String, ()>,
}

impl Default for RevokedSessions {
    fn default() -> Self {
        Self::new()
    }
}

impl RevokedSessions {
    pub fn new() -> Self {
        let ttl = StdDuration::from_secs(SESSION_TTL_DAYS as u64 * 24 * 60 * 60);
        Self {
            cache: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn revoke(&self, jti: &str) {
        self.cache.insert(jti.to_string(), ()).await;
    }

    pub fn is_revoked(&self, jti: &str) -> bool {
        self.cache.contains_key(jti)
    }

    pub async fn revoke_admin(&self, admin_id: Uuid) {
        self.cache.insert(admin_key(admin_id), ()).await;
    }

    pub fn is_admin_revoked(&self, admin_id: Uuid) -> bool {
        self.cache.contains_key(&admin_key(admin_id))
    }
}

fn admin_key(admin_id: Uuid) -> String {
    format!("admin:{admin_id}")
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn issue_token(secret: &str, admin: &admins::Model, now: DateTime<Utc>) -> AppResult<(String, Claims)> {
    let expiration = now
        .checked_add_signed(Duration::days(SESSION_TTL_DAYS))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: admin.id.to_string(),
        email: admin.email.clone(),
        role: admin.role.as_str().to_string(),
        jti: Uuid::new_v4().to_string(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok((token, claims))
}

pub fn decode_token(secret: &str, token: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

pub fn session_cookie(token: String, secure: bool) -> String {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(cookie::time::Duration::days(SESSION_TTL_DAYS))
        .build()
        .to_string()
}

pub fn cleared_session_cookie(secure: bool) -> String {
    let mut cookie = Cookie::build((SESSION_COOKIE, ""))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(secure)
        .build();
    cookie.make_removal();
    cookie.to_string()
}

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| Cookie::split_parse(raw).flatten())
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty())
}

/// Resolve the admin behind the request's session cookie, if any.
pub fn verify_session(state: &AppState, headers: &HeaderMap) -> Option<AdminPrincipal> {
    let token = session_token(headers)?;
    let claims = decode_token(state.config.jwt_secret.expose_secret(), &token)?;
    let admin_id = Uuid::parse_str(&claims.sub).ok()?;
    if state.sessions.is_revoked(&claims.jti) || state.sessions.is_admin_revoked(admin_id) {
        return None;
    }
    Some(AdminPrincipal {
        admin_id,
        email: claims.email,
        role: claims.role,
        jti: claims.jti,
    })
}

pub fn ensure_master(state: &AppState, principal: &AdminPrincipal) -> AppResult<()> {
    if principal.email.eq_ignore_ascii_case(&state.config.master_admin_email) {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

pub async fn login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<(ApiResponse<AdminProfile>, String)> {
    let LoginRequest { email, password } = payload;
    let email = normalize_email(&email);

    let admin = Admins::find()
        .filter(AdminCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;

    let admin = match admin {
        Some(a) => a,
        None => {
            tracing::info!(email = %email, "login rejected: unknown admin");
            return Err(AppError::Unauthorized);
        }
    };

    if !verify_password(&password, &admin.password_hash)? {
        tracing::info!(admin_id = %admin.id, "login rejected: bad password");
        return Err(AppError::Unauthorized);
    }

    let (token, claims) = issue_token(state.config.jwt_secret.expose_secret(), &admin, Utc::now())?;
    let cookie = session_cookie(token, state.config.cookie_secure);
    tracing::info!(admin_id = %admin.id, jti = %claims.jti, "admin logged in");

    Ok((
        ApiResponse::success("Logged in", AdminProfile::from(admin), Some(Meta::empty())),
        cookie,
    ))
}

/// Revoke the presented session (if valid) and hand back a clearing cookie.
pub async fn logout(state: &AppState, headers: &HeaderMap) -> String {
    if let Some(principal) = verify_session(state, headers) {
        state.sessions.revoke(&principal.jti).await;
        tracing::info!(admin_id = %principal.admin_id, "admin logged out");
    }
    cleared_session_cookie(state.config.cookie_secure)
}

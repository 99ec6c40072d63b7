use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use secrecy::ExposeSecret;
use uuid::Uuid;

use crate::{
    config::AppConfig,
    db::OrmConn,
    dto::{
        admins::{AdminList, CreateAdminRequest, UpdateAdminRequest},
        normalize_email,
    },
    entity::{
        UserRole,
        admins::{ActiveModel as AdminActive, Column as AdminCol, Entity as Admins, Model as AdminModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AdminPrincipal,
    models::AdminProfile,
    response::{ApiResponse, Meta},
    services::{
        auth_service::{ensure_master, hash_password},
        user_service::{ContactFields, upsert_by_email},
    },
    state::AppState,
};

pub async fn list_admins(
    state: &AppState,
    principal: &AdminPrincipal,
) -> AppResult<ApiResponse<AdminList>> {
    ensure_master(state, principal)?;
    let items: Vec<AdminProfile> = Admins::find()
        .order_by_asc(AdminCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(AdminProfile::from)
        .collect();
    let total = items.len() as i64;
    Ok(ApiResponse::success(
        "Admins",
        AdminList { items },
        Some(Meta::new(1, total.max(1), total)),
    ))
}

pub async fn create_admin(
    state: &AppState,
    principal: &AdminPrincipal,
    payload: CreateAdminRequest,
) -> AppResult<ApiResponse<AdminProfile>> {
    ensure_master(state, principal)?;
    let email = normalize_email(&payload.email);

    let txn = state.orm.begin().await?;
    ensure_email_free(&txn, &email, None).await?;
    let admin = insert_admin(&txn, &email, payload.name.trim(), &payload.password).await?;
    txn.commit().await?;

    tracing::info!(admin_id = %admin.id, created_by = %principal.email, "admin created");
    Ok(ApiResponse::success(
        "Admin created",
        AdminProfile::from(admin),
        Some(Meta::empty()),
    ))
}

pub async fn update_admin(
    state: &AppState,
    principal: &AdminPrincipal,
    id: Uuid,
    payload: UpdateAdminRequest,
) -> AppResult<ApiResponse<AdminProfile>> {
    ensure_master(state, principal)?;
    let existing = Admins::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let is_master = existing
        .email
        .eq_ignore_ascii_case(&state.config.master_admin_email);
    let mut active: AdminActive = existing.into();
    if let Some(email) = payload.email.as_deref().map(normalize_email) {
        if is_master && !email.eq_ignore_ascii_case(&state.config.master_admin_email) {
            tracing::warn!(admin_id = %id, "refusing to change the master admin email");
            return Err(AppError::Forbidden);
        }
        ensure_email_free(&state.orm, &email, Some(id)).await?;
        active.email = Set(email);
    }
    if let Some(name) = payload.name.as_deref().map(str::trim) {
        active.name = Set(name.to_string());
    }
    if let Some(password) = payload.password.as_deref() {
        active.password_hash = Set(hash_password(password)?);
    }
    active.updated_at = Set(Utc::now().into());
    let admin = active.update(&state.orm).await?;

    tracing::info!(admin_id = %admin.id, updated_by = %principal.email, "admin updated");
    Ok(ApiResponse::success(
        "Updated",
        AdminProfile::from(admin),
        Some(Meta::empty()),
    ))
}

pub async fn delete_admin(
    state: &AppState,
    principal: &AdminPrincipal,
    id: Uuid,
) -> AppResult<ApiResponse<AdminProfile>> {
    ensure_master(state, principal)?;
    let admin = Admins::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if admin.email.eq_ignore_ascii_case(&state.config.master_admin_email) {
        tracing::warn!(admin_id = %admin.id, "refusing to delete the master admin");
        return Err(AppError::Forbidden);
    }

    let profile = AdminProfile::from(admin.clone());
    admin.delete(&state.orm).await?;
    state.sessions.revoke_admin(id).await;
    tracing::info!(admin_id = %id, deleted_by = %principal.email, "admin deleted");
    Ok(ApiResponse::success("Deleted", profile, Some(Meta::empty())))
}

/// Create the master admin on startup when a password is configured and the account is missing.
/// Returns `true` when an account was created.
pub async fn ensure_master_admin(conn: &OrmConn, config: &AppConfig) -> AppResult<bool> {
    let Some(password) = config.master_admin_password.as_ref() else {
        tracing::debug!("MASTER_ADMIN_PASSWORD not set, skipping master admin bootstrap");
        return Ok(false);
    };
    let email = normalize_email(&config.master_admin_email);

    let exists = Admins::find()
        .filter(AdminCol::Email.eq(email.as_str()))
        .count(conn)
        .await?
        > 0;
    if exists {
        return Ok(false);
    }

    let txn = conn.begin().await?;
    let admin = insert_admin(&txn, &email, "Master Admin", password.expose_secret()).await?;
    txn.commit().await?;
    tracing::info!(admin_id = %admin.id, email = %admin.email, "master admin created");
    Ok(true)
}

async fn insert_admin<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    name: &str,
    password: &str,
) -> AppResult<AdminModel> {
    let user = upsert_by_email(
        conn,
        email,
        ContactFields {
            name: Some(name.to_string()),
            ..Default::default()
        },
        UserRole::Admin,
    )
    .await?;

    let admin = AdminActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(hash_password(password)?),
        name: Set(name.to_string()),
        role: Set(UserRole::Admin),
        user_id: Set(Some(user.id)),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(conn)
    .await?;
    Ok(admin)
}

async fn ensure_email_free<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    except: Option<Uuid>,
) -> AppResult<()> {
    let mut condition = Condition::all().add(AdminCol::Email.eq(email));
    if let Some(id) = except {
        condition = condition.add(AdminCol::Id.ne(id));
    }
    let taken = Admins::find().filter(condition).count(conn).await? > 0;
    if taken {
        return Err(AppError::Conflict(format!("admin {email} already exists")));
    }
    Ok(())
}

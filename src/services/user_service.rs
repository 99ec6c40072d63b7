use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    dto::{normalize_email, users::UpsertUserRequest},
    entity::{
        UserRole,
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    },
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Find a user by email and refresh the provided contact fields, or create a client.
pub async fn upsert_user(
    state: &AppState,
    payload: UpsertUserRequest,
) -> AppResult<ApiResponse<User>> {
    let user = upsert_by_email(
        &state.orm,
        &payload.email,
        ContactFields {
            name: payload.name,
            phone: payload.phone,
            address: payload.address,
        },
        UserRole::Client,
    )
    .await?;
    Ok(ApiResponse::success("User", User::from(user), Some(Meta::empty())))
}

#[derive(Debug, Default)]
pub(crate) struct ContactFields {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Shared by checkout-time user creation and admin account provisioning.
/// An existing user's role is only ever raised to ADMIN, never lowered.
pub(crate) async fn upsert_by_email<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    fields: ContactFields,
    role: UserRole,
) -> AppResult<UserModel> {
    let email = normalize_email(email);
    let name = non_blank(fields.name);
    let phone = non_blank(fields.phone);
    let address = non_blank(fields.address);

    let existing = find_by_email(conn, &email).await?;
    let user = match existing {
        Some(user) => user,
        None => {
            let id = Uuid::new_v4();
            // A concurrent request may insert the same email first; the loser
            // falls through and refreshes that row instead.
            let inserted = Users::insert(UserActive {
                id: Set(id),
                email: Set(email.clone()),
                name: Set(name.clone()),
                phone: Set(phone.clone()),
                address: Set(address.clone()),
                role: Set(role),
                created_at: NotSet,
                updated_at: NotSet,
            })
            .on_conflict(OnConflict::column(UserCol::Email).do_nothing().to_owned())
            .exec_without_returning(conn)
            .await?;
            if inserted > 0 {
                let user = Users::find_by_id(id).one(conn).await?.ok_or(AppError::NotFound)?;
                tracing::info!(user_id = %user.id, role = user.role.as_str(), "user created");
                return Ok(user);
            }
            find_by_email(conn, &email).await?.ok_or(AppError::NotFound)?
        }
    };

    let promote = role == UserRole::Admin && user.role != UserRole::Admin;
    if name.is_none() && phone.is_none() && address.is_none() && !promote {
        return Ok(user);
    }
    let mut active: UserActive = user.into();
    if let Some(name) = name {
        active.name = Set(Some(name));
    }
    if let Some(phone) = phone {
        active.phone = Set(Some(phone));
    }
    if let Some(address) = address {
        active.address = Set(Some(address));
    }
    if promote {
        active.role = Set(UserRole::Admin);
    }
    active.updated_at = Set(Utc::now().into());
    Ok(active.update(conn).await?)
}

async fn find_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> AppResult<Option<UserModel>> {
    Ok(Users::find()
        .filter(UserCol::Email.eq(email))
        .one(conn)
        .await?)
}

use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    dto::pix::UpsertPixRequest,
    entity::pix_configs::{ActiveModel, Column, Entity as PixConfigs},
    error::{AppError, AppResult},
    models::PixConfig,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn get_active(state: &AppState, key: &str) -> AppResult<ApiResponse<PixConfig>> {
    let config = PixConfigs::find()
        .filter(Column::Key.eq(key))
        .filter(Column::Active.eq(true))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("PIX", PixConfig::from(config), None))
}

pub async fn upsert(
    state: &AppState,
    key: &str,
    payload: UpsertPixRequest,
) -> AppResult<ApiResponse<PixConfig>> {
    let existing = PixConfigs::find()
        .filter(Column::Key.eq(key))
        .one(&state.orm)
        .await?;

    let saved = match existing {
        Some(model) => {
            let mut active: ActiveModel = model.into();
            active.pix_key = Set(payload.pix_key.trim().to_string());
            active.pix_type = Set(payload.pix_type.trim().to_string());
            active.recipient = Set(payload.recipient.trim().to_string());
            active.active = Set(payload.active);
            active.updated_at = Set(Utc::now().into());
            active.update(&state.orm).await?
        }
        None => {
            ActiveModel {
                id: Set(Uuid::new_v4()),
                key: Set(key.to_string()),
                pix_key: Set(payload.pix_key.trim().to_string()),
                pix_type: Set(payload.pix_type.trim().to_string()),
                recipient: Set(payload.recipient.trim().to_string()),
                active: Set(payload.active),
                created_at: NotSet,
                updated_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    tracing::info!(key, active = saved.active, "pix config saved");
    Ok(ApiResponse::success("PIX saved", PixConfig::from(saved), Some(Meta::empty())))
}

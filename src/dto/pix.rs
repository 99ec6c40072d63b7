use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::not_blank;

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPixRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub pix_key: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub pix_type: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub recipient: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

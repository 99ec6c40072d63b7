use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::email_address;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertUserRequest {
    #[serde(default)]
    #[validate(custom(function = "email_address"))]
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

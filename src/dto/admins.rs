use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{email_address, not_blank};
use crate::models::AdminProfile;

pub const MIN_PASSWORD_LEN: u64 = 6;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    #[serde(default)]
    #[validate(custom(function = "email_address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = MIN_PASSWORD_LEN, message = "must have at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminRequest {
    #[validate(custom(function = "email_address"))]
    pub email: Option<String>,
    #[validate(length(min = MIN_PASSWORD_LEN, message = "must have at least 6 characters"))]
    pub password: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminList {
    pub items: Vec<AdminProfile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(email: &str, password: &str, name: &str) -> CreateAdminRequest {
        CreateAdminRequest {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }

    #[test]
    fn create_checks_email_password_and_name() {
        assert!(create("staff@example.com", "secret123", "Staff").validate().is_ok());
        assert!(create("not-an-email", "secret123", "Staff").validate().is_err());
        assert!(create("staff@example.com", "12345", "Staff").validate().is_err());
        assert!(create("staff@example.com", "secret123", " ").validate().is_err());
    }

    #[test]
    fn update_only_checks_present_fields() {
        assert!(UpdateAdminRequest::default().validate().is_ok());
        let short = UpdateAdminRequest {
            password: Some("abc".into()),
            ..Default::default()
        };
        let errors = short.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }
}

pub mod admins;
pub mod auth;
pub mod categories;
pub mod orders;
pub mod pix;
pub mod products;
pub mod users;

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::{ValidateEmail, ValidationError};

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Rejects empty and whitespace-only strings.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("blank", "must not be blank"));
    }
    Ok(())
}

/// Emails are trimmed before checking, matching how they are stored.
pub(crate) fn email_address(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    if !value.trim().validate_email() {
        return Err(invalid("email", "is not a valid email address"));
    }
    Ok(())
}

pub(crate) fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        return Err(invalid("negative", "must not be negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_strings_are_rejected() {
        assert!(not_blank("  ").is_err());
        assert!(not_blank("Ana").is_ok());
    }

    #[test]
    fn emails_are_checked_after_trimming() {
        assert!(email_address(" ana@example.com ").is_ok());
        assert!(email_address("ana@").is_err());
        assert!(email_address("").is_err());
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(non_negative(&Decimal::new(-1, 2)).is_err());
        assert!(non_negative(&Decimal::ZERO).is_ok());
    }
}

//! Client-side form validation. Failures are reported inline next to the
//! offending field and never reach the network.

use lazy_static::lazy_static;
use regex::Regex;

pub const MIN_PASSWORD_LEN: usize = 6;

lazy_static! {
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();

    /// Optional leading +, then at least 10 digits, spaces or dashes
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[\d\s-]{10,}$").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Start date cannot be in the past")]
    StartInPast,

    #[error("End date must be after start date")]
    EndNotAfterStart,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Please enter a valid phone number")]
    InvalidPhone,

    #[error("Price must be zero or more")]
    InvalidPrice,

    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("Please login to continue")]
    LoginRequired,
}

impl ValidationError {
    /// Form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::StartInPast => "startDate",
            ValidationError::EndNotAfterStart => "endDate",
            ValidationError::InvalidEmail => "email",
            ValidationError::PasswordTooShort => "password",
            ValidationError::InvalidPhone => "phone",
            ValidationError::InvalidPrice => "pricePerDay",
            ValidationError::Required { field } => *field,
            ValidationError::LoginRequired => "session",
        }
    }

    /// Reason code, e.g. `START_IN_PAST`.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::StartInPast => "START_IN_PAST",
            ValidationError::EndNotAfterStart => "END_NOT_AFTER_START",
            ValidationError::InvalidEmail => "INVALID_EMAIL",
            ValidationError::PasswordTooShort => "PASSWORD_TOO_SHORT",
            ValidationError::InvalidPhone => "INVALID_PHONE",
            ValidationError::InvalidPrice => "INVALID_PRICE",
            ValidationError::Required { .. } => "REQUIRED",
            ValidationError::LoginRequired => "LOGIN_REQUIRED",
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(ValidationError::Required { field: "email" });
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if !PHONE_REGEX.is_match(phone) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails() {
        assert!(validate_email("a@b.com").is_ok());
        assert_eq!(validate_email("a@b"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a b@c.com"), Err(ValidationError::InvalidEmail));
        assert_eq!(
            validate_email("  "),
            Err(ValidationError::Required { field: "email" })
        );
    }

    #[test]
    fn passwords() {
        assert!(validate_password("secret").is_ok());
        assert_eq!(validate_password("12345"), Err(ValidationError::PasswordTooShort));
    }

    #[test]
    fn phones() {
        assert!(validate_phone("+251 911 234 567").is_ok());
        assert!(validate_phone("0911-234-567").is_ok());
        assert_eq!(validate_phone("12345"), Err(ValidationError::InvalidPhone));
        assert_eq!(validate_phone("0911abc4567"), Err(ValidationError::InvalidPhone));
    }

    #[test]
    fn required_fields_name_themselves() {
        let err = require("name", "").unwrap_err();
        assert_eq!(err.field(), "name");
        assert_eq!(err.to_string(), "name is required");
        assert!(require("name", "Abebe").is_ok());
    }

    #[test]
    fn date_codes() {
        assert_eq!(ValidationError::StartInPast.code(), "START_IN_PAST");
        assert_eq!(ValidationError::EndNotAfterStart.field(), "endDate");
    }
}

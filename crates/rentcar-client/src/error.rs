use crate::services::validation::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Server error ({status})")]
    Server { status: u16 },

    #[error("Session expired")]
    AuthExpired,

    #[error("Malformed authentication response")]
    MalformedResponse,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Request failed ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Domain { status: u16, message: Option<String> },

    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    /// Stable name of the error kind, as reported to the user-facing layer.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Server { .. } => "SERVER_ERROR",
            ClientError::AuthExpired => "AUTH_EXPIRED",
            ClientError::MalformedResponse => "MALFORMED_RESPONSE",
            ClientError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::Domain { .. } | ClientError::NotFound { .. } => "DOMAIN_ERROR",
            ClientError::Storage(_) | ClientError::Pool(_) | ClientError::Io(_) => "STORAGE_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
        }
    }

    /// Message shown to the user. `fallback` is the per-action generic text used
    /// when the server did not provide anything better.
    pub fn notice(&self, fallback: &str) -> String {
        match self {
            ClientError::Transport(_) => "Network error. Please check your connection.".to_string(),
            ClientError::Server { .. } => "Server error. Please try again later.".to_string(),
            ClientError::AuthExpired => "Session expired. Please login again.".to_string(),
            ClientError::MalformedResponse => "Invalid response from server".to_string(),
            ClientError::UserAlreadyExists => {
                "An account with this email already exists".to_string()
            }
            ClientError::Validation(e) => e.to_string(),
            ClientError::Domain {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Errors the HTTP layer already announced to the user on its own.
    pub fn is_globally_reported(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::Server { .. } | ClientError::AuthExpired
        )
    }

    /// Server message indicates the account being registered already exists.
    pub(crate) fn mentions_existing_account(&self) -> bool {
        match self {
            ClientError::Domain {
                message: Some(msg), ..
            } => crate::auth::normalizer::says_already_exists(msg),
            _ => false,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_message_is_shown_verbatim() {
        let err = ClientError::Domain {
            status: 400,
            message: Some("Car is not available".into()),
        };
        assert_eq!(err.notice("Booking failed"), "Car is not available");
        assert_eq!(err.kind(), "DOMAIN_ERROR");
    }

    #[test]
    fn domain_without_message_uses_fallback() {
        let err = ClientError::Domain {
            status: 422,
            message: None,
        };
        assert_eq!(err.notice("Booking failed"), "Booking failed");

        let blank = ClientError::Domain {
            status: 422,
            message: Some("  ".into()),
        };
        assert_eq!(blank.notice("Booking failed"), "Booking failed");
    }

    #[test]
    fn fixed_messages_per_kind() {
        assert_eq!(
            ClientError::Server { status: 503 }.notice("x"),
            "Server error. Please try again later."
        );
        assert_eq!(
            ClientError::AuthExpired.notice("x"),
            "Session expired. Please login again."
        );
        assert_eq!(
            ClientError::NotFound { path: "/cars/1".into() }.notice("Car not found"),
            "Car not found"
        );
        assert!(ClientError::AuthExpired.is_globally_reported());
        assert!(!ClientError::MalformedResponse.is_globally_reported());
    }

    #[test]
    fn validation_error_converts() {
        let err: ClientError = ValidationError::EndNotAfterStart.into();
        assert_eq!(err.kind(), "VALIDATION_ERROR");
        assert_eq!(err.notice("x"), "End date must be after start date");
    }

    #[test]
    fn existing_account_detection() {
        let err = ClientError::Domain {
            status: 409,
            message: Some("User Already Exists".into()),
        };
        assert!(err.mentions_existing_account());
        assert!(!ClientError::Server { status: 500 }.mentions_existing_account());
    }
}

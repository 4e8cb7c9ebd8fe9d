use thiserror::Error;

/// Every failure a use case can report.
///
/// Client-facing variants carry precise messages; `StoreUnavailable` and
/// `Internal` are logged and surfaced as a generic server error.
#[derive(Debug, Error)]
pub enum DomainError {
    // ── Credential operations ──────────────────────────────────
    #[error("Please enter all fields")]
    MissingFields,

    #[error("User already exists: {0}")]
    DuplicateUser(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    // ── Authentication ─────────────────────────────────────────
    #[error("No bearer token provided")]
    MissingToken,

    #[error("Token is malformed or its signature is invalid")]
    TokenMalformed,

    #[error("Token has expired")]
    TokenExpired,

    #[error("User {0} no longer exists")]
    UserNotFound(String),

    // ── Station CRUD ───────────────────────────────────────────
    #[error("{message}")]
    InvalidInput {
        message: String,
        errors: Vec<String>,
    },

    #[error("Charging station {0} not found")]
    NotFound(String),

    #[error("User not authorized to {action} this station")]
    Forbidden { action: &'static str },

    #[error("No valid fields provided for update")]
    NoChange,

    // ── Infrastructure ─────────────────────────────────────────
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Validation failure with a single message and no per-field list.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Validation failure carrying per-field messages.
    pub fn validation(errors: Vec<String>) -> Self {
        Self::InvalidInput {
            message: "Validation Error".to_string(),
            errors,
        }
    }

    /// Whether this error hides an infrastructure problem that must not leak
    /// to clients.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_) | Self::Internal(_))
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::StoreUnavailable(e.to_string())
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_carries_field_messages() {
        let err = DomainError::validation(vec!["name: Charger name is required.".into()]);
        match err {
            DomainError::InvalidInput { message, errors } => {
                assert_eq!(message, "Validation Error");
                assert_eq!(errors.len(), 1);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn only_infrastructure_errors_are_server_errors() {
        assert!(DomainError::StoreUnavailable("pool timed out".into()).is_server_error());
        assert!(DomainError::Internal("bad point".into()).is_server_error());
        assert!(!DomainError::NoChange.is_server_error());
        assert!(!DomainError::Forbidden { action: "delete" }.is_server_error());
    }
}

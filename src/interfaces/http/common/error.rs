//! Mapping of `DomainError` onto HTTP responses
//!
//! Every failure leaves the API as `{message, errors?}` with the status
//! below. Infrastructure failures are logged and collapsed into a generic
//! 500 so that no storage or crypto detail reaches the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::shared::DomainError;

/// Error payload
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }
}

/// `DomainError` on its way out of a handler
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        Self(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::MissingFields
            | DomainError::DuplicateUser(_)
            | DomainError::InvalidInput { .. }
            | DomainError::NoChange => StatusCode::BAD_REQUEST,
            DomainError::InvalidCredentials
            | DomainError::MissingToken
            | DomainError::TokenMalformed
            | DomainError::TokenExpired
            | DomainError::UserNotFound(_) => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden { .. } => StatusCode::FORBIDDEN,
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::StoreUnavailable(_) | DomainError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(self) -> ErrorBody {
        match self.0 {
            DomainError::MissingFields => ErrorBody::new("Please enter all fields"),
            DomainError::DuplicateUser(_) => ErrorBody::new("User already exists"),
            DomainError::InvalidCredentials => ErrorBody::new("Invalid credentials"),
            DomainError::MissingToken => ErrorBody::new("Not authorized, no token provided"),
            DomainError::TokenMalformed => ErrorBody::new("Invalid token, please login again"),
            DomainError::TokenExpired => ErrorBody::new("Token expired, please login again"),
            DomainError::UserNotFound(_) => ErrorBody::new("User not found, please login again"),
            DomainError::InvalidInput { message, errors } => ErrorBody { message, errors },
            DomainError::NotFound(_) => ErrorBody::new("Charging station not found"),
            DomainError::Forbidden { action } => {
                ErrorBody::new(format!("User not authorized to {} this station", action))
            }
            DomainError::NoChange => ErrorBody::new("No valid fields provided for update."),
            DomainError::StoreUnavailable(_) | DomainError::Internal(_) => {
                ErrorBody::new("Server error")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_server_error() {
            error!("Request failed: {}", self.0);
        }
        let status = self.status();
        (status, Json(self.body())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(e: DomainError) -> serde_json::Value {
        serde_json::to_value(ApiError(e).body()).unwrap()
    }

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(ApiError(DomainError::NoChange).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError(DomainError::TokenExpired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError(DomainError::Forbidden { action: "update" }).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError(DomainError::NotFound("x".into())).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError(DomainError::StoreUnavailable("pool".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_errors_carry_list() {
        let body = body_of(DomainError::validation(vec!["Status is required.".into()]));
        assert_eq!(
            body,
            serde_json::json!({"message": "Validation Error", "errors": ["Status is required."]})
        );
    }

    #[test]
    fn server_errors_hide_detail() {
        let body = body_of(DomainError::StoreUnavailable("disk I/O error at /var/db".into()));
        assert_eq!(body, serde_json::json!({"message": "Server error"}));
    }

    #[test]
    fn forbidden_names_the_action() {
        let body = body_of(DomainError::Forbidden { action: "delete" });
        assert_eq!(body["message"], "User not authorized to delete this station");
    }
}

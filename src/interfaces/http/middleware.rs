//! Authentication middleware for Axum

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::domain::{DomainError, DomainResult, RepositoryProvider};
use crate::infrastructure::crypto::TokenService;
use crate::interfaces::http::common::ApiError;

/// Authentication state: token verifier and user lookup
#[derive(Clone)]
pub struct AuthState {
    pub tokens: Arc<TokenService>,
    pub repos: Arc<dyn RepositoryProvider>,
}

/// Identity attached to a request that passed the gate
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
}

fn extract_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the caller behind an `Authorization` header value.
pub async fn authenticate(
    auth_state: &AuthState,
    auth_header: Option<&str>,
) -> DomainResult<AuthenticatedUser> {
    let token = auth_header
        .and_then(extract_token)
        .ok_or(DomainError::MissingToken)?;

    let user_id = auth_state.tokens.verify(token)?;

    let user = auth_state
        .repos
        .users()
        .find_by_id(&user_id)
        .await?
        .ok_or(DomainError::UserNotFound(user_id))?;

    Ok(AuthenticatedUser {
        id: user.id,
        username: user.username,
    })
}

/// JWT bearer authentication middleware
pub async fn auth_middleware(
    State(auth_state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match authenticate(&auth_state, auth_header).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            if !e.is_server_error() {
                debug!("Rejected request: {}", e);
                metrics::counter!("auth_failures_total", "reason" => failure_reason(&e))
                    .increment(1);
            }
            ApiError(e).into_response()
        }
    }
}

fn failure_reason(e: &DomainError) -> &'static str {
    match e {
        DomainError::MissingToken => "missing_token",
        DomainError::TokenExpired => "token_expired",
        DomainError::UserNotFound(_) => "user_not_found",
        _ => "invalid_token",
    }
}

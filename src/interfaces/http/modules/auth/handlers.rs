//! Authentication API handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{AuthResponse, CredentialsRequest, UserInfo};
use crate::application::CredentialService;
use crate::interfaces::http::common::{ApiError, ErrorBody, JsonBody};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Auth state
#[derive(Clone)]
pub struct AuthHandlerState {
    pub credentials: Arc<CredentialService>,
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Missing fields or user already exists", body = ErrorBody)
    )
)]
pub async fn register(
    State(state): State<AuthHandlerState>,
    JsonBody(request): JsonBody<CredentialsRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let session = state
        .credentials
        .register(&request.username, &request.password)
        .await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Successful login", body = AuthResponse),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login(
    State(state): State<AuthHandlerState>,
    JsonBody(request): JsonBody<CredentialsRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = state
        .credentials
        .login(&request.username, &request.password)
        .await?;
    Ok(Json(session.into()))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    )
)]
pub async fn get_current_user(Extension(user): Extension<AuthenticatedUser>) -> Json<UserInfo> {
    Json(user.into())
}

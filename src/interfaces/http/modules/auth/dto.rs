//! Authentication DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::AuthSession;
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Username and password. Missing keys read as empty strings.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub id: String,
    pub username: String,
    pub token: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            id: session.user.id,
            username: session.user.username,
            token: session.token,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
}

impl From<AuthenticatedUser> for UserInfo {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

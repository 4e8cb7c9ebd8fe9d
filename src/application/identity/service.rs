//! Credential operations: registration and login
//!
//! HTTP handlers are thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{CreateUserDto, DomainError, DomainResult, RepositoryProvider, UserSummary};
use crate::infrastructure::crypto::password::{hash_password, verify_password, DEFAULT_COST};
use crate::infrastructure::crypto::TokenService;

/// Identity plus a freshly issued bearer token
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserSummary,
    pub token: String,
}

pub struct CredentialService {
    repos: Arc<dyn RepositoryProvider>,
    tokens: Arc<TokenService>,
    bcrypt_cost: u32,
}

impl CredentialService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, tokens: Arc<TokenService>) -> Self {
        Self {
            repos,
            tokens,
            bcrypt_cost: DEFAULT_COST,
        }
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    // ── Registration ────────────────────────────────────────────

    /// Create a user and return it with a token.
    pub async fn register(&self, username: &str, password: &str) -> DomainResult<AuthSession> {
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::MissingFields);
        }

        if self.repos.users().find_by_username(username).await?.is_some() {
            return Err(DomainError::DuplicateUser(username.to_string()));
        }

        let password_hash = {
            let password = password.to_string();
            let cost = self.bcrypt_cost;
            tokio::task::spawn_blocking(move || hash_password(&password, cost))
                .await
                .map_err(|e| DomainError::Internal(format!("Hashing task failed: {}", e)))?
                .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))?
        };

        let user = self
            .repos
            .users()
            .create_user(CreateUserDto {
                username: username.to_string(),
                password_hash,
            })
            .await?;

        let token = self.tokens.issue(&user.id)?;

        info!(user_id = %user.id, username = %user.username, "New user registered");
        Ok(AuthSession {
            user: user.into(),
            token,
        })
    }

    // ── Authentication ──────────────────────────────────────────

    /// Unknown user and wrong password yield the same `InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<AuthSession> {
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::MissingFields);
        }

        let Some(user) = self.repos.users().find_by_username(username).await? else {
            metrics::counter!("auth_failures_total", "reason" => "invalid_credentials")
                .increment(1);
            return Err(DomainError::InvalidCredentials);
        };

        let valid = {
            let password = password.to_string();
            let hash = user.password_hash.clone();
            tokio::task::spawn_blocking(move || verify_password(&password, &hash))
                .await
                .map_err(|e| DomainError::Internal(format!("Hashing task failed: {}", e)))?
                .unwrap_or_else(|e| {
                    warn!(user_id = %user.id, "Stored password hash is unreadable: {}", e);
                    false
                })
        };

        if !valid {
            metrics::counter!("auth_failures_total", "reason" => "invalid_credentials")
                .increment(1);
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.id)?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthSession {
            user: user.into(),
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::JwtConfig;
    use crate::infrastructure::storage::InMemoryRepositoryProvider;

    fn service() -> (CredentialService, Arc<TokenService>) {
        let repos: Arc<dyn RepositoryProvider> = Arc::new(InMemoryRepositoryProvider::new());
        let tokens = Arc::new(TokenService::new(&JwtConfig {
            secret: "test-secret".into(),
            issuer: "charger-directory".into(),
        }));
        (
            CredentialService::new(repos, tokens.clone()).with_bcrypt_cost(4),
            tokens,
        )
    }

    #[tokio::test]
    async fn register_returns_identity_and_valid_token() {
        let (credentials, tokens) = service();
        let session = credentials.register("alice", "pw1").await.unwrap();

        assert_eq!(session.user.username, "alice");
        assert_eq!(tokens.verify(&session.token).unwrap(), session.user.id);
    }

    #[tokio::test]
    async fn register_requires_both_fields() {
        let (credentials, _) = service();
        assert!(matches!(
            credentials.register("", "pw1").await,
            Err(DomainError::MissingFields)
        ));
        assert!(matches!(
            credentials.register("alice", "").await,
            Err(DomainError::MissingFields)
        ));
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let (credentials, _) = service();
        credentials.register("alice", "pw1").await.unwrap();

        assert!(matches!(
            credentials.register("alice", "other").await,
            Err(DomainError::DuplicateUser(name)) if name == "alice"
        ));
        // Usernames are case-sensitive.
        assert!(credentials.register("Alice", "pw1").await.is_ok());
    }

    #[tokio::test]
    async fn login_accepts_correct_password() {
        let (credentials, tokens) = service();
        let registered = credentials.register("alice", "pw1").await.unwrap();
        let session = credentials.login("alice", "pw1").await.unwrap();

        assert_eq!(session.user, registered.user);
        assert_eq!(tokens.verify(&session.token).unwrap(), registered.user.id);
    }

    #[tokio::test]
    async fn login_failures_are_indistinguishable() {
        let (credentials, _) = service();
        credentials.register("alice", "pw1").await.unwrap();

        let wrong_password = credentials.login("alice", "nope").await.unwrap_err();
        let unknown_user = credentials.login("bob", "pw1").await.unwrap_err();

        assert!(matches!(wrong_password, DomainError::InvalidCredentials));
        assert!(matches!(unknown_user, DomainError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let (credentials, _) = service();
        assert!(matches!(
            credentials.login("alice", "").await,
            Err(DomainError::MissingFields)
        ));
    }
}

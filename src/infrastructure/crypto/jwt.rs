//! JWT token handling
//!
//! The `TokenService` is built once at startup from `JwtConfig` and shared
//! by the credential operations (issue) and the auth gate (verify).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::shared::{DomainError, DomainResult};

/// Fixed validity window of every issued token.
pub const TOKEN_VALIDITY_DAYS: i64 = 30;

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Issuer claim
    pub issuer: String,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Issuer
    pub iss: String,
}

/// Issues and verifies signed, time-limited bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::default();
        validation.set_issuer(&[&config.issuer]);
        // Expiry is checked against an explicit clock in `verify_at`.
        validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
        }
    }

    /// Issue a token for `user_id`, valid for [`TOKEN_VALIDITY_DAYS`].
    pub fn issue(&self, user_id: &str) -> DomainResult<String> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> DomainResult<String> {
        let expires_at = now + Duration::days(TOKEN_VALIDITY_DAYS);
        let claims = TokenClaims {
            sub: user_id.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token and return the user id it was issued to.
    pub fn verify(&self, token: &str) -> DomainResult<String> {
        self.verify_at(token, Utc::now())
    }

    /// A token is still valid at the exact second of its `exp` claim.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> DomainResult<String> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!("Token rejected: {}", e);
                DomainError::TokenMalformed
            })?;

        if now.timestamp() > data.claims.exp {
            return Err(DomainError::TokenExpired);
        }

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service(secret: &str) -> TokenService {
        TokenService::new(&JwtConfig {
            secret: secret.to_string(),
            issuer: "charger-directory".to_string(),
        })
    }

    #[test]
    fn test_issue_and_verify_token() {
        let tokens = service("test-secret");
        let token = tokens.issue("user-123").unwrap();

        assert_eq!(tokens.verify(&token).unwrap(), "user-123");
        assert_eq!(
            tokens
                .verify_at(&token, Utc::now() + Duration::days(29))
                .unwrap(),
            "user-123"
        );
    }

    #[test]
    fn test_validity_window_is_thirty_days() {
        let tokens = service("test-secret");
        let issued_at = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let token = tokens.issue_at("user-123", issued_at).unwrap();

        let at = |days: i64| issued_at + Duration::days(days);
        assert_eq!(tokens.verify_at(&token, at(29)).unwrap(), "user-123");
        assert_eq!(tokens.verify_at(&token, at(30)).unwrap(), "user-123");
        assert!(matches!(
            tokens.verify_at(&token, at(30) + Duration::seconds(1)),
            Err(DomainError::TokenExpired)
        ));
        assert!(matches!(
            tokens.verify_at(&token, at(31)),
            Err(DomainError::TokenExpired)
        ));
    }

    #[test]
    fn test_invalid_token() {
        let tokens = service("test-secret");
        assert!(matches!(
            tokens.verify("invalid-token"),
            Err(DomainError::TokenMalformed)
        ));
    }

    #[test]
    fn test_foreign_signature_is_malformed() {
        let token = service("other-secret").issue("user-123").unwrap();
        assert!(matches!(
            service("test-secret").verify(&token),
            Err(DomainError::TokenMalformed)
        ));
    }

    #[test]
    fn test_tampered_payload_is_malformed() {
        let tokens = service("test-secret");
        let token = tokens.issue("user-123").unwrap();
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        parts[1] = parts[1].chars().rev().collect();
        let tampered = parts.join(".");

        assert!(matches!(
            tokens.verify(&tampered),
            Err(DomainError::TokenMalformed)
        ));
    }

    #[test]
    fn test_wrong_issuer_is_malformed() {
        let foreign = TokenService::new(&JwtConfig {
            secret: "test-secret".to_string(),
            issuer: "someone-else".to_string(),
        });
        let token = foreign.issue("user-123").unwrap();
        assert!(matches!(
            service("test-secret").verify(&token),
            Err(DomainError::TokenMalformed)
        ));
    }
}

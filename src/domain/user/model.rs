//! User domain entity

use chrono::{DateTime, Utc};

/// Registered account that can own charging stations.
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    /// Unique, case-sensitive login name
    pub username: String,
    /// bcrypt hash of the password; never leaves the service layer
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            username: self.username.clone(),
        }
    }
}

/// Public view of a user: identity without the secret.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

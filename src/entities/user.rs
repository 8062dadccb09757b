//! User entity with password hashing helpers.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{Role, SubscriptionStatus};

#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub role: Role,
    pub subscription: SubscriptionStatus,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Verify a candidate password against the stored bcrypt hash.
    pub fn verify_password(&self, candidate: &str) -> bool {
        verify(candidate, &self.password).unwrap_or(false)
    }

    /// Hash a password using bcrypt with default cost.
    pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
        hash(password, DEFAULT_COST)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

//! User DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::entities::{Role, SubscriptionStatus, User};

#[derive(Serialize, Deserialize, Debug)]
pub struct UserDTO {
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub subscription: SubscriptionStatus,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            user_id: value.user_id,
            username: value.username,
            display_name: value.display_name,
            role: value.role,
            subscription: value.subscription,
        }
    }
}

/// Registration payload. Role is never client-controlled: every
/// registration creates a customer account.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateUserDTO {
    #[validate(length(min = 3, max = 32, message = "Username must be between 3 and 32 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 64, message = "Display name must be between 1 and 64 characters"))]
    pub display_name: String,

    #[validate(length(min = 8, max = 72, message = "Password must be between 8 and 72 characters"))]
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginDTO {
    pub username: String,
    pub password: String,
}

//! Enumerations stored as TEXT columns.

use serde::{Deserialize, Serialize};

/// Account role. Admins share one support inbox; customers own one
/// conversation each.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Which side of the conversation authored a message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Admin,
}

impl From<Role> for Sender {
    fn from(role: Role) -> Self {
        match role {
            Role::User => Sender::User,
            Role::Admin => Sender::Admin,
        }
    }
}

/// Subscription workflow state, mutated by exactly two transitions:
/// the customer requests, an admin approves or rejects.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    None,
    Pending,
    Active,
    Rejected,
}

//! Conversation DTOs - aggregated inbox rows and bulk operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One row of the admin inbox. Derived, never stored: a conversation
/// materializes with its first message and disappears with the last.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct ConversationSummaryDTO {
    pub conversation_key: i64,
    pub display_name: String,
    pub unread_count: i64,
    pub last_activity: DateTime<Utc>,
}

/// Request body for bulk conversation deletion.
#[derive(Serialize, Deserialize, Debug)]
pub struct BulkDeleteDTO {
    pub keys: Vec<i64>,
}

/// Bulk deletion outcome: deletes are independent, a failed key never
/// blocks the rest.
#[derive(Serialize, Deserialize, Debug)]
pub struct BulkDeleteResultDTO {
    pub deleted: usize,
    pub failed: Vec<i64>,
}

//! Message entity - one row of a support conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Sender;

/// A single chat message. `conversation_key` is the customer's user_id:
/// every message belongs to exactly one user <-> admin-pool conversation.
///
/// `is_read` only carries meaning for `sender = user` rows; it tracks the
/// admin-side unread backlog. Admin-authored rows are inserted already read.
#[derive(Serialize, Deserialize, Debug, Clone, sqlx::FromRow)]
pub struct Message {
    pub message_id: i64,
    pub conversation_key: i64,
    pub sender: Sender,
    pub body: Option<String>,
    pub attachment_ref: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

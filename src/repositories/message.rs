//! MessageRepository - the message store and conversation aggregation.
//!
//! Single source of truth for conversations. The realtime layer only fans
//! out what was appended here; nothing below this module mutates messages.

use chrono::Utc;
use sqlx::{Error, SqlitePool};
use tracing::debug;

use crate::dtos::{ConversationSummaryDTO, CreateMessageDTO};
use crate::entities::{Message, Sender};

pub struct MessageRepository {
    connection_pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Append one message to a conversation. The creation timestamp is
    /// assigned here, at store-write time, making this call the
    /// serialization point for racing sends on the same conversation.
    ///
    /// Admin-authored rows are inserted already read: unread tracking is
    /// one-directional and only counts the customer's backlog.
    pub async fn append(
        &self,
        conversation_key: &i64,
        sender: Sender,
        data: &CreateMessageDTO,
    ) -> Result<Message, Error> {
        let body = data.normalized_body();
        let created_at = Utc::now();
        let is_read = sender == Sender::Admin;

        let result = sqlx::query(
            r#"
            INSERT INTO messages (conversation_key, sender, body, attachment_ref, is_read, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(conversation_key)
        .bind(sender)
        .bind(&body)
        .bind(&data.attachment_ref)
        .bind(is_read)
        .bind(created_at)
        .execute(&self.connection_pool)
        .await?;

        debug!(conversation_key, "Message appended");

        Ok(Message {
            message_id: result.last_insert_rowid(),
            conversation_key: *conversation_key,
            sender,
            body,
            attachment_ref: data.attachment_ref.clone(),
            is_read,
            created_at,
        })
    }

    /// Full ordered history of one conversation, oldest first. Unknown
    /// keys yield an empty list, never an error.
    ///
    /// Ordering key is `created_at`, ties broken by insertion order.
    pub async fn find_many_by_conversation(
        &self,
        conversation_key: &i64,
    ) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT message_id, conversation_key, sender, body, attachment_ref, is_read, created_at
            FROM messages
            WHERE conversation_key = ?
            ORDER BY created_at ASC, message_id ASC
            "#,
        )
        .bind(conversation_key)
        .fetch_all(&self.connection_pool)
        .await
    }

    /// Mark every message in the conversation *not authored by* the reader
    /// as read. One UPDATE statement, so a concurrent append either lands
    /// before it (and is cleared) or after it (and stays unread) - never
    /// half of each. Idempotent.
    pub async fn mark_read(&self, conversation_key: &i64, reader: Sender) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE messages
            SET is_read = 1
            WHERE conversation_key = ? AND sender <> ?
            "#,
        )
        .bind(conversation_key)
        .bind(reader)
        .execute(&self.connection_pool)
        .await?;
        Ok(())
    }

    /// Remove every message for a key. Idempotent; there is no tombstone,
    /// the conversation simply stops existing until the next append.
    pub async fn delete_conversation(&self, conversation_key: &i64) -> Result<u64, Error> {
        let result = sqlx::query("DELETE FROM messages WHERE conversation_key = ?")
            .bind(conversation_key)
            .execute(&self.connection_pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// The admin inbox: one aggregate query over all conversations with at
    /// least one message. Ordered by unread count descending, then display
    /// name ascending so equal counts present deterministically.
    pub async fn list_conversations(&self) -> Result<Vec<ConversationSummaryDTO>, Error> {
        sqlx::query_as::<_, ConversationSummaryDTO>(
            r#"
            SELECT
                m.conversation_key AS conversation_key,
                u.display_name AS display_name,
                SUM(CASE WHEN m.sender <> 'admin' AND m.is_read = 0 THEN 1 ELSE 0 END) AS unread_count,
                MAX(m.created_at) AS last_activity
            FROM messages m
            JOIN users u ON u.user_id = m.conversation_key
            GROUP BY m.conversation_key, u.display_name
            ORDER BY unread_count DESC, u.display_name ASC
            "#,
        )
        .fetch_all(&self.connection_pool)
        .await
    }
}

//! Message DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::entities::{Message, Sender};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageDTO {
    pub message_id: i64,
    pub conversation_key: i64,
    pub sender: Sender,
    pub body: Option<String>,
    pub attachment_ref: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageDTO {
    fn from(value: Message) -> Self {
        Self {
            message_id: value.message_id,
            conversation_key: value.conversation_key,
            sender: value.sender,
            body: value.body,
            attachment_ref: value.attachment_ref,
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}

/// Inbound message payload, shared by the HTTP endpoint and the WebSocket
/// `SendMessage` event so both paths validate the same record.
///
/// A message must carry a non-empty body, an attachment reference, or both.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[validate(schema(function = require_body_or_attachment))]
pub struct CreateMessageDTO {
    #[validate(length(max = 5000, message = "Message body must be at most 5000 characters"))]
    pub body: Option<String>,
    pub attachment_ref: Option<String>,
}

fn require_body_or_attachment(dto: &CreateMessageDTO) -> Result<(), ValidationError> {
    let has_body = dto.body.as_deref().is_some_and(|b| !b.trim().is_empty());
    let has_attachment = dto
        .attachment_ref
        .as_deref()
        .is_some_and(|a| !a.is_empty());
    if has_body || has_attachment {
        Ok(())
    } else {
        Err(ValidationError::new("empty_message")
            .with_message("Message requires a body or an attachment".into()))
    }
}

impl CreateMessageDTO {
    /// Body normalized to `None` when blank, so storage never holds
    /// whitespace-only bodies next to an attachment.
    pub fn normalized_body(&self) -> Option<String> {
        self.body
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_owned)
    }
}

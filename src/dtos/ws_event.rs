//! WebSocket event DTOs.
//!
//! Tagged unions, serialized as `{ "type": "...", "data": { ... } }`.

use serde::{Deserialize, Serialize};

use super::{CreateMessageDTO, MessageDTO};

/// Events a connected client may send.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "data")]
pub enum WsClientEvent {
    SendMessage(SendMessagePayload),
}

/// Events pushed from the server. Delivery is best-effort: the store is
/// the authoritative state and disconnected peers reconcile by re-fetching.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "data")]
pub enum WsServerEvent {
    MessageCreated(MessageDTO),
    Error { code: u16, message: String },
}

/// `SendMessage` payload. `conversation_key` is required for admins and
/// ignored for customers, who always write to their own conversation.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SendMessagePayload {
    #[serde(default)]
    pub conversation_key: Option<i64>,
    #[serde(flatten)]
    pub message: CreateMessageDTO,
}

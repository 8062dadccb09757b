//! Inbox services - the admin back-office side of the support chat.

use crate::core::{AppError, AppState};
use crate::dtos::{BulkDeleteDTO, BulkDeleteResultDTO, ConversationSummaryDTO, MessageDTO};
use crate::entities::{Sender, User};
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    Extension,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The aggregated inbox: every conversation with at least one message,
/// ordered by unread count descending, then display name ascending.
#[instrument(skip(state))]
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ConversationSummaryDTO>>, AppError> {
    let summaries = state.msg.list_conversations().await?;
    Ok(Json(summaries))
}

/// Full ordered history of one conversation. Admin-only: this route shares
/// its path with the append endpoint, so the role check lives here instead
/// of a route layer. Reading does not mark the backlog as read; the inbox
/// client follows up with the read endpoint when a conversation is selected.
#[instrument(skip(state, current_user), fields(key))]
pub async fn get_conversation_messages(
    State(state): State<Arc<AppState>>,
    Path(key): Path<i64>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    if !current_user.is_admin() {
        return Err(AppError::forbidden("This action requires an admin account"));
    }

    let messages = state.msg.find_many_by_conversation(&key).await?;
    Ok(Json(messages.into_iter().map(MessageDTO::from).collect()))
}

/// Clear the customer-authored backlog of one conversation. Idempotent:
/// viewing a conversation twice marks read twice with the same result.
#[instrument(skip(state), fields(key))]
pub async fn mark_conversation_read(
    State(state): State<Arc<AppState>>,
    Path(key): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.msg.mark_read(&key, Sender::Admin).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a whole conversation. Idempotent no-op for unknown keys.
#[instrument(skip(state), fields(key))]
pub async fn delete_conversation(
    State(state): State<Arc<AppState>>,
    Path(key): Path<i64>,
) -> Result<StatusCode, AppError> {
    let removed = state.msg.delete_conversation(&key).await?;
    info!(key, removed, "Conversation deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Best-effort bulk delete: every key is attempted independently and the
/// failures are reported back, a failing key never blocks the rest.
#[instrument(skip(state, body), fields(count = body.keys.len()))]
pub async fn bulk_delete_conversations(
    State(state): State<Arc<AppState>>,
    Json(body): Json<BulkDeleteDTO>,
) -> Result<Json<BulkDeleteResultDTO>, AppError> {
    let mut deleted = 0;
    let mut failed = Vec::new();

    for key in &body.keys {
        match state.msg.delete_conversation(key).await {
            Ok(_) => deleted += 1,
            Err(e) => {
                warn!(key, "Bulk delete failed for key: {:?}", e);
                failed.push(*key);
            }
        }
    }

    info!(deleted, failed = failed.len(), "Bulk delete finished");
    Ok(Json(BulkDeleteResultDTO { deleted, failed }))
}

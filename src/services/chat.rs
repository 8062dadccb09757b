//! Chat services - the customer-facing conversation view and the shared
//! append endpoint.

use crate::core::{AppError, AppState};
use crate::dtos::{CreateMessageDTO, MessageDTO};
use crate::entities::{Role, Sender, User};
use crate::repositories::Read;
use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    Extension,
};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Full ordered history of the caller's own conversation, oldest first.
/// No read-state mutation happens here: unread tracking is one-directional
/// and only the admin side consumes it.
#[instrument(skip(state, current_user), fields(user_id = current_user.user_id))]
pub async fn get_my_messages(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    let messages = state
        .msg
        .find_many_by_conversation(&current_user.user_id)
        .await?;
    Ok(Json(messages.into_iter().map(MessageDTO::from).collect()))
}

/// Append a message to a conversation. Customers may only write to their
/// own conversation; admins may write to any existing customer's.
///
/// The freshly created message is also fanned out to connected peers, so
/// an HTTP send reaches the counterpart exactly like a WebSocket send.
#[instrument(skip(state, current_user, body), fields(user_id = current_user.user_id, key))]
pub async fn post_message(
    State(state): State<Arc<AppState>>,
    Path(key): Path<i64>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateMessageDTO>,
) -> Result<(StatusCode, Json<MessageDTO>), AppError> {
    match current_user.role {
        Role::User => {
            if key != current_user.user_id {
                return Err(AppError::forbidden("You may only write to your own conversation"));
            }
        }
        Role::Admin => {
            if state.user.read(&key).await?.is_none() {
                return Err(AppError::not_found("Unknown conversation key"));
            }
        }
    }

    body.validate()?;

    let message = state
        .msg
        .append(&key, Sender::from(current_user.role), &body)
        .await?;

    info!(message_id = message.message_id, "Message appended over HTTP");

    let dto = MessageDTO::from(message);
    // HTTP senders have no live connection to exclude; conn ids start at 1
    state.peers.fan_out_message(&dto, 0);

    Ok((StatusCode::CREATED, Json(dto)))
}

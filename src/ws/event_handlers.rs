//! WebSocket event handlers.

use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dtos::{MessageDTO, SendMessagePayload, WsClientEvent, WsServerEvent};
use crate::entities::{Role, Sender};
use crate::repositories::Read;
use crate::ws::connection::PeerIdentity;
use crate::ws::peermap::ConnId;
use crate::AppState;

pub async fn process_client_event(
    state: &Arc<AppState>,
    identity: PeerIdentity,
    conn_id: ConnId,
    event: WsClientEvent,
) {
    match event {
        WsClientEvent::SendMessage(payload) => {
            process_send_message(state, identity, conn_id, payload).await
        }
    }
}

/// Persist a message from a live connection, then fan it out.
///
/// The store append is the serialization point: two racing sends for the
/// same conversation may interleave at the network layer, but delivery
/// follows append-completion order. Errors go back to the sender only;
/// fan-out failures never surface, the write already succeeded.
#[instrument(skip(state, payload), fields(user_id = identity.user_id))]
async fn process_send_message(
    state: &Arc<AppState>,
    identity: PeerIdentity,
    conn_id: ConnId,
    payload: SendMessagePayload,
) {
    // Customers always write to their own conversation; admins must name one
    let conversation_key = match identity.role {
        Role::User => identity.user_id,
        Role::Admin => match payload.conversation_key {
            Some(key) => key,
            None => {
                push_error(state, conn_id, 400, "conversation_key is required");
                return;
            }
        },
    };

    if identity.role == Role::Admin {
        // A write must target an existing customer
        match state.user.read(&conversation_key).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                push_error(state, conn_id, 404, "Unknown conversation key");
                return;
            }
            Err(e) => {
                warn!("Storage error resolving conversation key: {:?}", e);
                push_error(state, conn_id, 500, "Storage failure, retry the send");
                return;
            }
        }
    }

    if let Err(e) = payload.message.validate() {
        push_error(state, conn_id, 400, &e.to_string());
        return;
    }

    let message = match state
        .msg
        .append(&conversation_key, Sender::from(identity.role), &payload.message)
        .await
    {
        Ok(message) => message,
        Err(e) => {
            warn!("Storage error appending message: {:?}", e);
            push_error(state, conn_id, 500, "Storage failure, retry the send");
            return;
        }
    };

    info!(message_id = message.message_id, "Message persisted from WS");
    state
        .peers
        .fan_out_message(&MessageDTO::from(message), conn_id);
}

fn push_error(state: &Arc<AppState>, conn_id: ConnId, code: u16, message: &str) {
    state.peers.push_to_conn(
        &conn_id,
        WsServerEvent::Error {
            code,
            message: message.to_string(),
        },
    );
}

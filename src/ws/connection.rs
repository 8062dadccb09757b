//! WebSocket connection lifecycle.
//!
//! Each accepted socket is split into a write task (drains the per
//! -connection channel) and a read loop (idle timeout + rate limit +
//! event dispatch). Teardown drops the registration; nothing is queued
//! for offline participants beyond what the store persists.

use axum::extract::ws::{Message, Utf8Bytes, WebSocket};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::time::{interval, timeout, Duration};
use tracing::{info, instrument, warn};

use crate::dtos::{WsClientEvent, WsServerEvent};
use crate::entities::User;
use crate::ws::event_handlers::process_client_event;
use crate::ws::peermap::ConnId;
use crate::ws::{RATE_LIMITER_MILLIS, TIMEOUT_DURATION_SECONDS};
use crate::AppState;

/// Identity of the connected participant, resolved once at upgrade.
#[derive(Debug, Clone, Copy)]
pub struct PeerIdentity {
    pub user_id: i64,
    pub role: crate::entities::Role,
}

#[instrument(skip(ws, state, current_user), fields(user_id = current_user.user_id))]
pub async fn handle_socket(ws: WebSocket, state: Arc<AppState>, current_user: User) {
    info!("WebSocket connection established");

    let identity = PeerIdentity {
        user_id: current_user.user_id,
        role: current_user.role,
    };

    let (ws_tx, ws_rx) = ws.split();

    // Per-connection channel: the peer map holds the sender, the write
    // task drains the receiver. Unregistering closes the channel and the
    // write task with it.
    let (int_tx, int_rx) = unbounded_channel::<WsServerEvent>();
    let conn_id = state.peers.register(identity.user_id, identity.role, int_tx);

    tokio::spawn(write_ws(conn_id, ws_tx, int_rx));
    tokio::spawn(listen_ws(conn_id, identity, ws_rx, state));
}

#[instrument(skip(websocket_tx, internal_rx))]
async fn write_ws(
    conn_id: ConnId,
    mut websocket_tx: SplitSink<WebSocket, Message>,
    mut internal_rx: UnboundedReceiver<WsServerEvent>,
) {
    info!("Write task started");

    while let Some(event) = internal_rx.recv().await {
        let json = match serde_json::to_string(&event) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize event: {:?}", e);
                continue;
            }
        };
        if let Err(e) = websocket_tx.send(Message::Text(Utf8Bytes::from(json))).await {
            warn!("Failed to push event, closing write task: {:?}", e);
            break;
        }
    }

    info!("Write task terminated");
}

#[instrument(skip(identity, websocket_rx, state), fields(user_id = identity.user_id))]
async fn listen_ws(
    conn_id: ConnId,
    identity: PeerIdentity,
    mut websocket_rx: SplitStream<WebSocket>,
    state: Arc<AppState>,
) {
    info!("Listen task started");

    let mut rate_limiter = interval(Duration::from_millis(RATE_LIMITER_MILLIS));
    let timeout_duration = Duration::from_secs(TIMEOUT_DURATION_SECONDS);

    loop {
        match timeout(timeout_duration, websocket_rx.next()).await {
            Ok(Some(msg_result)) => {
                rate_limiter.tick().await;

                let msg = match msg_result {
                    Ok(m) => m,
                    Err(e) => {
                        warn!("WebSocket error: {:?}", e);
                        break;
                    }
                };

                match msg {
                    Message::Text(text) => match serde_json::from_str::<WsClientEvent>(&text) {
                        Ok(event) => {
                            process_client_event(&state, identity, conn_id, event).await;
                        }
                        Err(_) => {
                            warn!("Failed to deserialize client event");
                            state.peers.push_to_conn(
                                &conn_id,
                                WsServerEvent::Error {
                                    code: 400,
                                    message: "Malformed event".to_string(),
                                },
                            );
                        }
                    },
                    Message::Close(_) => {
                        info!("Close message received");
                        break;
                    }
                    _ => {}
                }
            }
            Ok(None) => {
                info!("WebSocket stream ended");
                break;
            }
            Err(_) => {
                warn!(timeout_secs = TIMEOUT_DURATION_SECONDS, "Connection timeout");
                break;
            }
        }
    }

    // Teardown: dropping the registration closes the write task's channel
    state.peers.unregister(&conn_id);
    info!("Listen task terminated");
}

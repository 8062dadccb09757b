//! WebSocket module - realtime delivery channel
//!
//! Pure notification layer on top of the message store: it never affects
//! durability or correctness. A peer that misses a push reconciles by
//! re-fetching over HTTP.
//!
//! Identity and role come from the JWT presented at upgrade time, so the
//! connection is registered the moment the socket opens; no separate
//! announce event exists.

pub mod connection;
pub mod event_handlers;
pub mod peermap;

pub use connection::handle_socket;

use crate::{entities::User, AppState};
use axum::{
    extract::{ws::WebSocketUpgrade, State},
    response::Response,
    Extension,
};
use std::sync::Arc;

/// Minimum spacing between inbound client events on one connection.
pub const RATE_LIMITER_MILLIS: u64 = 50;
/// Idle connections are dropped after this long without any inbound frame.
pub const TIMEOUT_DURATION_SECONDS: u64 = 300;

/// Entry point for WebSocket upgrade requests. Runs behind the
/// authentication middleware, which put the caller into the extensions.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, current_user))
}

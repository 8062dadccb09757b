//! Services module - HTTP handlers
//!
//! One sub-module per API area. Handlers orchestrate repositories and the
//! peer map; all SQL stays in `repositories`, all wire shapes in `dtos`.

pub mod auth;
pub mod chat;
pub mod inbox;
pub mod product;
pub mod subscription;

// Re-exports to shorten imports
pub use auth::{login_user, register_user};
pub use chat::{get_my_messages, post_message};
pub use inbox::{
    bulk_delete_conversations, delete_conversation, get_conversation_messages,
    list_conversations, mark_conversation_read,
};
pub use product::{create_product, delete_product, get_product, list_products, update_product};
pub use subscription::{
    approve_subscription, list_pending_subscriptions, reject_subscription, request_subscription,
};

use crate::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

/// Root endpoint - health check with the live connection count
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "online_peers": state.peers.online_count() })),
    )
}

/// Client bootstrap config: the polling fallback interval for the inbox.
/// The push channel only delivers new-message events, so clients re-fetch
/// the authoritative state on this timer.
pub async fn client_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({ "inbox_refresh_secs": state.inbox_refresh_secs }))
}

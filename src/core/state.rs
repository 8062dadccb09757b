//! Application state shared across routes, middleware and the WS layer.

use sqlx::SqlitePool;

use crate::repositories::{MessageRepository, ProductRepository, UserRepository};
use crate::ws::peermap::PeerMap;

pub struct AppState {
    /// Account storage
    pub user: UserRepository,

    /// Catalog storage
    pub product: ProductRepository,

    /// Message store: the single source of truth for conversations
    pub msg: MessageRepository,

    /// Secret key for JWT tokens
    pub jwt_secret: String,

    /// Polling fallback interval handed out to clients (seconds)
    pub inbox_refresh_secs: u64,

    /// Live WebSocket connections, keyed by connection id. Owns no
    /// persistent state; a disconnected peer simply stops receiving pushes.
    pub peers: PeerMap,
}

impl AppState {
    /// Build the state from a shared connection pool. Repositories clone
    /// the pool handle; the pool itself is the only process-wide resource.
    pub fn new(pool: SqlitePool, jwt_secret: String, inbox_refresh_secs: u64) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            product: ProductRepository::new(pool.clone()),
            msg: MessageRepository::new(pool),
            jwt_secret,
            inbox_refresh_secs,
            peers: PeerMap::new(),
        }
    }
}

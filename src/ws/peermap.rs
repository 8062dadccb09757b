//! PeerMap - registry of live WebSocket connections.
//!
//! Keyed by connection id, not user id: one participant may hold several
//! tabs open and each gets its own channel. Admin connections form the
//! broadcast group that sees every conversation.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::dtos::{MessageDTO, WsServerEvent};
use crate::entities::Role;

pub type ConnId = u64;

struct Peer {
    user_id: i64,
    role: Role,
    tx: UnboundedSender<WsServerEvent>,
}

pub struct PeerMap {
    peers: DashMap<ConnId, Peer>,
    next_conn_id: AtomicU64,
}

impl PeerMap {
    pub fn new() -> Self {
        PeerMap {
            peers: DashMap::new(),
            next_conn_id: AtomicU64::new(1),
        }
    }

    pub fn register(&self, user_id: i64, role: Role, tx: UnboundedSender<WsServerEvent>) -> ConnId {
        let conn_id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
        self.peers.insert(conn_id, Peer { user_id, role, tx });
        info!(conn_id, user_id, ?role, total = self.peers.len(), "Peer registered");
        conn_id
    }

    pub fn unregister(&self, conn_id: &ConnId) {
        self.peers.remove(conn_id);
        info!(conn_id, total = self.peers.len(), "Peer unregistered");
    }

    /// Push an event to one connection. Failures mean the peer already
    /// disconnected; they are logged and swallowed.
    pub fn push_to_conn(&self, conn_id: &ConnId, event: WsServerEvent) {
        if let Some(peer) = self.peers.get(conn_id) {
            if peer.tx.send(event).is_err() {
                warn!(conn_id, "Peer channel closed, event dropped");
            }
        } else {
            debug!(conn_id, "Push to unregistered connection skipped");
        }
    }

    /// Fan a freshly appended message out to the conversation's customer
    /// connections and every admin connection, excluding the connection
    /// that sent it (the sender renders its own optimistic copy).
    ///
    /// Delivery is best-effort: a closed channel is logged and skipped, the
    /// store write already succeeded and the peer will reconcile by poll.
    pub fn fan_out_message(&self, message: &MessageDTO, exclude: ConnId) -> usize {
        let mut delivered = 0;
        for entry in self.peers.iter() {
            let (&conn_id, peer) = entry.pair();
            if conn_id == exclude {
                continue;
            }
            let addressed =
                peer.role == Role::Admin || peer.user_id == message.conversation_key;
            if !addressed {
                continue;
            }
            if peer
                .tx
                .send(WsServerEvent::MessageCreated(message.clone()))
                .is_ok()
            {
                delivered += 1;
            } else {
                warn!(conn_id, "Fan-out to closed peer channel, skipping");
            }
        }
        debug!(
            message_id = message.message_id,
            delivered, "Message fanned out"
        );
        delivered
    }

    pub fn online_count(&self) -> usize {
        self.peers.len()
    }
}

impl Default for PeerMap {
    fn default() -> Self {
        Self::new()
    }
}

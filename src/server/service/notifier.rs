//! Live notification fan-out.
//!
//! Each WebSocket connection registers once and receives an mpsc receiver. A connection
//! may then join the rooms of one or more users; pushing to a user delivers the event to
//! every connection currently in that user's room. Nothing is buffered for users without
//! a live connection.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};

use crate::model::socket::ServerEvent;

/// Capacity of the per-connection outbound queue.
const CONNECTION_BUFFER: usize = 64;

/// Identifier of one registered connection.
pub type ConnectionId = u64;

#[derive(Default)]
struct HubState {
    connections: HashMap<ConnectionId, mpsc::Sender<ServerEvent>>,
    /// User external id to the connections that joined that user.
    rooms: HashMap<String, HashSet<ConnectionId>>,
}

impl HubState {
    fn remove_connection(&mut self, connection: ConnectionId) {
        self.connections.remove(&connection);
        self.rooms.retain(|_, members| {
            members.remove(&connection);
            !members.is_empty()
        });
    }
}

/// Registry of live connections keyed by user external id.
#[derive(Clone, Default)]
pub struct NotificationHub {
    state: Arc<RwLock<HubState>>,
    next_id: Arc<AtomicU64>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection and returns its id and outbound queue.
    pub async fn register(&self) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(CONNECTION_BUFFER);

        self.state.write().await.connections.insert(id, tx);

        (id, rx)
    }

    /// Adds a connection to a user's room. Unknown connections are ignored.
    pub async fn join(&self, user_id: &str, connection: ConnectionId) {
        let mut state = self.state.write().await;
        if !state.connections.contains_key(&connection) {
            return;
        }

        state
            .rooms
            .entry(user_id.to_string())
            .or_default()
            .insert(connection);
    }

    /// Removes a connection from a user's room.
    pub async fn leave(&self, user_id: &str, connection: ConnectionId) {
        let mut state = self.state.write().await;
        if let Some(members) = state.rooms.get_mut(user_id) {
            members.remove(&connection);
            if members.is_empty() {
                state.rooms.remove(user_id);
            }
        }
    }

    /// Drops a connection and all of its room memberships.
    pub async fn disconnect(&self, connection: ConnectionId) {
        self.state.write().await.remove_connection(connection);
    }

    /// Delivers an event to every connection in a user's room.
    ///
    /// Connections whose receiver is gone are pruned. A connection with a full queue
    /// misses this event but stays registered.
    ///
    /// # Returns
    /// - `usize` - Number of connections the event was queued for
    pub async fn push(&self, user_id: &str, event: ServerEvent) -> usize {
        let targets: Vec<(ConnectionId, mpsc::Sender<ServerEvent>)> = {
            let state = self.state.read().await;
            let Some(members) = state.rooms.get(user_id) else {
                return 0;
            };
            members
                .iter()
                .filter_map(|id| state.connections.get(id).map(|tx| (*id, tx.clone())))
                .collect()
        };

        let mut delivered = 0;
        let mut dead = Vec::new();
        for (id, tx) in targets {
            match tx.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::warn!("Notification queue full for connection {}", id);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => dead.push(id),
            }
        }

        if !dead.is_empty() {
            let mut state = self.state.write().await;
            for id in dead {
                state.remove_connection(id);
            }
        }

        tracing::debug!("Pushed notification to {} connection(s) of {}", delivered, user_id);

        delivered
    }

    #[cfg(test)]
    async fn connection_count(&self) -> usize {
        self.state.read().await.connections.len()
    }
}

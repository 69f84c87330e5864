//! Concurrent connection storage with copy-on-read snapshots.
//!
//! [`Registry`] stores all open connections in a `HashMap` behind a
//! [`tokio::sync::RwLock`], plus an atomic online counter readable without
//! taking the lock. Broadcast fan-out iterates a snapshot, never the live
//! map, so slow recipients cannot block concurrent joins and leaves.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::RwLock;

use super::{Connection, ConnectionId};

/// Central store for all open connections.
///
/// The single synchronization point of the relay: every add, remove, and
/// snapshot serializes on the inner `RwLock`. The online counter is updated
/// while the write guard is held, so after each mutation completes
/// `count() == |membership|`.
///
/// # Concurrency
///
/// - `snapshot` and `count` run concurrently with each other.
/// - Mutations are serialized against snapshots and each other.
/// - A snapshot taken before a `remove` may still reference the removed
///   connection; sends to it fail cleanly once it is closed.
#[derive(Debug, Default)]
pub struct Registry {
    connections: RwLock<HashMap<ConnectionId, Arc<Connection>>>,
    online: AtomicUsize,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an open connection and increments the online counter.
    ///
    /// Identities are UUID v4, so a collision with an existing entry does
    /// not happen in practice; if it ever did, the previous entry is
    /// replaced without double-counting.
    pub async fn add(&self, conn: Arc<Connection>) {
        let mut map = self.connections.write().await;
        if map.insert(conn.id(), conn).is_none() {
            self.online.fetch_add(1, Ordering::Release);
        }
    }

    /// Removes a connection and decrements the online counter.
    ///
    /// Removing an absent identity is a no-op returning `None`, which keeps
    /// close paths idempotent (a transport error and the close event may
    /// both try to deregister the same connection).
    pub async fn remove(&self, id: ConnectionId) -> Option<Arc<Connection>> {
        let mut map = self.connections.write().await;
        let removed = map.remove(&id);
        if removed.is_some() {
            self.online.fetch_sub(1, Ordering::Release);
        }
        removed
    }

    /// Returns a point-in-time copy of the current membership.
    ///
    /// The returned handles stay valid while concurrent removals proceed;
    /// iteration never observes a partially registered connection.
    pub async fn snapshot(&self) -> Vec<Arc<Connection>> {
        let map = self.connections.read().await;
        map.values().map(Arc::clone).collect()
    }

    /// Returns the current online count without taking the lock.
    ///
    /// May be momentarily stale while a mutation is in flight, but always
    /// matches the membership once the mutation completes.
    #[must_use]
    pub fn count(&self) -> usize {
        self.online.load(Ordering::Acquire)
    }
}

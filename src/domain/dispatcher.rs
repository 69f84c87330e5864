//! Broadcast fan-out over the connection registry.
//!
//! The [`Dispatcher`] turns one inbound message into a delivery attempt on
//! every registered connection. Fan-out iterates a registry snapshot, so the
//! registry lock is never held across sends, and `Connection::send` only
//! enqueues, so the loop never awaits network I/O.

use std::sync::Arc;

use chrono::Utc;

use super::{ConnectionId, Registry, RelayEvent};

/// Broadcasts inbound messages to all registered connections.
///
/// Delivery is best-effort, at-least-one-attempt per recipient: a failing
/// send is logged and skipped, never aborting delivery to the remaining
/// recipients, and never removing the failing connection — deregistration
/// happens only through the connection's own close/error lifecycle.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
}

impl Dispatcher {
    /// Creates a dispatcher over the given registry.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    /// Broadcasts `text` from `src` to every registered connection,
    /// including `src` itself.
    ///
    /// Returns the number of recipients the message was enqueued for.
    pub async fn broadcast(&self, src: ConnectionId, text: &str) -> usize {
        let recipients = self.registry.snapshot().await;
        let mut delivered = 0;
        for conn in &recipients {
            match conn.send(text) {
                Ok(()) => delivered += 1,
                Err(err) => {
                    tracing::warn!(
                        connection_id = %conn.id(),
                        from = %src,
                        error = %err,
                        "dropping message for recipient"
                    );
                }
            }
        }
        tracing::debug!(from = %src, recipients = recipients.len(), delivered, "broadcast");
        delivered
    }

    /// Announces a newly joined connection to every client, the newcomer
    /// included, before any user message from it.
    pub async fn announce_join(&self, joined: ConnectionId) {
        let event = RelayEvent::PeerJoined {
            connection_id: joined,
            online: self.registry.count(),
            timestamp: Utc::now(),
        };
        if let Some(json) = event.to_json() {
            self.broadcast(joined, &json).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Connection;
    use tokio::sync::mpsc;

    fn make_connection() -> (Arc<Connection>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        (Arc::new(Connection::new(tx)), rx)
    }

    fn drain(rx: &mut mpsc::Receiver<String>) -> Vec<String> {
        let mut out = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            out.push(msg);
        }
        out
    }

    #[tokio::test]
    async fn broadcast_reaches_all_including_sender() {
        let registry = Arc::new(Registry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));

        let (a, mut rx_a) = make_connection();
        let (b, mut rx_b) = make_connection();
        let (c, mut rx_c) = make_connection();
        let src = a.id();
        registry.add(a).await;
        registry.add(b).await;
        registry.add(c).await;

        let delivered = dispatcher.broadcast(src, "hello").await;
        assert_eq!(delivered, 3);

        for rx in [&mut rx_a, &mut rx_b, &mut rx_c] {
            let msgs = drain(rx);
            assert_eq!(msgs, vec!["hello".to_owned()]);
        }
    }

    #[tokio::test]
    async fn failing_recipient_does_not_block_others() {
        let registry = Arc::new(Registry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));

        let (a, mut rx_a) = make_connection();
        let (b, _rx_b) = make_connection();
        let (c, mut rx_c) = make_connection();
        let src = a.id();
        b.close();
        registry.add(a).await;
        registry.add(b).await;
        registry.add(c).await;

        let delivered = dispatcher.broadcast(src, "hello").await;
        assert_eq!(delivered, 2);

        assert_eq!(drain(&mut rx_a), vec!["hello".to_owned()]);
        assert_eq!(drain(&mut rx_c), vec!["hello".to_owned()]);
    }

    #[tokio::test]
    async fn broadcast_to_empty_registry_delivers_nothing() {
        let registry = Arc::new(Registry::new());
        let dispatcher = Dispatcher::new(registry);
        let delivered = dispatcher.broadcast(ConnectionId::new(), "into the void").await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn join_announcement_reaches_newcomer_and_peers() {
        let registry = Arc::new(Registry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));

        let (a, mut rx_a) = make_connection();
        let (b, mut rx_b) = make_connection();
        let joined = b.id();
        registry.add(a).await;
        registry.add(b).await;

        dispatcher.announce_join(joined).await;

        for rx in [&mut rx_a, &mut rx_b] {
            let msgs = drain(rx);
            assert_eq!(msgs.len(), 1);
            let Some(json) = msgs.first() else {
                panic!("missing join notice");
            };
            assert!(json.contains("peer_joined"));
            assert!(json.contains(&joined.to_string()));
            assert!(json.contains("\"online\":2"));
        }
    }

    #[tokio::test]
    async fn departed_peer_no_longer_receives() {
        let registry = Arc::new(Registry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));

        let (a, mut rx_a) = make_connection();
        let (b, mut rx_b) = make_connection();
        let src = a.id();
        let departed = b.id();
        registry.add(a).await;
        registry.add(b).await;

        registry.remove(departed).await;
        let delivered = dispatcher.broadcast(src, "after you left").await;
        assert_eq!(delivered, 1);
        assert_eq!(drain(&mut rx_a), vec!["after you left".to_owned()]);
        assert!(drain(&mut rx_b).is_empty());
    }
}

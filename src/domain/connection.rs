//! Handle for one registered client connection.
//!
//! A [`Connection`] decouples the broadcast path from socket I/O: `send`
//! only enqueues onto a bounded channel drained by the connection's writer
//! task, so the dispatcher never awaits network writes.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;

use super::ConnectionId;
use crate::error::RelayError;

/// One client's live session as seen by the registry and dispatcher.
///
/// Owns the sending half of the connection's bounded outbound queue plus a
/// closed flag. The ws layer owns the socket itself and drains the queue's
/// receiving half. Lifecycle is `OPEN → CLOSED` with no way back; a new
/// handshake produces a new `Connection` with a new identity.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    outbound: mpsc::Sender<String>,
    closed: AtomicBool,
}

impl Connection {
    /// Creates a handle around the sending half of a connection's outbound
    /// queue.
    #[must_use]
    pub fn new(outbound: mpsc::Sender<String>) -> Self {
        Self {
            id: ConnectionId::new(),
            outbound,
            closed: AtomicBool::new(false),
        }
    }

    /// Returns this connection's identity.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Enqueues `text` for delivery to the client without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::ConnectionClosed`] if [`close`](Self::close)
    /// was called or the writer task has gone away, and
    /// [`RelayError::SendQueueFull`] if the bounded outbound queue is full.
    /// In both cases the message is dropped for this recipient only.
    pub fn send(&self, text: &str) -> Result<(), RelayError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(RelayError::ConnectionClosed(self.id));
        }
        match self.outbound.try_send(text.to_owned()) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(RelayError::SendQueueFull(self.id)),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(RelayError::ConnectionClosed(self.id))
            }
        }
    }

    /// Marks the connection closed. Idempotent; a closed connection fails
    /// all further `send` calls cleanly.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn make_connection(capacity: usize) -> (Connection, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Connection::new(tx), rx)
    }

    #[test]
    fn send_enqueues_message() {
        let (conn, mut rx) = make_connection(4);
        assert!(conn.send("hello").is_ok());
        assert_eq!(rx.try_recv().ok().as_deref(), Some("hello"));
    }

    #[test]
    fn send_on_full_queue_fails_with_queue_full() {
        let (conn, _rx) = make_connection(1);
        assert!(conn.send("first").is_ok());
        let err = conn.send("second");
        assert!(matches!(err, Err(RelayError::SendQueueFull(id)) if id == conn.id()));
    }

    #[test]
    fn send_after_close_fails_cleanly() {
        let (conn, _rx) = make_connection(4);
        conn.close();
        let err = conn.send("too late");
        assert!(matches!(err, Err(RelayError::ConnectionClosed(id)) if id == conn.id()));
    }

    #[test]
    fn send_after_receiver_dropped_fails_cleanly() {
        let (conn, rx) = make_connection(4);
        drop(rx);
        let err = conn.send("nobody listening");
        assert!(matches!(err, Err(RelayError::ConnectionClosed(_))));
    }

    #[test]
    fn close_is_idempotent() {
        let (conn, _rx) = make_connection(4);
        conn.close();
        conn.close();
        assert!(conn.is_closed());
    }

    #[test]
    fn new_connections_have_distinct_ids() {
        let (a, _rx_a) = make_connection(1);
        let (b, _rx_b) = make_connection(1);
        assert_ne!(a.id(), b.id());
    }
}

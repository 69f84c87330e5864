//! Synthetic server events injected into the relay stream.
//!
//! User messages are relayed verbatim; the only frames the server itself
//! produces are [`RelayEvent`]s, serialized to JSON and broadcast through
//! the [`super::Dispatcher`] like any other message.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ConnectionId;

/// Server-generated event broadcast to every connected client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RelayEvent {
    /// Emitted when a new connection joins, before any user message from
    /// it. Delivered to all clients including the newcomer.
    PeerJoined {
        /// Identity of the connection that joined.
        connection_id: ConnectionId,
        /// Online count at the time of the join.
        online: usize,
        /// Join timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl RelayEvent {
    /// Serializes the event to the JSON wire form.
    ///
    /// Serialization of this type cannot fail; a `None` here would indicate
    /// a serde bug and is treated as "nothing to send" by callers.
    #[must_use]
    pub fn to_json(&self) -> Option<String> {
        serde_json::to_string(self).ok()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn peer_joined_serializes_with_tag() {
        let event = RelayEvent::PeerJoined {
            connection_id: ConnectionId::new(),
            online: 3,
            timestamp: Utc::now(),
        };
        let Some(json) = event.to_json() else {
            panic!("serialization failed");
        };
        assert!(json.contains("\"event_type\":\"peer_joined\""));
        assert!(json.contains("\"online\":3"));
        assert!(json.contains("connection_id"));
    }
}

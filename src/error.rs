//! Relay error types.
//!
//! [`RelayError`] covers the per-recipient delivery failures the dispatcher
//! recovers from locally. No variant is fatal: a failing connection is
//! logged and skipped, and the process keeps serving everyone else.
//! Protocol-level failures (malformed frames, handshake errors) are handled
//! by the transport layer before the core ever sees the connection.

use crate::domain::ConnectionId;

/// Per-connection delivery error.
///
/// Both variants are recovered where they occur: the dispatcher logs the
/// failure and abandons delivery to that recipient for the current message
/// only. Removal of the connection happens exclusively through its own
/// close/error lifecycle, never as a side effect of a failed send.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The connection was closed (or its writer task is gone). Benign on
    /// removal and late-send paths; a send racing a close ends up here
    /// instead of panicking.
    #[error("connection {0} is closed")]
    ConnectionClosed(ConnectionId),

    /// The recipient's bounded outbound queue is full. The message is
    /// dropped for this recipient so one slow client cannot stall the
    /// broadcast loop.
    #[error("outbound queue full for connection {0}")]
    SendQueueFull(ConnectionId),
}

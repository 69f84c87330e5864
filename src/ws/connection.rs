//! WebSocket connection lifecycle.
//!
//! Runs one connection from registration to deregistration: a writer task
//! drains the connection's bounded outbound queue into the socket sink,
//! while the read loop feeds inbound text frames to the dispatcher.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::app_state::AppState;
use crate::domain::Connection;

/// Runs the full lifecycle of a single WebSocket connection.
///
/// Order matters on the way in: register first, then announce the join, so
/// the newcomer is part of its own join broadcast. On the way out (close
/// frame, stream end, or transport error alike) the connection is closed
/// before it is removed, so a concurrent broadcast holding a stale snapshot
/// fails its send cleanly instead of writing into a dead socket.
pub async fn run_connection(socket: WebSocket, state: AppState) {
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(state.config.outbound_queue_capacity);
    let conn = Arc::new(Connection::new(outbound_tx));
    let id = conn.id();

    state.registry.add(Arc::clone(&conn)).await;
    tracing::info!(connection_id = %id, online = state.registry.count(), "connection opened");
    state.dispatcher.announce_join(id).await;

    let (mut ws_tx, mut ws_rx) = socket.split();

    // Writer task: the only place this connection's socket is written to.
    let writer = tokio::spawn(async move {
        while let Some(text) = outbound_rx.recv().await {
            if ws_tx.send(Message::text(text)).await.is_err() {
                break;
            }
        }
    });

    // Read loop: one inbound event stream per connection.
    while let Some(msg) = ws_rx.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                tracing::debug!(connection_id = %id, len = text.len(), "inbound message");
                state.dispatcher.broadcast(id, text.as_str()).await;
            }
            Ok(Message::Close(_)) => break,
            // Binary frames and ping/pong are outside the relay's contract;
            // axum answers pings itself.
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(connection_id = %id, error = %err, "transport error");
                break;
            }
        }
    }

    conn.close();
    state.registry.remove(id).await;
    writer.abort();
    tracing::info!(connection_id = %id, online = state.registry.count(), "connection closed");
}

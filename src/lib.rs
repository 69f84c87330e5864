//! # pulse-relay
//!
//! Real-time WebSocket broadcast relay.
//!
//! Every client opens a persistent WebSocket connection at `/ws`; every
//! text message any client sends is fanned out to all currently connected
//! clients, the sender included. No rooms, no persistence, no auth — the
//! interesting part is doing the fan-out safely under concurrent joins,
//! leaves, and slow or dead receivers.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)
//!     │
//!     ├── WS upgrade + per-connection event loop (ws/)
//!     │       read loop ──▶ Dispatcher.broadcast
//!     │       writer task ◀── bounded outbound queue
//!     │
//!     ├── Dispatcher (domain/) ──▶ Registry.snapshot ──▶ Connection.send
//!     ├── Registry (domain/)  — the single synchronization point
//!     │
//!     └── REST observability (api/): /health, /stats
//! ```
//!
//! Fan-out never holds the registry lock across sends and never awaits
//! socket I/O: `Connection::send` is a non-blocking enqueue onto a bounded
//! per-connection queue, so one slow client costs itself dropped messages
//! rather than stalling everyone else.

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod ws;

//! WebSocket layer: upgrade handling and the per-connection event loop.
//!
//! The WebSocket endpoint at `/ws` is the relay's only ingress. This layer
//! is a thin transport adapter: it maps socket events onto the domain core
//! (register, broadcast, deregister) and drains each connection's outbound
//! queue into its socket.

pub mod connection;
pub mod handler;

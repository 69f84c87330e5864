//! Domain layer: connection identity, registry, and broadcast dispatch.
//!
//! This module contains the concurrent core of the relay: opaque connection
//! identity, the connection handle with its non-blocking send path, the
//! registry that tracks all open connections, and the dispatcher that fans
//! inbound messages out to the membership.

pub mod connection;
pub mod connection_id;
pub mod dispatcher;
pub mod registry;
pub mod relay_event;

pub use connection::Connection;
pub use connection_id::ConnectionId;
pub use dispatcher::Dispatcher;
pub use registry::Registry;
pub use relay_event::RelayEvent;

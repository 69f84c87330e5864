//! REST API layer: observability endpoints and router composition.
//!
//! The relay's HTTP surface outside `/ws` is read-only: a health check and
//! an online-count snapshot.

pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new().merge(handlers::system::routes())
}

//! Grapevine API server library.
//!
//! Exposes the router and its building blocks so integration tests can drive
//! the same application `main.rs` serves.

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

/// Builds the application router without transport layers.
pub fn build_router(app_state: state::AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::grapevine::router())
        .with_state(app_state)
}

//! HTTP API module for health, advisory, metrics, and documentation endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::{create_router, ApiDoc};

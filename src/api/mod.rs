//! HTTP surface: session registry and axum routes.

pub mod registry;
pub mod routes;

pub use registry::{SessionRegistry, spawn_expiry_task};
pub use routes::{AppState, session_routes};

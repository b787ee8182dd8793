//! HTTP transport: `/parse`, `/feedback`, `/health`.

mod app;
mod auth;
mod error;
mod routes;
mod state;

pub use app::{MAX_BODY_BYTES, ServerConfig, create_app, serve};
pub use error::ApiError;
pub use state::{AppState, SharedStore};

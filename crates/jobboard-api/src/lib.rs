//! Axum HTTP API server for the job board.
//!
//! This crate provides:
//! - JSON/multipart request handling with a shared validation layer
//! - Cookie-based JWT sessions
//! - Rate limiting and security headers
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;

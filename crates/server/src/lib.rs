//! HTTP surface for the sales summary and content generation pipeline.
//!
//! Three routes: a liveness probe at `/`, `POST /upload-csv` turning one
//! sales export into a [`aggregate::SalesSummary`], and
//! `POST /generate-content-stream` streaming generation progress as SSE.
//! The server holds no per-user state; credentials and datasets are
//! request-scoped.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use crate::config::{load, ServerConfig};
pub use crate::error::ServerError;
pub use crate::server::{build_router, start_server};
pub use crate::state::AppState;

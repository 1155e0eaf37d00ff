//! Shared application state.

use std::sync::Arc;

use crate::config::ServerConfig;

/// State handed to every handler. The server is otherwise stateless:
/// credentials and datasets live only inside a request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

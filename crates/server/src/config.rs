//! Server configuration.
//!
//! Settings come from an optional `menupulse` config file plus environment
//! variables under the `MENUPULSE_SERVER` prefix with `__` as the nesting
//! separator, e.g. `MENUPULSE_SERVER__PORT=8080` or
//! `MENUPULSE_SERVER__GENAI__API_BASE=http://localhost:4000/v1`.

use genai::GenAiConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Whole-request timeout. Must leave room for a full generation stream.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Request body cap, in megabytes.
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
    /// Fallback tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub genai: GenAiConfig,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_timeout_secs() -> u64 {
    180
}

fn default_max_upload_mb() -> usize {
    10
}

fn default_enable_cors() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_upload_mb: default_max_upload_mb(),
            enable_cors: default_enable_cors(),
            log_level: default_log_level(),
            genai: GenAiConfig::default(),
        }
    }
}

/// Load configuration from file (optional) and environment.
pub fn load() -> Result<ServerConfig, config::ConfigError> {
    config::Config::builder()
        .add_source(config::File::with_name("menupulse").required(false))
        .add_source(
            config::Environment::with_prefix("MENUPULSE_SERVER")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

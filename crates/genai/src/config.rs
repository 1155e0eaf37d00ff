//! Configuration for the generation client.

use serde::{Deserialize, Serialize};

/// Settings for talking to the upstream chat-completions API.
///
/// The API key is deliberately absent: credentials arrive per request and
/// are never stored in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenAiConfig {
    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Model used when a request does not name one.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Whole-request timeout, covering the full streamed response.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Emit a `streaming` progress event every this many received
    /// characters.
    #[serde(default = "default_progress_every_chars")]
    pub progress_every_chars: usize,
    /// Keys shorter than this fail fast without touching the network.
    #[serde(default = "default_min_api_key_len")]
    pub min_api_key_len: usize,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_progress_every_chars() -> usize {
    64
}

fn default_min_api_key_len() -> usize {
    10
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            default_model: default_model(),
            request_timeout_secs: default_request_timeout_secs(),
            progress_every_chars: default_progress_every_chars(),
            min_api_key_len: default_min_api_key_len(),
        }
    }
}

//! Marketing-content generation over a streamed chat-completions call.
//!
//! The flow is: build a prompt from a [`SalesSummary`](aggregate::SalesSummary),
//! stream one completion from an OpenAI-compatible endpoint, buffer the
//! tokens while emitting progress events, then extract and validate the
//! JSON content package at the end. Consumers get an async stream of
//! [`StreamEvent`]s that always ends with exactly one terminal event.
//!
//! Credentials and model names are per-request; nothing is persisted.

mod client;
mod config;
mod content;
mod error;
mod event;
mod extract;
mod prompt;

pub use crate::client::{generate_stream, GenerationRequest};
pub use crate::config::GenAiConfig;
pub use crate::content::{GeneratedContent, PlatformPost, PromotionIdea};
pub use crate::error::GenAiError;
pub use crate::event::StreamEvent;
pub use crate::extract::parse_generated_content;
pub use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};

//! Progress events emitted while a generation request runs.
//!
//! Events mirror the pipeline stages in order: `connecting` is sent before
//! the upstream request, `generating` on the first received token,
//! `streaming` as throttled progress, `processing` once the stream closes,
//! and then exactly one terminal event (`complete` or `error`). The server
//! forwards each one as an SSE frame as it is produced.

use serde_json::{json, Value};

use crate::content::GeneratedContent;

/// One progress event in a generation stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The upstream request is about to be sent.
    Connecting,
    /// The first token arrived; the model is producing output.
    Generating,
    /// Throttled progress: total characters received so far.
    Streaming { partial_chars: usize },
    /// The stream closed; the buffered output is being parsed.
    Processing,
    /// Terminal: validated content.
    Complete(GeneratedContent),
    /// Terminal: the request failed.
    Error(String),
}

impl StreamEvent {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamEvent::Complete(_) | StreamEvent::Error(_))
    }

    /// Wire shape for one SSE `data:` frame.
    pub fn to_json(&self) -> Value {
        match self {
            StreamEvent::Connecting => json!({
                "status": "connecting",
                "message": "Connecting to content model",
            }),
            StreamEvent::Generating => json!({
                "status": "generating",
                "message": "Generating content",
            }),
            StreamEvent::Streaming { partial_chars } => json!({
                "status": "streaming",
                "partial": partial_chars,
            }),
            StreamEvent::Processing => json!({
                "status": "processing",
                "message": "Processing response",
            }),
            StreamEvent::Complete(content) => json!({
                "status": "complete",
                "data": content,
            }),
            StreamEvent::Error(message) => json!({
                "error": message,
            }),
        }
    }
}

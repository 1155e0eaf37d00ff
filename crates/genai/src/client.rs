//! Streaming client for an OpenAI-compatible chat-completions endpoint.
//!
//! One request per generation, no retries. Progress and the terminal result
//! flow through a bounded channel as [`StreamEvent`]s; when the consumer
//! drops the stream the channel closes, sends start failing, and the
//! producer task stops reading the upstream body, releasing the connection.

use std::time::{Duration, Instant};

use aggregate::SalesSummary;
use futures::{Stream, StreamExt};
use once_cell::sync::Lazy;
use serde_json::json;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::GenAiConfig;
use crate::error::GenAiError;
use crate::event::StreamEvent;
use crate::extract::parse_generated_content;
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Shared connection pool. Per-request deadlines are set on each request;
/// only the connect timeout lives on the client.
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
        .expect("default reqwest client is constructible")
});

/// One generation request. The credential and model arrive per call and are
/// never stored.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub summary: SalesSummary,
    pub api_key: String,
    /// Falls back to [`GenAiConfig::default_model`] when absent.
    pub model: Option<String>,
}

/// Run a generation request, yielding progress events as they happen.
///
/// The stream always starts with `Connecting` and ends with exactly one
/// terminal event. Must be called from within a tokio runtime; the upstream
/// exchange runs on a spawned task.
pub fn generate_stream(
    cfg: GenAiConfig,
    request: GenerationRequest,
) -> impl Stream<Item = StreamEvent> + Send {
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    tokio::spawn(run_generation(cfg, request, tx));
    futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (event, rx))
    })
}

async fn run_generation(
    cfg: GenAiConfig,
    request: GenerationRequest,
    tx: mpsc::Sender<StreamEvent>,
) {
    let start = Instant::now();

    if tx.send(StreamEvent::Connecting).await.is_err() {
        return;
    }

    let api_key = request.api_key.trim();
    if api_key.len() < cfg.min_api_key_len {
        let err = GenAiError::Auth("API key is missing or too short".to_string());
        warn!(error = %err, "generation_rejected");
        let _ = tx.send(StreamEvent::Error(err.to_string())).await;
        return;
    }

    let model = request
        .model
        .clone()
        .unwrap_or_else(|| cfg.default_model.clone());
    info!(model = %model, api_base = %cfg.api_base, "generation_start");

    match stream_completion(&cfg, &request.summary, api_key, &model, &tx).await {
        Ok(Some(raw)) => {
            if tx.send(StreamEvent::Processing).await.is_err() {
                return;
            }
            match parse_generated_content(&raw) {
                Ok(content) => {
                    info!(
                        chars = raw.chars().count(),
                        elapsed_micros = start.elapsed().as_micros() as u64,
                        "generation_success"
                    );
                    let _ = tx.send(StreamEvent::Complete(content)).await;
                }
                Err(err) => {
                    warn!(error = %err, "generation_output_rejected");
                    let _ = tx.send(StreamEvent::Error(err.to_string())).await;
                }
            }
        }
        // Consumer dropped the stream; nothing left to tell anyone.
        Ok(None) => {}
        Err(err) => {
            warn!(error = %err, "generation_failure");
            let _ = tx.send(StreamEvent::Error(err.to_string())).await;
        }
    }
}

/// Send the chat request and buffer the streamed completion text, emitting
/// progress events along the way. `Ok(None)` means the consumer went away.
async fn stream_completion(
    cfg: &GenAiConfig,
    summary: &SalesSummary,
    api_key: &str,
    model: &str,
    tx: &mpsc::Sender<StreamEvent>,
) -> Result<Option<String>, GenAiError> {
    let url = format!("{}/chat/completions", cfg.api_base.trim_end_matches('/'));
    let payload = json!({
        "model": model,
        "stream": true,
        "temperature": 1,
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": build_user_prompt(summary)},
        ],
    });

    let response = HTTP_CLIENT
        .post(&url)
        .bearer_auth(api_key)
        .json(&payload)
        .timeout(Duration::from_secs(cfg.request_timeout_secs))
        .send()
        .await
        .map_err(map_transport_error)?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(map_status_error(status, &body, model));
    }

    let mut byte_stream = response.bytes_stream();
    let mut line_buf: Vec<u8> = Vec::new();
    let mut full = String::new();
    let mut sent_generating = false;
    let mut chars_seen = 0usize;
    let mut last_reported = 0usize;
    let mut done = false;

    while !done {
        let Some(chunk) = byte_stream.next().await else {
            break;
        };
        let chunk = chunk.map_err(map_transport_error)?;
        line_buf.extend_from_slice(&chunk);

        while let Some(pos) = line_buf.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = line_buf.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let Some(data) = line.trim().strip_prefix("data:") else {
                continue;
            };
            let data = data.trim();
            if data == "[DONE]" {
                done = true;
                break;
            }
            let Ok(frame) = serde_json::from_str::<serde_json::Value>(data) else {
                // Unparseable keep-alive or vendor frame; skip it.
                continue;
            };
            let Some(token) = frame
                .pointer("/choices/0/delta/content")
                .and_then(|v| v.as_str())
            else {
                continue;
            };

            if !sent_generating {
                sent_generating = true;
                if tx.send(StreamEvent::Generating).await.is_err() {
                    return Ok(None);
                }
            }

            full.push_str(token);
            chars_seen += token.chars().count();
            if chars_seen - last_reported >= cfg.progress_every_chars {
                last_reported = chars_seen;
                let event = StreamEvent::Streaming {
                    partial_chars: chars_seen,
                };
                if tx.send(event).await.is_err() {
                    return Ok(None);
                }
            }
        }
    }

    Ok(Some(full))
}

fn map_transport_error(err: reqwest::Error) -> GenAiError {
    if err.is_timeout() {
        GenAiError::UpstreamTimeout(err.to_string())
    } else if err.is_connect() {
        GenAiError::Upstream(format!("cannot connect to upstream: {err}"))
    } else {
        GenAiError::Upstream(err.to_string())
    }
}

fn map_status_error(status: reqwest::StatusCode, body: &str, model: &str) -> GenAiError {
    let detail = if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {body}")
    };
    match status.as_u16() {
        401 | 403 => GenAiError::Auth(detail),
        429 => GenAiError::RateLimit(detail),
        404 => GenAiError::ModelUnavailable(format!("{model} ({detail})")),
        _ => GenAiError::Upstream(detail),
    }
}

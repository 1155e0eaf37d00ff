//! Streaming content generation over SSE.

use std::convert::Infallible;

use aggregate::{CategoryStat, DateRange, Insight, ItemStat, SalesSummary};
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::{Stream, StreamExt};
use genai::GenerationRequest;
use serde::Deserialize;

use crate::state::AppState;

/// Body of `POST /generate-content-stream`: the summary fields as returned
/// by the upload endpoint, plus the caller's credential and optional model.
#[derive(Debug, Deserialize)]
pub struct GenerateContentRequest {
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub top_items: Vec<ItemStat>,
    #[serde(default)]
    pub top_categories: Vec<CategoryStat>,
    #[serde(default)]
    pub insights: Vec<Insight>,
    pub api_key: String,
    pub model: Option<String>,
}

/// `POST /generate-content-stream` — one SSE `data:` frame per progress
/// event, flushed as produced, ending with exactly one terminal frame.
pub async fn generate_content_stream(
    State(state): State<AppState>,
    Json(request): Json<GenerateContentRequest>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let summary = SalesSummary {
        date_range: request.date_range,
        top_items: request.top_items,
        top_categories: request.top_categories,
        insights: request.insights,
    };
    let generation = GenerationRequest {
        summary,
        api_key: request.api_key,
        model: request.model,
    };

    let events = genai::generate_stream(state.config.genai.clone(), generation)
        .map(|event| Ok(Event::default().data(event.to_json().to_string())));

    Sse::new(events).keep_alive(KeepAlive::default())
}

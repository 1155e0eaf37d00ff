//! MenuPulse: restaurant sales exports in, marketing content out.
//!
//! The pipeline runs in fixed stages, each owned by one crate:
//!
//! 1. [`ingest`] — detect the CSV layout and normalize rows.
//! 2. [`aggregate`] — group, rank, and total the canonical rows.
//! 3. [`insight`] — derive deterministic findings and tag standouts.
//! 4. [`genai`] — stream a content package from a chat-completions model,
//!    grounded in the summary.
//!
//! This crate re-exports the stage APIs and provides [`summarize_csv`], the
//! one-call path from a raw export to a [`SalesSummary`]. The HTTP surface
//! lives in the `menupulse-server` binary crate.
//!
//! ```
//! let csv = "date,item_name,quantity_sold,category\n\
//!            2025-01-01,Pho Beef,25,Noodles\n\
//!            2025-01-01,Banh Mi,18,Sandwich\n";
//! let summary = menupulse::summarize_csv(csv).unwrap();
//! assert_eq!(summary.top_items[0].item_name, "Pho Beef");
//! ```

use thiserror::Error;
use tracing::instrument;

pub use aggregate::{
    aggregate as aggregate_rows, AggregateError, AggregateReport, CategoryStat, DateRange,
    Insight, InsightKind, ItemStat, PerformanceTag, SalesSummary, TOP_LIMIT,
};
pub use genai::{
    generate_stream, GenAiConfig, GenAiError, GeneratedContent, GenerationRequest, PlatformPost,
    PromotionIdea, StreamEvent,
};
pub use ingest::{
    normalize_csv, CanonicalRow, FormatKind, IngestConfig, IngestError, NormalizedDataset,
};
pub use insight::{derive_insights, InsightConfig};

/// Failures from the summary half of the pipeline (ingest + aggregate).
/// Generation failures stay typed as [`GenAiError`] and surface as stream
/// events instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl PipelineError {
    /// Suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            PipelineError::Ingest(err) => err.http_status_code(),
            PipelineError::Aggregate(err) => err.http_status_code(),
        }
    }
}

/// Run a raw CSV export through ingest, aggregation, and insights with
/// default settings.
pub fn summarize_csv(content: &str) -> Result<SalesSummary, PipelineError> {
    summarize_csv_with(content, &IngestConfig::default(), &InsightConfig::default())
}

/// [`summarize_csv`] with explicit stage configuration.
#[instrument(skip_all, fields(bytes = content.len()))]
pub fn summarize_csv_with(
    content: &str,
    ingest_cfg: &IngestConfig,
    insight_cfg: &InsightConfig,
) -> Result<SalesSummary, PipelineError> {
    let dataset = normalize_csv(content, ingest_cfg)?;
    let report = aggregate_rows(&dataset.rows)?;
    Ok(derive_insights(&dataset.rows, report, insight_cfg))
}

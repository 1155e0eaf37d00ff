//! Reporting data model shared by the aggregation and insight stages.
//!
//! [`SalesSummary`] is the wire shape the server returns from an upload and
//! the generation stage consumes as its grounding input. Everything in it is
//! plain serde data; the heavy per-row detail stays in
//! [`AggregateReport`](crate::AggregateReport) and is truncated away before
//! serialization.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-item statistics, ranked by revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStat {
    pub item_name: String,
    pub quantity: f64,
    pub net_sales: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_price: Option<f64>,
    /// Set by the insight stage when an item earns a callout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_tag: Option<PerformanceTag>,
}

/// Per-category statistics, ranked by revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: String,
    pub quantity: f64,
    pub net_sales: f64,
}

/// Inclusive date span covered by the dataset. Absent for dateless exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Badge attached to an item the insight stage singled out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceTag {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub label: String,
}

/// Stable identifiers for the insight heuristics, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum InsightKind {
    Bestseller,
    TopRevenue,
    Revenue,
    Discount,
    Premium,
    Trend,
}

/// One human-readable finding derived from the aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub text: String,
}

/// The summary returned to clients and fed into content generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    pub top_items: Vec<ItemStat>,
    pub top_categories: Vec<CategoryStat>,
    pub insights: Vec<Insight>,
}

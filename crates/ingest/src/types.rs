//! Core data model types for the ingest crate.
//!
//! [`CanonicalRow`] is the unified record shape every supported CSV layout
//! normalizes into. Downstream stages (aggregation, insights) only ever see
//! canonical rows; the source layout is captured once as a [`FormatKind`] tag
//! and never re-inspected per row.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Supported tabular layouts, detected once per file from the header
/// signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FormatKind {
    /// POS export: `Sales Category, Item Name, Quantity, Avg Price,
    /// Gross Sales, Discount Amount, Net Sales` (dateless, revenue data).
    Pos,
    /// Simple export: `date, item_name, quantity_sold, category`.
    Simple,
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatKind::Pos => write!(f, "pos"),
            FormatKind::Simple => write!(f, "simple"),
        }
    }
}

/// One sales record normalized to the unified schema.
///
/// Invariant: `net_sales` is always derivable — `gross_sales - discount`
/// when both are present, else `avg_price * quantity`, else `quantity` as a
/// unit-count fallback. Rows are created once during normalization and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    /// Calendar date of the sale. Absent for dateless POS exports.
    pub date: Option<NaiveDate>,
    pub item_name: String,
    pub category: String,
    /// Units sold. Non-negative.
    pub quantity: f64,
    pub avg_price: Option<f64>,
    pub gross_sales: Option<f64>,
    pub discount: Option<f64>,
    /// Always present; see the derivation invariant above.
    pub net_sales: f64,
}

/// Output of [`normalize_csv`](crate::normalize_csv): the detected format,
/// the canonical rows, and how many malformed rows were skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDataset {
    pub format: FormatKind,
    pub rows: Vec<CanonicalRow>,
    /// Rows dropped because a required field could not be parsed. Retained
    /// for diagnostics; non-fatal unless every data row failed.
    pub skipped_rows: usize,
}

/// Derive `net_sales` for a row per the canonical invariant.
pub fn derive_net_sales(
    quantity: f64,
    avg_price: Option<f64>,
    gross_sales: Option<f64>,
    discount: Option<f64>,
) -> f64 {
    match (gross_sales, discount) {
        (Some(gross), Some(disc)) => gross - disc,
        _ => match avg_price {
            Some(price) => price * quantity,
            None => quantity,
        },
    }
}

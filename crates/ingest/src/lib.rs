//! Sales export ingest layer.
//!
//! This is where raw CSV uploads enter the pipeline. The file's layout is
//! detected once from its header signature ([`FormatKind`]), then every data
//! row is normalized into the one canonical shape downstream stages consume
//! ([`CanonicalRow`]).
//!
//! ## What we do here
//!
//! - **Detect the format** — POS export vs simple export, by column names,
//!   case-insensitively.
//! - **Tolerate messy exports** — mixed line endings, trailing commas, and
//!   unnamed header columns are cleaned up before parsing.
//! - **Normalize rows** — quantities and money parsed, `net_sales` derived
//!   per the canonical invariant, dates parsed where the format has them.
//! - **Skip, don't die** — a malformed row is counted and dropped; ingest
//!   only fails when no row survives.
//!
//! ## Example
//!
//! ```
//! use ingest::{normalize_csv, FormatKind, IngestConfig};
//!
//! let csv = "date,item_name,quantity_sold,category\n2025-01-01,Pho Beef,25,Noodles\n";
//! let dataset = normalize_csv(csv, &IngestConfig::default()).unwrap();
//!
//! assert_eq!(dataset.format, FormatKind::Simple);
//! assert_eq!(dataset.rows.len(), 1);
//! assert_eq!(dataset.rows[0].net_sales, 25.0);
//! ```

use std::time::Instant;

use chrono::NaiveDate;
use tracing::{info, warn};

mod config;
mod error;
mod format;
mod types;

use crate::format::{clean_csv_text, detect_format, parse_number, Column, HeaderMap};

pub use crate::config::IngestConfig;
pub use crate::error::IngestError;
pub use crate::types::{derive_net_sales, CanonicalRow, FormatKind, NormalizedDataset};

/// Normalize a raw CSV export into canonical rows.
///
/// Detects the format from the header, then runs the matching per-format
/// normalizer over every data row. Malformed rows are skipped and counted;
/// the call fails only on an unrecognized header, an oversized payload, or
/// when every data row is malformed.
pub fn normalize_csv(
    content: &str,
    cfg: &IngestConfig,
) -> Result<NormalizedDataset, IngestError> {
    let start = Instant::now();

    if let Some(limit) = cfg.max_payload_bytes {
        let len = content.len();
        if len > limit {
            let err = IngestError::PayloadTooLarge(format!(
                "raw payload size {len} exceeds limit of {limit}"
            ));
            warn!(error = %err, "ingest_failure");
            return Err(err);
        }
    }

    match normalize_inner(content) {
        Ok(dataset) => {
            info!(
                format = %dataset.format,
                rows = dataset.rows.len(),
                skipped_rows = dataset.skipped_rows,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "ingest_success"
            );
            Ok(dataset)
        }
        Err(err) => {
            warn!(
                error = %err,
                elapsed_micros = start.elapsed().as_micros() as u64,
                "ingest_failure"
            );
            Err(err)
        }
    }
}

fn normalize_inner(content: &str) -> Result<NormalizedDataset, IngestError> {
    let cleaned = clean_csv_text(content);
    if cleaned.is_empty() {
        return Err(IngestError::EmptyInput);
    }
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(cleaned.as_bytes());

    let headers = reader
        .headers()
        .map_err(|_| IngestError::EmptyInput)?
        .clone();
    let map = detect_format(&headers)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    let mut total = 0usize;

    for record in reader.records() {
        let Ok(record) = record else {
            total += 1;
            skipped += 1;
            continue;
        };
        total += 1;
        match normalize_row(&record, &map) {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
    }

    if total == 0 {
        return Err(IngestError::EmptyInput);
    }
    if rows.is_empty() {
        return Err(IngestError::AllRowsMalformed(total));
    }

    Ok(NormalizedDataset {
        format: map.format,
        rows,
        skipped_rows: skipped,
    })
}

/// Normalize one record per the detected format. Returns `None` when a
/// required field is missing or unparseable — the row is skipped.
fn normalize_row(record: &csv::StringRecord, map: &HeaderMap) -> Option<CanonicalRow> {
    let cell = |column: Column| -> &str {
        map.index(column)
            .and_then(|idx| record.get(idx))
            .unwrap_or("")
    };

    let item_name = cell(Column::ItemName).trim().to_string();
    if item_name.is_empty() {
        // POS exports interleave section-header rows without item names.
        return None;
    }

    let quantity = match parse_number(cell(Column::Quantity)) {
        Ok(Some(qty)) if qty >= 0.0 => qty,
        _ => return None,
    };

    let date = match map.format {
        FormatKind::Pos => None,
        FormatKind::Simple => Some(parse_date(cell(Column::Date))?),
    };

    let category = {
        let raw = cell(Column::Category).trim();
        if raw.is_empty() {
            "Uncategorized".to_string()
        } else {
            raw.to_string()
        }
    };

    // Optional money columns: empty or unparseable cells are treated as
    // absent rather than poisoning the row.
    let optional = |column: Column| parse_number(cell(column)).ok().flatten();
    let avg_price = optional(Column::AvgPrice);
    let gross_sales = optional(Column::GrossSales);
    let discount = optional(Column::Discount);

    let net_sales = match optional(Column::NetSales) {
        Some(net) => net,
        None => derive_net_sales(quantity, avg_price, gross_sales, discount),
    };

    Some(CanonicalRow {
        date,
        item_name,
        category,
        quantity,
        avg_price,
        gross_sales,
        discount,
        net_sales,
    })
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}

//! Header cleanup, format detection, and column mapping.
//!
//! Detection happens exactly once per file: the header is normalized
//! (lowercased, trimmed, empty/unnamed columns dropped) and matched against
//! the known signatures, producing a [`FormatKind`] tag plus a column index
//! map. Row normalization then dispatches on the tag and never inspects
//! column names again.

use std::collections::HashMap;

use crate::error::IngestError;
use crate::types::FormatKind;

/// Canonical column roles shared by both formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Column {
    Date,
    ItemName,
    Category,
    Quantity,
    AvgPrice,
    GrossSales,
    Discount,
    NetSales,
}

/// Detected format plus the position of each recognized column.
#[derive(Debug, Clone)]
pub(crate) struct HeaderMap {
    pub format: FormatKind,
    columns: HashMap<Column, usize>,
}

impl HeaderMap {
    pub fn index(&self, column: Column) -> Option<usize> {
        self.columns.get(&column).copied()
    }
}

/// Normalize line endings and strip the trailing commas POS exports leave on
/// header and data rows. Blank lines are dropped.
pub(crate) fn clean_csv_text(content: &str) -> String {
    let unified = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut cleaned = String::with_capacity(unified.len());
    for line in unified.lines() {
        let line = line.trim_end_matches(',').trim_end();
        if line.trim().is_empty() {
            continue;
        }
        if !cleaned.is_empty() {
            cleaned.push('\n');
        }
        cleaned.push_str(line);
    }
    cleaned
}

fn canonical_header(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Map one lowercased header name to its canonical column role.
fn column_role(name: &str) -> Option<Column> {
    match name {
        "sales category" | "category" => Some(Column::Category),
        "item name" | "item_name" => Some(Column::ItemName),
        "quantity" | "quantity_sold" => Some(Column::Quantity),
        "avg price" | "avg_price" => Some(Column::AvgPrice),
        "gross sales" | "gross_sales" => Some(Column::GrossSales),
        "discount amount" | "discount_amount" => Some(Column::Discount),
        "net sales" | "net_sales" => Some(Column::NetSales),
        "date" => Some(Column::Date),
        _ => None,
    }
}

/// Detect the format from a header record and build the column map.
///
/// Signatures:
/// - POS: `Item Name` together with `Sales Category`, `Gross Sales`, or
///   `Net Sales`.
/// - Simple: `date` together with `quantity_sold`.
pub(crate) fn detect_format(headers: &csv::StringRecord) -> Result<HeaderMap, IngestError> {
    let mut columns: HashMap<Column, usize> = HashMap::new();
    let mut seen: Vec<String> = Vec::new();

    for (idx, raw) in headers.iter().enumerate() {
        let name = canonical_header(raw);
        if name.is_empty() || name.starts_with("unnamed") {
            continue;
        }
        seen.push(name.clone());
        if let Some(role) = column_role(&name) {
            // First occurrence wins; duplicate headers are ignored.
            columns.entry(role).or_insert(idx);
        }
    }

    let has = |role: Column| columns.contains_key(&role);
    let has_raw = |name: &str| seen.iter().any(|h| h == name);

    let format = if has(Column::ItemName)
        && (has_raw("sales category") || has_raw("gross sales") || has_raw("net sales"))
    {
        FormatKind::Pos
    } else if has_raw("date") && has_raw("quantity_sold") {
        FormatKind::Simple
    } else {
        return Err(IngestError::UnsupportedFormat(seen.join(", ")));
    };

    let required: &[(Column, &str)] = match format {
        FormatKind::Pos => &[
            (Column::ItemName, "Item Name"),
            (Column::Category, "Sales Category"),
            (Column::Quantity, "Quantity"),
        ],
        FormatKind::Simple => &[
            (Column::Date, "date"),
            (Column::ItemName, "item_name"),
            (Column::Quantity, "quantity_sold"),
            (Column::Category, "category"),
        ],
    };
    let missing: Vec<&str> = required
        .iter()
        .filter(|(role, _)| !has(*role))
        .map(|(_, name)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns {
            format: format.to_string(),
            missing: missing.join(", "),
        });
    }

    Ok(HeaderMap { format, columns })
}

/// Parse a numeric cell, tolerating currency symbols and thousands
/// separators (`$4,600.00` → 4600.0). Empty cells are `None`; anything else
/// unparseable is an error for the caller to treat as a malformed row.
pub(crate) fn parse_number(raw: &str) -> Result<Option<f64>, ()> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    cleaned.parse::<f64>().map(Some).map_err(|_| ())
}

//! Deterministic aggregation over canonical sales rows.
//!
//! Grouping keys are case-normalized so `"Pho Beef"` and `"pho beef"` land
//! in the same bucket, with the first-seen casing kept for display. Ranking
//! is total: descending `net_sales`, ties broken by descending `quantity`,
//! then ascending name, so any permutation of the same rows produces the
//! same report.
//!
//! The full ranked listing plus dataset totals live on [`AggregateReport`];
//! [`AggregateReport::into_summary`] truncates to the top entries for the
//! wire shape.

use std::collections::BTreeMap;
use std::time::Instant;

use ingest::CanonicalRow;
use tracing::info;

mod error;
mod types;

pub use crate::error::AggregateError;
pub use crate::types::{
    CategoryStat, DateRange, Insight, InsightKind, ItemStat, PerformanceTag, SalesSummary,
};

/// How many items and categories a [`SalesSummary`] carries.
pub const TOP_LIMIT: usize = 5;

/// Full aggregation output: every ranked group plus dataset totals.
///
/// Downstream insight heuristics need the complete ranking and the totals;
/// only the truncated [`SalesSummary`] leaves the process.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateReport {
    pub date_range: Option<DateRange>,
    /// All items, ranked.
    pub items: Vec<ItemStat>,
    /// All categories, ranked.
    pub categories: Vec<CategoryStat>,
    pub total_quantity: f64,
    pub total_net_sales: f64,
    pub total_gross_sales: f64,
    pub total_discount: f64,
}

impl AggregateReport {
    /// Truncate to the wire shape. Insights start empty; the insight stage
    /// fills them in.
    pub fn into_summary(mut self) -> SalesSummary {
        self.items.truncate(TOP_LIMIT);
        self.categories.truncate(TOP_LIMIT);
        SalesSummary {
            date_range: self.date_range,
            top_items: self.items,
            top_categories: self.categories,
            insights: Vec::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Group {
    display_name: String,
    quantity: f64,
    net_sales: f64,
}

/// Aggregate canonical rows into a ranked report.
pub fn aggregate(rows: &[CanonicalRow]) -> Result<AggregateReport, AggregateError> {
    let start = Instant::now();

    if rows.is_empty() {
        return Err(AggregateError::EmptyDataset);
    }

    let mut items: BTreeMap<String, Group> = BTreeMap::new();
    let mut categories: BTreeMap<String, Group> = BTreeMap::new();
    let mut date_min: Option<chrono::NaiveDate> = None;
    let mut date_max: Option<chrono::NaiveDate> = None;
    let mut total_quantity = 0.0;
    let mut total_net_sales = 0.0;
    let mut total_gross_sales = 0.0;
    let mut total_discount = 0.0;

    for row in rows {
        accumulate(&mut items, &row.item_name, row);
        accumulate(&mut categories, &row.category, row);

        total_quantity += row.quantity;
        total_net_sales += row.net_sales;
        total_gross_sales += row.gross_sales.unwrap_or(0.0);
        total_discount += row.discount.unwrap_or(0.0);

        if let Some(date) = row.date {
            date_min = Some(date_min.map_or(date, |d| d.min(date)));
            date_max = Some(date_max.map_or(date, |d| d.max(date)));
        }
    }

    let mut item_stats: Vec<ItemStat> = items
        .into_values()
        .map(|group| ItemStat {
            avg_price: (group.quantity > 0.0).then(|| group.net_sales / group.quantity),
            item_name: group.display_name,
            quantity: group.quantity,
            net_sales: group.net_sales,
            performance_tag: None,
        })
        .collect();
    item_stats.sort_by(|a, b| {
        rank(
            (a.net_sales, a.quantity, &a.item_name),
            (b.net_sales, b.quantity, &b.item_name),
        )
    });

    let mut category_stats: Vec<CategoryStat> = categories
        .into_values()
        .map(|group| CategoryStat {
            category: group.display_name,
            quantity: group.quantity,
            net_sales: group.net_sales,
        })
        .collect();
    category_stats.sort_by(|a, b| {
        rank(
            (a.net_sales, a.quantity, &a.category),
            (b.net_sales, b.quantity, &b.category),
        )
    });

    let date_range = match (date_min, date_max) {
        (Some(start), Some(end)) => Some(DateRange { start, end }),
        _ => None,
    };

    info!(
        items = item_stats.len(),
        categories = category_stats.len(),
        total_net_sales,
        elapsed_micros = start.elapsed().as_micros() as u64,
        "aggregate_success"
    );

    Ok(AggregateReport {
        date_range,
        items: item_stats,
        categories: category_stats,
        total_quantity,
        total_net_sales,
        total_gross_sales,
        total_discount,
    })
}

fn accumulate(groups: &mut BTreeMap<String, Group>, name: &str, row: &CanonicalRow) {
    let group = groups.entry(name.to_lowercase()).or_default();
    if group.display_name.is_empty() {
        group.display_name = name.to_string();
    }
    group.quantity += row.quantity;
    group.net_sales += row.net_sales;
}

/// Total ranking order over `(net_sales, quantity, name)`: revenue
/// descending, quantity descending, name ascending (case-insensitive).
fn rank(a: (f64, f64, &str), b: (f64, f64, &str)) -> std::cmp::Ordering {
    b.0.total_cmp(&a.0)
        .then(b.1.total_cmp(&a.1))
        .then_with(|| a.2.to_lowercase().cmp(&b.2.to_lowercase()))
}

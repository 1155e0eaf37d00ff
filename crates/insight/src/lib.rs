//! Heuristic insights over an aggregation report.
//!
//! Every insight is a deterministic function of the rows and the report:
//! no randomness, no model calls. Heuristics run in a fixed order —
//! bestseller, top revenue, category concentration, discount pressure,
//! premium pricing, trend — and each contributes at most one finding. An
//! empty list is a valid outcome for a flat dataset.
//!
//! Thresholds live in [`InsightConfig`] so a deployment can tune when a
//! heuristic speaks up without touching this module.

use std::collections::BTreeMap;

use aggregate::{AggregateReport, Insight, InsightKind, ItemStat, PerformanceTag, SalesSummary};
use chrono::{Datelike, NaiveDate};
use ingest::CanonicalRow;
use tracing::info;

mod config;

pub use crate::config::InsightConfig;

/// Derive insights, tag standout items, and produce the final summary.
pub fn derive_insights(
    rows: &[CanonicalRow],
    mut report: AggregateReport,
    cfg: &InsightConfig,
) -> SalesSummary {
    let mut insights = Vec::new();

    let best_idx = bestseller(&report.items, cfg);
    if let Some(idx) = best_idx {
        let item = &mut report.items[idx];
        insights.push(Insight {
            kind: InsightKind::Bestseller,
            text: format!(
                "{} is the top seller with {} units sold",
                item.item_name,
                fmt_units(item.quantity)
            ),
        });
        item.performance_tag = Some(PerformanceTag {
            kind: InsightKind::Bestseller,
            label: "Bestseller".to_string(),
        });
    }

    let top_earner = report
        .items
        .first()
        .filter(|top| top.net_sales > 0.0)
        .map(|top| (top.item_name.clone(), top.net_sales));
    if let Some((name, net_sales)) = top_earner {
        insights.push(Insight {
            kind: InsightKind::TopRevenue,
            text: format!("{name} leads revenue with ${net_sales:.2} in net sales"),
        });
        // The bestseller badge wins when both land on the same item.
        if best_idx != Some(0) {
            report.items[0].performance_tag = Some(PerformanceTag {
                kind: InsightKind::TopRevenue,
                label: "Top Revenue".to_string(),
            });
        }
    }

    if let Some(insight) = category_concentration(&report, cfg) {
        insights.push(insight);
    }
    if let Some(insight) = discount_pressure(rows, cfg) {
        insights.push(insight);
    }
    if let Some(insight) = premium_pricing(&report, cfg) {
        insights.push(insight);
    }
    if let Some(insight) = monthly_trend(rows, cfg) {
        insights.push(insight);
    }

    info!(insights = insights.len(), "insight_success");

    let mut summary = report.into_summary();
    summary.insights = insights;
    summary
}

/// Index of the bestseller item, if one is clearly ahead on units.
fn bestseller(items: &[ItemStat], cfg: &InsightConfig) -> Option<usize> {
    let mut best = 0;
    for (idx, item) in items.iter().enumerate().skip(1) {
        if item.quantity > items[best].quantity {
            best = idx;
        }
    }
    let top = items.get(best)?;
    if top.quantity <= 0.0 {
        return None;
    }
    let runner_up = items
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != best)
        .map(|(_, item)| item.quantity)
        .fold(0.0_f64, f64::max);
    if items.len() == 1 || top.quantity >= cfg.bestseller_ratio * runner_up {
        Some(best)
    } else {
        None
    }
}

fn category_concentration(report: &AggregateReport, cfg: &InsightConfig) -> Option<Insight> {
    let top = report.categories.first()?;
    if report.total_net_sales <= 0.0 {
        return None;
    }
    let share = top.net_sales / report.total_net_sales;
    if share <= cfg.category_share_threshold {
        return None;
    }
    Some(Insight {
        kind: InsightKind::Revenue,
        text: format!(
            "{} accounts for {:.0}% of net sales",
            top.category,
            share * 100.0
        ),
    })
}

/// The most heavily discounted item, measured against its own gross sales.
fn discount_pressure(rows: &[CanonicalRow], cfg: &InsightConfig) -> Option<Insight> {
    #[derive(Default)]
    struct Money {
        display_name: String,
        gross: f64,
        discount: f64,
    }

    let mut per_item: BTreeMap<String, Money> = BTreeMap::new();
    for row in rows {
        let entry = per_item.entry(row.item_name.to_lowercase()).or_default();
        if entry.display_name.is_empty() {
            entry.display_name = row.item_name.clone();
        }
        entry.gross += row.gross_sales.unwrap_or(0.0);
        entry.discount += row.discount.unwrap_or(0.0);
    }

    let worst = per_item
        .into_values()
        .filter(|m| m.gross > 0.0 && m.discount / m.gross > cfg.discount_share_threshold)
        .max_by(|a, b| a.discount.total_cmp(&b.discount))?;

    let share = worst.discount / worst.gross;
    Some(Insight {
        kind: InsightKind::Discount,
        text: format!(
            "{} gave back {:.0}% of its gross sales in discounts",
            worst.display_name,
            share * 100.0
        ),
    })
}

fn premium_pricing(report: &AggregateReport, cfg: &InsightConfig) -> Option<Insight> {
    if report.total_quantity <= 0.0 || report.total_net_sales <= 0.0 {
        return None;
    }
    let mean_price = report.total_net_sales / report.total_quantity;
    let premium = report
        .items
        .iter()
        .filter(|item| item.quantity > 0.0)
        .filter(|item| {
            item.avg_price
                .is_some_and(|p| p >= cfg.premium_price_ratio * mean_price)
        })
        .max_by(|a, b| {
            a.avg_price
                .unwrap_or(0.0)
                .total_cmp(&b.avg_price.unwrap_or(0.0))
        })?;

    Some(Insight {
        kind: InsightKind::Premium,
        text: format!(
            "{} sells at a premium: ${:.2} vs the ${:.2} menu average",
            premium.item_name,
            premium.avg_price.unwrap_or(0.0),
            mean_price
        ),
    })
}

/// Category share shift between the first and last calendar month. Needs at
/// least two distinct months of dated rows.
fn monthly_trend(rows: &[CanonicalRow], cfg: &InsightConfig) -> Option<Insight> {
    #[derive(Default)]
    struct Month {
        total: f64,
        by_category: BTreeMap<String, f64>,
    }

    let mut months: BTreeMap<(i32, u32), Month> = BTreeMap::new();
    let mut display: BTreeMap<String, String> = BTreeMap::new();

    for row in rows {
        let Some(date) = row.date else { continue };
        let month = months.entry((date.year(), date.month())).or_default();
        month.total += row.net_sales;
        let key = row.category.to_lowercase();
        *month.by_category.entry(key.clone()).or_default() += row.net_sales;
        display.entry(key).or_insert_with(|| row.category.clone());
    }

    if months.len() < 2 {
        return None;
    }
    let (first_key, first) = months.iter().next()?;
    let (last_key, last) = months.iter().next_back()?;
    if first.total <= 0.0 || last.total <= 0.0 {
        return None;
    }

    let share = |month: &Month, key: &str| {
        month.by_category.get(key).copied().unwrap_or(0.0) / month.total
    };

    let mut candidate: Option<(String, f64, f64)> = None;
    for key in first.by_category.keys().chain(last.by_category.keys()) {
        let before = share(first, key);
        let after = share(last, key);
        let delta = after - before;
        let beats = candidate
            .as_ref()
            .map_or(true, |(_, b, a)| delta.abs() > (a - b).abs());
        if delta.abs() >= cfg.trend_shift_threshold && beats {
            candidate = Some((key.clone(), before, after));
        }
    }

    let (key, before, after) = candidate?;
    let direction = if after > before { "rose" } else { "fell" };
    Some(Insight {
        kind: InsightKind::Trend,
        text: format!(
            "{}'s share of net sales {} from {:.0}% in {} to {:.0}% in {}",
            display.get(&key).cloned().unwrap_or(key),
            direction,
            before * 100.0,
            month_label(*first_key),
            after * 100.0,
            month_label(*last_key)
        ),
    })
}

fn month_label((year, month): (i32, u32)) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"))
}

fn fmt_units(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{quantity:.0}")
    } else {
        format!("{quantity}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aggregate::aggregate;

    fn row(
        date: Option<&str>,
        item: &str,
        category: &str,
        qty: f64,
        gross: Option<f64>,
        discount: Option<f64>,
        net: f64,
    ) -> CanonicalRow {
        CanonicalRow {
            date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            item_name: item.to_string(),
            category: category.to_string(),
            quantity: qty,
            avg_price: None,
            gross_sales: gross,
            discount,
            net_sales: net,
        }
    }

    fn derive(rows: &[CanonicalRow]) -> SalesSummary {
        let report = aggregate(rows).unwrap();
        derive_insights(rows, report, &InsightConfig::default())
    }

    fn kinds(summary: &SalesSummary) -> Vec<InsightKind> {
        summary.insights.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn bestseller_fires_when_clearly_ahead() {
        let rows = vec![
            row(None, "Pho Beef", "Noodles", 120.0, None, None, 1740.0),
            row(None, "Banh Mi", "Sandwich", 60.0, None, None, 540.0),
        ];
        let summary = derive(&rows);
        let best = summary
            .insights
            .iter()
            .find(|i| i.kind == InsightKind::Bestseller)
            .unwrap();
        assert_eq!(best.text, "Pho Beef is the top seller with 120 units sold");
        let pho = summary
            .top_items
            .iter()
            .find(|i| i.item_name == "Pho Beef")
            .unwrap();
        assert_eq!(
            pho.performance_tag.as_ref().unwrap().kind,
            InsightKind::Bestseller
        );
    }

    #[test]
    fn bestseller_silent_on_close_race() {
        let rows = vec![
            row(None, "Pho Beef", "Noodles", 100.0, None, None, 1450.0),
            row(None, "Banh Mi", "Sandwich", 95.0, None, None, 855.0),
        ];
        let summary = derive(&rows);
        assert!(!kinds(&summary).contains(&InsightKind::Bestseller));
    }

    #[test]
    fn single_item_is_its_own_bestseller() {
        let rows = vec![row(None, "Pho Beef", "Noodles", 10.0, None, None, 145.0)];
        let summary = derive(&rows);
        assert!(kinds(&summary).contains(&InsightKind::Bestseller));
    }

    #[test]
    fn top_revenue_always_reported_and_tagged_when_distinct() {
        // Banh Mi moves the most units; Lobster Roll makes the most money.
        let rows = vec![
            row(None, "Banh Mi", "Sandwich", 200.0, None, None, 1800.0),
            row(None, "Lobster Roll", "Sandwich", 50.0, None, None, 2500.0),
        ];
        let summary = derive(&rows);
        let top = summary
            .insights
            .iter()
            .find(|i| i.kind == InsightKind::TopRevenue)
            .unwrap();
        assert!(top.text.contains("Lobster Roll"));
        assert!(top.text.contains("$2500.00"));

        let lobster = &summary.top_items[0];
        assert_eq!(
            lobster.performance_tag.as_ref().unwrap().kind,
            InsightKind::TopRevenue
        );
        let banh_mi = &summary.top_items[1];
        assert_eq!(
            banh_mi.performance_tag.as_ref().unwrap().kind,
            InsightKind::Bestseller
        );
    }

    #[test]
    fn bestseller_badge_wins_over_top_revenue_on_same_item() {
        let rows = vec![
            row(None, "Pho Beef", "Noodles", 120.0, None, None, 1740.0),
            row(None, "Banh Mi", "Sandwich", 60.0, None, None, 540.0),
        ];
        let summary = derive(&rows);
        let pho = &summary.top_items[0];
        assert_eq!(
            pho.performance_tag.as_ref().unwrap().kind,
            InsightKind::Bestseller
        );
        // Both insights still appear.
        assert!(kinds(&summary).contains(&InsightKind::TopRevenue));
    }

    #[test]
    fn category_concentration_fires_above_threshold() {
        let rows = vec![
            row(None, "Pho Beef", "Noodles", 10.0, None, None, 600.0),
            row(None, "Banh Mi", "Sandwich", 10.0, None, None, 400.0),
        ];
        let summary = derive(&rows);
        let revenue = summary
            .insights
            .iter()
            .find(|i| i.kind == InsightKind::Revenue)
            .unwrap();
        assert_eq!(revenue.text, "Noodles accounts for 60% of net sales");
    }

    #[test]
    fn category_concentration_silent_below_threshold() {
        // Largest category sits exactly at the 40% threshold; strict
        // comparison keeps it quiet.
        let rows = vec![
            row(None, "Pho Beef", "Noodles", 10.0, None, None, 400.0),
            row(None, "Banh Mi", "Sandwich", 10.0, None, None, 400.0),
            row(None, "Spring Rolls", "Appetizers", 10.0, None, None, 200.0),
        ];
        let summary = derive(&rows);
        assert!(!kinds(&summary).contains(&InsightKind::Revenue));
    }

    #[test]
    fn discount_pressure_names_the_worst_offender() {
        let rows = vec![
            row(None, "Pho Beef", "Noodles", 100.0, Some(1450.0), Some(50.0), 1400.0),
            row(None, "Banh Mi", "Sandwich", 80.0, Some(720.0), Some(180.0), 540.0),
        ];
        let summary = derive(&rows);
        let discount = summary
            .insights
            .iter()
            .find(|i| i.kind == InsightKind::Discount)
            .unwrap();
        assert!(discount.text.contains("Banh Mi"));
        assert!(discount.text.contains("25%"));
    }

    #[test]
    fn premium_pricing_compares_to_menu_average() {
        // Mean price: 2050 / 110 ≈ 18.64; Wagyu at 65 is well past 1.5x.
        let rows = vec![
            row(None, "Wagyu Special", "Mains", 10.0, None, None, 650.0),
            row(None, "Banh Mi", "Sandwich", 100.0, None, None, 1400.0),
        ];
        let summary = derive(&rows);
        let premium = summary
            .insights
            .iter()
            .find(|i| i.kind == InsightKind::Premium)
            .unwrap();
        assert!(premium.text.contains("Wagyu Special"));
        assert!(premium.text.contains("$65.00"));
    }

    #[test]
    fn trend_requires_two_months() {
        let rows = vec![
            row(Some("2025-01-05"), "Pho Beef", "Noodles", 10.0, None, None, 145.0),
            row(Some("2025-01-20"), "Banh Mi", "Sandwich", 10.0, None, None, 90.0),
        ];
        let summary = derive(&rows);
        assert!(!kinds(&summary).contains(&InsightKind::Trend));
    }

    #[test]
    fn trend_reports_share_shift_between_months() {
        // Noodles: 80% of January, 20% of February.
        let rows = vec![
            row(Some("2025-01-05"), "Pho Beef", "Noodles", 10.0, None, None, 800.0),
            row(Some("2025-01-20"), "Banh Mi", "Sandwich", 10.0, None, None, 200.0),
            row(Some("2025-02-05"), "Pho Beef", "Noodles", 10.0, None, None, 200.0),
            row(Some("2025-02-20"), "Banh Mi", "Sandwich", 10.0, None, None, 800.0),
        ];
        let summary = derive(&rows);
        let trend = summary
            .insights
            .iter()
            .find(|i| i.kind == InsightKind::Trend)
            .unwrap();
        assert!(trend.text.contains("fell") || trend.text.contains("rose"));
        assert!(trend.text.contains("January 2025"));
        assert!(trend.text.contains("February 2025"));
    }

    #[test]
    fn flat_dataset_yields_ordered_subset() {
        let rows = vec![
            row(None, "Pho Beef", "Noodles", 10.0, None, None, 500.0),
            row(None, "Banh Mi", "Sandwich", 10.0, None, None, 500.0),
        ];
        let summary = derive(&rows);
        // Heuristic order is stable regardless of which fire.
        let ks = kinds(&summary);
        let mut sorted = ks.clone();
        sorted.sort_by_key(|k| match k {
            InsightKind::Bestseller => 0,
            InsightKind::TopRevenue => 1,
            InsightKind::Revenue => 2,
            InsightKind::Discount => 3,
            InsightKind::Premium => 4,
            InsightKind::Trend => 5,
            // `InsightKind` is #[non_exhaustive] in another crate.
            _ => unreachable!(),
        });
        assert_eq!(ks, sorted);
    }
}

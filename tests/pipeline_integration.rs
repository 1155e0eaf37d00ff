//! Full-pipeline tests over the library entry point: raw CSV text in,
//! finished summary (or typed error) out.

use chrono::NaiveDate;
use menupulse::{summarize_csv, FormatKind, IngestConfig, InsightKind, PipelineError};

const SIMPLE_CSV: &str = "date,item_name,quantity_sold,category\n\
    2025-01-01,Pho Beef,25,Noodles\n\
    2025-01-02,Pho Beef,30,Noodles\n\
    2025-01-01,Banh Mi,18,Sandwich\n\
    2025-01-03,Spring Rolls,40,Appetizers\n";

#[test]
fn simple_export_produces_totals_and_date_range() {
    let summary = summarize_csv(SIMPLE_CSV).unwrap();

    let pho = summary
        .top_items
        .iter()
        .find(|i| i.item_name == "Pho Beef")
        .unwrap();
    assert_eq!(pho.quantity, 55.0);

    let range = summary.date_range.unwrap();
    assert_eq!(range.start, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    assert_eq!(range.end, NaiveDate::from_ymd_opt(2025, 1, 3).unwrap());

    assert_eq!(summary.top_categories.len(), 3);
}

#[test]
fn pos_export_nets_out_discounts() {
    let csv = "Sales Category,Item Name,Avg Price,Quantity,Gross Sales,Discount Amount,,\r\n\
        Noodles,Pho Beef,14.50,320,\"$4,600.00\",$34.03,,\r\n";
    let summary = summarize_csv(csv).unwrap();

    let pho = &summary.top_items[0];
    assert!((pho.net_sales - 4565.97).abs() < 1e-9);
    assert_eq!(summary.date_range, None);
}

#[test]
fn unknown_columns_fail_with_the_column_list() {
    let err = summarize_csv("sku,units,price\nA1,5,2.00\n").unwrap_err();
    match err {
        PipelineError::Ingest(inner) => {
            let msg = inner.to_string();
            assert!(msg.contains("not recognized"));
            assert!(msg.contains("sku"));
        }
        other => panic!("expected ingest error, got {other:?}"),
    }
}

#[test]
fn summary_serializes_to_the_wire_shape() {
    let summary = summarize_csv(SIMPLE_CSV).unwrap();
    let json = serde_json::to_value(&summary).unwrap();

    assert!(json["top_items"].is_array());
    assert!(json["top_categories"].is_array());
    assert!(json["insights"].is_array());
    assert_eq!(json["date_range"]["start"], "2025-01-01");

    // Tagged items carry the badge under the original key names.
    let tagged = json["top_items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item.get("performance_tag").is_some());
    if let Some(item) = tagged {
        assert!(item["performance_tag"]["type"].is_string());
        assert!(item["performance_tag"]["label"].is_string());
    }
}

#[test]
fn skipped_rows_do_not_fail_the_upload() {
    let csv = "date,item_name,quantity_sold,category\n\
        2025-01-01,Pho Beef,25,Noodles\n\
        garbage,,,\n\
        2025-01-02,Banh Mi,not-a-number,Sandwich\n";
    let summary = summarize_csv(csv).unwrap();
    assert_eq!(summary.top_items.len(), 1);
}

#[test]
fn format_detection_is_visible_to_library_callers() {
    let dataset = menupulse::normalize_csv(SIMPLE_CSV, &IngestConfig::default()).unwrap();
    assert_eq!(dataset.format, FormatKind::Simple);
}

#[test]
fn bestseller_insight_fires_on_a_clear_winner() {
    let csv = "date,item_name,quantity_sold,category\n\
        2025-01-01,Pho Beef,120,Noodles\n\
        2025-01-01,Banh Mi,60,Sandwich\n";
    let summary = summarize_csv(csv).unwrap();
    let best = summary
        .insights
        .iter()
        .find(|i| i.kind == InsightKind::Bestseller)
        .unwrap();
    assert!(best.text.contains("Pho Beef"));
    assert!(best.text.contains("120 units"));
}

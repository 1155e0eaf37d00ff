//! Thresholds the insight heuristics fire on.

use serde::{Deserialize, Serialize};

/// Named thresholds for every heuristic. All ratios are dimensionless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Bestseller fires when the top item sells at least this many times
    /// the runner-up's units (1.2 = 20% ahead).
    pub bestseller_ratio: f64,
    /// Category concentration fires when one category carries more than
    /// this share of net sales.
    pub category_share_threshold: f64,
    /// Discount pressure fires when an item's discounts exceed this share
    /// of its gross sales.
    pub discount_share_threshold: f64,
    /// Premium pricing fires when an item's average price is at least this
    /// many times the dataset mean price.
    pub premium_price_ratio: f64,
    /// Trend fires when a category's share of net sales moves by at least
    /// this much between the first and last calendar month.
    pub trend_shift_threshold: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            bestseller_ratio: 1.2,
            category_share_threshold: 0.40,
            discount_share_threshold: 0.15,
            premium_price_ratio: 1.5,
            trend_shift_threshold: 0.15,
        }
    }
}

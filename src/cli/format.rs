//! Currency and table formatting for terminal output.

use tabled::{Table, Tabled};

/// `$1,234.56`; negatives render as `-$1,234.56`.
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

/// One labelled figure in a two-column summary.
#[derive(Tabled)]
pub struct MetricRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl MetricRow {
    pub fn new(metric: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            metric: metric.into(),
            value: value.into(),
        }
    }
}

#[derive(Tabled)]
pub struct ProfitRow {
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Market Value")]
    pub market_value: String,
    #[tabled(rename = "Total Cost")]
    pub total_cost: String,
    #[tabled(rename = "Profit")]
    pub profit: String,
}

#[derive(Tabled)]
pub struct ReasonRow {
    #[tabled(rename = "Reason")]
    pub reason: &'static str,
    #[tabled(rename = "Count")]
    pub count: usize,
}

/// A listing near the median and its image outcome.
#[derive(Tabled)]
pub struct NeighbourRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Price")]
    pub price: String,
    #[tabled(rename = "Condition")]
    pub condition: String,
    #[tabled(rename = "Image")]
    pub image: String,
}

/// Render rows as a bordered table under their column names.
pub fn render_table<T: Tabled>(rows: impl IntoIterator<Item = T>) -> String {
    Table::new(rows).to_string()
}

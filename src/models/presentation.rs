use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One yearly total of a historical series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub amount: Decimal,
}

/// One renderable treemap rectangle.
#[derive(Debug, Clone, Serialize)]
pub struct TreemapCell {
    pub name: String,
    /// Object-constancy key for transitions between renders.
    pub key: String,
    pub value: f64,
    pub percent_of_parent: f64,
    pub color: &'static str,
    pub tooltip: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Treemap {
    pub name: String,
    pub cells: Vec<TreemapCell>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListRow {
    pub name: String,
    pub amount: String,
}

/// Tabular view of a node's children, largest first.
#[derive(Debug, Clone, Serialize)]
pub struct ListTable {
    pub heading: String,
    pub rows: Vec<ListRow>,
    pub total: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AreaPoint {
    pub year: i32,
    pub date: NaiveDate,
    pub value: f64,
    pub label: String,
}

/// Bar/area chart input for a historical series.
#[derive(Debug, Clone, Serialize)]
pub struct AreaChart {
    pub title: String,
    pub axis_label: &'static str,
    pub y_min: f64,
    pub y_max: f64,
    pub points: Vec<AreaPoint>,
}

/// Expense, income and net totals for the selected year.
#[derive(Debug, Clone, Serialize)]
pub struct YearlySummary {
    pub year: i32,
    pub expenses: String,
    pub income: String,
    pub net: String,
}

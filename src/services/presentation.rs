//! Turns aggregate nodes and historical series into render-ready data.

use chrono::Datelike;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::filters::{
    axis_label, display_value, format_amount, format_percent, unit_heading, AmountStyle,
};
use crate::models::{
    AggregateNode, AreaChart, AreaPoint, HistoricalPoint, ListRow, ListTable, Normalization,
    Treemap, TreemapCell, ViewState,
};
use crate::services::aggregator::grand_total;
use crate::sort_utils::{sort_by_size, SortDirection};

/// Cell colors from the smallest share of the parent to the largest.
pub const PALETTE: [&str; 7] = [
    "#6a4a3c", "#88419d", "#556270", "#4ecdc4", "#77cca4", "#ff6b6b", "#c44d58",
];

/// Percent-of-parent boundaries between consecutive palette entries.
pub const COLOR_THRESHOLDS: [f64; 6] = [1.0, 2.0, 7.0, 15.0, 20.0, 40.0];

pub fn cell_color(percent: f64) -> &'static str {
    let bucket = COLOR_THRESHOLDS
        .iter()
        .take_while(|threshold| percent >= **threshold)
        .count();
    PALETTE[bucket]
}

/// A treemap can only draw strictly positive areas.
pub fn is_renderable(node: &AggregateNode) -> bool {
    node.size > Decimal::ZERO
}

pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// Treemap cells for the children of `node`, zero and negative sizes removed.
pub fn treemap(node: &AggregateNode, state: &ViewState) -> Treemap {
    let visible: Vec<&AggregateNode> = node.children().iter().filter(|c| is_renderable(c)).collect();
    let parent_total: Decimal = visible.iter().map(|c| c.size).sum();
    let at_bureau = state.selected_bureau().is_some();

    let cells = visible
        .into_iter()
        .map(|child| {
            let percent = if parent_total.is_zero() {
                0.0
            } else {
                to_f64(child.size / parent_total * Decimal::ONE_HUNDRED)
            };
            let key = match (&child.unique_key, at_bureau) {
                (Some(unique), true) => unique.clone(),
                _ => child.name.clone(),
            };
            TreemapCell {
                name: child.name.clone(),
                key,
                value: to_f64(child.size),
                percent_of_parent: percent,
                color: cell_color(percent),
                tooltip: format!(
                    "{}: {}, {} van totaal",
                    child.name,
                    format_amount(child.size, state.normalization, AmountStyle::Tooltip),
                    format_percent(percent)
                ),
            }
        })
        .collect();

    Treemap {
        name: node.name.clone(),
        cells,
    }
}

/// Children of `node` largest first, with the grand total of all of them.
pub fn list_table(node: &AggregateNode, normalization: Normalization) -> ListTable {
    let mut children = node.children().to_vec();
    sort_by_size(&mut children, SortDirection::Desc);

    let rows = children
        .iter()
        .map(|c| ListRow {
            name: c.name.clone(),
            amount: format_amount(c.size, normalization, AmountStyle::List),
        })
        .collect();

    ListTable {
        heading: format!("Bedrag{}", unit_heading(normalization)),
        rows,
        total: format_amount(grand_total(node), normalization, AmountStyle::List),
    }
}

/// Chart input for a historical series, in the unit of `normalization`.
pub fn area_chart(
    title: &str,
    points: &[HistoricalPoint],
    normalization: Normalization,
) -> AreaChart {
    let points: Vec<AreaPoint> = points
        .iter()
        .map(|p| {
            let year = p.date.year();
            let label = if p.amount.is_zero() {
                year.to_string()
            } else {
                format!(
                    "{} - {}",
                    year,
                    format_amount(p.amount, normalization, AmountStyle::Tooltip)
                )
            };
            AreaPoint {
                year,
                date: p.date,
                value: to_f64(display_value(p.amount, normalization)),
                label,
            }
        })
        .collect();

    let min = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    let (y_min, y_max) = if points.is_empty() {
        (0.0, 0.0)
    } else if max > 0.0 {
        (min.min(0.0), max)
    } else {
        (min, 0.0)
    };

    AreaChart {
        title: title.to_string(),
        axis_label: axis_label(normalization),
        y_min,
        y_max,
        points,
    }
}

//! Money formatting for the Dutch-language dashboard.
//!
//! Ledger amounts are in thousands of euros. How they are shown depends on
//! the normalization:
//! - total: billions with two decimals
//! - absolute: whole euros
//! - per capita: euros per person with two decimals
//!
//! Thousands are separated by `.`, decimals by `,`.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::Normalization;

const THOUSANDS_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';
const EURO: &str = "\u{20ac}";

/// Where a formatted amount is shown; each spot uses its own precision/suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountStyle {
    Tooltip,
    List,
    Summary,
}

/// Converts a ledger amount into the unit shown for `normalization`.
pub fn display_value(amount: Decimal, normalization: Normalization) -> Decimal {
    match normalization {
        Normalization::Total => amount / Decimal::from(1_000_000),
        Normalization::Absolute => amount * Decimal::from(1000),
        Normalization::PerCapita => amount,
    }
}

pub fn format_amount(amount: Decimal, normalization: Normalization, style: AmountStyle) -> String {
    let value = display_value(amount, normalization);
    match (normalization, style) {
        (Normalization::Total, AmountStyle::Tooltip) => {
            format!("{} miljard", format_euro(value, 2))
        }
        (Normalization::Total, AmountStyle::List) => format_euro(value, 2),
        (Normalization::Total, AmountStyle::Summary) => {
            format!("{} miljard", format_euro(value, 0))
        }
        (Normalization::Absolute, _) => format_euro(value, 0),
        (Normalization::PerCapita, AmountStyle::Tooltip) => {
            format!("{} per persoon", format_euro(value, 2))
        }
        (Normalization::PerCapita, _) => format_euro(value, 2),
    }
}

/// Unit shown next to the amount column heading.
pub fn unit_heading(normalization: Normalization) -> &'static str {
    match normalization {
        Normalization::Total => " (miljarden)",
        Normalization::PerCapita => " (per persoon)",
        Normalization::Absolute => "",
    }
}

/// Caption of a chart's value axis.
pub fn axis_label(normalization: Normalization) -> &'static str {
    match normalization {
        Normalization::Total => "miljarden (\u{20ac})",
        Normalization::PerCapita => "per persoon (\u{20ac})",
        Normalization::Absolute => "euro (\u{20ac})",
    }
}

/// Formats `value` as euros rounded to `decimals` places, e.g. `€1.234,56`.
pub fn format_euro(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}{}", sign, EURO, format_number(rounded.abs(), decimals))
}

/// Formats a percentage with two decimals, e.g. `12,34%`.
pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value).replace('.', &DECIMAL_SEPARATOR.to_string())
}

fn format_number(value: Decimal, decimals: u32) -> String {
    let plain = format!("{:.*}", decimals as usize, value);
    let (whole, fraction) = match plain.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut result = format_with_thousands(whole, THOUSANDS_SEPARATOR);
    if let Some(fraction) = fraction {
        result.push(DECIMAL_SEPARATOR);
        result.push_str(fraction);
    }
    result
}

/// Inserts `sep` between every group of three digits.
fn format_with_thousands(digits: &str, sep: char) -> String {
    let chars: Vec<char> = digits.chars().rev().collect();
    let mut result = Vec::with_capacity(chars.len() + chars.len() / 3);

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(sep);
        }
        result.push(*c);
    }

    result.iter().rev().collect()
}

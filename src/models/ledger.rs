use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fiscal domain a ledger belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    #[default]
    Expenses,
    Income,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Expenses => "expenses",
            Domain::Income => "income",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "expenses" => Some(Domain::Expenses),
            "income" => Some(Domain::Income),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Domain::Expenses => "Uitgaven",
            Domain::Income => "Inkomsten",
        }
    }

    pub fn all() -> &'static [Domain] {
        &[Domain::Expenses, Domain::Income]
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether amounts are nominal or deflated to base-year prices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scaling {
    #[default]
    Raw,
    InflationAdjusted,
}

impl Scaling {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scaling::Raw => "raw",
            Scaling::InflationAdjusted => "inflation_adjusted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "raw" => Some(Scaling::Raw),
            "inflation_adjusted" => Some(Scaling::InflationAdjusted),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scaling::Raw => "Oorspronkelijk Bedrag",
            Scaling::InflationAdjusted => "Zonder Inflatie",
        }
    }

    pub fn all() -> &'static [Scaling] {
        &[Scaling::Raw, Scaling::InflationAdjusted]
    }
}

/// One account-level budget record with per-year amounts.
///
/// Amounts are in thousands of euros as published in the source tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub agency_name: String,
    pub bureau_name: String,
    pub account_name: String,
    /// Disambiguates accounts sharing a name across classifications.
    pub unique_key: String,
    pub amounts: BTreeMap<i32, Decimal>,
    pub row_number: usize,
}

impl LineItem {
    pub fn amount(&self, year: i32) -> Option<Decimal> {
        self.amounts.get(&year).copied()
    }
}

/// An ordered collection of line items for one domain, tagged with the
/// transforms that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Ledger {
    pub domain: Domain,
    pub scaling: Scaling,
    pub per_capita: bool,
    pub items: Vec<LineItem>,
}

impl Ledger {
    pub fn raw(domain: Domain, items: Vec<LineItem>) -> Self {
        Self {
            domain,
            scaling: Scaling::Raw,
            per_capita: false,
            items,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of every item's amount for `year`; items without the year count as zero.
    pub fn total_for_year(&self, year: i32) -> Decimal {
        self.items
            .iter()
            .filter_map(|item| item.amount(year))
            .sum()
    }

    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self
            .items
            .iter()
            .flat_map(|item| item.amounts.keys().copied())
            .collect();
        years.sort_unstable();
        years.dedup();
        years
    }
}

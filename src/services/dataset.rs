//! The eight precomputed ledgers the dashboard reads from.

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::date_utils::supported_years;
use crate::error::AppResult;
use crate::models::{Domain, Ledger, Normalization, Scaling, ViewState};
use crate::services::csv_parser::{self, ParseResult};
use crate::services::scaling::{adjust_for_inflation, adjust_per_capita, ScalingTables};

/// The four variants of one domain's ledger.
#[derive(Debug, Clone)]
pub struct LedgerSet {
    raw: Ledger,
    inflation: Ledger,
    per_capita: Ledger,
    per_capita_inflation: Ledger,
}

impl LedgerSet {
    pub fn build(raw: Ledger, tables: &ScalingTables) -> AppResult<Self> {
        let inflation = adjust_for_inflation(&raw, &tables.inflation)?;
        let per_capita = adjust_per_capita(&raw, &tables.population)?;
        let per_capita_inflation = adjust_per_capita(&inflation, &tables.population)?;
        Ok(Self {
            raw,
            inflation,
            per_capita,
            per_capita_inflation,
        })
    }

    /// Total and absolute share the unscaled-currency ledgers.
    pub fn variant(&self, scaling: Scaling, normalization: Normalization) -> &Ledger {
        match (scaling, normalization.is_per_capita()) {
            (Scaling::Raw, false) => &self.raw,
            (Scaling::InflationAdjusted, false) => &self.inflation,
            (Scaling::Raw, true) => &self.per_capita,
            (Scaling::InflationAdjusted, true) => &self.per_capita_inflation,
        }
    }

    pub fn all(&self) -> [&Ledger; 4] {
        [
            &self.raw,
            &self.inflation,
            &self.per_capita,
            &self.per_capita_inflation,
        ]
    }
}

/// What the startup load produced, surfaced on the status endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub expense_records: usize,
    pub income_records: usize,
    pub skipped_expense_records: usize,
    pub skipped_income_records: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Dataset {
    expenses: LedgerSet,
    income: LedgerSet,
    years: Vec<i32>,
    report: LoadReport,
}

impl Dataset {
    /// Validates the divisor tables against `years` and derives every variant.
    pub fn build(expenses: Ledger, income: Ledger, years: &[i32]) -> AppResult<Self> {
        let tables = ScalingTables::load(years)?;
        let report = LoadReport {
            expense_records: expenses.len(),
            income_records: income.len(),
            ..LoadReport::default()
        };
        Ok(Self {
            expenses: LedgerSet::build(expenses, &tables)?,
            income: LedgerSet::build(income, &tables)?,
            years: years.to_vec(),
            report,
        })
    }

    /// Parses both CSV tables for the supported years.
    pub fn from_csv(expenses_csv: &[u8], income_csv: &[u8]) -> AppResult<Self> {
        let years: Vec<i32> = supported_years().collect();
        let expenses = csv_parser::parse_ledger(expenses_csv, Domain::Expenses, &years)?;
        let income = csv_parser::parse_ledger(income_csv, Domain::Income, &years)?;
        Self::from_parse_results(expenses, income, &years)
    }

    /// Reads both CSV tables from the configured paths.
    pub fn load(config: &Config) -> AppResult<Self> {
        let years: Vec<i32> = supported_years().collect();
        let expenses = csv_parser::load_ledger(&config.expenses_path, Domain::Expenses, &years)?;
        let income = csv_parser::load_ledger(&config.income_path, Domain::Income, &years)?;
        Self::from_parse_results(expenses, income, &years)
    }

    fn from_parse_results(
        expenses: ParseResult,
        income: ParseResult,
        years: &[i32],
    ) -> AppResult<Self> {
        let skipped_expense_records = expenses.skipped();
        let skipped_income_records = income.skipped();
        let mut errors = expenses.errors;
        errors.extend(income.errors);

        let mut dataset = Self::build(expenses.ledger, income.ledger, years)?;
        dataset.report.skipped_expense_records = skipped_expense_records;
        dataset.report.skipped_income_records = skipped_income_records;
        dataset.report.errors = errors;

        info!(
            expense_records = dataset.report.expense_records,
            income_records = dataset.report.income_records,
            skipped_expense_records,
            skipped_income_records,
            "Budget dataset ready"
        );
        Ok(dataset)
    }

    pub fn ledgers(&self, domain: Domain) -> &LedgerSet {
        match domain {
            Domain::Expenses => &self.expenses,
            Domain::Income => &self.income,
        }
    }

    pub fn ledger(&self, domain: Domain, scaling: Scaling, normalization: Normalization) -> &Ledger {
        self.ledgers(domain).variant(scaling, normalization)
    }

    pub fn ledger_for(&self, state: &ViewState) -> &Ledger {
        self.ledger(state.domain, state.scaling, state.normalization)
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }
}

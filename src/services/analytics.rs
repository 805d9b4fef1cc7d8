use rust_decimal::Decimal;

use crate::filters::{format_amount, AmountStyle};
use crate::models::{Domain, ViewState, YearlySummary};
use crate::services::dataset::Dataset;

/// Raw yearly totals under one ledger variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearTotals {
    pub expenses: Decimal,
    pub income: Decimal,
}

impl YearTotals {
    pub fn for_state(dataset: &Dataset, state: &ViewState) -> Self {
        let total = |domain: Domain| {
            dataset
                .ledger(domain, state.scaling, state.normalization)
                .total_for_year(state.year)
        };
        Self {
            expenses: total(Domain::Expenses),
            income: total(Domain::Income),
        }
    }

    /// Income minus expenses; negative is a deficit.
    pub fn net(&self) -> Decimal {
        self.income - self.expenses
    }
}

/// Summary line for the selected year, formatted for the current
/// normalization.
pub fn yearly_summary(dataset: &Dataset, state: &ViewState) -> YearlySummary {
    let totals = YearTotals::for_state(dataset, state);
    let format = |amount| format_amount(amount, state.normalization, AmountStyle::Summary);
    YearlySummary {
        year: state.year,
        expenses: format(totals.expenses),
        income: format(totals.income),
        net: format(totals.net()),
    }
}

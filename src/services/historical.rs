use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date_utils::year_start;
use crate::error::{AppError, AppResult};
use crate::models::{HistoricalPoint, Ledger, LineItem};

/// Selects the rows a historical series sums: a whole agency, one bureau,
/// or a single account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTarget {
    pub agency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bureau: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl HistoryTarget {
    pub fn agency(agency: &str) -> Self {
        Self {
            agency: agency.to_string(),
            bureau: None,
            account: None,
        }
    }

    pub fn bureau(agency: &str, bureau: &str) -> Self {
        Self {
            bureau: Some(bureau.to_string()),
            ..Self::agency(agency)
        }
    }

    pub fn account(agency: &str, bureau: &str, account: &str) -> Self {
        Self {
            account: Some(account.to_string()),
            ..Self::bureau(agency, bureau)
        }
    }

    pub fn matches(&self, item: &LineItem) -> bool {
        item.agency_name == self.agency
            && self.bureau.as_ref().map_or(true, |b| *b == item.bureau_name)
            && self.account.as_ref().map_or(true, |a| *a == item.account_name)
    }

    /// The most specific name in the path.
    pub fn title(&self) -> &str {
        self.account
            .as_deref()
            .or(self.bureau.as_deref())
            .unwrap_or(&self.agency)
    }
}

/// Per-year totals of the matching rows, dated January 1st.
///
/// A target matching nothing yields a zero for every year.
pub fn historical(
    ledger: &Ledger,
    target: &HistoryTarget,
    years: &[i32],
) -> AppResult<Vec<HistoricalPoint>> {
    let rows: Vec<&LineItem> = ledger.items.iter().filter(|i| target.matches(i)).collect();

    years
        .iter()
        .map(|year| {
            let date = year_start(*year)
                .ok_or_else(|| AppError::Configuration(format!("Invalid year {}", year)))?;
            let amount: Decimal = rows
                .iter()
                .map(|r| r.amount(*year).unwrap_or(Decimal::ZERO))
                .sum();
            Ok(HistoricalPoint { date, amount })
        })
        .collect()
}

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, trace, warn};

use crate::error::AppError;
use crate::models::{Domain, Ledger, LineItem};

pub const AGENCY_COLUMN: &str = "Agency Name";
pub const BUREAU_COLUMN: &str = "Bureau Name";
pub const ACCOUNT_COLUMN: &str = "Account Name";
pub const UNIQUE_COLUMN: &str = "Unique";

#[derive(Debug)]
pub struct ParseResult {
    pub ledger: Ledger,
    pub errors: Vec<String>,
}

impl ParseResult {
    pub fn skipped(&self) -> usize {
        self.errors.len()
    }
}

struct Columns {
    agency: usize,
    bureau: usize,
    account: usize,
    unique: usize,
    years: Vec<(i32, usize)>,
}

/// Reads a ledger CSV from disk.
pub fn load_ledger(path: &Path, domain: Domain, years: &[i32]) -> Result<ParseResult, AppError> {
    debug!(path = %path.display(), %domain, "Loading ledger");
    let content = std::fs::read(path)?;
    parse_ledger(&content, domain, years)
}

/// Parses a ledger CSV with one amount column per entry of `years`.
///
/// Records with an unparseable amount are skipped and reported in
/// `ParseResult::errors`; a missing required column fails the whole load.
pub fn parse_ledger(content: &[u8], domain: Domain, years: &[i32]) -> Result<ParseResult, AppError> {
    trace!(content_size = content.len(), %domain, "Starting ledger parsing");

    let content_str =
        std::str::from_utf8(content).map_err(|e| AppError::CsvParse(e.to_string()))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content_str.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::CsvParse(e.to_string()))?
        .clone();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(AppError::CsvParse("CSV has no header row".into()));
    }

    debug!(column_count = headers.len(), "CSV headers parsed");

    let columns = resolve_columns(&headers, years)?;

    let mut items = Vec::new();
    let mut errors = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let row_number = row_idx + 2;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                errors.push(format!("Row {}: {}", row_number, e));
                continue;
            }
        };

        match parse_record(&record, &columns, row_number) {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!(row = row_number, %domain, "Skipping record: {}", e);
                errors.push(e.to_string());
            }
        }
    }

    if !errors.is_empty() {
        warn!(
            error_count = errors.len(),
            %domain,
            "Ledger parsing completed with skipped records"
        );
    }
    debug!(
        row_count = items.len(),
        error_count = errors.len(),
        %domain,
        "Ledger parsing completed"
    );

    Ok(ParseResult {
        ledger: Ledger::raw(domain, items),
        errors,
    })
}

fn resolve_columns(headers: &csv::StringRecord, years: &[i32]) -> Result<Columns, AppError> {
    let required = |name: &str| {
        find_column(headers, name)
            .ok_or_else(|| AppError::CsvParse(format!("No '{}' column found in CSV", name)))
    };

    let agency = required(AGENCY_COLUMN)?;
    let bureau = required(BUREAU_COLUMN)?;
    let account = required(ACCOUNT_COLUMN)?;
    let unique = required(UNIQUE_COLUMN)?;

    let years = years
        .iter()
        .map(|year| {
            find_column(headers, &year.to_string())
                .map(|col| (*year, col))
                .ok_or_else(|| {
                    AppError::Configuration(format!("No column for year {} in CSV", year))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Columns {
        agency,
        bureau,
        account,
        unique,
        years,
    })
}

fn parse_record(
    record: &csv::StringRecord,
    columns: &Columns,
    row_number: usize,
) -> Result<LineItem, AppError> {
    let text = |col: usize| record.get(col).unwrap_or("").trim().to_string();

    let agency_name = text(columns.agency);
    if agency_name.is_empty() {
        return Err(AppError::Validation(format!(
            "Row {}: Missing agency name",
            row_number
        )));
    }

    let mut amounts = BTreeMap::new();
    for (year, col) in &columns.years {
        let malformed = |value: &str| AppError::MalformedRecord {
            row: row_number,
            column: year.to_string(),
            value: value.to_string(),
        };
        // A short row lacks the cell entirely; only a present empty cell is zero.
        let cell = record.get(*col).ok_or_else(|| malformed("<missing>"))?;
        let amount = parse_amount(cell).ok_or_else(|| malformed(cell))?;
        amounts.insert(*year, amount);
    }

    Ok(LineItem {
        agency_name,
        bureau_name: text(columns.bureau),
        account_name: text(columns.account),
        unique_key: text(columns.unique),
        amounts,
        row_number,
    })
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|header| header.trim().eq_ignore_ascii_case(name))
}

/// Parses a comma-grouped amount such as `"1,234"` or `"-12,345.5"`.
///
/// An empty cell is missing data and counts as zero; anything else that is
/// not a number yields `None`.
pub fn parse_amount(cell: &str) -> Option<Decimal> {
    let cleaned: String = cell
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Some(Decimal::ZERO);
    }

    Decimal::from_str(&cleaned).ok()
}

//! Inflation and per-capita adjustment of ledgers.
//!
//! Both transforms divide every yearly amount by a per-year divisor. The
//! divisor tables are constants and must cover every year a ledger carries.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{Ledger, LineItem, Scaling};

/// Price deflators relative to 2012.
pub const INFLATION_DEFLATORS: &[(i32, &str)] = &[
    (2012, "1.000"),
    (2013, "1.025"),
    (2014, "1.040375"),
    (2015, "1.0528595"),
];

/// Population in thousands, matching the thousands-of-euros ledger unit so
/// that the quotient is euros per person.
pub const POPULATION_THOUSANDS: &[(i32, i64)] = &[
    (2012, 16730),
    (2013, 16780),
    (2014, 16829),
    (2015, 16901),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivisorKind {
    Inflation,
    Population,
}

impl DivisorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DivisorKind::Inflation => "inflation deflator",
            DivisorKind::Population => "population",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DivisorTable {
    kind: DivisorKind,
    by_year: BTreeMap<i32, Decimal>,
}

impl DivisorTable {
    pub fn new(kind: DivisorKind, entries: impl IntoIterator<Item = (i32, Decimal)>) -> Self {
        Self {
            kind,
            by_year: entries.into_iter().collect(),
        }
    }

    pub fn inflation() -> AppResult<Self> {
        let entries = INFLATION_DEFLATORS
            .iter()
            .map(|(year, value)| {
                Decimal::from_str(value)
                    .map(|d| (*year, d))
                    .map_err(|e| {
                        AppError::Configuration(format!("Deflator for {} is invalid: {}", year, e))
                    })
            })
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Self::new(DivisorKind::Inflation, entries))
    }

    pub fn population() -> Self {
        Self::new(
            DivisorKind::Population,
            POPULATION_THOUSANDS
                .iter()
                .map(|(year, people)| (*year, Decimal::from(*people))),
        )
    }

    pub fn kind(&self) -> DivisorKind {
        self.kind
    }

    pub fn divisor(&self, year: i32) -> AppResult<Decimal> {
        self.by_year.get(&year).copied().ok_or_else(|| {
            AppError::Configuration(format!("No {} entry for year {}", self.kind.as_str(), year))
        })
    }

    /// Checks the table against the years the ledgers carry.
    ///
    /// Every year needs a positive divisor. Deflators additionally start at
    /// exactly 1 in the first year and strictly increase.
    pub fn validate(&self, years: &[i32]) -> AppResult<()> {
        for year in years {
            let divisor = self.divisor(*year)?;
            if divisor <= Decimal::ZERO {
                return Err(AppError::Configuration(format!(
                    "{} for year {} must be positive, got {}",
                    self.kind.as_str(),
                    year,
                    divisor
                )));
            }
        }

        if self.kind == DivisorKind::Inflation {
            let mut values = self.by_year.iter();
            if let Some((base_year, base)) = values.next() {
                if *base != Decimal::ONE {
                    return Err(AppError::Configuration(format!(
                        "Base year {} deflator must be 1, got {}",
                        base_year, base
                    )));
                }
                let mut previous = *base;
                for (year, value) in values {
                    if *value <= previous {
                        return Err(AppError::Configuration(format!(
                            "Deflator for {} ({}) does not exceed the previous year ({})",
                            year, value, previous
                        )));
                    }
                    previous = *value;
                }
            }
        }

        Ok(())
    }
}

/// Both divisor tables, validated together at startup.
#[derive(Debug, Clone)]
pub struct ScalingTables {
    pub inflation: DivisorTable,
    pub population: DivisorTable,
}

impl ScalingTables {
    pub fn load(years: &[i32]) -> AppResult<Self> {
        let tables = Self {
            inflation: DivisorTable::inflation()?,
            population: DivisorTable::population(),
        };
        tables.inflation.validate(years)?;
        tables.population.validate(years)?;
        debug!(year_count = years.len(), "Divisor tables validated");
        Ok(tables)
    }
}

/// Deflates every amount to base-year prices, rounded to whole units.
pub fn adjust_for_inflation(ledger: &Ledger, deflators: &DivisorTable) -> AppResult<Ledger> {
    if ledger.scaling == Scaling::InflationAdjusted {
        return Err(AppError::TransformReapplied("inflation adjustment"));
    }
    if ledger.per_capita {
        return Err(AppError::TransformReapplied(
            "inflation adjustment after per-capita adjustment",
        ));
    }

    let items = divide_items(&ledger.items, deflators, round_half_up)?;
    Ok(Ledger {
        domain: ledger.domain,
        scaling: Scaling::InflationAdjusted,
        per_capita: false,
        items,
    })
}

/// Divides every amount by that year's population. Fractions are kept.
pub fn adjust_per_capita(ledger: &Ledger, population: &DivisorTable) -> AppResult<Ledger> {
    if ledger.per_capita {
        return Err(AppError::TransformReapplied("per-capita adjustment"));
    }

    let items = divide_items(&ledger.items, population, |d| d)?;
    Ok(Ledger {
        domain: ledger.domain,
        scaling: ledger.scaling,
        per_capita: true,
        items,
    })
}

fn divide_items(
    items: &[LineItem],
    table: &DivisorTable,
    finish: impl Fn(Decimal) -> Decimal,
) -> AppResult<Vec<LineItem>> {
    items
        .iter()
        .map(|item| {
            let amounts = item
                .amounts
                .iter()
                .map(|(year, amount)| {
                    let divisor = table.divisor(*year)?;
                    Ok((*year, finish(*amount / divisor)))
                })
                .collect::<AppResult<BTreeMap<_, _>>>()?;
            Ok(LineItem {
                amounts,
                ..item.clone()
            })
        })
        .collect()
}

/// Rounds to the nearest integer with halves going toward positive infinity.
fn round_half_up(value: Decimal) -> Decimal {
    (value + Decimal::new(5, 1)).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Domain;

    const YEARS: &[i32] = &[2012, 2013, 2014, 2015];

    fn ledger(amounts: &[(i32, i64)]) -> Ledger {
        Ledger::raw(
            Domain::Expenses,
            vec![LineItem {
                agency_name: "A".into(),
                bureau_name: "B".into(),
                account_name: "X".into(),
                unique_key: "u".into(),
                amounts: amounts.iter().map(|(y, a)| (*y, Decimal::from(*a))).collect(),
                row_number: 2,
            }],
        )
    }

    fn amount(ledger: &Ledger, year: i32) -> Decimal {
        ledger.items[0].amount(year).unwrap()
    }

    #[test]
    fn test_constant_tables_validate() {
        assert!(ScalingTables::load(YEARS).is_ok());
    }

    #[test]
    fn test_inflation_base_year_unchanged() {
        let tables = ScalingTables::load(YEARS).unwrap();
        let raw = ledger(&[(2012, 123_456), (2013, 1000)]);
        let adjusted = adjust_for_inflation(&raw, &tables.inflation).unwrap();
        assert_eq!(amount(&adjusted, 2012), Decimal::from(123_456));
        assert_eq!(adjusted.scaling, Scaling::InflationAdjusted);
    }

    #[test]
    fn test_inflation_divides_and_rounds() {
        let tables = ScalingTables::load(YEARS).unwrap();
        // 1000 / 1.025 = 975.609..., 2050 / 1.025 = 2000 exactly
        let raw = ledger(&[(2013, 1000), (2014, 2050)]);
        let adjusted = adjust_for_inflation(&raw, &tables.inflation).unwrap();
        assert_eq!(amount(&adjusted, 2013), Decimal::from(976));
        // 2050 / 1.040375 = 1970.44...
        assert_eq!(amount(&adjusted, 2014), Decimal::from(1970));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(Decimal::new(25, 1)), Decimal::from(3));
        assert_eq!(round_half_up(Decimal::new(-25, 1)), Decimal::from(-2));
        assert_eq!(round_half_up(Decimal::new(24, 1)), Decimal::from(2));
    }

    #[test]
    fn test_per_capita_keeps_fractions() {
        let tables = ScalingTables::load(YEARS).unwrap();
        let raw = ledger(&[(2012, 16730 * 3 + 1)]);
        let adjusted = adjust_per_capita(&raw, &tables.population).unwrap();
        let value = amount(&adjusted, 2012);
        assert!(value > Decimal::from(3));
        assert!(value < Decimal::new(30001, 4));
        assert!(adjusted.per_capita);
        assert_eq!(adjusted.scaling, Scaling::Raw);
    }

    #[test]
    fn test_per_capita_of_inflation_keeps_scaling() {
        let tables = ScalingTables::load(YEARS).unwrap();
        let raw = ledger(&[(2015, 16901)]);
        let inflated = adjust_for_inflation(&raw, &tables.inflation).unwrap();
        let both = adjust_per_capita(&inflated, &tables.population).unwrap();
        assert_eq!(both.scaling, Scaling::InflationAdjusted);
        assert!(both.per_capita);
    }

    #[test]
    fn test_double_application_rejected() {
        let tables = ScalingTables::load(YEARS).unwrap();
        let raw = ledger(&[(2012, 100)]);

        let inflated = adjust_for_inflation(&raw, &tables.inflation).unwrap();
        assert!(matches!(
            adjust_for_inflation(&inflated, &tables.inflation),
            Err(AppError::TransformReapplied(_))
        ));

        let per_capita = adjust_per_capita(&raw, &tables.population).unwrap();
        assert!(matches!(
            adjust_per_capita(&per_capita, &tables.population),
            Err(AppError::TransformReapplied(_))
        ));
        assert!(matches!(
            adjust_for_inflation(&per_capita, &tables.inflation),
            Err(AppError::TransformReapplied(_))
        ));
    }

    #[test]
    fn test_missing_divisor_is_configuration_error() {
        let tables = ScalingTables::load(YEARS).unwrap();
        let raw = ledger(&[(2016, 100)]);
        assert!(matches!(
            adjust_for_inflation(&raw, &tables.inflation),
            Err(AppError::Configuration(_))
        ));
        assert!(matches!(
            adjust_per_capita(&raw, &tables.population),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_uncovered_year() {
        let result = ScalingTables::load(&[2011, 2012]);
        assert!(matches!(result, Err(AppError::Configuration(msg)) if msg.contains("2011")));
    }

    #[test]
    fn test_validate_rejects_non_increasing_deflators() {
        let table = DivisorTable::new(
            DivisorKind::Inflation,
            [(2012, Decimal::ONE), (2013, Decimal::new(99, 2))],
        );
        assert!(table.validate(&[2012, 2013]).is_err());
    }

    #[test]
    fn test_validate_rejects_base_not_one() {
        let table = DivisorTable::new(
            DivisorKind::Inflation,
            [(2012, Decimal::new(11, 1)), (2013, Decimal::new(12, 1))],
        );
        assert!(table.validate(&[2012, 2013]).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_population() {
        let table = DivisorTable::new(DivisorKind::Population, [(2012, Decimal::ZERO)]);
        assert!(table.validate(&[2012]).is_err());
    }
}

use std::ops::RangeInclusive;

use chrono::NaiveDate;

/// First fiscal year present in the budget tables.
pub const FIRST_YEAR: i32 = 2012;
/// Last fiscal year present in the budget tables.
pub const LAST_YEAR: i32 = 2015;

pub fn supported_years() -> RangeInclusive<i32> {
    FIRST_YEAR..=LAST_YEAR
}

pub fn is_supported_year(year: i32) -> bool {
    supported_years().contains(&year)
}

/// January 1st of `year`, the date a yearly total is plotted at.
pub fn year_start(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_supported_years() {
        let years: Vec<i32> = supported_years().collect();
        assert_eq!(years, vec![2012, 2013, 2014, 2015]);
    }

    #[test]
    fn test_year_start() {
        let date = year_start(2014).unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2014, 1, 1));
    }

}

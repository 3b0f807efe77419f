//! Calendar day model.
//!
//! Pure date arithmetic used to lay out month grids and to group candidate
//! dates into contiguous runs. Nothing here performs I/O.

mod day;
mod interval;

pub use day::{
    Day, calendar_grid, days_in_month, leading_days, month_days, next_month, previous_month,
    trailing_days, weekday_index,
};
pub use interval::{TimeInterval, create_intervals};

use chrono::NaiveDate;

use crate::error::ValidationError;

/// Canonical date format used for every date key crossing the boundary.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a canonical `YYYY-MM-DD` date.
///
/// Rejects anything that does not format back to the same string, so
/// "2022-8-3" and "+2022-08-03" are refused along with "2022-13-01".
pub fn parse_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .filter(|date| format_date(*date) == s)
        .ok_or_else(|| ValidationError::InvalidDate(s.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn is_canonical_date(s: &str) -> bool {
    parse_date(s).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_canonical() {
        let date = parse_date("2022-07-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2022, 7, 1).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_non_canonical() {
        assert!(parse_date("2022-13-01").is_err());
        assert!(parse_date("2022-02-30").is_err());
        assert!(parse_date("2022-8-3").is_err());
        assert!(parse_date("not a date").is_err());
        assert!(parse_date("").is_err());
    }
}

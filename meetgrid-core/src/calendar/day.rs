use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// A cell of a month grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub date: NaiveDate,
    pub day_of_month: u32,
    /// False for the padding days borrowed from the adjacent months.
    pub is_current_month: bool,
}

impl Day {
    fn new(date: NaiveDate, is_current_month: bool) -> Self {
        Day {
            date,
            day_of_month: date.day(),
            is_current_month,
        }
    }
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 { (year + 1, 1) } else { (year, month + 1) }
}

pub fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 { (year - 1, 12) } else { (year, month - 1) }
}

/// Number of days in the month. Returns 0 for a month outside 1..=12.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next) = next_month(year, month);
    match (first_of_month(year, month), first_of_month(next_year, next)) {
        (Some(first), Some(next_first)) => (next_first - first).num_days() as u32,
        _ => 0,
    }
}

/// Weekday column for a Monday-first grid: Monday = 0 … Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> u32 {
    // Sunday-based numbering shifted back one day; Sunday (0) wraps to 6.
    let sunday_based = date.weekday().num_days_from_sunday();
    (sunday_based + 6) % 7
}

/// Every day of the month, in order.
pub fn month_days(year: i32, month: u32) -> Vec<Day> {
    let Some(first) = first_of_month(year, month) else {
        return Vec::new();
    };

    first
        .iter_days()
        .take(days_in_month(year, month) as usize)
        .map(|date| Day::new(date, true))
        .collect()
}

/// Days of the previous month that pad the first row so the 1st lands under
/// its weekday column.
pub fn leading_days(year: i32, month: u32) -> Vec<Day> {
    let Some(first) = first_of_month(year, month) else {
        return Vec::new();
    };

    let count = weekday_index(first) as i64;
    (1..=count)
        .rev()
        .map(|offset| Day::new(first - Duration::days(offset), false))
        .collect()
}

/// Days of the next month that pad the last row out to Sunday.
pub fn trailing_days(year: i32, month: u32) -> Vec<Day> {
    let Some(first) = first_of_month(year, month) else {
        return Vec::new();
    };

    let last = first + Duration::days(days_in_month(year, month) as i64 - 1);
    let count = 6 - weekday_index(last) as i64;
    (1..=count)
        .map(|offset| Day::new(last + Duration::days(offset), false))
        .collect()
}

/// Full Monday-first grid for the month. Length is always a multiple of 7.
pub fn calendar_grid(year: i32, month: u32) -> Vec<Day> {
    let mut grid = leading_days(year, month);
    grid.extend(month_days(year, month));
    grid.extend(trailing_days(year, month));
    grid
}

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::parse_date;

/// A run of consecutive calendar days, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeInterval(Vec<String>);

impl TimeInterval {
    pub fn dates(&self) -> &[String] {
        &self.0
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<TimeInterval> for Vec<String> {
    fn from(interval: TimeInterval) -> Self {
        interval.0
    }
}

fn is_next_day(previous: &str, current: &str) -> bool {
    match (parse_date(previous), parse_date(current)) {
        (Ok(prev), Ok(cur)) => cur - prev == Duration::days(1),
        _ => false,
    }
}

/// Group date keys into runs of consecutive days.
///
/// Keys must be canonical `YYYY-MM-DD` strings, which sort chronologically.
/// A key that does not parse never joins a neighbour, so it ends up in an
/// interval of its own.
pub fn create_intervals<I, S>(date_keys: I) -> Vec<TimeInterval>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut keys: Vec<String> = date_keys
        .into_iter()
        .map(|k| k.as_ref().to_string())
        .collect();
    keys.sort();
    keys.dedup();

    let mut intervals: Vec<TimeInterval> = Vec::new();

    for key in keys {
        let extends_run = intervals
            .last()
            .and_then(|run| run.last())
            .is_some_and(|prev| is_next_day(prev, &key));

        match intervals.last_mut() {
            Some(run) if extends_run => run.0.push(key),
            _ => intervals.push(TimeInterval(vec![key])),
        }
    }

    intervals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_vecs(intervals: Vec<TimeInterval>) -> Vec<Vec<String>> {
        intervals.into_iter().map(Vec::from).collect()
    }

    #[test]
    fn test_single_date() {
        let intervals = create_intervals(["2022-01-20"]);
        assert_eq!(as_vecs(intervals), vec![vec!["2022-01-20".to_string()]]);
    }

    #[test]
    fn test_empty_input() {
        assert!(create_intervals(Vec::<String>::new()).is_empty());
    }

    #[test]
    fn test_gap_starts_new_interval() {
        let intervals = create_intervals(["2022-08-06", "2022-08-03", "2022-08-04"]);
        assert_eq!(
            as_vecs(intervals),
            vec![
                vec!["2022-08-03".to_string(), "2022-08-04".to_string()],
                vec!["2022-08-06".to_string()],
            ]
        );
    }

    #[test]
    fn test_spans_month_boundary() {
        let intervals = create_intervals([
            "2022-08-03", "2022-08-04", "2022-08-06", "2022-08-07", "2022-08-08", "2022-08-09",
            "2022-08-31", "2022-09-01", "2022-09-03",
        ]);

        assert_eq!(intervals.len(), 4);
        assert_eq!(intervals[0].dates(), ["2022-08-03", "2022-08-04"]);
        assert_eq!(
            intervals[1].dates(),
            ["2022-08-06", "2022-08-07", "2022-08-08", "2022-08-09"]
        );
        assert_eq!(intervals[2].dates(), ["2022-08-31", "2022-09-01"]);
        assert_eq!(intervals[3].dates(), ["2022-09-03"]);
    }

    #[test]
    fn test_spans_year_boundary() {
        let intervals = create_intervals(["2022-12-31", "2023-01-01"]);
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].first(), Some("2022-12-31"));
        assert_eq!(intervals[0].last(), Some("2023-01-01"));
    }

    #[test]
    fn test_malformed_key_does_not_panic() {
        let intervals = create_intervals(["2022-08-03", "garbage", "2022-08-04"]);
        assert_eq!(intervals.len(), 2);
    }
}

//! Terminal rendering for meetgrid-core types.
//!
//! Extension traits and helpers that add colored output using owo_colors.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use meetgrid_core::calendar::{TimeInterval, calendar_grid, format_date, parse_date};
use meetgrid_core::time_block::block_label;
use meetgrid_core::{Event, LeaveOutcome, SlotCount};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let mut lines = vec![format!("📅 {}", self.name.bold())];

        lines.push(format!(
            "   {} {}–{}",
            "Times:".dimmed(),
            block_label(self.earliest),
            block_label(self.latest)
        ));

        let members: Vec<String> = self
            .members
            .iter()
            .map(|(name, member)| {
                if member.is_owner {
                    format!("{} {}", name, "(owner)".dimmed())
                } else {
                    name.clone()
                }
            })
            .collect();
        lines.push(format!("   {} {}", "Members:".dimmed(), members.join(", ")));

        lines.join("\n")
    }
}

impl Render for SlotCount {
    fn render(&self) -> String {
        format!(
            "{} {}–{} {}",
            self.date,
            block_label(self.block),
            block_label(self.block + 1),
            format!("({} available)", self.count).green()
        )
    }
}

impl Render for LeaveOutcome {
    fn render(&self) -> String {
        match self {
            LeaveOutcome::Left => "Left the event".to_string(),
            LeaveOutcome::OwnershipTransferred(owner) => {
                format!("Left the event, {} is now the owner", owner.bold())
            }
            LeaveOutcome::EventEmpty => "Left the event; nobody was left so it was deleted"
                .yellow()
                .to_string(),
        }
    }
}

const WEEKDAY_HEADER: &str = "Mo Tu We Th Fr Sa Su";

/// Monday-first month calendar. Dates in `highlighted` are shown in green.
pub fn render_month(year: i32, month: u32, highlighted: &BTreeSet<String>) -> String {
    let title = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_default();

    let mut lines = vec![format!("{:^20}", title).bold().to_string(), WEEKDAY_HEADER.dimmed().to_string()];

    for week in calendar_grid(year, month).chunks(7) {
        let cells: Vec<String> = week
            .iter()
            .map(|day| {
                let label = format!("{:>2}", day.day_of_month);
                if highlighted.contains(&format_date(day.date)) {
                    label.green().bold().to_string()
                } else if day.is_current_month {
                    label
                } else {
                    label.dimmed().to_string()
                }
            })
            .collect();
        lines.push(cells.join(" "));
    }

    lines.join("\n")
}

/// Color a member count relative to the group size.
fn heat_cell(count: usize, total: usize, mine: bool) -> String {
    let label = if count == 0 {
        " ·".to_string()
    } else {
        format!("{count:>2}")
    };

    let colored = if count == 0 {
        label.dimmed().to_string()
    } else if count == total {
        label.green().bold().to_string()
    } else if count * 2 >= total {
        label.green().to_string()
    } else {
        label.yellow().to_string()
    };

    if mine {
        format!("{}{}", colored, "*".cyan())
    } else {
        format!("{} ", colored)
    }
}

/// Right-aligned "day/month" header for a grid column.
fn column_label(date: &str) -> String {
    match parse_date(date) {
        Ok(d) => format!("{:>5}", format!("{}/{}", d.day(), d.month())),
        Err(_) => date.to_string(),
    }
}

/// Availability grid for one run of consecutive dates: one column per date,
/// one row per visible time block. `*` marks cells `viewer` has painted.
pub fn render_interval(event: &Event, interval: &TimeInterval, viewer: Option<&str>) -> String {
    let total = event.members.len().max(1);
    let mut lines = Vec::new();

    let header: Vec<String> = interval
        .dates()
        .iter()
        .map(|date| column_label(date))
        .collect();
    lines.push(format!("     {}", header.join("")).dimmed().to_string());

    for block in event.visible_blocks() {
        let row: Vec<String> = interval
            .dates()
            .iter()
            .map(|date| {
                let info = event.group_availabilities.date(date);
                let count = info.map_or(0, |i| i.count_at(block));
                let mine = viewer.is_some_and(|v| info.is_some_and(|i| i.is_marked(block, v)));
                format!("  {}", heat_cell(count, total, mine))
            })
            .collect();
        lines.push(format!("{}{}", block_label(block).dimmed(), row.join("")));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use meetgrid_core::AuthScope;

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_month_has_a_row_per_week() {
        let rendered = strip_ansi(&render_month(2022, 8, &BTreeSet::new()));
        let lines: Vec<&str> = rendered.lines().collect();

        // title, weekday header, five weeks
        assert_eq!(lines.len(), 2 + 5);
        assert_eq!(lines[1], WEEKDAY_HEADER);
        assert_eq!(lines[2], " 1  2  3  4  5  6  7");
        assert_eq!(lines[6], "29 30 31  1  2  3  4");
    }

    #[test]
    fn test_column_label_uses_canonical_dates_only() {
        assert_eq!(column_label("2022-08-04"), "  4/8");
        assert_eq!(column_label("2022-12-31"), "31/12");
        assert_eq!(column_label("2022-8-4"), "2022-8-4");
    }

    #[test]
    fn test_interval_grid_rows_follow_visible_blocks() {
        let mut event =
            Event::new("Dinner", "alice", AuthScope::Local, ["2022-08-03", "2022-08-04"], 36, 40)
                .unwrap();
        event.group_availabilities.mark("2022-08-04", 37, "alice");

        let interval = &event.intervals()[0];
        let rendered = strip_ansi(&render_interval(&event, interval, Some("alice")));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 1 + 4);
        assert!(lines[2].starts_with("18:30"));
        assert!(lines[2].contains(" 1*"));
        assert!(lines[1].starts_with("18:00"));
        assert!(!lines[1].contains('*'));
    }
}

//! Sparse availability map and its reconciliation with committed selections.
//!
//! `date -> time block -> username -> {}`. Presence of a username in a cell
//! means "available"; absence means not. Dates with no blocks and blocks
//! with no members are valid placeholders and are never pruned, so the key
//! set of the outer map doubles as the event's candidate dates.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::calendar::{TimeInterval, create_intervals, format_date};
use crate::error::ValidationError;
use crate::selection::{SelectionMode, SelectionRect, SelectionState};

/// Membership marker. Carries no data; presence is the signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {}

/// Members available in one (date, block) cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellMembers(BTreeMap<String, Marker>);

impl CellMembers {
    pub fn contains(&self, username: &str) -> bool {
        self.0.contains_key(username)
    }

    /// Mark `username`. Returns true if they were not marked before.
    pub fn upsert(&mut self, username: &str) -> bool {
        self.0.insert(username.to_string(), Marker {}).is_none()
    }

    /// Unmark `username`. Returns true if they were marked.
    pub fn remove(&mut self, username: &str) -> bool {
        self.0.remove(username).is_some()
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Availability for a single date, keyed by time block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityInfo(BTreeMap<usize, CellMembers>);

impl AvailabilityInfo {
    pub fn cell(&self, block: usize) -> Option<&CellMembers> {
        self.0.get(&block)
    }

    pub fn cell_mut(&mut self, block: usize) -> &mut CellMembers {
        self.0.entry(block).or_default()
    }

    pub fn is_marked(&self, block: usize, username: &str) -> bool {
        self.cell(block).is_some_and(|c| c.contains(username))
    }

    pub fn members_at(&self, block: usize) -> Vec<&str> {
        self.cell(block)
            .map(|c| c.usernames().collect())
            .unwrap_or_default()
    }

    pub fn count_at(&self, block: usize) -> usize {
        self.cell(block).map_or(0, CellMembers::len)
    }

    pub fn blocks(&self) -> impl Iterator<Item = (usize, &CellMembers)> {
        self.0.iter().map(|(block, cell)| (*block, cell))
    }

    /// Remove `username` from every block. Returns how many markers were dropped.
    pub fn remove_member(&mut self, username: &str) -> usize {
        self.0
            .values_mut()
            .map(|cell| cell.remove(username))
            .filter(|removed| *removed)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-date availability for the whole group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupAvailabilities(BTreeMap<String, AvailabilityInfo>);

impl GroupAvailabilities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty availability for each candidate date.
    pub fn with_dates<I, S>(dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        GroupAvailabilities(
            dates
                .into_iter()
                .map(|d| (d.into(), AvailabilityInfo::default()))
                .collect(),
        )
    }

    pub fn contains_date(&self, date: &str) -> bool {
        self.0.contains_key(date)
    }

    pub fn date(&self, date: &str) -> Option<&AvailabilityInfo> {
        self.0.get(date)
    }

    pub fn date_mut(&mut self, date: &str) -> Option<&mut AvailabilityInfo> {
        self.0.get_mut(date)
    }

    /// Add a candidate date. Existing availability for it is kept.
    pub fn insert_date(&mut self, date: &str) -> bool {
        if self.contains_date(date) {
            return false;
        }
        self.0.insert(date.to_string(), AvailabilityInfo::default());
        true
    }

    pub fn remove_date(&mut self, date: &str) -> Option<AvailabilityInfo> {
        self.0.remove(date)
    }

    /// Candidate dates in chronological order.
    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AvailabilityInfo)> {
        self.0.iter().map(|(date, info)| (date.as_str(), info))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_marked(&self, date: &str, block: usize, username: &str) -> bool {
        self.date(date).is_some_and(|info| info.is_marked(block, username))
    }

    /// Mark a single cell. Returns false if the date is not a candidate date
    /// or the user was already marked.
    pub fn mark(&mut self, date: &str, block: usize, username: &str) -> bool {
        self.date_mut(date)
            .is_some_and(|info| info.cell_mut(block).upsert(username))
    }

    /// Unmark a single cell. Empty cells are left in place.
    pub fn unmark(&mut self, date: &str, block: usize, username: &str) -> bool {
        self.date_mut(date)
            .is_some_and(|info| info.0.get_mut(&block).is_some_and(|c| c.remove(username)))
    }

    /// Drop every marker `username` holds, across all dates.
    pub fn remove_member(&mut self, username: &str) -> usize {
        self.0
            .values_mut()
            .map(|info| info.remove_member(username))
            .sum()
    }

    /// Number of cells where `username` is marked in one map but not the other.
    pub fn changed_cells(&self, other: &GroupAvailabilities, username: &str) -> usize {
        let mut cells: BTreeSet<(&str, usize)> = BTreeSet::new();
        for map in [self, other] {
            for (date, info) in map.iter() {
                cells.extend(info.blocks().map(|(block, _)| (date, block)));
            }
        }

        cells
            .into_iter()
            .filter(|&(date, block)| {
                self.is_marked(date, block, username) != other.is_marked(date, block, username)
            })
            .count()
    }

    /// Candidate dates grouped into runs of consecutive days.
    pub fn intervals(&self) -> Vec<TimeInterval> {
        create_intervals(self.dates())
    }
}

/// Apply a committed selection for `username` and return the new map.
///
/// Rows run from the first to the last block, columns advance one calendar
/// day at a time. Dates missing from the map are gaps in the candidate set
/// and are skipped. The input map is left untouched.
pub fn apply_selection(
    availabilities: &GroupAvailabilities,
    rect: &SelectionRect,
    mode: SelectionMode,
    username: &str,
) -> GroupAvailabilities {
    let mut updated = availabilities.clone();

    for block in rect.blocks() {
        for date in rect.dates() {
            let key = format_date(date);
            let Some(info) = updated.date_mut(&key) else {
                continue;
            };

            match mode {
                SelectionMode::Select => {
                    info.cell_mut(block).upsert(username);
                }
                SelectionMode::Deselect => {
                    if let Some(cell) = info.0.get_mut(&block) {
                        cell.remove(username);
                    }
                }
            }
        }
    }

    updated
}

/// Apply a raw [`SelectionState`], validating its corners and flags first.
pub fn apply_area(
    availabilities: &GroupAvailabilities,
    state: &SelectionState,
    username: &str,
) -> Result<GroupAvailabilities, ValidationError> {
    let mode = SelectionMode::from_flags(state.is_selecting_area, state.is_deselecting_area)?;
    let (start, end) = state
        .start()
        .zip(state.end())
        .ok_or(ValidationError::IncompleteSelection)?;
    let rect = SelectionRect::from_corners(&start, &end)?;

    Ok(apply_selection(availabilities, &rect, mode, username))
}

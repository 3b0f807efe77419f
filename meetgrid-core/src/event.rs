//! The event document: a meetup with candidate dates, a daily time range,
//! members and their painted availability.
//!
//! Serialised with camelCase keys so the same JSON document can be shared
//! with the web client.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::availability::GroupAvailabilities;
use crate::calendar::{TimeInterval, is_canonical_date, parse_date};
use crate::error::ValidationError;
use crate::time_block::{TIME_BLOCKS, block_label};

/// Where a member's identity comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScope {
    /// Name (and optional password) scoped to this one event.
    #[default]
    Local,
    /// Account from the external identity provider.
    Global,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default)]
    pub is_owner: bool,
    /// Opaque hash produced by the auth provider. Never a plain password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_pic_url: Option<String>,
    #[serde(default)]
    pub scope: AuthScope,
}

impl Member {
    pub fn new(scope: AuthScope) -> Self {
        Member {
            scope,
            ..Member::default()
        }
    }

    pub fn owner(scope: AuthScope) -> Self {
        Member {
            is_owner: true,
            scope,
            ..Member::default()
        }
    }
}

/// What happened when a member left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeaveOutcome {
    Left,
    /// The owner left and ownership moved to this member.
    OwnershipTransferred(String),
    /// Nobody is left; the document should be deleted.
    EventEmpty,
}

/// Number of members available in one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCount {
    pub date: String,
    pub block: usize,
    pub count: usize,
}

impl fmt::Display for SlotCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{} ({})",
            self.date,
            block_label(self.block),
            block_label(self.block + 1),
            self.count
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub name: String,
    /// First visible time block.
    pub earliest: usize,
    /// Exclusive end of the visible time blocks.
    pub latest: usize,
    #[serde(default)]
    pub group_availabilities: GroupAvailabilities,
    #[serde(default)]
    pub members: BTreeMap<String, Member>,
}

pub fn validate_time_range(earliest: usize, latest: usize) -> Result<(), ValidationError> {
    if earliest <= latest && latest <= TIME_BLOCKS {
        Ok(())
    } else {
        Err(ValidationError::InvalidTimeRange { earliest, latest })
    }
}

impl Event {
    /// Create an event owned by `owner` with the given candidate dates.
    pub fn new<I, S>(
        name: &str,
        owner: &str,
        scope: AuthScope,
        dates: I,
        earliest: usize,
        latest: usize,
    ) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        validate_time_range(earliest, latest)?;

        let mut group_availabilities = GroupAvailabilities::new();
        for date in dates {
            let date = date.as_ref();
            parse_date(date)?;
            group_availabilities.insert_date(date);
        }

        let mut members = BTreeMap::new();
        members.insert(owner.to_string(), Member::owner(scope));

        Ok(Event {
            name: name.to_string(),
            earliest,
            latest,
            group_availabilities,
            members,
        })
    }

    pub fn owner(&self) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, m)| m.is_owner)
            .map(|(name, _)| name.as_str())
    }

    pub fn is_owner(&self, username: &str) -> bool {
        self.members.get(username).is_some_and(|m| m.is_owner)
    }

    pub fn is_member(&self, username: &str) -> bool {
        self.members.contains_key(username)
    }

    pub fn set_time_range(&mut self, earliest: usize, latest: usize) -> Result<(), ValidationError> {
        validate_time_range(earliest, latest)?;
        self.earliest = earliest;
        self.latest = latest;
        Ok(())
    }

    /// Visible time blocks, in order.
    pub fn visible_blocks(&self) -> std::ops::Range<usize> {
        self.earliest..self.latest
    }

    pub fn add_date(&mut self, date: &str) -> Result<bool, ValidationError> {
        parse_date(date)?;
        Ok(self.group_availabilities.insert_date(date))
    }

    /// Drop a candidate date along with everyone's availability on it.
    pub fn remove_date(&mut self, date: &str) -> bool {
        self.group_availabilities.remove_date(date).is_some()
    }

    pub fn dates(&self) -> Vec<&str> {
        self.group_availabilities.dates().collect()
    }

    pub fn intervals(&self) -> Vec<TimeInterval> {
        self.group_availabilities.intervals()
    }

    pub fn join(&mut self, username: &str, member: Member) -> Result<(), ValidationError> {
        if self.is_member(username) {
            return Err(ValidationError::DuplicateMember(username.to_string()));
        }
        self.members.insert(
            username.to_string(),
            Member {
                is_owner: false,
                ..member
            },
        );
        Ok(())
    }

    /// Remove a member and every marker they hold.
    ///
    /// If the owner leaves, ownership passes to the alphabetically first
    /// remaining member so the event always has exactly one owner.
    pub fn leave(&mut self, username: &str) -> Result<LeaveOutcome, ValidationError> {
        let member = self
            .members
            .remove(username)
            .ok_or_else(|| ValidationError::UnknownMember(username.to_string()))?;
        self.group_availabilities.remove_member(username);

        if !member.is_owner {
            return Ok(LeaveOutcome::Left);
        }

        match self.members.iter_mut().next() {
            Some((next_owner, next)) => {
                next.is_owner = true;
                Ok(LeaveOutcome::OwnershipTransferred(next_owner.clone()))
            }
            None => Ok(LeaveOutcome::EventEmpty),
        }
    }

    pub fn available_members(&self, date: &str, block: usize) -> Vec<&str> {
        self.group_availabilities
            .date(date)
            .map(|info| info.members_at(block))
            .unwrap_or_default()
    }

    /// Member counts for every visible cell, dates in order then blocks.
    pub fn heat_counts(&self) -> Vec<SlotCount> {
        self.group_availabilities
            .iter()
            .flat_map(|(date, info)| {
                self.visible_blocks().map(move |block| SlotCount {
                    date: date.to_string(),
                    block,
                    count: info.count_at(block),
                })
            })
            .collect()
    }

    /// Busiest visible cells first. Cells nobody marked are left out.
    pub fn best_slots(&self, limit: usize) -> Vec<SlotCount> {
        let mut slots: Vec<SlotCount> = self
            .heat_counts()
            .into_iter()
            .filter(|s| s.count > 0)
            .collect();
        slots.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.date.cmp(&b.date))
                .then_with(|| a.block.cmp(&b.block))
        });
        slots.truncate(limit);
        slots
    }

    /// Check every document invariant.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_time_range(self.earliest, self.latest)?;

        for (date, info) in self.group_availabilities.iter() {
            if !is_canonical_date(date) {
                return Err(ValidationError::InvalidDate(date.to_string()));
            }
            if let Some((block, _)) = info.blocks().find(|(block, _)| *block >= TIME_BLOCKS) {
                return Err(ValidationError::TimeBlockOutOfRange(block));
            }
        }

        let owners = self.members.values().filter(|m| m.is_owner).count();
        if owners != 1 {
            return Err(ValidationError::InvalidEvent(format!(
                "expected exactly one owner, found {owners}"
            )));
        }

        Ok(())
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

//! Document store port.
//!
//! The realtime store that holds event documents lives outside the engine.
//! It is reached through [`DocumentStore`]: load the current document,
//! subscribe to later versions, and write partial updates. Two
//! implementations ship with the crate: [`MemoryStore`] for tests and
//! embedding, [`LocalStore`] for JSON files on disk.

mod feeds;
mod local;
mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::availability::GroupAvailabilities;
use crate::error::MeetgridResult;
use crate::event::{Event, Member};

/// Partial update to an event document. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub earliest: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_availabilities: Option<GroupAvailabilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<BTreeMap<String, Member>>,
}

impl EventPatch {
    pub fn availabilities(group_availabilities: GroupAvailabilities) -> Self {
        EventPatch {
            group_availabilities: Some(group_availabilities),
            ..EventPatch::default()
        }
    }

    pub fn time_range(earliest: usize, latest: usize) -> Self {
        EventPatch {
            earliest: Some(earliest),
            latest: Some(latest),
            ..EventPatch::default()
        }
    }

    /// Everything a membership change touches: members plus the markers
    /// a departing member held.
    pub fn membership(event: &Event) -> Self {
        EventPatch {
            members: Some(event.members.clone()),
            group_availabilities: Some(event.group_availabilities.clone()),
            ..EventPatch::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == EventPatch::default()
    }

    pub fn apply_to(&self, event: &mut Event) {
        if let Some(name) = &self.name {
            event.name = name.clone();
        }
        if let Some(earliest) = self.earliest {
            event.earliest = earliest;
        }
        if let Some(latest) = self.latest {
            event.latest = latest;
        }
        if let Some(group_availabilities) = &self.group_availabilities {
            event.group_availabilities = group_availabilities.clone();
        }
        if let Some(members) = &self.members {
            event.members = members.clone();
        }
    }
}

/// Remote document store for event documents.
///
/// Subscriptions are last-write-wins: a receiver always holds the latest
/// version the store has seen.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self, event_id: &str) -> MeetgridResult<Event>;

    async fn subscribe(&self, event_id: &str) -> MeetgridResult<watch::Receiver<Event>>;

    async fn write_patch(&self, event_id: &str, patch: EventPatch) -> MeetgridResult<()>;

    async fn create(&self, event_id: &str, event: &Event) -> MeetgridResult<()>;

    async fn delete(&self, event_id: &str) -> MeetgridResult<()>;

    /// Identifiers of every stored event, sorted.
    async fn list(&self) -> MeetgridResult<Vec<String>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::AuthScope;

    #[test]
    fn test_patch_only_touches_set_fields() {
        let mut event =
            Event::new("Dinner", "alice", AuthScope::Local, ["2022-08-03"], 10, 20).unwrap();
        let before = event.clone();

        EventPatch::default().apply_to(&mut event);
        assert_eq!(event, before);

        EventPatch::time_range(12, 30).apply_to(&mut event);
        assert_eq!((event.earliest, event.latest), (12, 30));
        assert_eq!(event.group_availabilities, before.group_availabilities);
    }

    #[test]
    fn test_patch_serializes_sparse() {
        let patch = EventPatch::time_range(1, 2);
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "earliest": 1, "latest": 2 }));
        assert!(EventPatch::default().is_empty());
        assert!(!patch.is_empty());
    }
}

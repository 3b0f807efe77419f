use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};

use super::feeds::Feeds;
use super::{DocumentStore, EventPatch};
use crate::error::{MeetgridError, MeetgridResult};
use crate::event::Event;

/// In-process store. Documents vanish with the process.
#[derive(Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Event>>,
    feeds: Feeds,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn load(&self, event_id: &str) -> MeetgridResult<Event> {
        self.documents
            .lock()
            .await
            .get(event_id)
            .cloned()
            .ok_or_else(|| MeetgridError::EventNotFound(event_id.to_string()))
    }

    async fn subscribe(&self, event_id: &str) -> MeetgridResult<watch::Receiver<Event>> {
        let current = self.load(event_id).await?;
        Ok(self.feeds.subscribe(event_id, current).await)
    }

    async fn write_patch(&self, event_id: &str, patch: EventPatch) -> MeetgridResult<()> {
        let updated = {
            let mut documents = self.documents.lock().await;
            let current = documents
                .get(event_id)
                .ok_or_else(|| MeetgridError::EventNotFound(event_id.to_string()))?;

            let mut event = current.clone();
            patch.apply_to(&mut event);
            event.validate()?;

            documents.insert(event_id.to_string(), event.clone());
            event
        };

        self.feeds.publish(event_id, &updated).await;
        Ok(())
    }

    async fn create(&self, event_id: &str, event: &Event) -> MeetgridResult<()> {
        event.validate()?;
        self.documents
            .lock()
            .await
            .insert(event_id.to_string(), event.clone());
        self.feeds.publish(event_id, event).await;
        Ok(())
    }

    async fn delete(&self, event_id: &str) -> MeetgridResult<()> {
        self.documents
            .lock()
            .await
            .remove(event_id)
            .ok_or_else(|| MeetgridError::EventNotFound(event_id.to_string()))?;
        self.feeds.close(event_id).await;
        Ok(())
    }

    async fn list(&self) -> MeetgridResult<Vec<String>> {
        let mut ids: Vec<String> = self.documents.lock().await.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::GroupAvailabilities;
    use crate::error::ValidationError;
    use crate::event::AuthScope;

    fn event() -> Event {
        Event::new("Dinner", "alice", AuthScope::Local, ["2022-08-03"], 0, 48).unwrap()
    }

    #[tokio::test]
    async fn test_subscriber_sees_patches() {
        let store = MemoryStore::new();
        store.create("dinner", &event()).await.unwrap();

        let mut feed = store.subscribe("dinner").await.unwrap();
        assert_eq!(feed.borrow().earliest, 0);

        let mut availabilities = GroupAvailabilities::with_dates(["2022-08-03"]);
        availabilities.mark("2022-08-03", 5, "alice");
        store
            .write_patch("dinner", EventPatch::availabilities(availabilities))
            .await
            .unwrap();

        feed.changed().await.unwrap();
        assert!(feed.borrow().group_availabilities.is_marked("2022-08-03", 5, "alice"));
    }

    #[tokio::test]
    async fn test_missing_event() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.load("nope").await,
            Err(MeetgridError::EventNotFound(_))
        ));
        assert!(matches!(
            store.write_patch("nope", EventPatch::time_range(0, 1)).await,
            Err(MeetgridError::EventNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_patch_is_not_written() {
        let store = MemoryStore::new();
        store.create("dinner", &event()).await.unwrap();

        let result = store
            .write_patch("dinner", EventPatch::time_range(40, 10))
            .await;
        assert!(matches!(
            result,
            Err(MeetgridError::Validation(ValidationError::InvalidTimeRange {
                earliest: 40,
                latest: 10
            }))
        ));

        let stored = store.load("dinner").await.unwrap();
        assert_eq!(stored.visible_blocks(), 0..48);
        assert!(stored.validate().is_ok());
    }

    #[tokio::test]
    async fn test_delete_closes_feed() {
        let store = MemoryStore::new();
        store.create("dinner", &event()).await.unwrap();
        let mut feed = store.subscribe("dinner").await.unwrap();

        store.delete("dinner").await.unwrap();
        assert!(feed.changed().await.is_err());
        assert!(store.list().await.unwrap().is_empty());
    }
}

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};

use super::feeds::Feeds;
use super::{DocumentStore, EventPatch};
use crate::error::{MeetgridError, MeetgridResult};
use crate::event::Event;

const DOCUMENT_EXTENSION: &str = "json";

/// Event documents stored as `<event-id>.json` files in one directory.
///
/// Writes go through a temp file and a rename so a crash never leaves a
/// half-written document. Subscriptions only see writes made through this
/// store instance.
pub struct LocalStore {
    root: PathBuf,
    write_lock: Mutex<()>,
    feeds: Feeds,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LocalStore {
            root: root.into(),
            write_lock: Mutex::new(()),
            feeds: Feeds::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, event_id: &str) -> MeetgridResult<PathBuf> {
        let valid = !event_id.is_empty()
            && event_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(MeetgridError::EventNotFound(format!(
                "'{event_id}' is not a valid event id"
            )));
        }

        Ok(self.root.join(format!("{event_id}.{DOCUMENT_EXTENSION}")))
    }

    async fn read(&self, event_id: &str) -> MeetgridResult<Event> {
        let path = self.document_path(event_id)?;

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MeetgridError::EventNotFound(event_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|e| {
            MeetgridError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    async fn write(&self, event_id: &str, event: &Event) -> MeetgridResult<()> {
        let path = self.document_path(event_id)?;
        let temp = path.with_extension(format!("{DOCUMENT_EXTENSION}.tmp"));

        let content = serde_json::to_string_pretty(event)
            .map_err(|e| MeetgridError::Serialization(e.to_string()))?;

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&temp, content).await?;
        tokio::fs::rename(&temp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for LocalStore {
    async fn load(&self, event_id: &str) -> MeetgridResult<Event> {
        self.read(event_id).await
    }

    async fn subscribe(&self, event_id: &str) -> MeetgridResult<watch::Receiver<Event>> {
        let current = self.read(event_id).await?;
        Ok(self.feeds.subscribe(event_id, current).await)
    }

    async fn write_patch(&self, event_id: &str, patch: EventPatch) -> MeetgridResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut event = self.read(event_id).await?;
        patch.apply_to(&mut event);
        event.validate()?;
        self.write(event_id, &event).await?;

        tracing::debug!(event_id, "wrote event patch");
        self.feeds.publish(event_id, &event).await;
        Ok(())
    }

    async fn create(&self, event_id: &str, event: &Event) -> MeetgridResult<()> {
        event.validate()?;

        let _guard = self.write_lock.lock().await;
        self.write(event_id, event).await?;
        self.feeds.publish(event_id, event).await;
        Ok(())
    }

    async fn delete(&self, event_id: &str) -> MeetgridResult<()> {
        let path = self.document_path(event_id)?;

        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MeetgridError::EventNotFound(event_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        }
        self.feeds.close(event_id).await;
        Ok(())
    }

    async fn list(&self) -> MeetgridResult<Vec<String>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if !path.extension().is_some_and(|e| e == DOCUMENT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }

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
        Event::new(
            "Dinner",
            "alice",
            AuthScope::Local,
            ["2022-08-03", "2022-08-04"],
            36,
            44,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        store.create("dinner", &event()).await.unwrap();
        assert!(dir.path().join("dinner.json").exists());
        assert!(!dir.path().join("dinner.json.tmp").exists());

        let loaded = store.load("dinner").await.unwrap();
        assert_eq!(loaded, event());
        assert_eq!(store.list().await.unwrap(), vec!["dinner".to_string()]);
    }

    #[tokio::test]
    async fn test_write_patch_persists_and_publishes() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.create("dinner", &event()).await.unwrap();
        let mut feed = store.subscribe("dinner").await.unwrap();

        let mut availabilities = GroupAvailabilities::with_dates(["2022-08-03", "2022-08-04"]);
        availabilities.mark("2022-08-04", 40, "alice");
        store
            .write_patch("dinner", EventPatch::availabilities(availabilities))
            .await
            .unwrap();

        feed.changed().await.unwrap();
        assert!(feed.borrow().group_availabilities.is_marked("2022-08-04", 40, "alice"));

        let reloaded = LocalStore::new(dir.path()).load("dinner").await.unwrap();
        assert!(reloaded.group_availabilities.is_marked("2022-08-04", 40, "alice"));
    }

    #[tokio::test]
    async fn test_invalid_patch_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        store.create("dinner", &event()).await.unwrap();

        let result = store.write_patch("dinner", EventPatch::time_range(40, 10)).await;
        assert!(matches!(
            result,
            Err(MeetgridError::Validation(ValidationError::InvalidTimeRange { .. }))
        ));
        assert_eq!(store.load("dinner").await.unwrap().earliest, 36);
    }

    #[tokio::test]
    async fn test_missing_and_invalid_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("not-created-yet"));

        assert!(store.list().await.unwrap().is_empty());
        assert!(matches!(
            store.load("nope").await,
            Err(MeetgridError::EventNotFound(_))
        ));
        assert!(matches!(
            store.load("../etc/passwd").await,
            Err(MeetgridError::EventNotFound(_))
        ));
        assert!(matches!(
            store.delete("nope").await,
            Err(MeetgridError::EventNotFound(_))
        ));
    }
}

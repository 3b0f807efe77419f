use std::collections::HashMap;

use tokio::sync::{Mutex, watch};

use crate::event::Event;

/// Per-event watch channels shared by the store implementations.
#[derive(Default)]
pub(crate) struct Feeds {
    senders: Mutex<HashMap<String, watch::Sender<Event>>>,
}

impl Feeds {
    pub(crate) async fn subscribe(&self, event_id: &str, current: Event) -> watch::Receiver<Event> {
        let mut senders = self.senders.lock().await;
        match senders.get(event_id) {
            Some(sender) => sender.subscribe(),
            None => {
                let (sender, receiver) = watch::channel(current);
                senders.insert(event_id.to_string(), sender);
                receiver
            }
        }
    }

    pub(crate) async fn publish(&self, event_id: &str, event: &Event) {
        if let Some(sender) = self.senders.lock().await.get(event_id) {
            sender.send_replace(event.clone());
        }
    }

    /// Drop the sender so subscribers see the feed close.
    pub(crate) async fn close(&self, event_id: &str) {
        self.senders.lock().await.remove(event_id);
    }
}

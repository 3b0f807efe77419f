//! Owning session for one event on one client.
//!
//! The session holds the single in-memory copy of the event, feeds pointer
//! events into the [`AreaSelector`], applies reconciliation results to its
//! copy straight away and writes them through to the [`DocumentStore`] on a
//! background writer task. Writes reach the store in the order they were
//! issued. Write failures are reported, never rolled back.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};

use crate::availability::apply_selection;
use crate::error::{MeetgridError, MeetgridResult, PreconditionError};
use crate::event::{Event, LeaveOutcome, Member};
use crate::identity::IdentityProvider;
use crate::notify::{NotificationSink, Severity};
use crate::selection::{AreaSelector, Cell, CommitOutcome, SelectionMode, SelectionPhase, SelectionState};
use crate::store::{DocumentStore, EventPatch};

/// Handle to a write-through queued on the session's writer.
///
/// Dropping it does not cancel the write.
#[derive(Debug)]
pub struct PendingWrite {
    result: oneshot::Receiver<MeetgridResult<()>>,
}

impl PendingWrite {
    /// Wait for the store to accept or reject the write.
    pub async fn wait(self) -> MeetgridResult<()> {
        self.result
            .await
            .map_err(|_| MeetgridError::Sync("Write task stopped before finishing".into()))?
    }
}

enum WriteOp {
    Patch(EventPatch),
    Delete,
}

struct WriteRequest {
    op: WriteOp,
    done: oneshot::Sender<MeetgridResult<()>>,
}

/// Start the task that applies one session's writes, one at a time.
///
/// It exits once the session is dropped and the queue has drained.
fn spawn_writer(
    event_id: String,
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn NotificationSink>,
) -> mpsc::UnboundedSender<WriteRequest> {
    let (tx, mut rx) = mpsc::unbounded_channel::<WriteRequest>();

    tokio::spawn(async move {
        while let Some(request) = rx.recv().await {
            let result = match request.op {
                WriteOp::Patch(patch) => store.write_patch(&event_id, patch).await,
                WriteOp::Delete => store.delete(&event_id).await,
            }
            .map_err(|e| report_sync_failure(notifier.as_ref(), &event_id, e));

            // The caller may have dropped its PendingWrite.
            let _ = request.done.send(result);
        }
    });

    tx
}

pub struct Session {
    event_id: String,
    event: Event,
    selector: AreaSelector,
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn NotificationSink>,
    writer: Option<mpsc::UnboundedSender<WriteRequest>>,
}

impl Session {
    pub fn new(
        event_id: &str,
        event: Event,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Session {
            event_id: event_id.to_string(),
            event,
            selector: AreaSelector::new(),
            store,
            identity,
            notifier,
            writer: None,
        }
    }

    /// Load the current document and open a session on it.
    pub async fn open(
        event_id: &str,
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        notifier: Arc<dyn NotificationSink>,
    ) -> MeetgridResult<Self> {
        let event = store.load(event_id).await?;
        Ok(Self::new(event_id, event, store, identity, notifier))
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn current_user(&self) -> Option<String> {
        self.identity.current_user()
    }

    fn require_user(&self) -> MeetgridResult<String> {
        self.identity.current_user().ok_or_else(|| {
            let err = PreconditionError::NoIdentity;
            self.notifier.notify(Severity::Warning, &err.to_string());
            err.into()
        })
    }

    fn require_owner(&self) -> MeetgridResult<String> {
        let user = self.require_user()?;
        if self.event.is_owner(&user) {
            return Ok(user);
        }
        let err = PreconditionError::NotOwner(user);
        self.notifier.notify(Severity::Warning, &err.to_string());
        Err(err.into())
    }

    fn reject(&self, err: impl Into<MeetgridError>) -> MeetgridError {
        let err = err.into();
        self.notifier.notify(Severity::Warning, &err.to_string());
        err
    }

    // SELECTION:

    pub fn phase(&self) -> SelectionPhase {
        self.selector.phase()
    }

    pub fn selection_state(&self) -> SelectionState {
        self.selector.state()
    }

    pub fn selected_cells(&self) -> BTreeSet<Cell> {
        self.selector.selected_cells()
    }

    /// Pointer down on a grid cell.
    pub fn begin_selection(&mut self, cell: Cell) -> MeetgridResult<SelectionMode> {
        let user = self.require_user()?;

        if self.selector.is_active() {
            tracing::warn!(
                error = %PreconditionError::GestureAlreadyActive,
                "aborting stale gesture"
            );
            self.selector.abort();
        }

        let mode = self
            .selector
            .begin(cell, &self.event.group_availabilities, &user);
        tracing::debug!(%mode, user = %user, "selection started");
        Ok(mode)
    }

    /// Pointer moved over a grid cell.
    pub fn extend_selection(&mut self, cell: Cell) -> bool {
        self.selector.extend(cell)
    }

    /// Pointer released or left outside the grid.
    pub fn abort_selection(&mut self) -> bool {
        let cancelled = self.selector.abort();
        if cancelled {
            self.notifier.notify(Severity::Info, "Selection cancelled");
        }
        cancelled
    }

    /// Pointer released on the grid.
    ///
    /// Returns the background write when the document changed, `None` when
    /// there was nothing to apply.
    pub fn commit_selection(&mut self) -> MeetgridResult<Option<PendingWrite>> {
        if !self.selector.is_active() {
            return Ok(None);
        }

        let user = match self.require_user() {
            Ok(user) => user,
            Err(err) => {
                self.selector.abort();
                return Err(err);
            }
        };

        let selection = match self.selector.commit() {
            Ok(CommitOutcome::Committed(selection)) => selection,
            Ok(CommitOutcome::Unchanged(_) | CommitOutcome::NoGesture) => return Ok(None),
            Err(err) => return Err(self.reject(err)),
        };

        let updated = apply_selection(
            &self.event.group_availabilities,
            &selection.rect,
            selection.mode,
            &user,
        );
        if updated == self.event.group_availabilities {
            tracing::debug!(?selection, "selection did not change availability");
            return Ok(None);
        }

        tracing::debug!(?selection, user = %user, "applying selection");
        self.event.group_availabilities = updated.clone();
        Ok(Some(self.write(EventPatch::availabilities(updated))))
    }

    // EVENT SETTINGS:

    pub fn set_time_range(&mut self, earliest: usize, latest: usize) -> MeetgridResult<PendingWrite> {
        self.require_owner()?;
        self.event
            .set_time_range(earliest, latest)
            .map_err(|e| self.reject(e))?;
        Ok(self.write(EventPatch::time_range(earliest, latest)))
    }

    pub fn add_date(&mut self, date: &str) -> MeetgridResult<Option<PendingWrite>> {
        self.require_owner()?;
        let added = self.event.add_date(date).map_err(|e| self.reject(e))?;
        Ok(added.then(|| self.write_availabilities()))
    }

    pub fn remove_date(&mut self, date: &str) -> MeetgridResult<Option<PendingWrite>> {
        self.require_owner()?;
        let removed = self.event.remove_date(date);
        Ok(removed.then(|| self.write_availabilities()))
    }

    // MEMBERSHIP:

    pub fn join(&mut self, member: Member) -> MeetgridResult<PendingWrite> {
        let user = self.require_user()?;
        self.event.join(&user, member).map_err(|e| self.reject(e))?;
        let patch = EventPatch::membership(&self.event);
        Ok(self.write(patch))
    }

    /// Leave the event. The last member leaving deletes it.
    pub fn leave(&mut self) -> MeetgridResult<(LeaveOutcome, PendingWrite)> {
        let user = self.require_user()?;
        let outcome = self.event.leave(&user).map_err(|e| self.reject(e))?;

        let pending = match &outcome {
            LeaveOutcome::EventEmpty => self.delete(),
            _ => {
                let patch = EventPatch::membership(&self.event);
                self.write(patch)
            }
        };
        Ok((outcome, pending))
    }

    // REMOTE UPDATES:

    pub async fn subscribe(&self) -> MeetgridResult<watch::Receiver<Event>> {
        self.store.subscribe(&self.event_id).await
    }

    /// Replace the local copy with a version pushed by the store.
    pub fn apply_remote(&mut self, event: Event) {
        self.event = event;
        self.selector.forget_last_commit();
    }

    /// Wait for the next version on `feed` and apply it.
    /// Returns false once the feed has closed.
    pub async fn sync_from(&mut self, feed: &mut watch::Receiver<Event>) -> bool {
        if feed.changed().await.is_err() {
            return false;
        }
        let event = feed.borrow_and_update().clone();
        self.apply_remote(event);
        true
    }

    // WRITE-THROUGH:

    fn write_availabilities(&mut self) -> PendingWrite {
        let patch = EventPatch::availabilities(self.event.group_availabilities.clone());
        self.write(patch)
    }

    fn write(&mut self, patch: EventPatch) -> PendingWrite {
        self.enqueue(WriteOp::Patch(patch))
    }

    fn delete(&mut self) -> PendingWrite {
        self.enqueue(WriteOp::Delete)
    }

    fn enqueue(&mut self, op: WriteOp) -> PendingWrite {
        let (done, result) = oneshot::channel();
        let writer = self.writer.get_or_insert_with(|| {
            spawn_writer(
                self.event_id.clone(),
                Arc::clone(&self.store),
                Arc::clone(&self.notifier),
            )
        });

        if let Err(mpsc::error::SendError(request)) = writer.send(WriteRequest { op, done }) {
            let err = report_sync_failure(
                self.notifier.as_ref(),
                &self.event_id,
                MeetgridError::Sync("Writer task is gone".into()),
            );
            let _ = request.done.send(Err(err));
        }
        PendingWrite { result }
    }
}

fn report_sync_failure(
    notifier: &dyn NotificationSink,
    event_id: &str,
    err: MeetgridError,
) -> MeetgridError {
    tracing::warn!(event_id, error = %err, "write-through failed");
    notifier.notify(Severity::Error, &format!("Failed to save changes: {err}"));
    match err {
        MeetgridError::Sync(_) => err,
        other => MeetgridError::Sync(other.to_string()),
    }
}

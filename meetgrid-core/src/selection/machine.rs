use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::mode::SelectionMode;
use super::rect::{Cell, SelectionRect};
use crate::availability::GroupAvailabilities;
use crate::error::ValidationError;

/// Which kind of gesture is in flight, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Selecting,
    Deselecting,
}

/// A committed rectangle together with what it does.
///
/// Also the signature the selector compares consecutive commits against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub rect: SelectionRect,
    pub mode: SelectionMode,
}

/// Result of [`AreaSelector::commit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new selection to reconcile and write through.
    Committed(Selection),
    /// Same rectangle and mode as the previous commit; nothing to do.
    Unchanged(Selection),
    /// Commit while idle (e.g. a pointer release that never started a drag).
    NoGesture,
}

/// Flat snapshot of the gesture, in the shape the grid UI binds to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub is_selecting_area: bool,
    pub is_deselecting_area: bool,
    pub start_time: Option<usize>,
    pub start_date: Option<String>,
    pub end_time: Option<usize>,
    pub end_date: Option<String>,
}

impl SelectionState {
    pub fn start(&self) -> Option<Cell> {
        Some(Cell::new(self.start_date.clone()?, self.start_time?))
    }

    pub fn end(&self) -> Option<Cell> {
        Some(Cell::new(self.end_date.clone()?, self.end_time?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Gesture {
    mode: SelectionMode,
    anchor: Cell,
    current: Cell,
}

/// Drag-to-select state machine for one availability grid.
///
/// Idle → (begin) → Selecting | Deselecting → (extend)* → (commit | abort) → Idle.
/// The polarity is fixed by the anchor cell when the gesture begins.
#[derive(Debug, Clone, Default)]
pub struct AreaSelector {
    gesture: Option<Gesture>,
    last_committed: Option<Selection>,
}

impl AreaSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SelectionPhase {
        match &self.gesture {
            None => SelectionPhase::Idle,
            Some(g) if g.mode.is_selecting() => SelectionPhase::Selecting,
            Some(_) => SelectionPhase::Deselecting,
        }
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Start a gesture on `anchor`, choosing its polarity from the anchor's
    /// current membership for `username`.
    ///
    /// Beginning while another gesture is active drops the old one; callers
    /// should treat that as a wiring defect (see [`AreaSelector::is_active`]).
    pub fn begin(
        &mut self,
        anchor: Cell,
        availabilities: &GroupAvailabilities,
        username: &str,
    ) -> SelectionMode {
        let mode = SelectionMode::for_anchor(availabilities, &anchor, username);
        self.begin_with_mode(anchor, mode);
        mode
    }

    pub fn begin_with_mode(&mut self, anchor: Cell, mode: SelectionMode) {
        if let Some(stale) = self.gesture.take() {
            tracing::warn!(
                anchor = ?stale.anchor,
                "selection began while another gesture was active, dropping the old one"
            );
        }

        self.gesture = Some(Gesture {
            mode,
            current: anchor.clone(),
            anchor,
        });
    }

    /// Move the free corner. Returns false when no gesture is active.
    pub fn extend(&mut self, cell: Cell) -> bool {
        match self.gesture.as_mut() {
            Some(gesture) => {
                gesture.current = cell;
                true
            }
            None => false,
        }
    }

    /// End the gesture and produce the normalised selection.
    ///
    /// The selector is Idle afterwards whatever the outcome.
    pub fn commit(&mut self) -> Result<CommitOutcome, ValidationError> {
        let Some(gesture) = self.gesture.take() else {
            return Ok(CommitOutcome::NoGesture);
        };

        let rect = SelectionRect::from_corners(&gesture.anchor, &gesture.current)?;
        let selection = Selection {
            rect,
            mode: gesture.mode,
        };

        if self.last_committed == Some(selection) {
            tracing::debug!(?selection, "skipping repeated selection");
            return Ok(CommitOutcome::Unchanged(selection));
        }

        self.last_committed = Some(selection);
        Ok(CommitOutcome::Committed(selection))
    }

    /// Cancel without committing. Returns true if a gesture was in flight.
    pub fn abort(&mut self) -> bool {
        self.gesture.take().is_some()
    }

    /// Forget the previous commit so an identical one is applied again.
    pub fn forget_last_commit(&mut self) {
        self.last_committed = None;
    }

    pub fn last_committed(&self) -> Option<&Selection> {
        self.last_committed.as_ref()
    }

    /// Cells covered by the in-flight rectangle, for highlighting.
    /// Empty when idle or when the current corners are not valid.
    pub fn selected_cells(&self) -> BTreeSet<Cell> {
        self.gesture
            .as_ref()
            .and_then(|g| SelectionRect::from_corners(&g.anchor, &g.current).ok())
            .map(|rect| rect.cells().into_iter().collect())
            .unwrap_or_default()
    }

    pub fn state(&self) -> SelectionState {
        match &self.gesture {
            None => SelectionState::default(),
            Some(g) => SelectionState {
                is_selecting_area: g.mode.is_selecting(),
                is_deselecting_area: g.mode.is_deselecting(),
                start_time: Some(g.anchor.block),
                start_date: Some(g.anchor.date.clone()),
                end_time: Some(g.current.block),
                end_date: Some(g.current.date.clone()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> GroupAvailabilities {
        GroupAvailabilities::with_dates(["2022-08-03", "2022-08-04", "2022-08-06"])
    }

    #[test]
    fn test_begin_extend_commit() {
        let availabilities = grid();
        let mut selector = AreaSelector::new();
        assert_eq!(selector.phase(), SelectionPhase::Idle);

        let mode = selector.begin(Cell::new("2022-08-04", 10), &availabilities, "alice");
        assert_eq!(mode, SelectionMode::Select);
        assert_eq!(selector.phase(), SelectionPhase::Selecting);

        assert!(selector.extend(Cell::new("2022-08-03", 12)));
        let state = selector.state();
        assert!(state.is_selecting_area);
        assert_eq!(state.start_date.as_deref(), Some("2022-08-04"));
        assert_eq!(state.end_time, Some(12));

        let outcome = selector.commit().unwrap();
        let CommitOutcome::Committed(selection) = outcome else {
            panic!("Expected a committed selection, got {:?}", outcome);
        };
        assert_eq!(selection.mode, SelectionMode::Select);
        assert_eq!(selection.rect.blocks(), 10..=12);
        assert_eq!(selector.phase(), SelectionPhase::Idle);
        assert_eq!(selector.state(), SelectionState::default());
    }

    #[test]
    fn test_anchor_on_marked_cell_deselects() {
        let mut availabilities = grid();
        availabilities.mark("2022-08-03", 5, "alice");

        let mut selector = AreaSelector::new();
        selector.begin(Cell::new("2022-08-03", 5), &availabilities, "alice");
        assert_eq!(selector.phase(), SelectionPhase::Deselecting);

        // revisiting unmarked cells does not flip polarity mid-drag
        selector.extend(Cell::new("2022-08-04", 9));
        assert_eq!(selector.phase(), SelectionPhase::Deselecting);
        assert!(selector.state().is_deselecting_area);
    }

    #[test]
    fn test_identical_consecutive_commit_is_unchanged() {
        let availabilities = grid();
        let mut selector = AreaSelector::new();

        selector.begin(Cell::new("2022-08-03", 5), &availabilities, "alice");
        assert!(matches!(selector.commit(), Ok(CommitOutcome::Committed(_))));

        selector.begin(Cell::new("2022-08-03", 5), &availabilities, "alice");
        assert!(matches!(selector.commit(), Ok(CommitOutcome::Unchanged(_))));

        selector.forget_last_commit();
        selector.begin(Cell::new("2022-08-03", 5), &availabilities, "alice");
        assert!(matches!(selector.commit(), Ok(CommitOutcome::Committed(_))));
    }

    #[test]
    fn test_same_rect_with_other_mode_is_committed() {
        let mut selector = AreaSelector::new();
        selector.begin_with_mode(Cell::new("2022-08-03", 5), SelectionMode::Select);
        selector.commit().unwrap();

        selector.begin_with_mode(Cell::new("2022-08-03", 5), SelectionMode::Deselect);
        assert!(matches!(selector.commit(), Ok(CommitOutcome::Committed(_))));
    }

    #[test]
    fn test_invalid_commit_returns_to_idle() {
        let mut selector = AreaSelector::new();
        selector.begin_with_mode(Cell::new("2022-08-03", 5), SelectionMode::Select);
        selector.extend(Cell::new("2022-08-03", 48));

        assert_eq!(selector.commit(), Err(ValidationError::TimeBlockOutOfRange(48)));
        assert_eq!(selector.phase(), SelectionPhase::Idle);
        assert!(selector.last_committed().is_none());
    }

    #[test]
    fn test_commit_while_idle() {
        let mut selector = AreaSelector::new();
        assert_eq!(selector.commit(), Ok(CommitOutcome::NoGesture));
    }

    #[test]
    fn test_abort_is_safe_in_any_state() {
        let mut selector = AreaSelector::new();
        assert!(!selector.abort());

        selector.begin_with_mode(Cell::new("2022-08-03", 5), SelectionMode::Select);
        assert!(selector.abort());
        assert_eq!(selector.phase(), SelectionPhase::Idle);
        assert_eq!(selector.commit(), Ok(CommitOutcome::NoGesture));
    }

    #[test]
    fn test_begin_while_active_replaces_gesture() {
        let mut selector = AreaSelector::new();
        selector.begin_with_mode(Cell::new("2022-08-03", 5), SelectionMode::Select);
        selector.begin_with_mode(Cell::new("2022-08-06", 7), SelectionMode::Deselect);

        assert_eq!(selector.phase(), SelectionPhase::Deselecting);
        assert_eq!(selector.state().start_date.as_deref(), Some("2022-08-06"));
    }

    #[test]
    fn test_extend_while_idle_is_ignored() {
        let mut selector = AreaSelector::new();
        assert!(!selector.extend(Cell::new("2022-08-03", 5)));
        assert_eq!(selector.phase(), SelectionPhase::Idle);
    }

    #[test]
    fn test_selected_cells_preview() {
        let mut selector = AreaSelector::new();
        assert!(selector.selected_cells().is_empty());

        selector.begin_with_mode(Cell::new("2022-08-04", 2), SelectionMode::Select);
        selector.extend(Cell::new("2022-08-03", 3));

        let cells = selector.selected_cells();
        assert_eq!(cells.len(), 4);
        assert!(cells.contains(&Cell::new("2022-08-03", 2)));
        assert!(cells.contains(&Cell::new("2022-08-04", 3)));

        selector.extend(Cell::new("bogus", 3));
        assert!(selector.selected_cells().is_empty());
    }
}

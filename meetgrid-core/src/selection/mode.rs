use std::fmt;

use serde::{Deserialize, Serialize};

use super::rect::Cell;
use crate::availability::GroupAvailabilities;
use crate::error::ValidationError;

/// What a committed rectangle does to the acting user's markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Mark the user available in every cell.
    Select,
    /// Clear the user's marker from every cell.
    Deselect,
}

impl SelectionMode {
    /// Build a mode from the pair of UI flags. Exactly one must be set.
    pub fn from_flags(is_selecting: bool, is_deselecting: bool) -> Result<Self, ValidationError> {
        match (is_selecting, is_deselecting) {
            (true, false) => Ok(SelectionMode::Select),
            (false, true) => Ok(SelectionMode::Deselect),
            (true, true) => Err(ValidationError::ContradictoryMode),
            (false, false) => Err(ValidationError::MissingMode),
        }
    }

    /// Polarity of a gesture, decided once from its anchor cell.
    ///
    /// Starting on a cell the user has not marked paints availability;
    /// starting on a marked cell erases it. A cell outside the candidate
    /// dates counts as unmarked.
    pub fn for_anchor(availabilities: &GroupAvailabilities, anchor: &Cell, username: &str) -> Self {
        if availabilities.is_marked(&anchor.date, anchor.block, username) {
            SelectionMode::Deselect
        } else {
            SelectionMode::Select
        }
    }

    pub fn is_selecting(self) -> bool {
        self == SelectionMode::Select
    }

    pub fn is_deselecting(self) -> bool {
        self == SelectionMode::Deselect
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionMode::Select => write!(f, "select"),
            SelectionMode::Deselect => write!(f, "deselect"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flags() {
        assert_eq!(SelectionMode::from_flags(true, false), Ok(SelectionMode::Select));
        assert_eq!(SelectionMode::from_flags(false, true), Ok(SelectionMode::Deselect));
        assert_eq!(
            SelectionMode::from_flags(true, true),
            Err(ValidationError::ContradictoryMode)
        );
        assert_eq!(SelectionMode::from_flags(false, false), Err(ValidationError::MissingMode));
    }

    #[test]
    fn test_for_anchor_follows_anchor_membership() {
        let mut availabilities = GroupAvailabilities::with_dates(["2022-08-03"]);
        let anchor = Cell::new("2022-08-03", 5);

        assert_eq!(
            SelectionMode::for_anchor(&availabilities, &anchor, "alice"),
            SelectionMode::Select
        );

        availabilities.mark("2022-08-03", 5, "alice");
        assert_eq!(
            SelectionMode::for_anchor(&availabilities, &anchor, "alice"),
            SelectionMode::Deselect
        );
        // Someone else's marker does not flip the polarity
        assert_eq!(
            SelectionMode::for_anchor(&availabilities, &anchor, "bob"),
            SelectionMode::Select
        );
    }

    #[test]
    fn test_for_anchor_outside_candidate_dates() {
        let availabilities = GroupAvailabilities::with_dates(["2022-08-03"]);
        let anchor = Cell::new("2022-08-05", 5);
        assert_eq!(
            SelectionMode::for_anchor(&availabilities, &anchor, "alice"),
            SelectionMode::Select
        );
    }
}

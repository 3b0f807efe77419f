//! Rectangle selection over the (date × time block) grid.
//!
//! A drag gesture is anchored on one cell and extended to another; on
//! commit the two corners are normalised into a [`SelectionRect`] and handed,
//! together with the gesture's [`SelectionMode`], to reconciliation.

mod machine;
mod mode;
mod rect;

pub use machine::{AreaSelector, CommitOutcome, Selection, SelectionPhase, SelectionState};
pub use mode::SelectionMode;
pub use rect::{Cell, SelectionRect, bounds_are_valid};

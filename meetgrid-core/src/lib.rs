//! Availability grid engine for meetgrid.
//!
//! An event has a set of candidate dates and a daily window of half-hour
//! time blocks. Members drag rectangles across the resulting
//! (date × block) grid to paint or erase their availability:
//! - `calendar` lays out month grids and groups dates into runs
//! - `selection` tracks the drag gesture and normalises it into a rectangle
//! - `availability` holds the sparse map and applies committed rectangles
//! - `session` ties those to a document store, identity and notifications

pub mod availability;
pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod identity;
pub mod notify;
pub mod selection;
pub mod session;
pub mod store;
pub mod time_block;

pub use availability::{AvailabilityInfo, CellMembers, GroupAvailabilities, Marker};
pub use error::{MeetgridError, MeetgridResult, PreconditionError, ValidationError};
pub use event::{AuthScope, Event, LeaveOutcome, Member, SlotCount};
pub use selection::{AreaSelector, Cell, SelectionMode, SelectionRect};
pub use session::{PendingWrite, Session};

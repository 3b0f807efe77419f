//! Error types for the meetgrid ecosystem.

use thiserror::Error;

use crate::time_block::TIME_BLOCKS;

/// Rejected input. Always recoverable: the gesture resets and nothing is applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Time block {0} is out of range (expected 0..{max})", max = TIME_BLOCKS)]
    TimeBlockOutOfRange(usize),

    #[error("Invalid date '{0}'. Expected a real calendar date as YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Selection must either select or deselect, not both")]
    ContradictoryMode,

    #[error("Selection has neither selecting nor deselecting set")]
    MissingMode,

    #[error("Selection is missing its start or end cell")]
    IncompleteSelection,

    #[error("Invalid time range {earliest}..{latest} (expected 0 <= earliest <= latest <= {max})", max = TIME_BLOCKS)]
    InvalidTimeRange { earliest: usize, latest: usize },

    #[error("Member '{0}' is not part of this event")]
    UnknownMember(String),

    #[error("Member '{0}' already exists in this event")]
    DuplicateMember(String),

    #[error("Invalid event: {0}")]
    InvalidEvent(String),
}

/// Violated wiring contract. Logged and recovered from, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionError {
    #[error("A selection gesture was already in progress")]
    GestureAlreadyActive,

    #[error("No signed-in user to record availability for")]
    NoIdentity,

    #[error("Only the event owner can do that ('{0}' is not the owner)")]
    NotOwner(String),
}

/// Errors that can occur in meetgrid operations.
#[derive(Error, Debug)]
pub enum MeetgridError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("Sync error: {0}")]
    Sync(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for meetgrid operations.
pub type MeetgridResult<T> = Result<T, MeetgridError>;

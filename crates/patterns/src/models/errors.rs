//! Error types for pattern editing.
//!
//! Every error here rejects the shape of the input. None are transient, so
//! retrying with the same input yields the same error.

use crate::identifiers::*;

/// A candidate stop sequence is not a single-stop edit of the original
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    #[error(
        "Changes to pattern stops must be made one at a time \
         (original has {original_len} stops, candidate has {candidate_len})"
    )]
    UnsupportedEditShape {
        original_len: usize,
        candidate_len: usize,
    },

    #[error("Multiple differences found after position {at}")]
    MultipleDifferences { at: usize },

    #[error("Difference between positions {first} and {last} moves more than one stop")]
    AmbiguousTransposition { first: usize, last: usize },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RebindError {
    #[error("Stop time {stop_time_id} of trip {trip_id} has no pattern stop for {stop_id}")]
    TripPatternMismatch {
        trip_id: TripIdentifier,
        stop_time_id: StopTimeIdentifier,
        stop_id: StopIdentifier,
    },

    #[error("Stop times of trip {trip_id} are not in chronological order")]
    UnorderedStopTimes { trip_id: TripIdentifier },

    #[error("Edit position {at} is outside a pattern of {len} stops")]
    ClassificationOutOfRange { at: usize, len: usize },

    #[error("Transposition names stop {expected} but position {at} holds {found}")]
    TransposedStopMismatch {
        at: usize,
        expected: StopIdentifier,
        found: StopIdentifier,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DerivationError {
    #[error("Trip {trip_id} has no stop times")]
    EmptyTrip { trip_id: TripIdentifier },
}

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error(transparent)]
    Classification(#[from] ClassificationError),

    #[error(transparent)]
    Rebind(#[from] RebindError),

    #[error(transparent)]
    Derivation(#[from] DerivationError),

    #[error("Pattern not found: {0}")]
    PatternNotFound(PatternIdentifier),

    #[error("Trip not found: {0}")]
    TripNotFound(TripIdentifier),

    #[error("Route not found: {0}")]
    RouteNotFound(RouteIdentifier),

    #[error("Stop time not found: {0}")]
    StopTimeNotFound(StopTimeIdentifier),

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
}

pub type Result<T> = std::result::Result<T, PatternError>;

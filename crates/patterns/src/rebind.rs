//! Propagation of a classified pattern edit to the stop-times of bound trips.
//!
//! Trips do not have to serve every stop of their pattern, so stop-times are
//! matched to pattern stops by walking both in order: each stop-time takes the
//! first not-yet-consumed candidate stop with the same identifier. The cursor
//! only moves forward, which keeps the walk linear and resolves repeated stops
//! deterministically.

use tracing::{debug, warn};

use crate::classify::EditClassification;
use crate::config::ChronologyCheck;
use crate::identifiers::*;
use crate::models::errors::RebindError;
use crate::models::types::{PatternStop, StopTime, TripStopTimes};
use crate::sequence;

/// A change to one persisted stop-time
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopTimeMutation {
    SetSequence {
        stop_time_id: StopTimeIdentifier,
        sequence: u32,
    },
    Delete {
        stop_time_id: StopTimeIdentifier,
    },
}

impl StopTimeMutation {
    pub fn stop_time_id(&self) -> &StopTimeIdentifier {
        match self {
            Self::SetSequence { stop_time_id, .. } | Self::Delete { stop_time_id } => stop_time_id,
        }
    }
}

/// A pattern stop of the candidate, reduced to what alignment needs
struct Slot<'a> {
    stop_id: &'a StopIdentifier,
    sequence: u32,
}

/// What one edit does to the stop-times it singles out
#[derive(Default)]
struct Edit<'a> {
    /// Original (stop, sequence) of a deleted pattern stop
    removed: Option<(&'a StopIdentifier, Option<u32>)>,
    /// Original (stop, sequence) of a moved pattern stop, and its new slot
    moved: Option<(&'a StopIdentifier, Option<u32>, usize)>,
}

impl Edit<'_> {
    fn destination(&self) -> Option<usize> {
        self.moved.map(|(_, _, to)| to)
    }
}

fn is_original(stop_time: &StopTime, stop_id: &StopIdentifier, sequence: Option<u32>) -> bool {
    &stop_time.stop_id == stop_id && stop_time.sequence == sequence
}

/// Rebind every trip's stop-times to the candidate pattern stops, warning about
/// trips whose stop-times are not in chronological order.
pub fn rebind(
    classification: &EditClassification,
    original_stops: &[PatternStop],
    candidate_stops: &[PatternStop],
    trips: &[TripStopTimes],
) -> Result<Vec<StopTimeMutation>, RebindError> {
    rebind_with(
        classification,
        original_stops,
        candidate_stops,
        trips,
        ChronologyCheck::default(),
    )
}

pub fn rebind_with(
    classification: &EditClassification,
    original_stops: &[PatternStop],
    candidate_stops: &[PatternStop],
    trips: &[TripStopTimes],
    chronology: ChronologyCheck,
) -> Result<Vec<StopTimeMutation>, RebindError> {
    let original = sequence::ordered(original_stops.iter());
    let candidate = sequence::ordered(candidate_stops.iter());

    let original_at = |at: usize| {
        original
            .get(at)
            .map(|stop| (&stop.stop_id, stop.sequence))
            .ok_or(RebindError::ClassificationOutOfRange {
                at,
                len: original.len(),
            })
    };

    let edit = match classification {
        EditClassification::NoChange => return Ok(Vec::new()),
        EditClassification::Addition { .. } => Edit::default(),
        EditClassification::Deletion { at } => Edit {
            removed: Some(original_at(*at)?),
            ..Edit::default()
        },
        EditClassification::Transposition { from, to, stop } => {
            if *to >= candidate.len() {
                return Err(RebindError::ClassificationOutOfRange {
                    at: *to,
                    len: candidate.len(),
                });
            }
            let (stop_id, sequence) = original_at(*from)?;
            if stop_id != stop {
                return Err(RebindError::TransposedStopMismatch {
                    at: *from,
                    expected: stop.clone(),
                    found: stop_id.clone(),
                });
            }
            Edit {
                moved: Some((stop_id, sequence, *to)),
                ..Edit::default()
            }
        }
    };

    rebind_all(&candidate, trips, &edit, chronology)
}

/// Align every trip's stop-times to `candidate_stops` without deleting or
/// moving anything, e.g. after the pattern's sequences were re-packed.
pub fn realign(
    candidate_stops: &[PatternStop],
    trips: &[TripStopTimes],
    chronology: ChronologyCheck,
) -> Result<Vec<StopTimeMutation>, RebindError> {
    let candidate = sequence::ordered(candidate_stops.iter());
    rebind_all(&candidate, trips, &Edit::default(), chronology)
}

fn rebind_all(
    candidate: &[&PatternStop],
    trips: &[TripStopTimes],
    edit: &Edit,
    chronology: ChronologyCheck,
) -> Result<Vec<StopTimeMutation>, RebindError> {
    let slots: Vec<Slot> = candidate
        .iter()
        .zip(0u32..)
        .map(|(stop, position)| Slot {
            stop_id: &stop.stop_id,
            sequence: stop.sequence.unwrap_or(position),
        })
        .collect();

    let mut mutations = Vec::new();
    for trip in trips {
        let before = mutations.len();
        rebind_trip(trip, &slots, edit, chronology, &mut mutations)?;
        debug!(
            "trip {}: {} stop time mutations",
            trip.trip_id,
            mutations.len() - before
        );
    }
    Ok(mutations)
}

fn rebind_trip(
    trip: &TripStopTimes,
    slots: &[Slot],
    edit: &Edit,
    chronology: ChronologyCheck,
    mutations: &mut Vec<StopTimeMutation>,
) -> Result<(), RebindError> {
    let stop_times = sequence::ordered(trip.stop_times.iter());

    if chronology != ChronologyCheck::Ignore
        && !sequence::is_chronological(stop_times.iter().copied())
    {
        if chronology == ChronologyCheck::Reject {
            return Err(RebindError::UnorderedStopTimes {
                trip_id: trip.trip_id.clone(),
            });
        }
        warn!(
            "stop times of trip {} disagree with their sequence order",
            trip.trip_id
        );
    }

    let mut cursor = 0;
    for stop_time in stop_times {
        if let Some((stop_id, sequence)) = edit.removed {
            if is_original(stop_time, stop_id, sequence) {
                mutations.push(StopTimeMutation::Delete {
                    stop_time_id: stop_time.id.clone(),
                });
                continue;
            }
        }

        if let Some((stop_id, sequence, to)) = edit.moved {
            if is_original(stop_time, stop_id, sequence) {
                push_sequence(mutations, stop_time, slots[to].sequence);
                continue;
            }
        }

        let index = align(slots, cursor, &stop_time.stop_id, edit.destination()).ok_or_else(|| {
            RebindError::TripPatternMismatch {
                trip_id: trip.trip_id.clone(),
                stop_time_id: stop_time.id.clone(),
                stop_id: stop_time.stop_id.clone(),
            }
        })?;
        cursor = index + 1;
        push_sequence(mutations, stop_time, slots[index].sequence);
    }
    Ok(())
}

/// Index of the first slot at or after `cursor` serving `stop_id`, never
/// landing on `skip`
fn align(
    slots: &[Slot],
    cursor: usize,
    stop_id: &StopIdentifier,
    skip: Option<usize>,
) -> Option<usize> {
    slots
        .get(cursor..)?
        .iter()
        .zip(cursor..)
        .find(|(slot, index)| Some(*index) != skip && slot.stop_id == stop_id)
        .map(|(_, index)| index)
}

fn push_sequence(mutations: &mut Vec<StopTimeMutation>, stop_time: &StopTime, sequence: u32) {
    if stop_time.sequence != Some(sequence) {
        mutations.push(StopTimeMutation::SetSequence {
            stop_time_id: stop_time.id.clone(),
            sequence,
        });
    }
}

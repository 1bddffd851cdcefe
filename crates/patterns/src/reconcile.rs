//! One reconciliation call: classify an edited stop list against the persisted
//! one and work out what it means for every bound trip.
//!
//! This is a pure function of its inputs. Applying the plan, inside a single
//! transaction, is left to the caller (see [`crate::editor::PatternEditor`]).

use crate::classify::{classify_pattern_stops, EditClassification};
use crate::config::EditorConfig;
use crate::models::errors::Result;
use crate::models::types::{PatternStop, TripStopTimes};
use crate::rebind::{realign, rebind_with, StopTimeMutation};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReconciliationPlan {
    pub classification: EditClassification,
    /// Candidate pattern stops in order, sequences packed to 0..n-1
    pub pattern_stops: Vec<PatternStop>,
    pub stop_time_mutations: Vec<StopTimeMutation>,
}

impl ReconciliationPlan {
    pub fn is_no_change(&self) -> bool {
        self.classification == EditClassification::NoChange
    }
}

pub fn reconcile(
    original_stops: &[PatternStop],
    mut candidate_stops: Vec<PatternStop>,
    trips: &[TripStopTimes],
    config: &EditorConfig,
) -> Result<ReconciliationPlan> {
    let classification = classify_pattern_stops(original_stops, &mut candidate_stops)?;
    let stop_time_mutations = match classification {
        // same stops, but the candidate's sequences were still re-packed
        EditClassification::NoChange => realign(&candidate_stops, trips, config.chronology)?,
        _ => rebind_with(
            &classification,
            original_stops,
            &candidate_stops,
            trips,
            config.chronology,
        )?,
    };

    Ok(ReconciliationPlan {
        classification,
        pattern_stops: candidate_stops,
        stop_time_mutations,
    })
}

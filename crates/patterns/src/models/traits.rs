//! Storage seam for the pattern editor.
//!
//! The editing core never performs I/O. [`PatternStore`] is what the calling
//! layer implements on top of its database; the editor reads one consistent
//! snapshot through it and writes the resulting plan back through it. Callers
//! run each editor operation inside a single transaction.

use crate::derivation::DerivedPattern;
use crate::identifiers::*;
use crate::models::errors::Result;
use crate::models::types::*;
use crate::rebind::StopTimeMutation;

pub trait PatternStore {
    // ---- Lookups ----
    fn pattern(&self, id: &PatternIdentifier) -> Option<Pattern>;

    /// Pattern stops in storage order (not necessarily sequence order)
    fn pattern_stops(&self, id: &PatternIdentifier) -> Option<Vec<PatternStop>>;

    /// Every trip currently bound to the pattern, with its stop-times
    fn trips_for_pattern(&self, id: &PatternIdentifier) -> Vec<TripStopTimes>;

    fn sample_trip(&self, id: &TripIdentifier) -> Option<SampleTrip>;

    // ---- Commands ----

    /// Replace all of a pattern's stops
    fn replace_pattern_stops(&mut self, id: &PatternIdentifier, stops: Vec<PatternStop>)
        -> Result<()>;

    fn apply_stop_time_mutations(&mut self, mutations: &[StopTimeMutation]) -> Result<()>;

    /// Persist a derived pattern and its stops, generating their identifiers
    fn insert_pattern(&mut self, derived: &DerivedPattern) -> Result<PatternIdentifier>;

    fn set_route_long_name(&mut self, id: &RouteIdentifier, long_name: &str) -> Result<()>;

    /// Delete a pattern, its pattern stops, every stop-time of its bound trips
    /// and the trips themselves.
    fn delete_pattern_cascade(&mut self, id: &PatternIdentifier) -> Result<()>;
}

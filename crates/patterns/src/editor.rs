//! The pattern editing service.
//!
//! [`PatternEditor`] reads a snapshot of one pattern and its trips through a
//! [`PatternStore`], runs the pure reconciliation/derivation logic on it and
//! writes the outcome back. It does not lock or open transactions: callers
//! wrap each operation in one transaction and serialize edits to the same
//! pattern.

use tracing::{debug, info};

use crate::config::EditorConfig;
use crate::derivation::derive_pattern_with;
use crate::identifiers::*;
use crate::models::errors::{PatternError, Result};
use crate::models::traits::PatternStore;
use crate::models::types::PatternStop;
use crate::rebind::realign;
use crate::reconcile::{reconcile, ReconciliationPlan};
use crate::sequence;

pub struct PatternEditor<S> {
    store: S,
    config: EditorConfig,
}

impl<S: PatternStore> PatternEditor<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EditorConfig::default())
    }

    pub fn with_config(store: S, config: EditorConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Replace a pattern's stops with an edited list differing by at most one
    /// stop, and carry the change over to every bound trip's stop-times.
    ///
    /// Nothing is written when the edit is rejected.
    pub fn reconcile_pattern_stops(
        &mut self,
        pattern_id: &PatternIdentifier,
        candidate: Vec<PatternStop>,
    ) -> Result<ReconciliationPlan> {
        let original = self
            .store
            .pattern_stops(pattern_id)
            .ok_or_else(|| PatternError::PatternNotFound(pattern_id.clone()))?;
        let trips = self.store.trips_for_pattern(pattern_id);

        let plan = reconcile(&original, candidate, &trips, &self.config)?;
        debug!(
            "pattern {}: {:?} across {} trips",
            pattern_id,
            plan.classification,
            trips.len()
        );

        // defaults on the stops may have changed even when their order did not
        self.store
            .replace_pattern_stops(pattern_id, plan.pattern_stops.clone())?;
        if !plan.stop_time_mutations.is_empty() {
            self.store
                .apply_stop_time_mutations(&plan.stop_time_mutations)?;
            info!(
                "reconciled pattern {}: {} stop time mutations",
                pattern_id,
                plan.stop_time_mutations.len()
            );
        }
        Ok(plan)
    }

    /// Create a new pattern from one trip's stop-times and rename the trip's
    /// route after its first and last stops.
    pub fn create_from_trip(&mut self, trip_id: &TripIdentifier) -> Result<PatternIdentifier> {
        let trip = self
            .store
            .sample_trip(trip_id)
            .ok_or_else(|| PatternError::TripNotFound(trip_id.clone()))?;
        let derived = derive_pattern_with(&trip, &self.config.route_name_separator)?;

        let pattern_id = self.store.insert_pattern(&derived)?;
        self.store
            .set_route_long_name(&derived.route_id, &derived.route_long_name)?;

        info!("adding trip pattern: {} as {}", derived.name, pattern_id);
        Ok(pattern_id)
    }

    /// Re-pack a pattern's stop sequences to 0..n-1 and move the stop-times of
    /// its trips along with them.
    pub fn resequence_pattern_stops(&mut self, pattern_id: &PatternIdentifier) -> Result<()> {
        let mut stops = self
            .store
            .pattern_stops(pattern_id)
            .ok_or_else(|| PatternError::PatternNotFound(pattern_id.clone()))?;
        sequence::sort_by_sequence(&mut stops);
        sequence::renumber(&mut stops);

        let trips = self.store.trips_for_pattern(pattern_id);
        let mutations = realign(&stops, &trips, self.config.chronology)?;

        self.store.replace_pattern_stops(pattern_id, stops)?;
        self.store.apply_stop_time_mutations(&mutations)?;
        info!("resequenced pattern {}", pattern_id);
        Ok(())
    }

    /// Delete a pattern along with its stops, bound trips and their stop-times
    pub fn delete_pattern(&mut self, pattern_id: &PatternIdentifier) -> Result<()> {
        self.store.delete_pattern_cascade(pattern_id)?;
        info!("deleted pattern {}", pattern_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ClassificationError;
    use crate::models::schedule::{ScheduleWindow, ServiceDays};
    use crate::models::types::{Pattern, Stop, StopTime};
    use crate::provider::memory::{InMemoryPatternStore, RouteRecord, TripRecord};
    use approx::assert_relative_eq;

    fn route_stops() -> [(&'static str, &'static str); 4] {
        [
            ("a", "Harbor"),
            ("b", "Library"),
            ("c", "Market"),
            ("d", "University"),
        ]
    }

    /// Route 7 with pattern p1 over a, b, c, d (sequences 0, 10, 20, 30) and
    /// two trips, one of which skips b.
    fn editor() -> PatternEditor<InMemoryPatternStore> {
        let mut store = InMemoryPatternStore::new();
        for (id, name) in route_stops() {
            store.insert_stop(Stop {
                id: StopIdentifier::new(id),
                name: name.into(),
            });
        }
        store.insert_route(RouteRecord {
            id: RouteIdentifier::new("r7"),
            short_name: "7".into(),
            long_name: "".into(),
        });
        store.insert_pattern_with_stops(
            Pattern {
                id: PatternIdentifier::new("p1"),
                name: "7(University)".into(),
                headsign: "University".into(),
                route_id: RouteIdentifier::new("r7"),
                shape_id: None,
                service_days: ServiceDays::from_bools(true, true, false),
                window: ScheduleWindow::FixedTimes,
            },
            route_stops()
                .iter()
                .zip(0u32..)
                .map(|((stop, _), i)| PatternStop::new(format!("ps_{stop}"), *stop, Some(i * 10)))
                .collect(),
        );

        let trips: [(&str, &[(&str, u32)]); 2] = [
            ("all", &[("a", 0), ("b", 10), ("c", 20), ("d", 30)]),
            ("express", &[("a", 0), ("c", 20), ("d", 30)]),
        ];
        for (trip, stops) in trips {
            let stop_times = stops
                .iter()
                .zip(0u32..)
                .map(|((stop, sequence), i)| {
                    StopTime::new(format!("{trip}_{stop}"), *stop, Some(*sequence))
                        .with_times(i * 300, i * 300 + 30)
                        .with_distance(f64::from(i) * 1250.0)
                })
                .collect();
            store.insert_trip(
                TripRecord {
                    id: TripIdentifier::new(trip),
                    route_id: RouteIdentifier::new("r7"),
                    pattern_id: Some(PatternIdentifier::new("p1")),
                    headsign: "University".into(),
                    shape_id: None,
                },
                stop_times,
            );
        }
        PatternEditor::new(store)
    }

    fn sequences(
        editor: &PatternEditor<InMemoryPatternStore>,
        trip: &str,
    ) -> Vec<(String, Option<u32>)> {
        let mut stop_times: Vec<_> = editor
            .store()
            .stop_times(&TripIdentifier::new(trip))
            .unwrap()
            .iter()
            .map(|st| (st.stop_id.to_string(), st.sequence))
            .collect();
        stop_times.sort_by_key(|(_, sequence)| *sequence);
        stop_times
    }

    fn candidate(stops: &[&str]) -> Vec<PatternStop> {
        stops
            .iter()
            .zip(0u32..)
            .map(|(stop, i)| PatternStop::new(format!("ps_{stop}"), *stop, Some(i)))
            .collect()
    }

    fn owned(pairs: &[(&str, u32)]) -> Vec<(String, Option<u32>)> {
        pairs.iter().map(|(s, q)| (s.to_string(), Some(*q))).collect()
    }

    #[test]
    fn test_reconcile_deletion() {
        let mut editor = editor();
        let p1 = PatternIdentifier::new("p1");

        editor
            .reconcile_pattern_stops(&p1, candidate(&["a", "c", "d"]))
            .unwrap();

        assert_eq!(sequences(&editor, "all"), owned(&[("a", 0), ("c", 1), ("d", 2)]));
        assert_eq!(sequences(&editor, "express"), owned(&[("a", 0), ("c", 1), ("d", 2)]));
        assert_eq!(editor.store().pattern_stops(&p1).unwrap().len(), 3);
    }

    #[test]
    fn test_reconcile_transposition() {
        let mut editor = editor();
        let p1 = PatternIdentifier::new("p1");

        editor
            .reconcile_pattern_stops(&p1, candidate(&["a", "c", "b", "d"]))
            .unwrap();

        assert_eq!(
            sequences(&editor, "all"),
            owned(&[("a", 0), ("c", 1), ("b", 2), ("d", 3)])
        );
        assert_eq!(sequences(&editor, "express"), owned(&[("a", 0), ("c", 1), ("d", 3)]));
    }

    #[test]
    fn test_rejected_edit_writes_nothing() {
        let mut editor = editor();
        let p1 = PatternIdentifier::new("p1");

        let result = editor.reconcile_pattern_stops(&p1, candidate(&["a", "x", "y", "d"]));
        assert!(matches!(
            result,
            Err(PatternError::Classification(
                ClassificationError::MultipleDifferences { .. }
            ))
        ));

        let stops = editor.store().pattern_stops(&p1).unwrap();
        assert_eq!(stops[1].sequence, Some(10));
        assert_eq!(sequences(&editor, "all")[3], ("d".to_string(), Some(30)));
    }

    #[test]
    fn test_unknown_pattern() {
        let mut editor = editor();
        let result = editor.reconcile_pattern_stops(&PatternIdentifier::new("nope"), Vec::new());
        assert!(matches!(result, Err(PatternError::PatternNotFound(_))));
    }

    #[test]
    fn test_resequence() {
        let mut editor = editor();
        let p1 = PatternIdentifier::new("p1");

        editor.resequence_pattern_stops(&p1).unwrap();

        let stops = editor.store().pattern_stops(&p1).unwrap();
        let packed: Vec<Option<u32>> = stops.iter().map(|s| s.sequence).collect();
        assert_eq!(packed, vec![Some(0), Some(1), Some(2), Some(3)]);
        assert_eq!(sequences(&editor, "express"), owned(&[("a", 0), ("c", 2), ("d", 3)]));
    }

    #[test]
    fn test_create_from_trip() {
        let mut editor = editor();

        let pattern_id = editor
            .create_from_trip(&TripIdentifier::new("express"))
            .unwrap();

        let store = editor.store();
        let pattern = store.pattern(&pattern_id).unwrap();
        assert_eq!(&*pattern.name, "7(University)");
        assert_eq!(
            &*store.route(&RouteIdentifier::new("r7")).unwrap().long_name,
            "Harbor - University"
        );

        let stops = store.pattern_stops(&pattern_id).unwrap();
        assert_eq!(stops.len(), 3);
        assert_eq!(stops[1].default_travel_time, Some(270));
        assert_eq!(stops[1].default_dwell_time, Some(30));
        assert_relative_eq!(stops[2].default_distance.unwrap(), 1250.0);
    }

    #[test]
    fn test_create_from_unknown_trip() {
        let mut editor = editor();
        let result = editor.create_from_trip(&TripIdentifier::new("ghost"));
        assert!(matches!(result, Err(PatternError::TripNotFound(_))));
    }

    #[test]
    fn test_delete_pattern() {
        let mut editor = editor();
        editor.delete_pattern(&PatternIdentifier::new("p1")).unwrap();

        assert_eq!(editor.store().pattern_count(), 0);
        assert!(editor.store().trip(&TripIdentifier::new("all")).is_none());
    }
}

//! In-memory pattern store.
//!
//! Pattern stops live in an arena keyed by pattern id; stops, routes and trips
//! refer to each other by identifier only. Suitable for tests, previews and
//! small offline editing sessions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::derivation::DerivedPattern;
use crate::identifiers::*;
use crate::models::{errors::*, schedule::*, traits::PatternStore, types::*};
use crate::rebind::StopTimeMutation;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteRecord {
    pub id: RouteIdentifier,
    pub short_name: Arc<str>,
    pub long_name: Arc<str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripRecord {
    pub id: TripIdentifier,
    pub route_id: RouteIdentifier,
    /// `None` until the trip is bound to a pattern
    pub pattern_id: Option<PatternIdentifier>,
    pub headsign: Arc<str>,
    pub shape_id: Option<ShapeIdentifier>,
}

#[derive(Clone, Debug, Default)]
pub struct InMemoryPatternStore {
    stops: HashMap<StopIdentifier, Stop>,
    routes: HashMap<RouteIdentifier, RouteRecord>,
    patterns: HashMap<PatternIdentifier, Pattern>,
    pattern_stops: HashMap<PatternIdentifier, Vec<PatternStop>>,
    trips: HashMap<TripIdentifier, TripRecord>,
    stop_times: HashMap<TripIdentifier, Vec<StopTime>>,
    next_id: u64,
}

impl InMemoryPatternStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- Loading ----

    pub fn insert_stop(&mut self, stop: Stop) {
        self.stops.insert(stop.id.clone(), stop);
    }

    pub fn insert_route(&mut self, route: RouteRecord) {
        self.routes.insert(route.id.clone(), route);
    }

    pub fn insert_pattern_with_stops(&mut self, pattern: Pattern, stops: Vec<PatternStop>) {
        self.pattern_stops.insert(pattern.id.clone(), stops);
        self.patterns.insert(pattern.id.clone(), pattern);
    }

    pub fn insert_trip(&mut self, trip: TripRecord, stop_times: Vec<StopTime>) {
        self.stop_times.insert(trip.id.clone(), stop_times);
        self.trips.insert(trip.id.clone(), trip);
    }

    // ---- Inspection ----

    pub fn route(&self, id: &RouteIdentifier) -> Option<&RouteRecord> {
        self.routes.get(id)
    }

    pub fn trip(&self, id: &TripIdentifier) -> Option<&TripRecord> {
        self.trips.get(id)
    }

    pub fn stop_times(&self, trip_id: &TripIdentifier) -> Option<&[StopTime]> {
        self.stop_times.get(trip_id).map(Vec::as_slice)
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    fn generate_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_{}", prefix, self.next_id)
    }
}

impl PatternStore for InMemoryPatternStore {
    fn pattern(&self, id: &PatternIdentifier) -> Option<Pattern> {
        self.patterns.get(id).cloned()
    }

    fn pattern_stops(&self, id: &PatternIdentifier) -> Option<Vec<PatternStop>> {
        self.pattern_stops.get(id).cloned()
    }

    fn trips_for_pattern(&self, id: &PatternIdentifier) -> Vec<TripStopTimes> {
        let mut trips: Vec<TripStopTimes> = self
            .trips
            .values()
            .filter(|trip| trip.pattern_id.as_ref() == Some(id))
            .map(|trip| TripStopTimes {
                trip_id: trip.id.clone(),
                stop_times: self.stop_times.get(&trip.id).cloned().unwrap_or_default(),
            })
            .collect();
        // HashMap order is arbitrary; keep plans reproducible
        trips.sort_by(|a, b| a.trip_id.as_str().cmp(b.trip_id.as_str()));
        trips
    }

    fn sample_trip(&self, id: &TripIdentifier) -> Option<SampleTrip> {
        let trip = self.trips.get(id)?;
        let route = self.routes.get(&trip.route_id)?;
        let stop_times = self.stop_times.get(id).cloned().unwrap_or_default();

        let stop_names = stop_times
            .iter()
            .filter_map(|st| self.stops.get(&st.stop_id))
            .map(|stop| (stop.id.clone(), stop.name.clone()))
            .collect();

        Some(SampleTrip {
            trip_id: trip.id.clone(),
            route_id: trip.route_id.clone(),
            route_short_name: route.short_name.clone(),
            headsign: trip.headsign.clone(),
            shape_id: trip.shape_id.clone(),
            stop_times,
            stop_names,
        })
    }

    fn replace_pattern_stops(
        &mut self,
        id: &PatternIdentifier,
        stops: Vec<PatternStop>,
    ) -> Result<()> {
        let slot = self
            .pattern_stops
            .get_mut(id)
            .ok_or_else(|| PatternError::PatternNotFound(id.clone()))?;
        *slot = stops;
        Ok(())
    }

    fn apply_stop_time_mutations(&mut self, mutations: &[StopTimeMutation]) -> Result<()> {
        let known: HashSet<&StopTimeIdentifier> = self
            .stop_times
            .values()
            .flatten()
            .map(|st| &st.id)
            .collect();
        if let Some(missing) = mutations
            .iter()
            .map(StopTimeMutation::stop_time_id)
            .find(|id| !known.contains(id))
        {
            return Err(PatternError::StopTimeNotFound(missing.clone()));
        }

        let mut pending: HashMap<&StopTimeIdentifier, &StopTimeMutation> = mutations
            .iter()
            .map(|mutation| (mutation.stop_time_id(), mutation))
            .collect();

        for stop_times in self.stop_times.values_mut() {
            stop_times.retain_mut(|st| match pending.remove(&st.id) {
                Some(StopTimeMutation::Delete { .. }) => false,
                Some(StopTimeMutation::SetSequence { sequence, .. }) => {
                    st.sequence = Some(*sequence);
                    true
                }
                None => true,
            });
        }
        Ok(())
    }

    fn insert_pattern(&mut self, derived: &DerivedPattern) -> Result<PatternIdentifier> {
        if !self.routes.contains_key(&derived.route_id) {
            return Err(PatternError::RouteNotFound(derived.route_id.clone()));
        }

        let id = PatternIdentifier::new(self.generate_id("pattern"));
        let stops = derived
            .stops
            .iter()
            .map(|stop| PatternStop {
                id: PatternStopIdentifier::new(self.generate_id("pattern_stop")),
                stop_id: stop.stop_id.clone(),
                sequence: Some(stop.sequence),
                default_dwell_time: stop.default_dwell_time,
                default_distance: stop.default_distance,
                default_travel_time: stop.default_travel_time,
            })
            .collect();

        let pattern = Pattern {
            id: id.clone(),
            name: derived.name.as_str().into(),
            headsign: derived.headsign.clone(),
            route_id: derived.route_id.clone(),
            shape_id: derived.shape_id.clone(),
            service_days: ServiceDays::new(),
            window: ScheduleWindow::FixedTimes,
        };
        self.insert_pattern_with_stops(pattern, stops);
        Ok(id)
    }

    fn set_route_long_name(&mut self, id: &RouteIdentifier, long_name: &str) -> Result<()> {
        let route = self
            .routes
            .get_mut(id)
            .ok_or_else(|| PatternError::RouteNotFound(id.clone()))?;
        route.long_name = long_name.into();
        Ok(())
    }

    fn delete_pattern_cascade(&mut self, id: &PatternIdentifier) -> Result<()> {
        self.patterns
            .remove(id)
            .ok_or_else(|| PatternError::PatternNotFound(id.clone()))?;
        self.pattern_stops.remove(id);

        let bound: Vec<TripIdentifier> = self
            .trips
            .values()
            .filter(|trip| trip.pattern_id.as_ref() == Some(id))
            .map(|trip| trip.id.clone())
            .collect();
        for trip_id in bound {
            self.stop_times.remove(&trip_id);
            self.trips.remove(&trip_id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> InMemoryPatternStore {
        let mut store = InMemoryPatternStore::new();
        store.insert_route(RouteRecord {
            id: RouteIdentifier::new("r1"),
            short_name: "1".into(),
            long_name: "".into(),
        });
        store.insert_pattern_with_stops(
            Pattern {
                id: PatternIdentifier::new("p1"),
                name: "1(North)".into(),
                headsign: "North".into(),
                route_id: RouteIdentifier::new("r1"),
                shape_id: None,
                service_days: ServiceDays::from_bools(true, false, false),
                window: ScheduleWindow::FixedTimes,
            },
            vec![
                PatternStop::new("ps1", "a", Some(0)),
                PatternStop::new("ps2", "b", Some(1)),
            ],
        );
        for trip in ["t1", "t2"] {
            store.insert_trip(
                TripRecord {
                    id: TripIdentifier::new(trip),
                    route_id: RouteIdentifier::new("r1"),
                    pattern_id: Some(PatternIdentifier::new("p1")),
                    headsign: "North".into(),
                    shape_id: None,
                },
                vec![
                    StopTime::new(format!("{trip}_a"), "a", Some(0)),
                    StopTime::new(format!("{trip}_b"), "b", Some(1)),
                ],
            );
        }
        store.insert_trip(
            TripRecord {
                id: TripIdentifier::new("unbound"),
                route_id: RouteIdentifier::new("r1"),
                pattern_id: None,
                headsign: "South".into(),
                shape_id: None,
            },
            vec![StopTime::new("unbound_a", "a", Some(0))],
        );
        store
    }

    #[test]
    fn test_trips_for_pattern() {
        let store = store();
        let trips = store.trips_for_pattern(&PatternIdentifier::new("p1"));

        let ids: Vec<&str> = trips.iter().map(|t| t.trip_id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2"]);
        assert_eq!(trips[0].stop_times.len(), 2);
    }

    #[test]
    fn test_apply_mutations() {
        let mut store = store();
        store
            .apply_stop_time_mutations(&[
                StopTimeMutation::Delete {
                    stop_time_id: StopTimeIdentifier::new("t1_a"),
                },
                StopTimeMutation::SetSequence {
                    stop_time_id: StopTimeIdentifier::new("t1_b"),
                    sequence: 0,
                },
            ])
            .unwrap();

        let stop_times = store.stop_times(&TripIdentifier::new("t1")).unwrap();
        assert_eq!(stop_times.len(), 1);
        assert_eq!(stop_times[0].id.as_str(), "t1_b");
        assert_eq!(stop_times[0].sequence, Some(0));
    }

    #[test]
    fn test_unknown_stop_time_changes_nothing() {
        let mut store = store();
        let result = store.apply_stop_time_mutations(&[
            StopTimeMutation::Delete {
                stop_time_id: StopTimeIdentifier::new("t1_a"),
            },
            StopTimeMutation::Delete {
                stop_time_id: StopTimeIdentifier::new("nope"),
            },
        ]);

        assert!(matches!(result, Err(PatternError::StopTimeNotFound(_))));
        assert_eq!(store.stop_times(&TripIdentifier::new("t1")).unwrap().len(), 2);
    }

    #[test]
    fn test_delete_pattern_cascade() {
        let mut store = store();
        store
            .delete_pattern_cascade(&PatternIdentifier::new("p1"))
            .unwrap();

        assert_eq!(store.pattern_count(), 0);
        assert!(store.pattern_stops(&PatternIdentifier::new("p1")).is_none());
        assert!(store.trip(&TripIdentifier::new("t1")).is_none());
        assert!(store.stop_times(&TripIdentifier::new("t2")).is_none());
        // trips of other patterns survive
        assert!(store.trip(&TripIdentifier::new("unbound")).is_some());

        assert!(matches!(
            store.delete_pattern_cascade(&PatternIdentifier::new("p1")),
            Err(PatternError::PatternNotFound(_))
        ));
    }

    #[test]
    fn test_sample_trip_names() {
        let mut store = store();
        store.insert_stop(Stop {
            id: StopIdentifier::new("a"),
            name: "Alpha".into(),
        });

        let sample = store.sample_trip(&TripIdentifier::new("t1")).unwrap();
        assert_eq!(&*sample.route_short_name, "1");
        assert_eq!(
            sample.stop_names.get(&StopIdentifier::new("a")).map(|n| &**n),
            Some("Alpha")
        );
        assert!(!sample.stop_names.contains_key(&StopIdentifier::new("b")));
    }
}

//! Core data types for patterns, trips and their stop-times.
//!
//! Times are seconds since midnight of the service day and may exceed 24 hours
//! for trips running past midnight. Durations derived from them are signed so
//! that inconsistent data shows up as a negative value instead of wrapping.

use std::collections::HashMap;
use std::sync::Arc;

use crate::identifiers::*;
use crate::models::schedule::{ScheduleWindow, ServiceDays};

// ============================================================================
// Stops and patterns
// ============================================================================

/// A physical stop. The editing core only looks at the identifier; the name
/// is used when deriving route names.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stop {
    pub id: StopIdentifier,
    pub name: Arc<str>,
}

/// One stop's position and default timing within a pattern
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PatternStop {
    pub id: PatternStopIdentifier,
    pub stop_id: StopIdentifier,
    /// Position within the pattern. `None` for stops that were never persisted.
    pub sequence: Option<u32>,
    pub default_dwell_time: Option<i64>,
    pub default_distance: Option<f64>,
    pub default_travel_time: Option<i64>,
}

impl PatternStop {
    pub fn new(
        id: impl Into<PatternStopIdentifier>,
        stop_id: impl Into<StopIdentifier>,
        sequence: Option<u32>,
    ) -> Self {
        Self {
            id: id.into(),
            stop_id: stop_id.into(),
            sequence,
            default_dwell_time: None,
            default_distance: None,
            default_travel_time: None,
        }
    }
}

/// Pattern metadata. Its stops are kept separately, keyed by pattern id.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pattern {
    pub id: PatternIdentifier,
    pub name: Arc<str>,
    pub headsign: Arc<str>,
    pub route_id: RouteIdentifier,
    pub shape_id: Option<ShapeIdentifier>,
    pub service_days: ServiceDays,
    pub window: ScheduleWindow,
}

// ============================================================================
// Trips and stop-times
// ============================================================================

/// A trip's realized arrival/departure at one stop
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StopTime {
    pub id: StopTimeIdentifier,
    pub stop_id: StopIdentifier,
    /// Sequence of the pattern stop this stop-time was bound to
    pub sequence: Option<u32>,
    pub arrival_time: Option<u32>,
    pub departure_time: Option<u32>,
    /// Distance along the trip's shape, non-decreasing along a trip
    pub distance_traveled: Option<f64>,
}

impl StopTime {
    pub fn new(
        id: impl Into<StopTimeIdentifier>,
        stop_id: impl Into<StopIdentifier>,
        sequence: Option<u32>,
    ) -> Self {
        Self {
            id: id.into(),
            stop_id: stop_id.into(),
            sequence,
            arrival_time: None,
            departure_time: None,
            distance_traveled: None,
        }
    }

    pub fn with_times(mut self, arrival: u32, departure: u32) -> Self {
        self.arrival_time = Some(arrival);
        self.departure_time = Some(departure);
        self
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance_traveled = Some(distance);
        self
    }

    /// Seconds spent at the stop, if both times are known
    pub fn dwell_time(&self) -> Option<i64> {
        Some(i64::from(self.departure_time?) - i64::from(self.arrival_time?))
    }
}

/// The stop-times of one trip bound to a pattern
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripStopTimes {
    pub trip_id: TripIdentifier,
    pub stop_times: Vec<StopTime>,
}

impl TripStopTimes {
    pub fn new(trip_id: impl Into<TripIdentifier>, stop_times: Vec<StopTime>) -> Self {
        Self {
            trip_id: trip_id.into(),
            stop_times,
        }
    }
}

/// A trip used as the template for a brand-new pattern, together with the
/// route and stop details needed to name it.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleTrip {
    pub trip_id: TripIdentifier,
    pub route_id: RouteIdentifier,
    pub route_short_name: Arc<str>,
    pub headsign: Arc<str>,
    pub shape_id: Option<ShapeIdentifier>,
    pub stop_times: Vec<StopTime>,
    pub stop_names: HashMap<StopIdentifier, Arc<str>>,
}

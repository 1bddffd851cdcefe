//! Derivation of a new pattern from one sample trip.
//!
//! Each stop-time of the trip becomes a pattern stop whose defaults are taken
//! from the trip itself: dwell at the stop, and distance and travel time from
//! the previous stop. The first stop has zero distance and travel time.

use std::sync::Arc;

use tracing::warn;

use crate::identifiers::*;
use crate::models::errors::DerivationError;
use crate::models::types::{SampleTrip, StopTime};
use crate::sequence;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedPatternStop {
    pub stop_id: StopIdentifier,
    pub sequence: u32,
    pub default_dwell_time: Option<i64>,
    pub default_distance: Option<f64>,
    pub default_travel_time: Option<i64>,
}

/// A pattern ready to be persisted, plus the long name derived for its route
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedPattern {
    /// `"<route short name>(<headsign>)"`
    pub name: String,
    pub headsign: Arc<str>,
    pub route_id: RouteIdentifier,
    pub shape_id: Option<ShapeIdentifier>,
    /// `"<first stop name> - <last stop name>"`
    pub route_long_name: String,
    pub stops: Vec<DerivedPatternStop>,
}

pub fn derive_pattern(trip: &SampleTrip) -> Result<DerivedPattern, DerivationError> {
    derive_pattern_with(trip, " - ")
}

/// Derive a pattern, joining the route's first and last stop names with
/// `separator`
pub fn derive_pattern_with(
    trip: &SampleTrip,
    separator: &str,
) -> Result<DerivedPattern, DerivationError> {
    let stop_times = sequence::ordered(trip.stop_times.iter());
    let (Some(first), Some(last)) = (stop_times.first(), stop_times.last()) else {
        return Err(DerivationError::EmptyTrip {
            trip_id: trip.trip_id.clone(),
        });
    };

    // Unset sequences sort last; number them after the highest set one.
    let mut next_unset = stop_times
        .iter()
        .filter_map(|stop_time| stop_time.sequence)
        .max()
        .map_or(0, |max| max + 1);

    let mut stops = Vec::with_capacity(stop_times.len());
    let mut previous: Option<&StopTime> = None;
    for stop_time in stop_times.iter().copied() {
        let (default_distance, default_travel_time) = match previous {
            None => (Some(0.0), Some(0)),
            Some(previous) => (
                stop_time
                    .distance_traveled
                    .zip(previous.distance_traveled)
                    .map(|(distance, previous)| distance - previous),
                elapsed(previous.departure_time, stop_time.arrival_time),
            ),
        };

        stops.push(DerivedPatternStop {
            stop_id: stop_time.stop_id.clone(),
            sequence: stop_time.sequence.unwrap_or_else(|| {
                next_unset += 1;
                next_unset - 1
            }),
            default_dwell_time: stop_time.dwell_time(),
            default_distance,
            default_travel_time,
        });
        previous = Some(stop_time);
    }

    let route_long_name = format!(
        "{}{}{}",
        stop_name(trip, &first.stop_id),
        separator,
        stop_name(trip, &last.stop_id)
    );

    Ok(DerivedPattern {
        name: format!("{}({})", trip.route_short_name, trip.headsign),
        headsign: trip.headsign.clone(),
        route_id: trip.route_id.clone(),
        shape_id: trip.shape_id.clone(),
        route_long_name,
        stops,
    })
}

fn elapsed(from: Option<u32>, to: Option<u32>) -> Option<i64> {
    Some(i64::from(to?) - i64::from(from?))
}

fn stop_name<'a>(trip: &'a SampleTrip, stop_id: &'a StopIdentifier) -> &'a str {
    match trip.stop_names.get(stop_id) {
        Some(name) => name.as_ref(),
        None => {
            warn!("no name for stop {} of trip {}", stop_id, trip.trip_id);
            stop_id.as_str()
        }
    }
}

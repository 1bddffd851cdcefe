//! Seeding patterns from a GTFS feed.
//!
//! GTFS stop-times have no identifiers of their own; they are named
//! `<trip id>:<stop sequence>`, which is unique within a feed.

use std::collections::HashMap;
use std::sync::Arc;

use gtfs_structures::Gtfs;

use crate::identifiers::*;
use crate::models::errors::{PatternError, Result};
use crate::models::types::{SampleTrip, StopTime};

/// Build the sample trip for `trip_id` from a parsed feed
pub fn sample_trip_from_gtfs(gtfs: &Gtfs, trip_id: &str) -> Result<SampleTrip> {
    let trip = gtfs
        .get_trip(trip_id)
        .map_err(|_| PatternError::TripNotFound(TripIdentifier::new(trip_id)))?;
    let route = gtfs
        .get_route(&trip.route_id)
        .map_err(|_| PatternError::RouteNotFound(RouteIdentifier::new(&trip.route_id)))?;

    let mut stop_names: HashMap<StopIdentifier, Arc<str>> = HashMap::new();
    let stop_times = trip
        .stop_times
        .iter()
        .map(|st| {
            let stop_id = StopIdentifier::new(&st.stop.id);
            if let Some(name) = &st.stop.name {
                stop_names.insert(stop_id.clone(), name.as_str().into());
            }
            StopTime {
                id: StopTimeIdentifier::new(format!("{}:{}", trip.id, st.stop_sequence)),
                stop_id,
                sequence: Some(st.stop_sequence),
                arrival_time: st.arrival_time,
                departure_time: st.departure_time,
                distance_traveled: st.shape_dist_traveled.map(f64::from),
            }
        })
        .collect();

    Ok(SampleTrip {
        trip_id: TripIdentifier::new(&trip.id),
        route_id: RouteIdentifier::new(&trip.route_id),
        route_short_name: route.short_name.as_deref().unwrap_or_default().into(),
        headsign: trip.trip_headsign.as_deref().unwrap_or_default().into(),
        shape_id: trip.shape_id.as_deref().map(ShapeIdentifier::new),
        stop_times,
        stop_names,
    })
}

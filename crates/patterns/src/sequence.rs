//! Ordering of pattern stops and stop-times by their `sequence` field.
//!
//! Entries without a sequence sort after every entry that has one and keep
//! their relative order among themselves.

use std::cmp::Ordering;

use crate::identifiers::StopIdentifier;
use crate::models::types::{PatternStop, StopTime};

/// Anything positioned by a (possibly unset) sequence number
pub trait Sequenced {
    fn sequence(&self) -> Option<u32>;
}

impl Sequenced for PatternStop {
    fn sequence(&self) -> Option<u32> {
        self.sequence
    }
}

impl Sequenced for StopTime {
    fn sequence(&self) -> Option<u32> {
        self.sequence
    }
}

impl<T: Sequenced + ?Sized> Sequenced for &T {
    fn sequence(&self) -> Option<u32> {
        (**self).sequence()
    }
}

/// Comparator placing unset sequences last
pub fn by_sequence<T: Sequenced>(a: &T, b: &T) -> Ordering {
    match (a.sequence(), b.sequence()) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort by sequence
pub fn sort_by_sequence<T: Sequenced>(items: &mut [T]) {
    items.sort_by(by_sequence);
}

pub fn ordered<T: Sequenced>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut items: Vec<T> = items.into_iter().collect();
    sort_by_sequence(&mut items);
    items
}

/// Stop identifiers read left to right
pub fn stop_ids(stops: &[PatternStop]) -> Vec<StopIdentifier> {
    stops.iter().map(|stop| stop.stop_id.clone()).collect()
}

/// Re-pack sequences to 0..n-1 following slice order
pub fn renumber(stops: &mut [PatternStop]) {
    for (sequence, stop) in (0u32..).zip(stops.iter_mut()) {
        stop.sequence = Some(sequence);
    }
}

/// Whether the known departure times (arrival when departure is unset) never
/// go backwards. Untimed stop-times are ignored.
pub fn is_chronological<'a>(stop_times: impl IntoIterator<Item = &'a StopTime>) -> bool {
    let times: Vec<u32> = stop_times
        .into_iter()
        .filter_map(|st| st.departure_time.or(st.arrival_time))
        .collect();
    times.windows(2).all(|pair| pair[0] <= pair[1])
}

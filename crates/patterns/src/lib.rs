//! # trip-patterns
//!
//! Trip pattern editing for transit schedules.
//!
//! A pattern is the ordered list of stops shared by many trips. This crate
//! works out what an edit to that list means for the trips bound to it, and
//! derives new patterns from sample trips.
//!
//! ## Features
//!
//! - **Single-stop edits**: an edited stop list is classified as an addition,
//!   deletion or move of exactly one stop; anything else is rejected
//! - **Skip-aware rebinding**: stop-times are realigned to the edited pattern
//!   even for trips that skip some of its stops
//! - **Pattern derivation**: default dwell, travel time and distance from one
//!   trip's stop-times
//! - **Pluggable storage**: the core is pure; [`PatternStore`] is the seam to
//!   your database
//!
//! ## Example
//!
//! ```
//! use trip_patterns::prelude::*;
//!
//! let mut store = InMemoryPatternStore::new();
//! store.insert_route(RouteRecord {
//!     id: RouteIdentifier::new("r1"),
//!     short_name: "1".into(),
//!     long_name: "".into(),
//! });
//! store.insert_pattern_with_stops(
//!     Pattern {
//!         id: PatternIdentifier::new("p1"),
//!         name: "1(Downtown)".into(),
//!         headsign: "Downtown".into(),
//!         route_id: RouteIdentifier::new("r1"),
//!         shape_id: None,
//!         service_days: ServiceDays::from_bools(true, false, false),
//!         window: ScheduleWindow::FixedTimes,
//!     },
//!     vec![
//!         PatternStop::new("ps_a", "a", Some(0)),
//!         PatternStop::new("ps_b", "b", Some(1)),
//!         PatternStop::new("ps_c", "c", Some(2)),
//!     ],
//! );
//! store.insert_trip(
//!     TripRecord {
//!         id: TripIdentifier::new("t1"),
//!         route_id: RouteIdentifier::new("r1"),
//!         pattern_id: Some(PatternIdentifier::new("p1")),
//!         headsign: "Downtown".into(),
//!         shape_id: None,
//!     },
//!     vec![
//!         StopTime::new("t1_a", "a", Some(0)).with_times(0, 30),
//!         StopTime::new("t1_c", "c", Some(2)).with_times(300, 320),
//!     ],
//! );
//!
//! // Insert stop x between a and b
//! let mut editor = PatternEditor::new(store);
//! let plan = editor
//!     .reconcile_pattern_stops(
//!         &PatternIdentifier::new("p1"),
//!         vec![
//!             PatternStop::new("ps_a", "a", Some(0)),
//!             PatternStop::new("ps_x", "x", Some(1)),
//!             PatternStop::new("ps_b", "b", Some(2)),
//!             PatternStop::new("ps_c", "c", Some(3)),
//!         ],
//!     )
//!     .unwrap();
//!
//! assert_eq!(plan.classification, EditClassification::Addition { at: 1 });
//! let stop_times = editor.store().stop_times(&TripIdentifier::new("t1")).unwrap();
//! assert_eq!(stop_times[1].sequence, Some(3));
//! ```

pub mod classify;
pub mod config;
pub mod derivation;
pub mod editor;
#[cfg(feature = "gtfs")]
pub mod gtfs;
pub mod identifiers;
pub mod models;
pub mod provider;
pub mod rebind;
pub mod reconcile;
pub mod sequence;

// Re-exports for convenience
pub mod prelude {
    pub use crate::classify::{classify, classify_pattern_stops, EditClassification};
    pub use crate::config::{ChronologyCheck, EditorConfig};
    pub use crate::derivation::{
        derive_pattern, derive_pattern_with, DerivedPattern, DerivedPatternStop,
    };
    pub use crate::editor::PatternEditor;
    pub use crate::identifiers::*;
    pub use crate::models::{errors::*, schedule::*, traits::*, types::*};
    pub use crate::provider::{InMemoryPatternStore, RouteRecord, TripRecord};
    pub use crate::rebind::{realign, rebind, rebind_with, StopTimeMutation};
    pub use crate::reconcile::{reconcile, ReconciliationPlan};
}

pub use prelude::*;

//! Pattern stores.

pub mod memory;

pub use memory::{InMemoryPatternStore, RouteRecord, TripRecord};

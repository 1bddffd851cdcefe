//! Schedule data models, errors, and the storage trait.

pub mod errors;
pub mod schedule;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use errors::{ClassificationError, DerivationError, PatternError, RebindError, Result};
pub use schedule::{ScheduleWindow, ServiceDays};
pub use traits::PatternStore;
pub use types::{Pattern, PatternStop, SampleTrip, Stop, StopTime, TripStopTimes};

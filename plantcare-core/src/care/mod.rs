//! Care scheduling engine
//!
//! Pure, synchronous computations over plant records:
//! - [`schedule`]: next due date from the last watering and the interval
//! - [`status`]: urgency tier, badge label and interval progress
//! - [`streak`]: consecutive kept watering intervals
//! - [`calendar`]: plants grouped onto the days of a month
//! - [`snapshot`]: all of the above for every plant against one date
//!
//! None of these functions read the system clock. The caller supplies "today"
//! (usually from a [`Clock`](crate::clock::Clock)) so repeated calls with the
//! same inputs always return the same result.

pub mod calendar;
pub mod schedule;
pub mod snapshot;
pub mod status;
pub mod streak;

pub use calendar::{build_month, CalendarMonth, DayBucket};
pub use schedule::{compute_next_due, validate_interval};
pub use snapshot::{plant_streak, CareSnapshot, PlantEntry, StatusSummary};
pub use status::{classify, CareStatus, Urgency, DUE_SOON_DAYS};
pub use streak::{compute_streak, StreakResult};

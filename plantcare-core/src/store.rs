//! Read interface to the plant persistence layer.
//!
//! The care engine consumes records through this trait only; [`Database`]
//! is the bundled SQLite implementation.
//!
//! [`Database`]: crate::db::Database

use crate::error::Result;
use crate::types::{PlantCareRecord, WateringEvent};

/// Source of plant records and watering logs.
pub trait PlantStore {
    /// All tracked plants.
    fn list_plants(&self) -> Result<Vec<PlantCareRecord>>;

    /// Watering events for one plant, in the order they were recorded.
    fn list_watering_events(&self, plant_id: &str) -> Result<Vec<WateringEvent>>;
}

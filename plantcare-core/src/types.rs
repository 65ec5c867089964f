//! Core domain types for plantcare
//!
//! These types mirror the records owned by the persistence layer. The care
//! engine only reads them; every derived value (status, streak, calendar
//! bucket) is computed fresh from these records and a date snapshot.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Plant** | A tracked plant with a watering interval |
//! | **Due date** | The calendar date on which a plant is next scheduled for watering |
//! | **Watering event** | One entry of the append-only watering log |
//! | **Interval** | Days between scheduled waterings, always at least 1 |
//!
//! All dates are calendar dates ([`NaiveDate`]); watering is tracked at day
//! granularity and carries no time-of-day or timezone.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date format used for all textual date input and output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Name shown when neither a nickname nor a species name is set.
pub const UNNAMED_PLANT: &str = "Unnamed plant";

/// Parse a `YYYY-MM-DD` date, rejecting anything malformed.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|e| Error::InvalidDate(format!("'{}': {}", s, e)))
}

// ============================================
// Plant
// ============================================

/// A plant and its watering schedule, as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantCareRecord {
    /// Unique, immutable identifier
    pub id: String,
    /// Species name (may be empty)
    pub species: String,
    /// Custom name; overrides the species name for display
    pub nickname: Option<String>,
    /// Days between waterings (>= 1)
    pub watering_interval_days: i64,
    /// Most recent watering, `None` if the plant has never been watered
    pub last_watered_at: Option<NaiveDate>,
    /// Scheduled due date, derived from `last_watered_at` and the interval
    pub next_due_at: NaiveDate,
    /// When the plant was added
    pub created_at: NaiveDate,
}

impl PlantCareRecord {
    /// Human-friendly name: nickname, then species, then [`UNNAMED_PLANT`].
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .or_else(|| Some(self.species.trim()).filter(|s| !s.is_empty()))
            .unwrap_or(UNNAMED_PLANT)
    }
}

/// Input for adding a plant to a store.
#[derive(Debug, Clone, Default)]
pub struct NewPlant {
    /// Species name
    pub species: String,
    /// Optional custom name
    pub nickname: Option<String>,
    /// Days between waterings
    pub watering_interval_days: i64,
    /// Known last watering, if any
    pub last_watered_at: Option<NaiveDate>,
}

// ============================================
// Watering log
// ============================================

/// One entry of the append-only watering log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WateringEvent {
    /// Plant this event belongs to
    pub plant_id: String,
    /// Day the plant was watered
    pub occurred_at: NaiveDate,
    /// Amount of water in millilitres, if recorded
    pub amount_ml: Option<i64>,
    /// Free-form note
    pub note: Option<String>,
}

impl WateringEvent {
    /// Create an event with no amount or note.
    pub fn new(plant_id: impl Into<String>, occurred_at: NaiveDate) -> Self {
        Self {
            plant_id: plant_id.into(),
            occurred_at,
            amount_ml: None,
            note: None,
        }
    }
}

//! Care status classification.
//!
//! Turns a scheduled due date into a badge: a label, an urgency tier and the
//! elapsed fraction of the watering interval. This is the single place the
//! due-soon threshold lives; every view classifies through [`classify`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::schedule::validate_interval;
use crate::error::Result;

/// Plants due within this many days (but not today) are "due soon".
pub const DUE_SOON_DAYS: i64 = 2;

/// Urgency tiers, ordered from least to most pressing.
///
/// `Ord` follows urgency, so `Urgency::Overdue` is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Healthy,
    DueSoon,
    DueToday,
    Overdue,
}

impl Urgency {
    /// All tiers, most urgent first.
    pub const ALL: [Urgency; 4] = [
        Urgency::Overdue,
        Urgency::DueToday,
        Urgency::DueSoon,
        Urgency::Healthy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Healthy => "healthy",
            Urgency::DueSoon => "due_soon",
            Urgency::DueToday => "due_today",
            Urgency::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived care status for one plant at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareStatus {
    /// Badge text, e.g. "3 days overdue" or "Healthy"
    pub label: String,
    /// Urgency tier
    pub urgency: Urgency,
    /// Elapsed fraction of the current interval, in `[0, 1]`
    pub progress_fraction: f64,
    /// Whole days until due; negative when overdue
    pub days_until: i64,
}

impl CareStatus {
    /// Days overdue, if the plant is overdue.
    pub fn days_overdue(&self) -> Option<i64> {
        (self.urgency == Urgency::Overdue).then_some(-self.days_until)
    }

    /// Whether the plant needs water today or is already late.
    pub fn needs_water(&self) -> bool {
        self.urgency >= Urgency::DueToday
    }
}

/// Classify a plant's due date relative to `now`.
///
/// Progress is measured against the *current* `interval_days`, even if the
/// interval was edited after `next_due_at` was scheduled; the result is
/// clamped so it always stays within `[0, 1]`.
pub fn classify(next_due_at: NaiveDate, now: NaiveDate, interval_days: i64) -> Result<CareStatus> {
    validate_interval(interval_days)?;

    let days_until = (next_due_at - now).num_days();

    let (urgency, label, progress_fraction) = if days_until < 0 {
        let overdue = -days_until;
        let label = if overdue == 1 {
            "1 day overdue".to_string()
        } else {
            format!("{} days overdue", overdue)
        };
        (Urgency::Overdue, label, 1.0)
    } else if days_until == 0 {
        (Urgency::DueToday, "Due today".to_string(), 1.0)
    } else if days_until <= DUE_SOON_DAYS {
        (
            Urgency::DueSoon,
            "Due soon".to_string(),
            elapsed_fraction(days_until, interval_days),
        )
    } else {
        (
            Urgency::Healthy,
            "Healthy".to_string(),
            elapsed_fraction(days_until, interval_days),
        )
    };

    Ok(CareStatus {
        label,
        urgency,
        progress_fraction,
        days_until,
    })
}

fn elapsed_fraction(days_until: i64, interval_days: i64) -> f64 {
    (1.0 - days_until as f64 / interval_days as f64).clamp(0.0, 1.0)
}

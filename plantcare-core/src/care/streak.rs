//! Watering streaks.
//!
//! A streak counts consecutive watering intervals kept: each gap between two
//! successive watering days that is no longer than the interval (plus the
//! configured grace days) extends the streak, a longer gap breaks it.

use chrono::NaiveDate;
use serde::Serialize;

use super::schedule::validate_interval;
use crate::error::{Error, Result};
use crate::types::WateringEvent;

/// Streak statistics for one plant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreakResult {
    /// Consecutive kept intervals ending at the latest watering, 0 if lapsed
    pub current_streak_days: i64,
    /// Longest run of kept intervals anywhere in the history
    pub best_streak_days: i64,
    /// Most recent watering day
    pub last_watered_at: Option<NaiveDate>,
}

/// Compute current and best streaks from one plant's watering log.
///
/// Events may arrive in any order; several events on the same day count as a
/// single watering. The current streak drops to 0 once `now` is more than
/// `interval_days + grace_days` past the latest watering, while the best
/// streak is unaffected.
pub fn compute_streak(
    events: &[WateringEvent],
    interval_days: i64,
    now: NaiveDate,
    grace_days: i64,
) -> Result<StreakResult> {
    validate_interval(interval_days)?;
    if grace_days < 0 {
        return Err(Error::InvalidInterval { days: grace_days });
    }

    let mut dates: Vec<NaiveDate> = events.iter().map(|e| e.occurred_at).collect();
    dates.sort();
    dates.dedup();

    let Some(&last) = dates.last() else {
        return Ok(StreakResult::default());
    };

    let max_gap = interval_days + grace_days;
    let mut streak = 0i64;
    let mut best_streak = 0i64;

    // Iterate from oldest to newest watering
    for pair in dates.windows(2) {
        let gap = (pair[1] - pair[0]).num_days();
        if gap <= max_gap {
            streak += 1;
            best_streak = best_streak.max(streak);
        } else {
            streak = 0;
        }
    }

    let since_last = (now - last).num_days();
    let current_streak = if since_last > max_gap { 0 } else { streak };

    tracing::trace!(
        waterings = dates.len(),
        current_streak,
        best_streak,
        since_last,
        "Computed watering streak"
    );

    Ok(StreakResult {
        current_streak_days: current_streak,
        best_streak_days: best_streak,
        last_watered_at: Some(last),
    })
}

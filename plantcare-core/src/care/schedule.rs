//! Next-due-date computation.

use chrono::{Days, NaiveDate};

use crate::error::{Error, Result};

/// Reject intervals shorter than one day.
pub fn validate_interval(interval_days: i64) -> Result<()> {
    if interval_days < 1 {
        return Err(Error::InvalidInterval {
            days: interval_days,
        });
    }
    Ok(())
}

/// Compute the next watering due date.
///
/// A plant that has never been watered is due immediately (`today`).
/// Otherwise the due date is `last_watered_at + interval_days` in calendar
/// days.
pub fn compute_next_due(
    last_watered_at: Option<NaiveDate>,
    interval_days: i64,
    today: NaiveDate,
) -> Result<NaiveDate> {
    validate_interval(interval_days)?;

    let Some(last) = last_watered_at else {
        return Ok(today);
    };

    add_days(last, interval_days)
}

/// Add a positive number of days, failing if the result is out of range.
pub(crate) fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    u64::try_from(days)
        .ok()
        .and_then(|d| date.checked_add_days(Days::new(d)))
        .ok_or_else(|| Error::InvalidDate(format!("{} + {} days is out of range", date, days)))
}

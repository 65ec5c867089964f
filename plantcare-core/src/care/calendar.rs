//! Month calendar aggregation.
//!
//! Groups plants onto the days of a month by their *stored* schedule: a plant
//! appears as due on exactly its `next_due_at` and as watered on exactly its
//! `last_watered_at`. Nothing is re-evaluated here; schedules are computed
//! before aggregation.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::PlantCareRecord;

/// A calendar month (year, month 1-12).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// Create a month, rejecting month indexes outside 1-12 and
    /// unrepresentable years.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(Error::InvalidDate(format!(
                "no such month: {}-{:02}",
                year, month
            )));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse `YYYY-MM` (e.g. "2024-02").
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidDate(format!("'{}': expected YYYY-MM", s));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month number, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Number of days in this month.
    pub fn num_days(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|&day| NaiveDate::from_ymd_opt(self.year, self.month, day).is_some())
            .unwrap_or(28)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.day(1)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.day(self.num_days())
    }

    /// Every date in the month, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (1..=self.num_days()).map(move |day| self.day(day))
    }

    /// Whether `date` falls within this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// The month before this one.
    pub fn previous(&self) -> Result<Self> {
        if self.month == 1 {
            Self::new(self.year - 1, 12)
        } else {
            Self::new(self.year, self.month - 1)
        }
    }

    /// The month after this one.
    pub fn next(&self) -> Result<Self> {
        if self.month == 12 {
            Self::new(self.year + 1, 1)
        } else {
            Self::new(self.year, self.month + 1)
        }
    }

    /// Display name, e.g. "February 2024".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_day().format("%B"), self.year)
    }

    fn day(&self, day: u32) -> NaiveDate {
        // Construction guarantees the month exists; `day` is within num_days()
        NaiveDate::from_ymd_opt(self.year, self.month, day).unwrap_or(NaiveDate::MIN)
    }
}

impl std::fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The plants due and watered on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// Plant ids whose scheduled due date is this day
    pub plants_due: BTreeSet<String>,
    /// Plant ids last watered on this day
    pub plants_watered: BTreeSet<String>,
}

impl DayBucket {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            plants_due: BTreeSet::new(),
            plants_watered: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.plants_due.is_empty() && self.plants_watered.is_empty()
    }
}

/// Build one bucket per day of `month`, in date order.
pub fn build_month(plants: &[PlantCareRecord], month: CalendarMonth) -> Vec<DayBucket> {
    let mut buckets: Vec<DayBucket> = month.days().map(DayBucket::empty).collect();

    for plant in plants {
        if month.contains(plant.next_due_at) {
            buckets[plant.next_due_at.day0() as usize]
                .plants_due
                .insert(plant.id.clone());
        }

        if let Some(watered) = plant.last_watered_at.filter(|d| month.contains(*d)) {
            buckets[watered.day0() as usize]
                .plants_watered
                .insert(plant.id.clone());
        }
    }

    buckets
}

//! One consistent pass over every plant.
//!
//! A [`CareSnapshot`] reads the clock once and derives every status and the
//! month calendar from the same plant list, so a plant's badge and its
//! calendar placement never disagree within a render.

use chrono::NaiveDate;
use serde::Serialize;

use super::calendar::{build_month, CalendarMonth, DayBucket};
use super::status::{classify, CareStatus, Urgency};
use super::streak::{compute_streak, StreakResult};
use crate::clock::Clock;
use crate::config::CareConfig;
use crate::error::Result;
use crate::store::PlantStore;
use crate::types::PlantCareRecord;

/// A plant together with its status at snapshot time.
#[derive(Debug, Clone, Serialize)]
pub struct PlantEntry {
    pub plant: PlantCareRecord,
    pub display_name: String,
    pub status: CareStatus,
}

/// Plant counts per urgency tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub overdue: usize,
    pub due_today: usize,
    pub due_soon: usize,
    pub healthy: usize,
    pub total: usize,
}

impl StatusSummary {
    fn add(&mut self, urgency: Urgency) {
        match urgency {
            Urgency::Overdue => self.overdue += 1,
            Urgency::DueToday => self.due_today += 1,
            Urgency::DueSoon => self.due_soon += 1,
            Urgency::Healthy => self.healthy += 1,
        }
        self.total += 1;
    }

    /// Number of plants in `urgency`.
    pub fn count(&self, urgency: Urgency) -> usize {
        match urgency {
            Urgency::Overdue => self.overdue,
            Urgency::DueToday => self.due_today,
            Urgency::DueSoon => self.due_soon,
            Urgency::Healthy => self.healthy,
        }
    }

    /// Plants that need water today or are late.
    pub fn needs_water(&self) -> usize {
        self.overdue + self.due_today
    }
}

/// Statuses and calendar for every plant, computed against a single date.
#[derive(Debug, Clone, Serialize)]
pub struct CareSnapshot {
    /// The date every status was computed against
    pub today: NaiveDate,
    /// Plants, most urgent first
    pub entries: Vec<PlantEntry>,
    pub summary: StatusSummary,
    pub month: CalendarMonth,
    pub calendar: Vec<DayBucket>,
}

impl CareSnapshot {
    /// Load all plants from `store` and classify them against one clock
    /// reading. `month` defaults to the current month.
    pub fn build(
        store: &dyn PlantStore,
        clock: &dyn Clock,
        month: Option<CalendarMonth>,
    ) -> Result<Self> {
        let today = clock.today();
        let plants = store.list_plants()?;
        let month = month.unwrap_or_else(|| CalendarMonth::containing(today));
        Self::from_plants(plants, today, month)
    }

    /// Build a snapshot from already-loaded plants.
    pub fn from_plants(
        plants: Vec<PlantCareRecord>,
        today: NaiveDate,
        month: CalendarMonth,
    ) -> Result<Self> {
        let calendar = build_month(&plants, month);

        let mut summary = StatusSummary::default();
        let mut entries = Vec::with_capacity(plants.len());
        for plant in plants {
            let status = classify(plant.next_due_at, today, plant.watering_interval_days)
                .map_err(|e| {
                    tracing::warn!(
                        plant_id = %plant.id,
                        interval = plant.watering_interval_days,
                        error = %e,
                        "Plant has an invalid schedule"
                    );
                    e
                })?;
            summary.add(status.urgency);
            entries.push(PlantEntry {
                display_name: plant.display_name().to_string(),
                plant,
                status,
            });
        }

        entries.sort_by(|a, b| {
            b.status
                .urgency
                .cmp(&a.status.urgency)
                .then(a.plant.next_due_at.cmp(&b.plant.next_due_at))
                .then_with(|| a.display_name.cmp(&b.display_name))
        });

        tracing::debug!(
            %today,
            %month,
            plants = summary.total,
            overdue = summary.overdue,
            due_today = summary.due_today,
            "Built care snapshot"
        );

        Ok(Self {
            today,
            entries,
            summary,
            month,
            calendar,
        })
    }

    /// Entry for a plant id.
    pub fn entry(&self, plant_id: &str) -> Option<&PlantEntry> {
        self.entries.iter().find(|e| e.plant.id == plant_id)
    }

    /// Pretty-printed JSON for machine-readable output.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Entries in one urgency tier, in snapshot order.
    pub fn in_tier(&self, urgency: Urgency) -> impl Iterator<Item = &PlantEntry> {
        self.entries
            .iter()
            .filter(move |e| e.status.urgency == urgency)
    }
}

/// Load a plant's watering log and compute its streak with the configured
/// grace days.
pub fn plant_streak(
    store: &dyn PlantStore,
    plant: &PlantCareRecord,
    today: NaiveDate,
    care: &CareConfig,
) -> Result<StreakResult> {
    let events = store.list_watering_events(&plant.id)?;
    compute_streak(&events, plant.watering_interval_days, today, care.grace_days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::Error;
    use crate::types::WateringEvent;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    struct MemoryStore {
        plants: Vec<PlantCareRecord>,
        events: Vec<WateringEvent>,
    }

    impl PlantStore for MemoryStore {
        fn list_plants(&self) -> Result<Vec<PlantCareRecord>> {
            Ok(self.plants.clone())
        }

        fn list_watering_events(&self, plant_id: &str) -> Result<Vec<WateringEvent>> {
            Ok(self
                .events
                .iter()
                .filter(|e| e.plant_id == plant_id)
                .cloned()
                .collect())
        }
    }

    fn plant(id: &str, name: &str, interval: i64, due: NaiveDate) -> PlantCareRecord {
        PlantCareRecord {
            id: id.to_string(),
            species: name.to_string(),
            nickname: None,
            watering_interval_days: interval,
            last_watered_at: None,
            next_due_at: due,
            created_at: date(2024, 1, 1),
        }
    }

    fn store() -> MemoryStore {
        MemoryStore {
            plants: vec![
                plant("h", "Cactus", 14, date(2024, 1, 30)),
                plant("o", "Fern", 3, date(2024, 1, 15)),
                plant("t", "Basil", 2, date(2024, 1, 17)),
                plant("s", "Pothos", 7, date(2024, 1, 18)),
                plant("o2", "Aloe", 7, date(2024, 1, 12)),
            ],
            events: vec![
                WateringEvent::new("s", date(2024, 1, 4)),
                WateringEvent::new("s", date(2024, 1, 11)),
                WateringEvent::new("o", date(2024, 1, 12)),
            ],
        }
    }

    #[test]
    fn test_snapshot_orders_by_urgency() {
        let snapshot =
            CareSnapshot::build(&store(), &FixedClock(date(2024, 1, 17)), None).unwrap();

        let order: Vec<_> = snapshot.entries.iter().map(|e| e.plant.id.as_str()).collect();
        assert_eq!(order, vec!["o2", "o", "t", "s", "h"]);

        assert_eq!(
            snapshot.summary,
            StatusSummary {
                overdue: 2,
                due_today: 1,
                due_soon: 1,
                healthy: 1,
                total: 5,
            }
        );
        assert_eq!(snapshot.summary.needs_water(), 3);
        assert_eq!(snapshot.in_tier(Urgency::Overdue).count(), 2);
        assert_eq!(snapshot.entry("o2").unwrap().status.label, "5 days overdue");

        let json: serde_json::Value =
            serde_json::from_str(&snapshot.to_json_pretty().unwrap()).unwrap();
        assert_eq!(json["summary"]["overdue"], 2);
        assert_eq!(json["entries"][0]["status"]["urgency"], "overdue");
    }

    #[test]
    fn test_snapshot_calendar_matches_statuses() {
        let today = date(2024, 1, 17);
        let snapshot = CareSnapshot::build(&store(), &FixedClock(today), None).unwrap();
        assert_eq!(snapshot.month, CalendarMonth::new(2024, 1).unwrap());
        assert_eq!(snapshot.calendar.len(), 31);

        // Plants due today in the calendar are exactly the due-today tier
        let bucket = &snapshot.calendar[16];
        assert_eq!(bucket.date, today);
        let due_today: Vec<_> = snapshot
            .in_tier(Urgency::DueToday)
            .map(|e| e.plant.id.clone())
            .collect();
        assert_eq!(bucket.plants_due.iter().cloned().collect::<Vec<_>>(), due_today);
    }

    /// Advances one day on every read.
    struct TickingClock(std::sync::Mutex<NaiveDate>);

    impl Clock for TickingClock {
        fn today(&self) -> NaiveDate {
            let mut day = self.0.lock().unwrap();
            let current = *day;
            *day = current.succ_opt().unwrap();
            current
        }
    }

    #[test]
    fn test_snapshot_reads_clock_once() {
        let clock = TickingClock(std::sync::Mutex::new(date(2024, 1, 31)));
        let snapshot = CareSnapshot::build(&store(), &clock, None).unwrap();

        // Statuses and calendar month both come from the same reading
        assert_eq!(snapshot.today, date(2024, 1, 31));
        assert_eq!(snapshot.month, CalendarMonth::new(2024, 1).unwrap());
        assert_eq!(snapshot.entry("h").unwrap().status.days_until, -1);
        assert_eq!(clock.today(), date(2024, 2, 1));
    }

    #[test]
    fn test_invalid_interval_fails_snapshot() {
        let mut store = store();
        store.plants.push(plant("bad", "Broken", 0, date(2024, 1, 17)));
        let err = CareSnapshot::build(&store, &FixedClock(date(2024, 1, 17)), None).unwrap_err();
        assert!(matches!(err, Error::InvalidInterval { days: 0 }));
    }

    #[test]
    fn test_plant_streak_uses_store_log() {
        let store = store();
        let pothos = &store.plants[3];
        let streak =
            plant_streak(&store, pothos, date(2024, 1, 17), &CareConfig::default()).unwrap();
        assert_eq!(streak.current_streak_days, 1);
        assert_eq!(streak.best_streak_days, 1);
        assert_eq!(streak.last_watered_at, Some(date(2024, 1, 11)));
    }
}

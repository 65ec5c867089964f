//! Database repository layer
//!
//! Provides query and insert operations for plants and the watering log.
//! Every write that touches `last_watered_at` or the interval recomputes
//! `next_due_at` in the same transaction.

use crate::care::{compute_next_due, validate_interval};
use crate::error::{Error, Result};
use crate::store::PlantStore;
use crate::types::*;
use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const PLANT_COLUMNS: &str = "id, species, nickname, watering_interval_days, last_watered_at, \
                             next_due_at, created_at";

/// Database handle (single connection behind a mutex)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA foreign_keys = ON;
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        tracing::debug!(path = %path.display(), "Opened database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.lock();
        super::schema::run_migrations(&conn)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic while holding the lock cannot leave SQLite half-written
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ============================================
    // Plant operations
    // ============================================

    /// Add a plant, computing its first due date.
    ///
    /// A known `last_watered_at` is also recorded as the first watering event.
    pub fn add_plant(&self, new: &NewPlant, today: NaiveDate) -> Result<PlantCareRecord> {
        validate_interval(new.watering_interval_days)?;
        if let Some(last) = new.last_watered_at {
            reject_future(last, today)?;
        }

        let next_due_at =
            compute_next_due(new.last_watered_at, new.watering_interval_days, today)?;
        let plant = PlantCareRecord {
            id: uuid::Uuid::new_v4().to_string(),
            species: new.species.trim().to_string(),
            nickname: new
                .nickname
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            watering_interval_days: new.watering_interval_days,
            last_watered_at: new.last_watered_at,
            next_due_at,
            created_at: today,
        };

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO plants (id, species, nickname, watering_interval_days,
                                last_watered_at, next_due_at, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                plant.id,
                plant.species,
                plant.nickname,
                plant.watering_interval_days,
                plant.last_watered_at.map(format_date),
                format_date(plant.next_due_at),
                format_date(plant.created_at),
            ],
        )?;
        if let Some(last) = plant.last_watered_at {
            insert_event(&tx, &WateringEvent::new(plant.id.clone(), last))?;
        }
        tx.commit()?;

        tracing::info!(
            plant_id = %plant.id,
            name = plant.display_name(),
            interval = plant.watering_interval_days,
            next_due = %plant.next_due_at,
            "Added plant"
        );

        Ok(plant)
    }

    /// Get a plant by id
    pub fn get_plant(&self, id: &str) -> Result<Option<PlantCareRecord>> {
        let conn = self.lock();
        get_plant_with(&conn, id)
    }

    /// Find plants by id, id prefix, or case-insensitive name substring.
    ///
    /// An exact id match short-circuits the search. A blank query matches
    /// nothing.
    pub fn find_plants(&self, query: &str) -> Result<Vec<PlantCareRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        if let Some(plant) = self.get_plant(query)? {
            return Ok(vec![plant]);
        }

        let needle = query.to_lowercase();
        let matches = self
            .list_plants()?
            .into_iter()
            .filter(|p| {
                p.id.starts_with(query) || p.display_name().to_lowercase().contains(&needle)
            })
            .collect();
        Ok(matches)
    }

    /// Resolve a query to exactly one plant.
    ///
    /// When several plants match, a case-insensitive exact name match wins;
    /// otherwise the query is ambiguous.
    pub fn resolve_plant(&self, query: &str) -> Result<PlantCareRecord> {
        let mut matches = self.find_plants(query)?;
        match matches.len() {
            0 => Err(Error::PlantNotFound(query.to_string())),
            1 => Ok(matches.remove(0)),
            count => {
                let needle = query.trim().to_lowercase();
                let mut exact: Vec<_> = matches
                    .into_iter()
                    .filter(|p| p.display_name().to_lowercase() == needle)
                    .collect();
                if exact.len() == 1 {
                    Ok(exact.remove(0))
                } else {
                    Err(Error::AmbiguousPlant {
                        query: query.to_string(),
                        count,
                    })
                }
            }
        }
    }

    /// Change a plant's interval and recompute its due date.
    pub fn update_interval(
        &self,
        plant_id: &str,
        interval_days: i64,
        today: NaiveDate,
    ) -> Result<PlantCareRecord> {
        validate_interval(interval_days)?;

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let mut plant = get_plant_with(&tx, plant_id)?
            .ok_or_else(|| Error::PlantNotFound(plant_id.to_string()))?;

        plant.watering_interval_days = interval_days;
        plant.next_due_at = compute_next_due(plant.last_watered_at, interval_days, today)?;

        tx.execute(
            "UPDATE plants SET watering_interval_days = ?1, next_due_at = ?2 WHERE id = ?3",
            params![interval_days, format_date(plant.next_due_at), plant.id],
        )?;
        tx.commit()?;

        tracing::info!(
            plant_id = %plant.id,
            interval = interval_days,
            next_due = %plant.next_due_at,
            "Updated watering interval"
        );

        Ok(plant)
    }

    /// Remove a plant and its watering log.
    pub fn remove_plant(&self, plant_id: &str) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM watering_events WHERE plant_id = ?1",
            [plant_id],
        )?;
        let removed = tx.execute("DELETE FROM plants WHERE id = ?1", [plant_id])?;
        if removed == 0 {
            return Err(Error::PlantNotFound(plant_id.to_string()));
        }
        tx.commit()?;

        tracing::info!(plant_id, "Removed plant");
        Ok(())
    }

    // ============================================
    // Watering log operations
    // ============================================

    /// Append a watering event and reschedule the plant.
    ///
    /// `last_watered_at` becomes the latest watering day on record, so
    /// back-filling an older event never moves the schedule backwards.
    pub fn record_watering(
        &self,
        event: &WateringEvent,
        today: NaiveDate,
    ) -> Result<PlantCareRecord> {
        reject_future(event.occurred_at, today)?;

        let mut conn = self.lock();
        let tx = conn.transaction()?;
        let mut plant = get_plant_with(&tx, &event.plant_id)?
            .ok_or_else(|| Error::PlantNotFound(event.plant_id.clone()))?;

        insert_event(&tx, event)?;

        let last = plant
            .last_watered_at
            .map_or(event.occurred_at, |prev| prev.max(event.occurred_at));
        plant.last_watered_at = Some(last);
        plant.next_due_at = compute_next_due(Some(last), plant.watering_interval_days, today)?;

        tx.execute(
            "UPDATE plants SET last_watered_at = ?1, next_due_at = ?2 WHERE id = ?3",
            params![
                format_date(last),
                format_date(plant.next_due_at),
                plant.id
            ],
        )?;
        tx.commit()?;

        tracing::info!(
            plant_id = %plant.id,
            occurred_at = %event.occurred_at,
            amount_ml = event.amount_ml,
            next_due = %plant.next_due_at,
            "Recorded watering"
        );

        Ok(plant)
    }

    /// Count watering events for a plant
    pub fn count_watering_events(&self, plant_id: &str) -> Result<i64> {
        let conn = self.lock();
        let count = conn.query_row(
            "SELECT COUNT(*) FROM watering_events WHERE plant_id = ?1",
            [plant_id],
            |r| r.get(0),
        )?;
        Ok(count)
    }
}

impl PlantStore for Database {
    fn list_plants(&self) -> Result<Vec<PlantCareRecord>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM plants ORDER BY created_at ASC, rowid ASC",
            PLANT_COLUMNS
        ))?;
        let plants = stmt
            .query_map([], row_to_plant)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(plants)
    }

    fn list_watering_events(&self, plant_id: &str) -> Result<Vec<WateringEvent>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            r#"
            SELECT plant_id, occurred_at, amount_ml, note
            FROM watering_events
            WHERE plant_id = ?1
            ORDER BY occurred_at ASC, id ASC
            "#,
        )?;
        let events = stmt
            .query_map([plant_id], row_to_event)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(events)
    }
}

fn get_plant_with(conn: &Connection, id: &str) -> Result<Option<PlantCareRecord>> {
    let plant = conn
        .query_row(
            &format!("SELECT {} FROM plants WHERE id = ?1", PLANT_COLUMNS),
            [id],
            row_to_plant,
        )
        .optional()?;
    Ok(plant)
}

fn insert_event(conn: &Connection, event: &WateringEvent) -> Result<i64> {
    conn.execute(
        r#"
        INSERT INTO watering_events (plant_id, occurred_at, amount_ml, note)
        VALUES (?1, ?2, ?3, ?4)
        "#,
        params![
            event.plant_id,
            format_date(event.occurred_at),
            event.amount_ml,
            event.note,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn reject_future(date: NaiveDate, today: NaiveDate) -> Result<()> {
    if date > today {
        return Err(Error::InvalidDate(format!(
            "watering date {} is in the future (today is {})",
            date, today
        )));
    }
    Ok(())
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn date_at(row: &Row, idx: usize) -> rusqlite::Result<NaiveDate> {
    let text: String = row.get(idx)?;
    NaiveDate::parse_from_str(&text, DATE_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn optional_date_at(row: &Row, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let text: Option<String> = row.get(idx)?;
    text.map(|t| {
        NaiveDate::parse_from_str(&t, DATE_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn row_to_plant(row: &Row) -> rusqlite::Result<PlantCareRecord> {
    Ok(PlantCareRecord {
        id: row.get(0)?,
        species: row.get(1)?,
        nickname: row.get(2)?,
        watering_interval_days: row.get(3)?,
        last_watered_at: optional_date_at(row, 4)?,
        next_due_at: date_at(row, 5)?,
        created_at: date_at(row, 6)?,
    })
}

fn row_to_event(row: &Row) -> rusqlite::Result<WateringEvent> {
    Ok(WateringEvent {
        plant_id: row.get(0)?,
        occurred_at: date_at(row, 1)?,
        amount_ml: row.get(2)?,
        note: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    fn fern() -> NewPlant {
        NewPlant {
            species: "Boston Fern".to_string(),
            nickname: Some("Fernando".to_string()),
            watering_interval_days: 3,
            last_watered_at: None,
        }
    }

    #[test]
    fn test_add_never_watered_plant_is_due_today() {
        let db = test_db();
        let today = date(2024, 1, 10);
        let plant = db.add_plant(&fern(), today).unwrap();

        assert_eq!(plant.next_due_at, today);
        assert_eq!(plant.created_at, today);
        assert_eq!(plant.display_name(), "Fernando");
        assert_eq!(db.count_watering_events(&plant.id).unwrap(), 0);

        let stored = db.get_plant(&plant.id).unwrap().unwrap();
        assert_eq!(stored, plant);
    }

    #[test]
    fn test_add_with_last_watered_seeds_log() {
        let db = test_db();
        let new = NewPlant {
            last_watered_at: Some(date(2024, 1, 8)),
            ..fern()
        };
        let plant = db.add_plant(&new, date(2024, 1, 10)).unwrap();
        assert_eq!(plant.next_due_at, date(2024, 1, 11));

        let events = db.list_watering_events(&plant.id).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].occurred_at, date(2024, 1, 8));
    }

    #[test]
    fn test_add_rejects_invalid_input() {
        let db = test_db();
        let zero = NewPlant {
            watering_interval_days: 0,
            ..fern()
        };
        assert!(matches!(
            db.add_plant(&zero, date(2024, 1, 1)),
            Err(Error::InvalidInterval { days: 0 })
        ));

        let future = NewPlant {
            last_watered_at: Some(date(2024, 1, 2)),
            ..fern()
        };
        assert!(matches!(
            db.add_plant(&future, date(2024, 1, 1)),
            Err(Error::InvalidDate(_))
        ));
        assert!(db.list_plants().unwrap().is_empty());
    }

    #[test]
    fn test_record_watering_reschedules() {
        let db = test_db();
        let plant = db.add_plant(&fern(), date(2024, 1, 1)).unwrap();

        let updated = db
            .record_watering(&WateringEvent::new(&plant.id, date(2024, 1, 5)), date(2024, 1, 5))
            .unwrap();
        assert_eq!(updated.last_watered_at, Some(date(2024, 1, 5)));
        assert_eq!(updated.next_due_at, date(2024, 1, 8));

        // Back-filled older event keeps the latest watering
        let backfilled = db
            .record_watering(&WateringEvent::new(&plant.id, date(2024, 1, 2)), date(2024, 1, 6))
            .unwrap();
        assert_eq!(backfilled.last_watered_at, Some(date(2024, 1, 5)));
        assert_eq!(backfilled.next_due_at, date(2024, 1, 8));

        let events = db.list_watering_events(&plant.id).unwrap();
        let dates: Vec<_> = events.iter().map(|e| e.occurred_at).collect();
        assert_eq!(dates, vec![date(2024, 1, 2), date(2024, 1, 5)]);
    }

    #[test]
    fn test_record_watering_unknown_plant() {
        let db = test_db();
        let err = db
            .record_watering(&WateringEvent::new("missing", date(2024, 1, 1)), date(2024, 1, 1))
            .unwrap_err();
        assert!(matches!(err, Error::PlantNotFound(_)));
    }

    #[test]
    fn test_update_interval_recomputes_due() {
        let db = test_db();
        let new = NewPlant {
            last_watered_at: Some(date(2024, 1, 10)),
            ..fern()
        };
        let plant = db.add_plant(&new, date(2024, 1, 10)).unwrap();

        let updated = db.update_interval(&plant.id, 7, date(2024, 1, 12)).unwrap();
        assert_eq!(updated.watering_interval_days, 7);
        assert_eq!(updated.next_due_at, date(2024, 1, 17));

        assert!(matches!(
            db.update_interval(&plant.id, -2, date(2024, 1, 12)),
            Err(Error::InvalidInterval { days: -2 })
        ));
        assert_eq!(db.get_plant(&plant.id).unwrap().unwrap(), updated);
    }

    #[test]
    fn test_resolve_plant() {
        let db = test_db();
        let today = date(2024, 1, 1);
        let fern = db.add_plant(&fern(), today).unwrap();
        let pothos = db
            .add_plant(
                &NewPlant {
                    species: "Golden Pothos".to_string(),
                    nickname: None,
                    watering_interval_days: 7,
                    last_watered_at: None,
                },
                today,
            )
            .unwrap();
        db.add_plant(
            &NewPlant {
                species: "Pothos".to_string(),
                nickname: None,
                watering_interval_days: 7,
                last_watered_at: None,
            },
            today,
        )
        .unwrap();

        assert_eq!(db.resolve_plant("fernando").unwrap().id, fern.id);
        assert_eq!(db.resolve_plant(&pothos.id).unwrap().id, pothos.id);
        // Two names contain "pothos" but only one equals it
        assert_eq!(db.resolve_plant("pothos").unwrap().species, "Pothos");
        assert!(matches!(
            db.resolve_plant("o"),
            Err(Error::AmbiguousPlant { count: 3, .. })
        ));
        assert!(matches!(
            db.resolve_plant("cactus"),
            Err(Error::PlantNotFound(_))
        ));
    }

    #[test]
    fn test_blank_query_matches_nothing() {
        let db = test_db();
        let plant = db.add_plant(&fern(), date(2024, 1, 1)).unwrap();

        assert!(db.find_plants("").unwrap().is_empty());
        assert!(db.find_plants("   ").unwrap().is_empty());
        assert!(matches!(
            db.resolve_plant("   "),
            Err(Error::PlantNotFound(_))
        ));
        assert!(db.get_plant(&plant.id).unwrap().is_some());
    }

    #[test]
    fn test_resolve_exact_name_ignores_unicode_case() {
        let db = test_db();
        let today = date(2024, 1, 1);
        let exact = db
            .add_plant(
                &NewPlant {
                    species: "Ölbaum".to_string(),
                    nickname: None,
                    watering_interval_days: 10,
                    last_watered_at: None,
                },
                today,
            )
            .unwrap();
        db.add_plant(
            &NewPlant {
                species: "Großer Ölbaum".to_string(),
                nickname: None,
                watering_interval_days: 10,
                last_watered_at: None,
            },
            today,
        )
        .unwrap();

        assert_eq!(db.resolve_plant("ÖLBAUM").unwrap().id, exact.id);
    }

    #[test]
    fn test_remove_plant() {
        let db = test_db();
        let today = date(2024, 1, 1);
        let plant = db.add_plant(&fern(), today).unwrap();
        db.record_watering(&WateringEvent::new(&plant.id, today), today)
            .unwrap();

        db.remove_plant(&plant.id).unwrap();
        assert!(db.get_plant(&plant.id).unwrap().is_none());
        assert_eq!(db.count_watering_events(&plant.id).unwrap(), 0);
        assert!(matches!(
            db.remove_plant(&plant.id),
            Err(Error::PlantNotFound(_))
        ));
    }
}

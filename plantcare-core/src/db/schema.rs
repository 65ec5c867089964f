//! Database schema and migrations
//!
//! Uses SQLite with embedded migrations managed via PRAGMA user_version.
//! Dates are stored as `YYYY-MM-DD` text.

use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// SQL migrations, indexed by version number
const MIGRATIONS: &[&str] = &[
    // Version 1: plants and the watering log
    r#"
    CREATE TABLE IF NOT EXISTS plants (
        id                     TEXT PRIMARY KEY,
        species                TEXT NOT NULL,
        nickname               TEXT,
        watering_interval_days INTEGER NOT NULL CHECK (watering_interval_days >= 1),
        last_watered_at        TEXT,
        next_due_at            TEXT NOT NULL,
        created_at             TEXT NOT NULL
    );

    -- Append-only; rowid order is insertion order
    CREATE TABLE IF NOT EXISTS watering_events (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        plant_id         TEXT NOT NULL REFERENCES plants(id) ON DELETE CASCADE,
        occurred_at      TEXT NOT NULL,
        amount_ml        INTEGER,
        note             TEXT
    );
    "#,
    // Version 2: lookup indexes
    r#"
    CREATE INDEX IF NOT EXISTS idx_watering_events_plant
        ON watering_events(plant_id, occurred_at);
    CREATE INDEX IF NOT EXISTS idx_plants_next_due
        ON plants(next_due_at);
    "#,
];

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> crate::error::Result<()> {
    let current_version: i32 = conn
        .query_row("PRAGMA user_version", [], |r| r.get(0))
        .unwrap_or(0);

    tracing::info!(
        current_version,
        target_version = SCHEMA_VERSION,
        "Checking database migrations"
    );

    for (i, migration) in MIGRATIONS.iter().enumerate() {
        let version = (i + 1) as i32;
        if version > current_version {
            tracing::info!(version, "Running migration");
            conn.execute_batch(migration)?;
            conn.execute_batch(&format!("PRAGMA user_version = {}", version))?;
        }
    }

    if current_version < SCHEMA_VERSION {
        tracing::info!(
            from = current_version,
            to = SCHEMA_VERSION,
            "Migrations complete"
        );
    }

    Ok(())
}

/// Get the current schema version from the database
pub fn get_schema_version(conn: &Connection) -> crate::error::Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    Ok(version)
}

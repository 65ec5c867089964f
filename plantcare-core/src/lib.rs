//! # plantcare-core
//!
//! Core library for plantcare - a plant watering tracker.
//!
//! This library provides:
//! - Domain types for plants and the watering log
//! - The care engine: due dates, status badges, streaks and month calendars
//! - Database storage layer with SQLite
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Stored records:** plants and an append-only watering log ([`db`])
//! - **Care engine:** pure functions over records and a date ([`care`])
//! - **Presentation:** front ends render [`care::CareSnapshot`]s
//!
//! ## Example
//!
//! ```rust,no_run
//! use plantcare_core::care::CareSnapshot;
//! use plantcare_core::{Config, Database, SystemClock};
//!
//! let config = Config::load().expect("failed to load config");
//!
//! let db = Database::open(&config.resolved_database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let snapshot = CareSnapshot::build(&db, &SystemClock, None).expect("failed to build snapshot");
//! for entry in &snapshot.entries {
//!     println!("{}: {}", entry.display_name, entry.status.label);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use store::PlantStore;
pub use types::*;

// Public modules
pub mod care;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod format;
pub mod logging;
pub mod store;
pub mod types;

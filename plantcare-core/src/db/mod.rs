//! Database layer for plantcare
//!
//! This module provides the storage layer using SQLite with:
//! - Schema migrations
//! - Repository pattern for queries
//! - The [`PlantStore`](crate::store::PlantStore) implementation the care engine reads from

pub mod repo;
pub mod schema;

pub use repo::Database;

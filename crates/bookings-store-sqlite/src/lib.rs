//! SQLite backend for bookings.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The schema is owned by the bundled
//! migrations under `migrations/`, applied through [`SqliteStore`]'s
//! [`MigrationRunner`](bookings_core::MigrationRunner) implementation.

mod encode;
mod migrations;
mod sql;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use migrations::{MIGRATIONS_DIR, Migration};
pub use store::SqliteStore;

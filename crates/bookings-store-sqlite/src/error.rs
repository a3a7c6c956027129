//! Error type for `bookings-store-sqlite`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] bookings_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("failed to read migrations from {path:?}: {source}")]
  MigrationIo {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("migration batch number out of range: {0}")]
  BatchOutOfRange(i64),

  /// Migrations were requested in production without `force`.
  #[error("refusing to migrate in production without force")]
  ProductionWithoutForce,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

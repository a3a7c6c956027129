//! Error types for `bookings-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid table name for {key}: {name:?}")]
  InvalidTableName { key: &'static str, name: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Runtime configuration, resolved once at startup and handed to the store.

use std::path::PathBuf;

use serde::Deserialize;
use strum::Display;

use crate::{Error, Result};

/// Names of the tables the store reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Tables {
  pub bookings:       String,
  /// Join table between subjects and bookings.
  pub bookings_users: String,
}

impl Default for Tables {
  fn default() -> Self {
    Self {
      bookings:       "bookings".to_owned(),
      bookings_users: "bookings_users".to_owned(),
    }
  }
}

/// Deployment environment. Migrations refuse to run in `Production` unless
/// forced.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Display, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
  #[default]
  Local,
  Testing,
  Production,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookingsConfig {
  pub tables:                Tables,
  /// When `false`, `is_booked` matches on the bookable key alone, so a
  /// resource of another type sharing the key counts as booked.
  pub strict_bookable_match: bool,
  pub environment:           Environment,
  pub database_path:         PathBuf,
}

impl Default for BookingsConfig {
  fn default() -> Self {
    Self {
      tables:                Tables::default(),
      strict_bookable_match: false,
      environment:           Environment::default(),
      database_path:         PathBuf::from("bookings.sqlite"),
    }
  }
}

impl BookingsConfig {
  /// Check that configured table names are safe to splice into SQL.
  pub fn validate(&self) -> Result<()> {
    check_identifier("tables.bookings", &self.tables.bookings)?;
    check_identifier("tables.bookings_users", &self.tables.bookings_users)?;
    Ok(())
  }
}

fn check_identifier(key: &'static str, name: &str) -> Result<()> {
  let mut chars = name.chars();
  let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
  if valid {
    Ok(())
  } else {
    Err(Error::InvalidTableName { key, name: name.to_owned() })
  }
}

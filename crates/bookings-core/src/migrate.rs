//! The seam between the `migrate:bookings` command and whatever actually
//! applies schema migrations.

use std::{future::Future, path::PathBuf};

/// Arguments forwarded to a [`MigrationRunner`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrateOptions {
  /// Give every migration its own batch, so each can be rolled back alone.
  pub step:  bool,
  /// Directory holding the migration definitions to apply.
  pub path:  PathBuf,
  /// Run even when the environment is production.
  pub force: bool,
}

/// What a run applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
  /// Names of the migrations applied, in order.
  pub ran:        Vec<String>,
  /// Highest batch number written; `None` if nothing ran.
  pub last_batch: Option<u32>,
}

impl MigrationReport {
  pub fn is_empty(&self) -> bool { self.ran.is_empty() }
}

pub trait MigrationRunner: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn migrate(
    &self,
    options: MigrateOptions,
  ) -> impl Future<Output = Result<MigrationReport, Self::Error>> + Send + '_;
}

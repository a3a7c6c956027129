//! Console commands for bookings.
//!
//! The only command, `migrate:bookings`, forwards to a [`MigrationRunner`]
//! pointed at the bundled migration definitions.

use std::path::PathBuf;

use bookings_core::{MigrateOptions, MigrationReport, MigrationRunner};
use bookings_store_sqlite::MIGRATIONS_DIR;
use tracing::warn;

/// `migrate:bookings [--force]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrateCommand {
  /// Run even when the environment is production.
  pub force: bool,
}

impl MigrateCommand {
  pub const NAME: &'static str = "migrate:bookings";
  pub const DESCRIPTION: &'static str = "Migrate Bookings Tables.";

  /// Arguments handed to the runner. Only `force` varies.
  pub fn options(&self) -> MigrateOptions {
    MigrateOptions {
      step:  true,
      path:  PathBuf::from(MIGRATIONS_DIR),
      force: self.force,
    }
  }

  /// Announce the command and delegate to `runner`. Runner errors are
  /// returned untouched.
  pub async fn handle<R: MigrationRunner>(
    &self,
    runner: &R,
  ) -> Result<MigrationReport, R::Error> {
    warn!("{}", Self::DESCRIPTION);
    runner.migrate(self.options()).await
  }
}

#[cfg(test)]
mod tests {
  use std::{io, sync::Mutex};

  use bookings_core::BookingsConfig;
  use bookings_store_sqlite::SqliteStore;

  use super::*;

  /// Records what it was asked to do instead of touching a database.
  #[derive(Default)]
  struct RecordingRunner {
    calls: Mutex<Vec<MigrateOptions>>,
  }

  impl MigrationRunner for RecordingRunner {
    type Error = io::Error;

    async fn migrate(&self, options: MigrateOptions) -> io::Result<MigrationReport> {
      self.calls.lock().unwrap().push(options);
      Ok(MigrationReport { ran: vec!["0001_example".into()], last_batch: Some(1) })
    }
  }

  struct FailingRunner;

  impl MigrationRunner for FailingRunner {
    type Error = io::Error;

    async fn migrate(&self, _options: MigrateOptions) -> io::Result<MigrationReport> {
      Err(io::Error::other("database is locked"))
    }
  }

  #[tokio::test]
  async fn force_flag_is_forwarded() {
    let runner = RecordingRunner::default();
    MigrateCommand { force: true }.handle(&runner).await.unwrap();
    MigrateCommand { force: false }.handle(&runner).await.unwrap();

    let calls = runner.calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].force);
    assert!(!calls[1].force);
  }

  #[tokio::test]
  async fn step_and_path_are_fixed() {
    let runner = RecordingRunner::default();
    for force in [true, false] {
      MigrateCommand { force }.handle(&runner).await.unwrap();
    }

    for call in runner.calls.lock().unwrap().iter() {
      assert!(call.step);
      assert_eq!(call.path, PathBuf::from(MIGRATIONS_DIR));
    }
  }

  #[tokio::test]
  async fn runner_report_is_returned() {
    let report = MigrateCommand::default()
      .handle(&RecordingRunner::default())
      .await
      .unwrap();
    assert_eq!(report.ran, vec!["0001_example"]);
  }

  #[tokio::test]
  async fn runner_error_propagates_unchanged() {
    let err = MigrateCommand::default().handle(&FailingRunner).await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::Other);
    assert_eq!(err.to_string(), "database is locked");
  }

  #[tokio::test]
  async fn migrates_a_fresh_database_from_embedded_definitions() {
    let dir = tempfile::tempdir().unwrap();
    let config = BookingsConfig {
      database_path: dir.path().join("bookings.sqlite"),
      ..BookingsConfig::default()
    };
    let store = SqliteStore::open(config).await.unwrap();

    let report = MigrateCommand::default().handle(&store).await.unwrap();
    assert_eq!(report.ran, vec![
      "2024_01_01_000001_create_bookings_table",
      "2024_01_01_000002_create_bookings_users_table",
    ]);
    assert_eq!(report.last_batch, Some(2));

    let again = MigrateCommand::default().handle(&store).await.unwrap();
    assert!(again.is_empty());
  }
}

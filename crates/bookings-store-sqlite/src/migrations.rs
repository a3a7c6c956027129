//! Schema migrations.
//!
//! A migration is a `.sql` file; its name is the file stem and files apply in
//! name order. Table names are written as `{bookings}` / `{bookings_users}`
//! placeholders and filled in from configuration. Applied migrations are
//! recorded in a `migrations` table with a batch number, so re-running only
//! applies what is new.

use std::{collections::HashSet, path::Path};

use bookings_core::{
  BookingStore, Environment, MigrateOptions, MigrationReport, MigrationRunner, Tables,
};
use tracing::{info, warn};

use crate::{Error, Result, SqliteStore};

/// Directory the bundled migration definitions were built from.
///
/// Naming this path in [`MigrateOptions`] selects the copies embedded in the
/// binary; the directory itself need not exist at run time.
pub const MIGRATIONS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/migrations");

const BUNDLED: &[(&str, &str)] = &[
  (
    "2024_01_01_000001_create_bookings_table",
    include_str!("../migrations/2024_01_01_000001_create_bookings_table.sql"),
  ),
  (
    "2024_01_01_000002_create_bookings_users_table",
    include_str!("../migrations/2024_01_01_000002_create_bookings_users_table.sql"),
  ),
];

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    migration TEXT NOT NULL UNIQUE,
    batch     INTEGER NOT NULL
);
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Migration {
  pub name: String,
  pub sql:  String,
}

impl Migration {
  /// Load every `*.sql` file in `dir`, sorted by name.
  pub fn load_dir(dir: &Path) -> Result<Vec<Self>> {
    let io_err = |source| Error::MigrationIo { path: dir.to_path_buf(), source };

    let mut paths = vec![];
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
      let path = entry.map_err(io_err)?.path();
      if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
        paths.push(path);
      }
    }
    paths.sort();

    paths
      .into_iter()
      .map(|path| {
        let sql = std::fs::read_to_string(&path)
          .map_err(|source| Error::MigrationIo { path: path.clone(), source })?;
        let name = path
          .file_stem()
          .map(|s| s.to_string_lossy().into_owned())
          .unwrap_or_default();
        Ok(Self { name, sql })
      })
      .collect()
  }

  /// The migrations to apply for `path`: the embedded set when `path` is
  /// [`MIGRATIONS_DIR`], otherwise the files found there.
  pub fn resolve(path: &Path) -> Result<Vec<Self>> {
    Self::resolve_against(path, Path::new(MIGRATIONS_DIR))
  }

  fn resolve_against(path: &Path, bundled_dir: &Path) -> Result<Vec<Self>> {
    if path == bundled_dir {
      Ok(Self::bundled())
    } else {
      Self::load_dir(path)
    }
  }

  pub fn bundled() -> Vec<Self> {
    BUNDLED
      .iter()
      .map(|(name, sql)| Self { name: (*name).to_owned(), sql: (*sql).to_owned() })
      .collect()
  }

  /// Substitute configured table names for the placeholders.
  fn render(&self, tables: &Tables) -> String {
    self
      .sql
      .replace("{bookings_users}", &tables.bookings_users)
      .replace("{bookings}", &tables.bookings)
  }
}

impl SqliteStore {
  /// Apply every migration in `migrations` not yet recorded.
  ///
  /// With `step`, each migration gets its own batch; otherwise the whole run
  /// shares one. Each migration commits together with its bookkeeping row.
  pub async fn run_migrations(
    &self,
    migrations: Vec<Migration>,
    step: bool,
  ) -> Result<MigrationReport> {
    let tables = &self.config().tables;
    let rendered: Vec<(String, String)> = migrations
      .iter()
      .map(|m| (m.name.clone(), m.render(tables)))
      .collect();

    let (ran, last_batch) = self
      .conn()
      .call(move |conn| {
        conn.execute_batch(MIGRATIONS_TABLE)?;

        let done: HashSet<String> = {
          let mut stmt = conn.prepare("SELECT migration FROM migrations")?;
          stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?
        };

        let mut batch: i64 = conn.query_row(
          "SELECT COALESCE(MAX(batch), 0) FROM migrations",
          [],
          |row| row.get(0),
        )?;

        let mut ran = vec![];
        for (name, sql) in rendered {
          if done.contains(&name) {
            continue;
          }
          if step || ran.is_empty() {
            batch += 1;
          }

          info!(migration = %name, batch, "migrating");
          let tx = conn.transaction()?;
          tx.execute_batch(&sql)?;
          tx.execute(
            "INSERT INTO migrations (migration, batch) VALUES (?1, ?2)",
            rusqlite::params![name, batch],
          )?;
          tx.commit()?;
          info!(migration = %name, "migrated");

          ran.push(name);
        }

        let last_batch = (!ran.is_empty()).then_some(batch);
        Ok((ran, last_batch))
      })
      .await?;

    if ran.is_empty() {
      info!("nothing to migrate");
    }

    let last_batch = last_batch
      .map(|b| u32::try_from(b).map_err(|_| Error::BatchOutOfRange(b)))
      .transpose()?;

    Ok(MigrationReport { ran, last_batch })
  }
}

impl MigrationRunner for SqliteStore {
  type Error = Error;

  async fn migrate(&self, options: MigrateOptions) -> Result<MigrationReport> {
    let environment = self.config().environment;
    if environment == Environment::Production && !options.force {
      warn!(%environment, "migration refused; rerun with force");
      return Err(Error::ProductionWithoutForce);
    }

    let migrations = Migration::resolve(&options.path)?;
    self.run_migrations(migrations, options.step).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_set_matches_directory() {
    let on_disk = Migration::load_dir(Path::new(MIGRATIONS_DIR)).unwrap();
    assert_eq!(Migration::bundled(), on_disk);
  }

  #[test]
  fn bundled_path_needs_no_directory() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("migrations");
    assert!(!gone.exists());

    let resolved = Migration::resolve_against(&gone, &gone).unwrap();
    assert_eq!(resolved, Migration::bundled());
  }

  #[test]
  fn other_paths_are_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("0001_rooms.sql"), "CREATE TABLE rooms (id INTEGER);").unwrap();

    let resolved = Migration::resolve(dir.path()).unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].name, "0001_rooms");
  }

  #[test]
  fn placeholders_take_configured_names() {
    let m = Migration {
      name: "x".into(),
      sql:  "CREATE TABLE {bookings_users} (b TEXT REFERENCES {bookings}(id));".into(),
    };
    let tables = Tables { bookings: "r".into(), bookings_users: "rh".into() };
    assert_eq!(m.render(&tables), "CREATE TABLE rh (b TEXT REFERENCES r(id));");
  }
}

//! `bookings` — maintenance commands for the bookings store.
//!
//! # Usage
//!
//! ```
//! bookings migrate:bookings
//! bookings migrate:bookings --force
//! ```
//!
//! Configuration is read from an optional `bookings.toml` in the working
//! directory, overridden by `BOOKINGS_*` environment variables (nested keys
//! use `__`, e.g. `BOOKINGS_TABLES__BOOKINGS_USERS`).

use anyhow::Context as _;
use bookings_cli::MigrateCommand;
use bookings_core::BookingsConfig;
use bookings_store_sqlite::SqliteStore;
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bookings", version, about = "Bookings maintenance commands")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Migrate Bookings Tables.
  #[command(name = "migrate:bookings")]
  MigrateBookings {
    /// Force the operation to run when in production.
    #[arg(long)]
    force: bool,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::with_name("bookings").required(false))
    .add_source(
      config::Environment::with_prefix("BOOKINGS")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read configuration")?;

  let bookings_cfg: BookingsConfig = settings
    .try_deserialize()
    .context("failed to deserialise BookingsConfig")?;

  let store_path = bookings_cfg.database_path.clone();
  let store = SqliteStore::open(bookings_cfg)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  match cli.command {
    Command::MigrateBookings { force } => {
      let report = MigrateCommand { force }
        .handle(&store)
        .await
        .context("migration failed")?;
      for name in &report.ran {
        println!("Migrated: {name}");
      }
      if report.is_empty() {
        println!("Nothing to migrate.");
      }
    }
  }

  Ok(())
}

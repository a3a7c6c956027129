//! [`SqliteStore`] — the SQLite implementation of [`BookingStore`].

use std::sync::Arc;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use tracing::debug;

use bookings_core::{Booking, BookingId, BookingQuery, BookingStore, BookingsConfig, NewBooking};

use crate::{
  Result,
  encode::{BOOKING_COLUMNS, RawBooking, encode_dt, encode_id, truncate_dt},
  migrations::Migration,
  sql::{self, Statement},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A booking store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection and configuration are
/// reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  config: Arc<BookingsConfig>,
}

impl SqliteStore {
  /// Open (or create) the database at `config.database_path`.
  ///
  /// The schema is not touched; apply migrations through
  /// [`MigrationRunner`](bookings_core::MigrationRunner) first.
  pub async fn open(config: BookingsConfig) -> Result<Self> {
    config.validate()?;
    let conn = tokio_rusqlite::Connection::open(&config.database_path).await?;
    let store = Self { conn, config: Arc::new(config) };
    store.configure().await?;
    Ok(store)
  }

  /// Open an in-memory store with the bundled migrations applied — useful
  /// for testing.
  pub async fn open_in_memory(config: BookingsConfig) -> Result<Self> {
    config.validate()?;
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, config: Arc::new(config) };
    store.configure().await?;
    store.run_migrations(Migration::bundled(), true).await?;
    Ok(store)
  }

  pub(crate) fn conn(&self) -> &tokio_rusqlite::Connection { &self.conn }

  async fn configure(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(
          "PRAGMA journal_mode = WAL;
           PRAGMA foreign_keys = ON;",
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn fetch(&self, stmt: Statement) -> Result<Vec<Booking>> {
    let raws: Vec<RawBooking> = self
      .conn
      .call(move |conn| {
        let mut prepared = conn.prepare(&stmt.sql)?;
        let rows = prepared
          .query_map(rusqlite::params_from_iter(stmt.params), RawBooking::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBooking::into_booking).collect()
  }

  async fn scalar(&self, stmt: Statement) -> Result<i64> {
    let value = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          &stmt.sql,
          rusqlite::params_from_iter(stmt.params),
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(value)
  }
}

// ─── BookingStore impl ───────────────────────────────────────────────────────

impl BookingStore for SqliteStore {
  type Error = crate::Error;

  fn config(&self) -> &BookingsConfig { &self.config }

  async fn create_booking(&self, input: NewBooking) -> Result<Booking> {
    // Stored at microsecond precision; return what a reload yields.
    let now = truncate_dt(Utc::now())?;
    let booking = Booking {
      id:         BookingId::new(),
      bookable:   input.bookable,
      user:       input.user,
      starts_at:  truncate_dt(input.starts_at)?,
      ends_at:    truncate_dt(input.ends_at)?,
      created_at: now,
      updated_at: now,
    };

    let insert_booking = format!(
      "INSERT INTO {} (
         id, bookable_id, bookable_type, user_id, user_type,
         starts_at, ends_at, created_at, updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
      self.config.tables.bookings
    );
    let insert_link = format!(
      "INSERT INTO {} (booking_id, user_id, user_type) VALUES (?1, ?2, ?3)",
      self.config.tables.bookings_users
    );

    let id_str        = encode_id(booking.id);
    let bookable_id   = booking.bookable.bookable_id;
    let bookable_type = booking.bookable.bookable_type.clone();
    let user_id       = booking.user.subject_id;
    let user_type     = booking.user.subject_type.clone();
    let starts_us     = encode_dt(booking.starts_at);
    let ends_us       = encode_dt(booking.ends_at);
    let now_us        = encode_dt(now);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          &insert_booking,
          rusqlite::params![
            id_str,
            bookable_id,
            bookable_type,
            user_id,
            user_type,
            starts_us,
            ends_us,
            now_us,
            now_us,
          ],
        )?;
        tx.execute(&insert_link, rusqlite::params![id_str, user_id, user_type])?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    debug!(
      booking = %booking.id,
      bookable_type = %booking.bookable.bookable_type,
      bookable_id = booking.bookable.bookable_id,
      "booking created"
    );
    Ok(booking)
  }

  async fn find_booking(&self, id: BookingId) -> Result<Option<Booking>> {
    let id_str = encode_id(id);
    let sql = format!(
      "SELECT {BOOKING_COLUMNS} FROM {} b WHERE b.id = ?1",
      self.config.tables.bookings
    );

    let raw: Option<RawBooking> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawBooking::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawBooking::into_booking).transpose()
  }

  async fn get_bookings(&self, query: &BookingQuery) -> Result<Vec<Booking>> {
    self.fetch(sql::select(&self.config.tables, query)).await
  }

  async fn bookings_exist(&self, query: &BookingQuery) -> Result<bool> {
    Ok(self.scalar(sql::exists(&self.config.tables, query)).await? != 0)
  }

  async fn count_bookings(&self, query: &BookingQuery) -> Result<u64> {
    let n = self.scalar(sql::count(&self.config.tables, query)).await?;
    Ok(u64::try_from(n).unwrap_or_default())
  }
}

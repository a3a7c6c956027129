//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as integer microseconds since the Unix epoch. Every
//! `DateTime<Utc>` fits in an `i64` at that precision, and integer order is
//! chronological order, so SQL comparisons on them are sound. Sub-microsecond
//! precision is dropped. Booking ids are hyphenated lowercase UUIDs.

use bookings_core::{Bookable, Booking, BookingId, Subject};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── BookingId ───────────────────────────────────────────────────────────────

pub fn encode_id(id: BookingId) -> String { id.0.hyphenated().to_string() }

pub fn decode_id(s: &str) -> Result<BookingId> { Ok(BookingId(Uuid::parse_str(s)?)) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> i64 { dt.timestamp_micros() }

pub fn decode_dt(micros: i64) -> Result<DateTime<Utc>> {
  DateTime::from_timestamp_micros(micros)
    .ok_or_else(|| Error::DateParse(format!("timestamp out of range: {micros}")))
}

/// `dt` as it will read back from the store.
pub fn truncate_dt(dt: DateTime<Utc>) -> Result<DateTime<Utc>> { decode_dt(encode_dt(dt)) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching the field order of [`RawBooking::from_row`].
pub const BOOKING_COLUMNS: &str = "b.id, b.bookable_id, b.bookable_type, b.user_id, b.user_type, \
                                   b.starts_at, b.ends_at, b.created_at, b.updated_at";

/// Raw values read directly from a bookings row.
pub struct RawBooking {
  pub id:            String,
  pub bookable_id:   i64,
  pub bookable_type: String,
  pub user_id:       i64,
  pub user_type:     String,
  pub starts_at:     i64,
  pub ends_at:       i64,
  pub created_at:    i64,
  pub updated_at:    i64,
}

impl RawBooking {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      bookable_id:   row.get(1)?,
      bookable_type: row.get(2)?,
      user_id:       row.get(3)?,
      user_type:     row.get(4)?,
      starts_at:     row.get(5)?,
      ends_at:       row.get(6)?,
      created_at:    row.get(7)?,
      updated_at:    row.get(8)?,
    })
  }

  pub fn into_booking(self) -> Result<Booking> {
    Ok(Booking {
      id:         decode_id(&self.id)?,
      bookable:   Bookable::new(self.bookable_type, self.bookable_id),
      user:       Subject::new(self.user_type, self.user_id),
      starts_at:  decode_dt(self.starts_at)?,
      ends_at:    decode_dt(self.ends_at)?,
      created_at: decode_dt(self.created_at)?,
      updated_at: decode_dt(self.updated_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone};

  use super::*;

  #[test]
  fn timestamps_order_numerically() {
    let early = Utc.with_ymd_and_hms(2024, 3, 1, 9, 59, 59).unwrap();
    let late = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    assert!(encode_dt(early) < encode_dt(late));
    assert_eq!(encode_dt(late), 1_709_287_200_000_000);
  }

  #[test]
  fn extreme_years_survive_encoding() {
    for dt in [
      Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap(),
      Utc.with_ymd_and_hms(-50, 6, 1, 12, 0, 0).unwrap(),
      DateTime::<Utc>::MAX_UTC - Duration::nanoseconds(999),
      DateTime::<Utc>::MIN_UTC,
    ] {
      let truncated = truncate_dt(dt).unwrap();
      assert_eq!(decode_dt(encode_dt(truncated)).unwrap(), truncated);
    }

    let ancient = Utc.with_ymd_and_hms(-50, 6, 1, 12, 0, 0).unwrap();
    let far = Utc.with_ymd_and_hms(10000, 1, 1, 0, 0, 0).unwrap();
    assert!(encode_dt(ancient) < encode_dt(Utc::now()));
    assert!(encode_dt(Utc::now()) < encode_dt(far));
  }

  #[test]
  fn sub_microsecond_precision_is_dropped() {
    let dt = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap() + Duration::nanoseconds(1_500);
    let truncated = truncate_dt(dt).unwrap();
    assert_eq!(truncated, dt - Duration::nanoseconds(500));
  }

  #[test]
  fn out_of_range_integer_is_reported() {
    assert!(matches!(decode_dt(i64::MAX), Err(Error::DateParse(_))));
  }
}

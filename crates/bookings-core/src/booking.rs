//! Booking records.
//!
//! A booking links one subject to one bookable over a time interval. Once
//! written it is never updated; there is no status and no lifecycle beyond
//! creation.

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::morph::{Bookable, Subject};

/// Opaque primary key, assigned by the store on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookingId(pub Uuid);

impl BookingId {
  pub fn new() -> Self { Self(Uuid::new_v4()) }
}

impl Default for BookingId {
  fn default() -> Self { Self::new() }
}

impl fmt::Display for BookingId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
}

/// A persisted booking.
///
/// `starts_at` and `ends_at` are stored as supplied, at microsecond
/// precision. Nothing checks that the interval is well-formed or that it does
/// not overlap another booking of the same resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
  pub id:         BookingId,
  pub bookable:   Bookable,
  pub user:       Subject,
  pub starts_at:  DateTime<Utc>,
  pub ends_at:    DateTime<Utc>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Booking {
  /// The resource this booking reserves.
  pub fn bookable(&self) -> &Bookable { &self.bookable }

  /// The subject that made this booking.
  pub fn user(&self) -> &Subject { &self.user }
}

/// Input to [`BookingStore::create_booking`](crate::store::BookingStore::create_booking).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
  pub bookable:  Bookable,
  pub user:      Subject,
  pub starts_at: DateTime<Utc>,
  pub ends_at:   DateTime<Utc>,
}

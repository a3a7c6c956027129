//! [`HasBookings`] — booking capability for a single subject.
//!
//! Built by delegation rather than inheritance: wrap any subject reference
//! together with a store and the subject gains `bookings`, `bookings_of`,
//! `is_booked` and `new_booking`.

use chrono::{DateTime, Utc};

use crate::{
  booking::{Booking, NewBooking},
  morph::{AsBookable, Subject},
  query::BookingQuery,
  store::BookingStore,
};

pub struct HasBookings<'s, S: BookingStore> {
  store:   &'s S,
  subject: Subject,
}

impl<'s, S: BookingStore> HasBookings<'s, S> {
  pub fn new(store: &'s S, subject: Subject) -> Self { Self { store, subject } }

  pub fn subject(&self) -> &Subject { &self.subject }

  /// All bookings of this subject. Lazy; nothing is read until executed.
  pub fn bookings(&self) -> BookingQuery {
    BookingQuery::for_subject(self.subject.clone())
  }

  /// This subject's bookings of one resource, matched on type and key.
  pub fn bookings_of(&self, bookable: &impl AsBookable) -> BookingQuery {
    let bookable = bookable.as_bookable();
    self
      .bookings()
      .where_bookable_type(bookable.bookable_type)
      .where_bookable_id(bookable.bookable_id)
  }

  /// Whether this subject holds any booking of `bookable`.
  ///
  /// Unless `strict_bookable_match` is configured, only the key is compared:
  /// a `Car` with key 5 reads as booked once a `Room` with key 5 is.
  pub async fn is_booked(&self, bookable: &impl AsBookable) -> Result<bool, S::Error> {
    let bookable = bookable.as_bookable();
    let query = if self.store.config().strict_bookable_match {
      self.bookings_of(&bookable)
    } else {
      self.bookings().where_bookable_id(bookable.bookable_id)
    };
    query.exists(self.store).await
  }

  /// Book `bookable` for `[starts_at, ends_at]`. The interval is stored as
  /// given; no ordering or overlap check is made.
  pub async fn new_booking(
    &self,
    bookable: &impl AsBookable,
    starts_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
  ) -> Result<Booking, S::Error> {
    self
      .store
      .create_booking(NewBooking {
        bookable: bookable.as_bookable(),
        user: self.subject.clone(),
        starts_at,
        ends_at,
      })
      .await
  }
}

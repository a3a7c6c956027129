//! The `BookingStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `bookings-store-sqlite`).
//! [`HasBookings`](crate::has_bookings::HasBookings) and the CLI depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  booking::{Booking, BookingId, NewBooking},
  config::BookingsConfig,
  has_bookings::HasBookings,
  morph::AsSubject,
  query::BookingQuery,
};

/// Abstraction over a booking store backend.
///
/// Bookings are written once and never updated. Every read is a fresh query;
/// nothing is cached.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes.
pub trait BookingStore: Send + Sync + Sized {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The configuration this store was opened with.
  fn config(&self) -> &BookingsConfig;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a booking and its subject link, returning the stored record with
  /// its assigned identity and timestamps.
  fn create_booking(
    &self,
    input: NewBooking,
  ) -> impl Future<Output = Result<Booking, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Reload a booking by identity. Returns `None` if not found.
  fn find_booking(
    &self,
    id: BookingId,
  ) -> impl Future<Output = Result<Option<Booking>, Self::Error>> + Send + '_;

  /// Bookings matching `query`, ordered by `starts_at` then `created_at`.
  fn get_bookings<'a>(
    &'a self,
    query: &'a BookingQuery,
  ) -> impl Future<Output = Result<Vec<Booking>, Self::Error>> + Send + 'a;

  /// Whether at least one booking matches `query`.
  fn bookings_exist<'a>(
    &'a self,
    query: &'a BookingQuery,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  fn count_bookings<'a>(
    &'a self,
    query: &'a BookingQuery,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  // ── Capability ────────────────────────────────────────────────────────

  /// Attach booking capability to an application model.
  fn bookings_for(&self, model: &impl AsSubject) -> HasBookings<'_, Self> {
    HasBookings::new(self, model.as_subject())
  }
}

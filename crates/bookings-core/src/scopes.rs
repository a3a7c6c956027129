//! Named, reusable filters over a booking's interval.
//!
//! Each [`Scope`] is a boolean predicate over `starts_at` / `ends_at`. Storage
//! backends translate scopes into their own query language; [`Scope::matches`]
//! is the reference semantics they must agree with.

use chrono::{DateTime, Utc};

use crate::booking::Booking;

/// A single interval predicate. All bounds are exclusive except for
/// [`Scope::Range`] and [`Scope::Current`], which are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
  StartsBefore(DateTime<Utc>),
  StartsAfter(DateTime<Utc>),
  EndsBefore(DateTime<Utc>),
  EndsAfter(DateTime<Utc>),
  /// Booking lies entirely within `[from, to]`.
  Range {
    from: DateTime<Utc>,
    to:   DateTime<Utc>,
  },
  /// Booking is in progress at the given instant.
  Current(DateTime<Utc>),
}

impl Scope {
  pub fn matches(&self, booking: &Booking) -> bool {
    let (starts, ends) = (booking.starts_at, booking.ends_at);
    match *self {
      Scope::StartsBefore(t) => starts < t,
      Scope::StartsAfter(t) => starts > t,
      Scope::EndsBefore(t) => ends < t,
      Scope::EndsAfter(t) => ends > t,
      Scope::Range { from, to } => starts >= from && ends <= to,
      Scope::Current(now) => starts <= now && ends >= now,
    }
  }
}

/// Query-scope capability. Implementors supply [`BookingScopes::scope`]; the
/// named filters come for free.
///
/// `past`, `future` and `current` capture "now" at the moment they are
/// applied, not when the query eventually runs.
pub trait BookingScopes: Sized {
  fn scope(self, scope: Scope) -> Self;

  fn starts_before(self, t: DateTime<Utc>) -> Self { self.scope(Scope::StartsBefore(t)) }

  fn starts_after(self, t: DateTime<Utc>) -> Self { self.scope(Scope::StartsAfter(t)) }

  fn ends_before(self, t: DateTime<Utc>) -> Self { self.scope(Scope::EndsBefore(t)) }

  fn ends_after(self, t: DateTime<Utc>) -> Self { self.scope(Scope::EndsAfter(t)) }

  fn range(self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
    self.scope(Scope::Range { from, to })
  }

  /// Bookings that have already ended.
  fn past(self) -> Self { self.ends_before(Utc::now()) }

  /// Bookings that have not started yet.
  fn future(self) -> Self { self.starts_after(Utc::now()) }

  /// Bookings in progress right now.
  fn current(self) -> Self { self.scope(Scope::Current(Utc::now())) }
}

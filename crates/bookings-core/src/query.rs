//! [`BookingQuery`] — a lazy description of a filtered read.
//!
//! Building a query does no I/O. It is executed against a [`BookingStore`]
//! with [`get`](BookingQuery::get), [`first`](BookingQuery::first),
//! [`exists`](BookingQuery::exists) or [`count`](BookingQuery::count), each
//! of which issues one fresh read.

use crate::{
  booking::Booking,
  morph::{Bookable, Subject},
  scopes::{BookingScopes, Scope},
  store::BookingStore,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingQuery {
  /// When set, only bookings linked to this subject through the join table.
  pub subject:       Option<Subject>,
  pub bookable_type: Option<String>,
  pub bookable_id:   Option<i64>,
  pub scopes:        Vec<Scope>,
  pub limit:         Option<usize>,
}

impl BookingQuery {
  /// All bookings of `subject` (the subject ↔ booking morph-to-many relation).
  pub fn for_subject(subject: Subject) -> Self {
    Self { subject: Some(subject), ..Self::default() }
  }

  /// All bookings of `bookable`, whoever made them. Reads the bookings table
  /// directly, without the join table.
  pub fn for_bookable(bookable: &Bookable) -> Self {
    Self::default()
      .where_bookable_type(&bookable.bookable_type)
      .where_bookable_id(bookable.bookable_id)
  }

  pub fn where_bookable_type(mut self, bookable_type: impl Into<String>) -> Self {
    self.bookable_type = Some(bookable_type.into());
    self
  }

  pub fn where_bookable_id(mut self, bookable_id: i64) -> Self {
    self.bookable_id = Some(bookable_id);
    self
  }

  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = Some(limit);
    self
  }

  /// In-memory equivalent of the filters, excluding `limit`. The subject
  /// filter compares against the booking's own `user` columns.
  pub fn matches(&self, booking: &Booking) -> bool {
    self.subject.as_ref().is_none_or(|s| &booking.user == s)
      && self
        .bookable_type
        .as_ref()
        .is_none_or(|t| &booking.bookable.bookable_type == t)
      && self.bookable_id.is_none_or(|id| booking.bookable.bookable_id == id)
      && self.scopes.iter().all(|s| s.matches(booking))
  }

  // ── Executors ─────────────────────────────────────────────────────────

  pub async fn get<S: BookingStore>(&self, store: &S) -> Result<Vec<Booking>, S::Error> {
    store.get_bookings(self).await
  }

  pub async fn first<S: BookingStore>(
    &self,
    store: &S,
  ) -> Result<Option<Booking>, S::Error> {
    let query = self.clone().limit(1);
    Ok(store.get_bookings(&query).await?.into_iter().next())
  }

  pub async fn exists<S: BookingStore>(&self, store: &S) -> Result<bool, S::Error> {
    store.bookings_exist(self).await
  }

  pub async fn count<S: BookingStore>(&self, store: &S) -> Result<u64, S::Error> {
    store.count_bookings(self).await
  }
}

impl BookingScopes for BookingQuery {
  fn scope(mut self, scope: Scope) -> Self {
    self.scopes.push(scope);
    self
  }
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;
  use crate::booking::BookingId;

  fn booking(bookable: Bookable, user: Subject) -> Booking {
    let t = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
    Booking {
      id: BookingId::new(),
      bookable,
      user,
      starts_at: t,
      ends_at: t,
      created_at: t,
      updated_at: t,
    }
  }

  #[test]
  fn for_bookable_filters_both_columns() {
    let q = BookingQuery::for_bookable(&Bookable::new("Room", 5));
    assert_eq!(q.subject, None);
    assert_eq!(q.bookable_type.as_deref(), Some("Room"));
    assert_eq!(q.bookable_id, Some(5));

    let user = Subject::new("User", 1);
    assert!(q.matches(&booking(Bookable::new("Room", 5), user.clone())));
    assert!(!q.matches(&booking(Bookable::new("Car", 5), user)));
  }

  #[test]
  fn for_subject_isolates_subject() {
    let q = BookingQuery::for_subject(Subject::new("User", 1));
    let room = Bookable::new("Room", 5);
    assert!(q.matches(&booking(room.clone(), Subject::new("User", 1))));
    assert!(!q.matches(&booking(room.clone(), Subject::new("User", 2))));
    assert!(!q.matches(&booking(room, Subject::new("Admin", 1))));
  }

  #[test]
  fn scopes_accumulate_in_order() {
    let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let q = BookingQuery::default().starts_after(t).ends_before(t).limit(3);
    assert_eq!(q.scopes, vec![Scope::StartsAfter(t), Scope::EndsBefore(t)]);
    assert_eq!(q.limit, Some(3));
  }
}

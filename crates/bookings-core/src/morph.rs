//! Polymorphic references to the two roles that take part in a booking.
//!
//! A reference is a type tag plus a key. The tag names the kind of entity
//! (e.g. `"User"`, `"Room"`) and the key identifies one row of that kind.
//! Neither side is owned here; the application owns its own entities.

/// The entity making a booking, e.g. a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subject {
  pub subject_type: String,
  pub subject_id:   i64,
}

impl Subject {
  pub fn new(subject_type: impl Into<String>, subject_id: i64) -> Self {
    Self { subject_type: subject_type.into(), subject_id }
  }
}

/// A reservable resource, e.g. a room or an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bookable {
  pub bookable_type: String,
  pub bookable_id:   i64,
}

impl Bookable {
  pub fn new(bookable_type: impl Into<String>, bookable_id: i64) -> Self {
    Self { bookable_type: bookable_type.into(), bookable_id }
  }
}

/// Implemented by application models that can make bookings.
pub trait AsSubject {
  fn as_subject(&self) -> Subject;
}

/// Implemented by application models that can be booked.
pub trait AsBookable {
  fn as_bookable(&self) -> Bookable;
}

impl AsSubject for Subject {
  fn as_subject(&self) -> Subject { self.clone() }
}

impl AsBookable for Bookable {
  fn as_bookable(&self) -> Bookable { self.clone() }
}

#[cfg(test)]
mod tests {
  use super::*;

  struct Room {
    id: i64,
  }

  impl AsBookable for Room {
    fn as_bookable(&self) -> Bookable { Bookable::new("Room", self.id) }
  }

  #[test]
  fn model_produces_its_reference() {
    let room = Room { id: 5 };
    assert_eq!(room.as_bookable(), Bookable::new("Room", 5));
  }

  #[test]
  fn same_key_different_type_are_distinct() {
    assert_ne!(Bookable::new("Room", 5), Bookable::new("Car", 5));
  }
}

//! Core types and trait definitions for bookings.
//!
//! Any application entity can act as a booking subject (it makes bookings) or
//! as a bookable resource (it gets booked). Both roles are expressed as plain
//! polymorphic references, so this crate stays free of database dependencies.
//! Storage backends (e.g. `bookings-store-sqlite`) implement [`BookingStore`].

pub mod booking;
pub mod config;
pub mod error;
pub mod has_bookings;
pub mod migrate;
pub mod morph;
pub mod query;
pub mod scopes;
pub mod store;

pub use booking::{Booking, BookingId, NewBooking};
pub use config::{BookingsConfig, Environment, Tables};
pub use error::{Error, Result};
pub use has_bookings::HasBookings;
pub use migrate::{MigrateOptions, MigrationReport, MigrationRunner};
pub use morph::{AsBookable, AsSubject, Bookable, Subject};
pub use query::BookingQuery;
pub use scopes::{BookingScopes, Scope};
pub use store::BookingStore;

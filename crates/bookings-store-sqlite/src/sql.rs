//! Translation of [`BookingQuery`] into SQL.
//!
//! Table names come from validated configuration and are spliced in directly;
//! every value is bound as a positional parameter.

use bookings_core::{BookingQuery, Scope, Tables};
use rusqlite::types::Value;

use crate::encode::{BOOKING_COLUMNS, encode_dt};

/// A statement and its positional parameters, ready to be moved onto the
/// connection thread.
pub struct Statement {
  pub sql:    String,
  pub params: Vec<Value>,
}

/// `FROM ... WHERE ...` shared by every read.
fn from_where(tables: &Tables, query: &BookingQuery) -> Statement {
  let mut sql = format!("FROM {} b", tables.bookings);
  let mut conds: Vec<String> = vec![];
  let mut params: Vec<Value> = vec![];

  if let Some(subject) = &query.subject {
    sql.push_str(&format!(
      " INNER JOIN {} bu ON bu.booking_id = b.id",
      tables.bookings_users
    ));
    conds.push("bu.user_type = ?".into());
    params.push(Value::Text(subject.subject_type.clone()));
    conds.push("bu.user_id = ?".into());
    params.push(Value::Integer(subject.subject_id));
  }

  if let Some(t) = &query.bookable_type {
    conds.push("b.bookable_type = ?".into());
    params.push(Value::Text(t.clone()));
  }

  if let Some(id) = query.bookable_id {
    conds.push("b.bookable_id = ?".into());
    params.push(Value::Integer(id));
  }

  for scope in &query.scopes {
    match *scope {
      Scope::StartsBefore(t) => {
        conds.push("b.starts_at < ?".into());
        params.push(Value::Integer(encode_dt(t)));
      }
      Scope::StartsAfter(t) => {
        conds.push("b.starts_at > ?".into());
        params.push(Value::Integer(encode_dt(t)));
      }
      Scope::EndsBefore(t) => {
        conds.push("b.ends_at < ?".into());
        params.push(Value::Integer(encode_dt(t)));
      }
      Scope::EndsAfter(t) => {
        conds.push("b.ends_at > ?".into());
        params.push(Value::Integer(encode_dt(t)));
      }
      Scope::Range { from, to } => {
        conds.push("b.starts_at >= ? AND b.ends_at <= ?".into());
        params.push(Value::Integer(encode_dt(from)));
        params.push(Value::Integer(encode_dt(to)));
      }
      Scope::Current(now) => {
        conds.push("b.starts_at <= ? AND b.ends_at >= ?".into());
        params.push(Value::Integer(encode_dt(now)));
        params.push(Value::Integer(encode_dt(now)));
      }
    }
  }

  if !conds.is_empty() {
    sql.push_str(" WHERE ");
    sql.push_str(&conds.join(" AND "));
  }

  Statement { sql, params }
}

pub fn select(tables: &Tables, query: &BookingQuery) -> Statement {
  let Statement { sql, mut params } = from_where(tables, query);
  let mut sql = format!("SELECT {BOOKING_COLUMNS} {sql} ORDER BY b.starts_at, b.created_at");
  if let Some(limit) = query.limit {
    sql.push_str(" LIMIT ?");
    params.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
  }
  Statement { sql, params }
}

pub fn exists(tables: &Tables, query: &BookingQuery) -> Statement {
  let Statement { sql, params } = from_where(tables, query);
  Statement { sql: format!("SELECT EXISTS (SELECT 1 {sql})"), params }
}

pub fn count(tables: &Tables, query: &BookingQuery) -> Statement {
  let Statement { sql, params } = from_where(tables, query);
  Statement { sql: format!("SELECT COUNT(*) {sql}"), params }
}

#[cfg(test)]
mod tests {
  use bookings_core::{Bookable, BookingScopes, Subject};
  use chrono::{TimeZone, Utc};

  use super::*;

  #[test]
  fn subject_query_joins_configured_table() {
    let tables = Tables {
      bookings:       "reservations".into(),
      bookings_users: "reservation_holders".into(),
    };
    let q = BookingQuery::for_subject(Subject::new("User", 7));
    let stmt = count(&tables, &q);
    assert_eq!(
      stmt.sql,
      "SELECT COUNT(*) FROM reservations b INNER JOIN reservation_holders bu \
       ON bu.booking_id = b.id WHERE bu.user_type = ? AND bu.user_id = ?"
    );
    assert_eq!(stmt.params, vec![Value::Text("User".into()), Value::Integer(7)]);
  }

  #[test]
  fn bookable_query_skips_join() {
    let q = BookingQuery::for_bookable(&Bookable::new("Room", 5));
    let stmt = exists(&Tables::default(), &q);
    assert!(!stmt.sql.contains("JOIN"));
    assert!(stmt.sql.ends_with("WHERE b.bookable_type = ? AND b.bookable_id = ?)"));
  }

  #[test]
  fn scopes_and_limit_bind_in_order() {
    let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    let q = BookingQuery::default().range(from, to).limit(2);
    let stmt = select(&Tables::default(), &q);
    assert!(stmt.sql.ends_with(
      "WHERE b.starts_at >= ? AND b.ends_at <= ? ORDER BY b.starts_at, b.created_at LIMIT ?"
    ));
    assert_eq!(
      stmt.params,
      vec![
        Value::Integer(encode_dt(from)),
        Value::Integer(encode_dt(to)),
        Value::Integer(2),
      ]
    );
  }

  #[test]
  fn unfiltered_query_has_no_where() {
    let stmt = select(&Tables::default(), &BookingQuery::default());
    assert!(!stmt.sql.contains("WHERE"));
  }
}

//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microsecond
//! precision, `Z` suffix) so that lexical order is chronological. String
//! lists are stored as compact JSON arrays.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use haul_core::{
  account::Account, lifecycle::SubmissionStatus, submission::Submission,
};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time, truncated to the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── SubmissionStatus ────────────────────────────────────────────────────────

pub fn encode_status(s: SubmissionStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<SubmissionStatus> { Ok(s.parse()?) }

// ─── String lists ────────────────────────────────────────────────────────────

pub fn encode_list(items: &[String]) -> Result<String> {
  Ok(serde_json::to_string(items)?)
}

pub fn decode_list(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawSubmission::from_row`].
pub const SUBMISSION_COLUMNS: &str = "id, customer_name, email, phone, \
  payment_handle, pickup_address, pickup_lat, pickup_lng, \
  clothing_description, clothing_items, estimated_items, status, created_at, \
  updated_at, scheduled_pickup_date, scheduled_pickup_time, admin_notes, \
  customer_availability";

/// Raw values read directly from a `submissions` row.
pub struct RawSubmission {
  pub id:                    String,
  pub customer_name:         String,
  pub email:                 String,
  pub phone:                 String,
  pub payment_handle:        String,
  pub pickup_address:        String,
  pub pickup_lat:            Option<f64>,
  pub pickup_lng:            Option<f64>,
  pub clothing_description:  String,
  pub clothing_items:        String,
  pub estimated_items:       i64,
  pub status:                String,
  pub created_at:            String,
  pub updated_at:            String,
  pub scheduled_pickup_date: Option<String>,
  pub scheduled_pickup_time: Option<String>,
  pub admin_notes:           Option<String>,
  pub customer_availability: String,
}

impl RawSubmission {
  /// Read a row selected with [`SUBMISSION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                    row.get(0)?,
      customer_name:         row.get(1)?,
      email:                 row.get(2)?,
      phone:                 row.get(3)?,
      payment_handle:        row.get(4)?,
      pickup_address:        row.get(5)?,
      pickup_lat:            row.get(6)?,
      pickup_lng:            row.get(7)?,
      clothing_description:  row.get(8)?,
      clothing_items:        row.get(9)?,
      estimated_items:       row.get(10)?,
      status:                row.get(11)?,
      created_at:            row.get(12)?,
      updated_at:            row.get(13)?,
      scheduled_pickup_date: row.get(14)?,
      scheduled_pickup_time: row.get(15)?,
      admin_notes:           row.get(16)?,
      customer_availability: row.get(17)?,
    })
  }

  /// Encode a domain record for writing.
  pub fn from_submission(s: &Submission) -> Result<Self> {
    Ok(Self {
      id:                    s.id.clone(),
      customer_name:         s.customer_name.clone(),
      email:                 s.email.clone(),
      phone:                 s.phone.clone(),
      payment_handle:        s.payment_handle.clone(),
      pickup_address:        s.pickup_address.clone(),
      pickup_lat:            s.pickup_lat,
      pickup_lng:            s.pickup_lng,
      clothing_description:  s.clothing_description.clone(),
      clothing_items:        encode_list(&s.clothing_items)?,
      estimated_items:       s.estimated_items,
      status:                encode_status(s.status).to_owned(),
      created_at:            encode_dt(s.created_at),
      updated_at:            encode_dt(s.updated_at),
      scheduled_pickup_date: s.scheduled_pickup_date.clone(),
      scheduled_pickup_time: s.scheduled_pickup_time.clone(),
      admin_notes:           s.admin_notes.clone(),
      customer_availability: encode_list(&s.customer_availability)?,
    })
  }

  pub fn into_submission(self) -> Result<Submission> {
    Ok(Submission {
      id:                    self.id,
      customer_name:         self.customer_name,
      email:                 self.email,
      phone:                 self.phone,
      payment_handle:        self.payment_handle,
      pickup_address:        self.pickup_address,
      pickup_lat:            self.pickup_lat,
      pickup_lng:            self.pickup_lng,
      clothing_description:  self.clothing_description,
      clothing_items:        decode_list(&self.clothing_items)?,
      estimated_items:       self.estimated_items,
      status:                decode_status(&self.status)?,
      created_at:            decode_dt(&self.created_at)?,
      updated_at:            decode_dt(&self.updated_at)?,
      scheduled_pickup_date: self.scheduled_pickup_date,
      scheduled_pickup_time: self.scheduled_pickup_time,
      admin_notes:           self.admin_notes,
      customer_availability: decode_list(&self.customer_availability)?,
    })
  }
}

/// Column list matching [`RawAccount::from_row`].
pub const ACCOUNT_COLUMNS: &str =
  "email, customer_name, phone, payment_handle, default_address, created_at";

/// Raw strings read directly from an `accounts` row.
pub struct RawAccount {
  pub email:           String,
  pub customer_name:   String,
  pub phone:           String,
  pub payment_handle:  String,
  pub default_address: String,
  pub created_at:      String,
}

impl RawAccount {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      email:           row.get(0)?,
      customer_name:   row.get(1)?,
      phone:           row.get(2)?,
      payment_handle:  row.get(3)?,
      default_address: row.get(4)?,
      created_at:      row.get(5)?,
    })
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      email:           self.email,
      customer_name:   self.customer_name,
      phone:           self.phone,
      payment_handle:  self.payment_handle,
      default_address: self.default_address,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_sortable() {
    let early = decode_dt("2026-01-01T00:00:00Z").unwrap();
    let later = decode_dt("2026-01-01T00:00:00.5Z").unwrap();
    let (a, b) = (encode_dt(early), encode_dt(later));
    assert_eq!(a.len(), b.len());
    assert!(a < b);
    assert_eq!(decode_dt(&b).unwrap(), later);
  }

  #[test]
  fn now_survives_a_roundtrip() {
    let t = now();
    assert_eq!(decode_dt(&encode_dt(t)).unwrap(), t);
  }

  #[test]
  fn unknown_status_in_row_is_an_error() {
    assert!(matches!(
      decode_status("archived"),
      Err(Error::Core(haul_core::Error::UnknownStatus(_)))
    ));
  }
}

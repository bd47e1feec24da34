//! Submission types — one customer's pickup request and the edits applied to
//! it over its lifetime.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::lifecycle::SubmissionStatus;

// ─── Submission ──────────────────────────────────────────────────────────────

/// A stored pickup request. Serialised with camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
  /// Opaque identifier assigned by the store.
  pub id:                    String,
  pub customer_name:         String,
  /// Stored exactly as submitted; lookups compare case-insensitively.
  pub email:                 String,
  pub phone:                 String,
  #[serde(alias = "zelleInfo")]
  pub payment_handle:        String,
  pub pickup_address:        String,
  pub pickup_lat:            Option<f64>,
  pub pickup_lng:            Option<f64>,
  pub clothing_description:  String,
  pub clothing_items:        Vec<String>,
  /// Customer's estimate. Not validated; zero and negative values are kept.
  pub estimated_items:       i64,
  pub status:                SubmissionStatus,
  /// Server-assigned; never changes after creation.
  pub created_at:            DateTime<Utc>,
  pub updated_at:            DateTime<Utc>,
  pub scheduled_pickup_date: Option<String>,
  pub scheduled_pickup_time: Option<String>,
  pub admin_notes:           Option<String>,
  pub customer_availability: Vec<String>,
}

// ─── NewSubmission ───────────────────────────────────────────────────────────

/// Input to [`crate::store::PickupStore::create_submission`].
///
/// `id`, `status` and both timestamps are always set by the store; they are
/// not accepted from callers.
#[derive(Debug, Clone, Default)]
pub struct NewSubmission {
  pub customer_name:         String,
  pub email:                 String,
  pub phone:                 String,
  pub payment_handle:        String,
  pub pickup_address:        String,
  pub pickup_lat:            Option<f64>,
  pub pickup_lng:            Option<f64>,
  pub clothing_description:  String,
  pub clothing_items:        Vec<String>,
  pub estimated_items:       i64,
  pub customer_availability: Vec<String>,
}

impl NewSubmission {
  /// Build the stored record. Status is always [`SubmissionStatus::Pending`].
  pub fn into_submission(self, id: String, now: DateTime<Utc>) -> Submission {
    Submission {
      id,
      customer_name: self.customer_name,
      email: self.email,
      phone: self.phone,
      payment_handle: self.payment_handle,
      pickup_address: self.pickup_address,
      pickup_lat: self.pickup_lat,
      pickup_lng: self.pickup_lng,
      clothing_description: self.clothing_description,
      clothing_items: self.clothing_items,
      estimated_items: self.estimated_items,
      status: SubmissionStatus::Pending,
      created_at: now,
      updated_at: now,
      scheduled_pickup_date: None,
      scheduled_pickup_time: None,
      admin_notes: None,
      customer_availability: self.customer_availability,
    }
  }
}

// ─── SubmissionPatch ─────────────────────────────────────────────────────────

/// A partial update. Absent fields are left untouched.
///
/// For the nullable fields the outer `Option` records presence and the inner
/// one the value, so an explicit JSON `null` clears the field. `id`,
/// `createdAt` and `updatedAt` have no slot here and are dropped silently
/// when a payload carries them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPatch {
  pub customer_name:         Option<String>,
  pub email:                 Option<String>,
  pub phone:                 Option<String>,
  #[serde(alias = "zelleInfo")]
  pub payment_handle:        Option<String>,
  pub pickup_address:        Option<String>,
  #[serde(default, deserialize_with = "nullable")]
  pub pickup_lat:            Option<Option<f64>>,
  #[serde(default, deserialize_with = "nullable")]
  pub pickup_lng:            Option<Option<f64>>,
  pub clothing_description:  Option<String>,
  pub clothing_items:        Option<Vec<String>>,
  pub estimated_items:       Option<i64>,
  pub status:                Option<SubmissionStatus>,
  #[serde(default, deserialize_with = "nullable")]
  pub scheduled_pickup_date: Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub scheduled_pickup_time: Option<Option<String>>,
  #[serde(default, deserialize_with = "nullable")]
  pub admin_notes:           Option<Option<String>>,
  pub customer_availability: Option<Vec<String>>,
}

/// Present-but-null becomes `Some(None)`; absence is handled by
/// `#[serde(default)]`.
fn nullable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(de).map(Some)
}

impl SubmissionPatch {
  /// Whether applying this patch forces the status to `scheduled`: true when
  /// it carries a non-blank pickup date.
  pub fn schedules_pickup(&self) -> bool {
    matches!(
      &self.scheduled_pickup_date,
      Some(Some(date)) if !date.trim().is_empty()
    )
  }

  /// Apply every supplied field to `target` and bump `updated_at`.
  ///
  /// Status transitions are unconstrained. A pickup date overrides any
  /// status carried in the same patch.
  pub fn apply(self, target: &mut Submission, now: DateTime<Utc>) {
    let schedules = self.schedules_pickup();

    if let Some(v) = self.customer_name {
      target.customer_name = v;
    }
    if let Some(v) = self.email {
      target.email = v;
    }
    if let Some(v) = self.phone {
      target.phone = v;
    }
    if let Some(v) = self.payment_handle {
      target.payment_handle = v;
    }
    if let Some(v) = self.pickup_address {
      target.pickup_address = v;
    }
    if let Some(v) = self.pickup_lat {
      target.pickup_lat = v;
    }
    if let Some(v) = self.pickup_lng {
      target.pickup_lng = v;
    }
    if let Some(v) = self.clothing_description {
      target.clothing_description = v;
    }
    if let Some(v) = self.clothing_items {
      target.clothing_items = v;
    }
    if let Some(v) = self.estimated_items {
      target.estimated_items = v;
    }
    if let Some(v) = self.status {
      target.status = v;
    }
    if let Some(v) = self.scheduled_pickup_date {
      target.scheduled_pickup_date = v;
    }
    if let Some(v) = self.scheduled_pickup_time {
      target.scheduled_pickup_time = v;
    }
    if let Some(v) = self.admin_notes {
      target.admin_notes = v;
    }
    if let Some(v) = self.customer_availability {
      target.customer_availability = v;
    }

    if schedules {
      target.status = SubmissionStatus::Scheduled;
    }
    target.updated_at = now;
  }
}

// ─── Scheduling ──────────────────────────────────────────────────────────────

/// The admin "schedule pickup" action. Date, time and notes are stored
/// verbatim; an omitted field clears the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
  pub date:  Option<String>,
  pub time:  Option<String>,
  pub notes: Option<String>,
}

impl From<ScheduleRequest> for SubmissionPatch {
  fn from(req: ScheduleRequest) -> Self {
    SubmissionPatch {
      scheduled_pickup_date: Some(req.date),
      scheduled_pickup_time: Some(req.time),
      admin_notes: Some(req.notes),
      ..Default::default()
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::Duration;

  use super::*;

  fn sample(status: SubmissionStatus) -> Submission {
    let now = Utc::now();
    let mut s = NewSubmission {
      customer_name: "Ada".into(),
      email: "Ada@Example.com".into(),
      phone: "555-0100".into(),
      payment_handle: "ada@bank".into(),
      pickup_address: "1 Bleecker St".into(),
      estimated_items: 4,
      ..Default::default()
    }
    .into_submission("sub-1".into(), now);
    s.status = status;
    s
  }

  #[test]
  fn new_submission_starts_pending() {
    let s = sample(SubmissionStatus::Pending);
    assert_eq!(s.status, SubmissionStatus::Pending);
    assert_eq!(s.created_at, s.updated_at);
    assert!(s.scheduled_pickup_date.is_none());
  }

  #[test]
  fn absent_fields_are_untouched() {
    let mut s = sample(SubmissionStatus::Listed);
    let before = s.clone();
    let later = s.updated_at + Duration::seconds(5);

    SubmissionPatch::default().apply(&mut s, later);

    assert_eq!(s.updated_at, later);
    s.updated_at = before.updated_at;
    assert_eq!(s, before);
  }

  #[test]
  fn status_can_move_backwards() {
    let mut s = sample(SubmissionStatus::Sold);
    let patch = SubmissionPatch {
      status: Some(SubmissionStatus::Pending),
      ..Default::default()
    };
    patch.apply(&mut s, Utc::now());
    assert_eq!(s.status, SubmissionStatus::Pending);
  }

  #[test]
  fn pickup_date_forces_scheduled_from_any_status() {
    for prior in SubmissionStatus::ALL {
      let mut s = sample(prior);
      let patch = SubmissionPatch {
        status: Some(SubmissionStatus::Listed),
        scheduled_pickup_date: Some(Some("2026-11-02".into())),
        ..Default::default()
      };
      patch.apply(&mut s, Utc::now());
      assert_eq!(s.status, SubmissionStatus::Scheduled, "prior = {prior}");
      assert_eq!(s.scheduled_pickup_date.as_deref(), Some("2026-11-02"));
    }
  }

  #[test]
  fn blank_pickup_date_does_not_schedule() {
    let mut s = sample(SubmissionStatus::Processing);
    let patch = SubmissionPatch {
      scheduled_pickup_date: Some(Some("  ".into())),
      ..Default::default()
    };
    patch.apply(&mut s, Utc::now());
    assert_eq!(s.status, SubmissionStatus::Processing);
  }

  #[test]
  fn json_null_clears_and_absence_keeps() {
    let mut s = sample(SubmissionStatus::Scheduled);
    s.admin_notes = Some("ring twice".into());
    s.scheduled_pickup_time = Some("10:00".into());

    let patch: SubmissionPatch =
      serde_json::from_str(r#"{"adminNotes": null}"#).unwrap();
    patch.apply(&mut s, Utc::now());

    assert_eq!(s.admin_notes, None);
    assert_eq!(s.scheduled_pickup_time.as_deref(), Some("10:00"));
  }

  #[test]
  fn identity_fields_in_payload_are_ignored() {
    let mut s = sample(SubmissionStatus::Pending);
    let created = s.created_at;

    let patch: SubmissionPatch = serde_json::from_str(
      r#"{"id": "other", "createdAt": "2001-01-01T00:00:00Z", "status": "picked_up"}"#,
    )
    .unwrap();
    patch.apply(&mut s, Utc::now());

    assert_eq!(s.id, "sub-1");
    assert_eq!(s.created_at, created);
    assert_eq!(s.status, SubmissionStatus::PickedUp);
  }

  #[test]
  fn zelle_info_alias_is_accepted() {
    let patch: SubmissionPatch =
      serde_json::from_str(r#"{"zelleInfo": "555-0199"}"#).unwrap();
    assert_eq!(patch.payment_handle.as_deref(), Some("555-0199"));
  }

  #[test]
  fn schedule_request_sets_all_three_fields() {
    let mut s = sample(SubmissionStatus::Pending);
    s.admin_notes = Some("old".into());

    let patch = SubmissionPatch::from(ScheduleRequest {
      date:  Some("2026-11-02".into()),
      time:  Some("afternoon".into()),
      notes: None,
    });
    patch.apply(&mut s, Utc::now());

    assert_eq!(s.status, SubmissionStatus::Scheduled);
    assert_eq!(s.scheduled_pickup_time.as_deref(), Some("afternoon"));
    assert_eq!(s.admin_notes, None);
  }

  #[test]
  fn schedule_without_date_keeps_status() {
    let mut s = sample(SubmissionStatus::PickedUp);
    SubmissionPatch::from(ScheduleRequest {
      notes: Some("call first".into()),
      ..Default::default()
    })
    .apply(&mut s, Utc::now());
    assert_eq!(s.status, SubmissionStatus::PickedUp);
    assert_eq!(s.admin_notes.as_deref(), Some("call first"));
  }
}

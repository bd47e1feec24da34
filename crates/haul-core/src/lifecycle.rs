//! Submission lifecycle — the status label a pickup request carries.
//!
//! Stages follow a linear order (`pending → scheduled → picked_up →
//! processing → listed → sold`), but the order is advisory: any stage may be
//! set to any other stage directly. Only the set of labels is fixed.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

// ─── Status ──────────────────────────────────────────────────────────────────

/// The lifecycle stage of a submission.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
  /// Received, awaiting admin review. Every submission starts here.
  #[default]
  Pending,
  Scheduled,
  PickedUp,
  Processing,
  Listed,
  Sold,
}

impl SubmissionStatus {
  /// Every status, in lifecycle order.
  pub const ALL: [Self; 6] = [
    Self::Pending,
    Self::Scheduled,
    Self::PickedUp,
    Self::Processing,
    Self::Listed,
    Self::Sold,
  ];

  /// The wire/database label. Must match the serde `snake_case` tags above.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Pending => "pending",
      Self::Scheduled => "scheduled",
      Self::PickedUp => "picked_up",
      Self::Processing => "processing",
      Self::Listed => "listed",
      Self::Sold => "sold",
    }
  }

  /// Human-readable label for dashboards and tracking pages.
  pub fn label(self) -> &'static str {
    match self {
      Self::Pending => "Pending Review",
      Self::Scheduled => "Pickup Scheduled",
      Self::PickedUp => "Picked Up",
      Self::Processing => "Processing",
      Self::Listed => "Listed for Sale",
      Self::Sold => "Sold",
    }
  }

  /// The following stage in lifecycle order; `None` once sold.
  pub fn next(self) -> Option<Self> {
    let idx = Self::ALL.iter().position(|s| *s == self)?;
    Self::ALL.get(idx + 1).copied()
  }

  pub fn is_terminal(self) -> bool { matches!(self, Self::Sold) }
}

impl fmt::Display for SubmissionStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for SubmissionStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| Error::UnknownStatus(s.to_owned()))
  }
}

// ─── Summary ─────────────────────────────────────────────────────────────────

/// Number of submissions in each stage, as shown on the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
  pub total:      u64,
  pub pending:    u64,
  pub scheduled:  u64,
  pub picked_up:  u64,
  pub processing: u64,
  pub listed:     u64,
  pub sold:       u64,
}

impl StatusCounts {
  /// Add `n` submissions in `status` to the tally.
  pub fn add(&mut self, status: SubmissionStatus, n: u64) {
    self.total += n;
    let slot = match status {
      SubmissionStatus::Pending => &mut self.pending,
      SubmissionStatus::Scheduled => &mut self.scheduled,
      SubmissionStatus::PickedUp => &mut self.picked_up,
      SubmissionStatus::Processing => &mut self.processing,
      SubmissionStatus::Listed => &mut self.listed,
      SubmissionStatus::Sold => &mut self.sold,
    };
    *slot += n;
  }

  pub fn get(&self, status: SubmissionStatus) -> u64 {
    match status {
      SubmissionStatus::Pending => self.pending,
      SubmissionStatus::Scheduled => self.scheduled,
      SubmissionStatus::PickedUp => self.picked_up,
      SubmissionStatus::Processing => self.processing,
      SubmissionStatus::Listed => self.listed,
      SubmissionStatus::Sold => self.sold,
    }
  }

  /// Per-stage breakdown in lifecycle order.
  pub fn stages(&self) -> Vec<StageCount> {
    SubmissionStatus::ALL
      .into_iter()
      .map(|status| StageCount {
        status,
        label: status.label(),
        count: self.get(status),
        next: status.next(),
        terminal: status.is_terminal(),
      })
      .collect()
  }
}

/// One row of [`StatusCounts::stages`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
  pub status:   SubmissionStatus,
  pub label:    &'static str,
  pub count:    u64,
  pub next:     Option<SubmissionStatus>,
  pub terminal: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn labels_roundtrip_through_from_str() {
    for status in SubmissionStatus::ALL {
      assert_eq!(status.as_str().parse::<SubmissionStatus>().unwrap(), status);
    }
  }

  #[test]
  fn serde_tags_match_as_str() {
    for status in SubmissionStatus::ALL {
      let json = serde_json::to_value(status).unwrap();
      assert_eq!(json, serde_json::Value::String(status.as_str().into()));
    }
  }

  #[test]
  fn unknown_label_is_rejected() {
    assert!(matches!(
      "shipped".parse::<SubmissionStatus>(),
      Err(Error::UnknownStatus(s)) if s == "shipped"
    ));
    assert!(serde_json::from_str::<SubmissionStatus>("\"PENDING\"").is_err());
  }

  #[test]
  fn next_walks_the_linear_order() {
    assert_eq!(SubmissionStatus::Pending.next(), Some(SubmissionStatus::Scheduled));
    assert_eq!(SubmissionStatus::Listed.next(), Some(SubmissionStatus::Sold));
    assert_eq!(SubmissionStatus::Sold.next(), None);
    assert!(SubmissionStatus::Sold.is_terminal());
    assert!(!SubmissionStatus::Pending.is_terminal());
  }

  #[test]
  fn default_is_pending() {
    assert_eq!(SubmissionStatus::default(), SubmissionStatus::Pending);
  }

  #[test]
  fn counts_tally_per_status() {
    let mut counts = StatusCounts::default();
    counts.add(SubmissionStatus::Pending, 3);
    counts.add(SubmissionStatus::Sold, 1);
    assert_eq!(counts.total, 4);
    assert_eq!(counts.get(SubmissionStatus::Pending), 3);
    assert_eq!(counts.get(SubmissionStatus::Sold), 1);
    assert_eq!(counts.get(SubmissionStatus::Listed), 0);
  }

  #[test]
  fn counts_serialise_in_camel_case() {
    let mut counts = StatusCounts::default();
    counts.add(SubmissionStatus::PickedUp, 2);
    let json = serde_json::to_value(&counts).unwrap();
    assert_eq!(json["pickedUp"], 2);
    assert!(json.get("picked_up").is_none());
  }

  #[test]
  fn stages_follow_lifecycle_order() {
    let mut counts = StatusCounts::default();
    counts.add(SubmissionStatus::Listed, 5);
    let stages = counts.stages();

    let order: Vec<_> = stages.iter().map(|s| s.status).collect();
    assert_eq!(order, SubmissionStatus::ALL);

    let listed = &stages[4];
    assert_eq!(listed.label, "Listed for Sale");
    assert_eq!(listed.count, 5);
    assert_eq!(listed.next, Some(SubmissionStatus::Sold));
    assert!(!listed.terminal);

    let sold = &stages[5];
    assert_eq!(sold.next, None);
    assert!(sold.terminal);
    assert_eq!(sold.count, 0);
  }
}

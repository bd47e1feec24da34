//! Customer accounts — saved profiles used to prefill future submissions.
//!
//! An account is keyed by its lower-cased email. It is linked to submissions
//! only by that email string; the store enforces no referential integrity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved customer profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
  /// Always lower-case; see [`normalize_email`].
  pub email:           String,
  pub customer_name:   String,
  pub phone:           String,
  #[serde(alias = "zelleInfo")]
  pub payment_handle:  String,
  pub default_address: String,
  /// Set on first save; preserved when the account is overwritten.
  pub created_at:      DateTime<Utc>,
}

/// Input to [`crate::store::PickupStore::upsert_account`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
  pub email:           String,
  #[serde(default)]
  pub customer_name:   String,
  #[serde(default)]
  pub phone:           String,
  #[serde(default, alias = "zelleInfo")]
  pub payment_handle:  String,
  #[serde(default)]
  pub default_address: String,
}

/// The account key for `email`.
pub fn normalize_email(email: &str) -> String { email.to_lowercase() }

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalize_lowercases_only() {
    assert_eq!(normalize_email("Jo.Smith@Example.COM"), "jo.smith@example.com");
    assert_eq!(normalize_email(" a@b.c "), " a@b.c ");
  }

  #[test]
  fn new_account_fields_default_to_empty() {
    let acct: NewAccount =
      serde_json::from_str(r#"{"email": "a@b.com", "zelleInfo": "a@bank"}"#)
        .unwrap();
    assert_eq!(acct.email, "a@b.com");
    assert_eq!(acct.payment_handle, "a@bank");
    assert_eq!(acct.customer_name, "");
  }
}

//! The `PickupStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `haul-store-sqlite`).
//! The HTTP layer (`haul-api`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  account::{Account, NewAccount},
  lifecycle::{StatusCounts, SubmissionStatus},
  submission::{NewSubmission, Submission, SubmissionPatch},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`PickupStore::list_submissions`].
#[derive(Debug, Clone, Default)]
pub struct SubmissionQuery {
  /// Exact email match, compared case-insensitively.
  pub email:  Option<String>,
  pub status: Option<SubmissionStatus>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the record store for submissions and accounts.
///
/// Writes are unconditional: there is no version check, so concurrent edits
/// to the same record resolve to whichever write lands last.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PickupStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Submissions ───────────────────────────────────────────────────────

  /// Persist a new submission. The store assigns the id and timestamps and
  /// sets the status to `pending`.
  fn create_submission(
    &self,
    input: NewSubmission,
  ) -> impl Future<Output = Result<Submission, Self::Error>> + Send + '_;

  /// Retrieve a submission by id. Returns `None` if not found.
  fn get_submission<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Submission>, Self::Error>> + Send + 'a;

  /// List submissions matching `query`, newest-created first.
  fn list_submissions<'a>(
    &'a self,
    query: &'a SubmissionQuery,
  ) -> impl Future<Output = Result<Vec<Submission>, Self::Error>> + Send + 'a;

  /// Apply `patch` to the submission with `id` and return the updated
  /// record. Returns `None` if not found.
  fn update_submission<'a>(
    &'a self,
    id: &'a str,
    patch: SubmissionPatch,
  ) -> impl Future<Output = Result<Option<Submission>, Self::Error>> + Send + 'a;

  /// Delete one submission. Returns `false` if it did not exist.
  fn delete_submission<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Delete every submission and return how many were removed.
  fn delete_all_submissions(
    &self,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Count submissions per status.
  fn status_counts(
    &self,
  ) -> impl Future<Output = Result<StatusCounts, Self::Error>> + Send + '_;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Create the account for `input.email` (lower-cased), or overwrite every
  /// field but `created_at` if it already exists.
  fn upsert_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Account, Self::Error>> + Send + '_;

  /// Retrieve an account by email, case-insensitively. Returns `None` if not
  /// found.
  fn get_account<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<Account>, Self::Error>> + Send + 'a;

  /// List all accounts, newest first.
  fn list_accounts(
    &self,
  ) -> impl Future<Output = Result<Vec<Account>, Self::Error>> + Send + '_;
}

//! [`SqliteStore`] — the SQLite implementation of [`PickupStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use haul_core::{
  account::{Account, NewAccount, normalize_email},
  lifecycle::StatusCounts,
  store::{PickupStore, SubmissionQuery},
  submission::{NewSubmission, Submission, SubmissionPatch},
};

use crate::{
  Result,
  encode::{
    ACCOUNT_COLUMNS, RawAccount, RawSubmission, SUBMISSION_COLUMNS,
    decode_status, encode_dt, encode_status, now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A pickup store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`Submission`] into the `submissions` table.
  async fn insert_submission(&self, submission: &Submission) -> Result<()> {
    let raw = RawSubmission::from_submission(submission)?;
    let email_key = normalize_email(&raw.email);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO submissions (
             id, customer_name, email, phone, payment_handle, pickup_address,
             pickup_lat, pickup_lng, clothing_description, clothing_items,
             estimated_items, status, created_at, updated_at,
             scheduled_pickup_date, scheduled_pickup_time, admin_notes,
             customer_availability, email_key
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                     ?14, ?15, ?16, ?17, ?18, ?19)",
          rusqlite::params![
            raw.id,
            raw.customer_name,
            raw.email,
            raw.phone,
            raw.payment_handle,
            raw.pickup_address,
            raw.pickup_lat,
            raw.pickup_lng,
            raw.clothing_description,
            raw.clothing_items,
            raw.estimated_items,
            raw.status,
            raw.created_at,
            raw.updated_at,
            raw.scheduled_pickup_date,
            raw.scheduled_pickup_time,
            raw.admin_notes,
            raw.customer_availability,
            email_key,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Read, patch and write back one row inside a single transaction, so
/// concurrent patches to different fields never undo each other. `id` and
/// `created_at` are never written.
fn patch_submission(
  conn: &mut rusqlite::Connection,
  id: &str,
  patch: SubmissionPatch,
) -> Result<Option<Submission>> {
  let tx = conn.transaction()?;

  let Some(raw) = tx
    .query_row(
      &format!("SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?1"),
      rusqlite::params![id],
      RawSubmission::from_row,
    )
    .optional()?
  else {
    return Ok(None);
  };

  let mut submission = raw.into_submission()?;
  patch.apply(&mut submission, now());
  let raw = RawSubmission::from_submission(&submission)?;

  tx.execute(
    "UPDATE submissions SET
       customer_name = ?2, email = ?3, phone = ?4, payment_handle = ?5,
       pickup_address = ?6, pickup_lat = ?7, pickup_lng = ?8,
       clothing_description = ?9, clothing_items = ?10,
       estimated_items = ?11, status = ?12, updated_at = ?13,
       scheduled_pickup_date = ?14, scheduled_pickup_time = ?15,
       admin_notes = ?16, customer_availability = ?17, email_key = ?18
     WHERE id = ?1",
    rusqlite::params![
      raw.id,
      raw.customer_name,
      raw.email,
      raw.phone,
      raw.payment_handle,
      raw.pickup_address,
      raw.pickup_lat,
      raw.pickup_lng,
      raw.clothing_description,
      raw.clothing_items,
      raw.estimated_items,
      raw.status,
      raw.updated_at,
      raw.scheduled_pickup_date,
      raw.scheduled_pickup_time,
      raw.admin_notes,
      raw.customer_availability,
      normalize_email(&raw.email),
    ],
  )?;
  tx.commit()?;

  Ok(Some(submission))
}

// ─── PickupStore impl ────────────────────────────────────────────────────────

impl PickupStore for SqliteStore {
  type Error = crate::Error;

  // ── Submissions ───────────────────────────────────────────────────────────

  async fn create_submission(&self, input: NewSubmission) -> Result<Submission> {
    let submission = input.into_submission(Uuid::new_v4().to_string(), now());
    self.insert_submission(&submission).await?;
    tracing::debug!(id = %submission.id, "inserted submission");
    Ok(submission)
  }

  async fn get_submission(&self, id: &str) -> Result<Option<Submission>> {
    let id = id.to_owned();

    let raw: Option<RawSubmission> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE id = ?1"),
            rusqlite::params![id],
            RawSubmission::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSubmission::into_submission).transpose()
  }

  async fn list_submissions(
    &self,
    query: &SubmissionQuery,
  ) -> Result<Vec<Submission>> {
    let email = query.email.as_deref().map(normalize_email);
    let status = query.status.map(encode_status);

    let raws: Vec<RawSubmission> = self
      .conn
      .call(move |conn| {
        // Unset filters bind NULL and match everything.
        let sql = format!(
          "SELECT {SUBMISSION_COLUMNS} FROM submissions
           WHERE (?1 IS NULL OR email_key = ?1)
             AND (?2 IS NULL OR status = ?2)
           ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![email, status], RawSubmission::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubmission::into_submission).collect()
  }

  async fn update_submission(
    &self,
    id: &str,
    patch: SubmissionPatch,
  ) -> Result<Option<Submission>> {
    let id = id.to_owned();

    self
      .conn
      .call(move |conn| Ok(patch_submission(conn, &id, patch)))
      .await?
  }

  async fn delete_submission(&self, id: &str) -> Result<bool> {
    let id = id.to_owned();

    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM submissions WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;
    Ok(n > 0)
  }

  async fn delete_all_submissions(&self) -> Result<u64> {
    let n = self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM submissions", [])?))
      .await?;
    Ok(n as u64)
  }

  async fn status_counts(&self) -> Result<StatusCounts> {
    let rows: Vec<(String, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT status, COUNT(*) FROM submissions GROUP BY status")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut counts = StatusCounts::default();
    for (status, n) in rows {
      counts.add(decode_status(&status)?, n as u64);
    }
    Ok(counts)
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn upsert_account(&self, input: NewAccount) -> Result<Account> {
    let email = normalize_email(&input.email);
    let at_str = encode_dt(now());

    let raw: RawAccount = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO accounts (
             email, customer_name, phone, payment_handle, default_address,
             created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (email) DO UPDATE SET
             customer_name   = excluded.customer_name,
             phone           = excluded.phone,
             payment_handle  = excluded.payment_handle,
             default_address = excluded.default_address",
          rusqlite::params![
            email,
            input.customer_name,
            input.phone,
            input.payment_handle,
            input.default_address,
            at_str,
          ],
        )?;
        Ok(conn.query_row(
          &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?1"),
          rusqlite::params![email],
          RawAccount::from_row,
        )?)
      })
      .await?;

    raw.into_account()
  }

  async fn get_account(&self, email: &str) -> Result<Option<Account>> {
    let email = normalize_email(email);

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = ?1"),
            rusqlite::params![email],
            RawAccount::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAccount::into_account).transpose()
  }

  async fn list_accounts(&self) -> Result<Vec<Account>> {
    let raws: Vec<RawAccount> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map([], RawAccount::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAccount::into_account).collect()
  }
}

//! SQL schema for the Haul SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS submissions (
    id                    TEXT PRIMARY KEY,
    customer_name         TEXT NOT NULL,
    email                 TEXT NOT NULL,   -- as submitted
    email_key             TEXT NOT NULL,   -- normalize_email(email); lookups use this
    phone                 TEXT NOT NULL,
    payment_handle        TEXT NOT NULL,
    pickup_address        TEXT NOT NULL,
    pickup_lat            REAL,
    pickup_lng            REAL,
    clothing_description  TEXT NOT NULL DEFAULT '',
    clothing_items        TEXT NOT NULL DEFAULT '[]',   -- JSON array
    estimated_items       INTEGER NOT NULL DEFAULT 0,
    status                TEXT NOT NULL DEFAULT 'pending'
                          CHECK (status IN ('pending', 'scheduled', 'picked_up',
                                            'processing', 'listed', 'sold')),
    created_at            TEXT NOT NULL,   -- RFC 3339 UTC, fixed width
    updated_at            TEXT NOT NULL,
    scheduled_pickup_date TEXT,
    scheduled_pickup_time TEXT,
    admin_notes           TEXT,
    customer_availability TEXT NOT NULL DEFAULT '[]'    -- JSON array
);

-- Linked to submissions by email string only; no foreign key.
CREATE TABLE IF NOT EXISTS accounts (
    email           TEXT PRIMARY KEY,   -- always lower-case
    customer_name   TEXT NOT NULL,
    phone           TEXT NOT NULL,
    payment_handle  TEXT NOT NULL,
    default_address TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS submissions_email_idx   ON submissions(email_key);
CREATE INDEX IF NOT EXISTS submissions_created_idx ON submissions(created_at);
CREATE INDEX IF NOT EXISTS submissions_status_idx  ON submissions(status);

PRAGMA user_version = 2;
";

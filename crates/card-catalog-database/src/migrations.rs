//! Database migrations.
//!
//! Migrations run in order and are tracked in the `migrations` table.

use crate::StoreResult;
use rusqlite::Connection;
use tracing::{debug, info};

/// Current schema version.
pub const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> StoreResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM migrations",
        [],
        |row| row.get(0),
    )?;

    info!(current_version, target_version = CURRENT_VERSION, "Running migrations");

    if current_version < 1 {
        migrate_v1_cards(conn)?;
    }
    if current_version < 2 {
        migrate_v2_authorized_senders(conn)?;
    }

    debug!("Migrations complete");
    Ok(())
}

fn record_migration(conn: &Connection, version: i32, name: &str) -> StoreResult<()> {
    conn.execute(
        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
        rusqlite::params![version, name],
    )?;
    debug!(version, name, "Migration applied");
    Ok(())
}

/// V1: card catalog keyed by the Portuguese name.
fn migrate_v1_cards(conn: &Connection) -> StoreResult<()> {
    info!("Applying migration v1: cards");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS cards (
            name_pt TEXT PRIMARY KEY NOT NULL CHECK (length(name_pt) > 0),
            name_en TEXT,
            cost INTEGER,
            power INTEGER,
            ability TEXT,
            availability TEXT,
            image_url TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_cards_name_en
            ON cards(name_en);
        ",
    )?;

    record_migration(conn, 1, "cards")?;
    Ok(())
}

/// V2: presence-only set of identities allowed to mutate the catalog.
fn migrate_v2_authorized_senders(conn: &Connection) -> StoreResult<()> {
    info!("Applying migration v2: authorized senders");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS authorized_senders (
            identity TEXT PRIMARY KEY NOT NULL,
            added_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;

    record_migration(conn, 2, "authorized_senders")?;
    Ok(())
}

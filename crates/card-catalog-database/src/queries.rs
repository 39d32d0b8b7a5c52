//! Standalone query functions that work with any Connection.
//!
//! Each function takes a `&Connection` as its first parameter so it can run
//! inside [`crate::AsyncDatabase::call`] or directly in tests.

use crate::{AuthorizedSender, CardFields, CardRecord, StoreError, StoreResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use tracing::debug;

const CARD_COLUMNS: &str =
    "name_pt, name_en, cost, power, ability, availability, image_url, created_at, updated_at";

// ==========================================
// Cards
// ==========================================

/// Get a card by its primary key.
pub fn get_card(conn: &Connection, name_pt: &str) -> StoreResult<Option<CardRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {CARD_COLUMNS} FROM cards WHERE name_pt = ?1"
    ))?;

    stmt.query_row(params![name_pt], map_card)
        .optional()
        .map_err(StoreError::from)
}

/// Get a card whose primary key or English name equals `name`.
///
/// A primary-key match wins. Among English-name matches, the earliest
/// inserted record wins.
pub fn get_card_by_either(conn: &Connection, name: &str) -> StoreResult<Option<CardRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {CARD_COLUMNS} FROM cards
         WHERE name_pt = ?1 OR name_en = ?1
         ORDER BY (name_pt = ?1) DESC, rowid ASC
         LIMIT 1"
    ))?;

    stmt.query_row(params![name], map_card)
        .optional()
        .map_err(StoreError::from)
}

/// Insert a new card. Fails with `DuplicateKey` if the primary key exists.
pub fn insert_card(conn: &Connection, fields: &CardFields) -> StoreResult<CardRecord> {
    validate_key(&fields.name_pt)?;

    let now = Utc::now().to_rfc3339();
    let result = conn.execute(
        "INSERT INTO cards (name_pt, name_en, cost, power, ability, availability, image_url, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
        params![
            fields.name_pt,
            fields.name_en,
            fields.cost,
            fields.power,
            fields.ability,
            fields.availability,
            fields.image_url,
            now,
        ],
    );

    match result {
        Ok(_) => {}
        Err(rusqlite::Error::SqliteFailure(e, _)) if is_key_conflict(&e) => {
            return Err(StoreError::DuplicateKey(fields.name_pt.clone()));
        }
        Err(e) => return Err(e.into()),
    }

    debug!(name_pt = %fields.name_pt, "Card inserted");
    get_card(conn, &fields.name_pt)?
        .ok_or_else(|| StoreError::NotFound(fields.name_pt.clone()))
}

/// Overwrite every non-key field of an existing card.
///
/// Fails with `NotFound` if no card has `fields.name_pt`.
pub fn update_card(conn: &Connection, fields: &CardFields) -> StoreResult<CardRecord> {
    validate_key(&fields.name_pt)?;

    let now = Utc::now().to_rfc3339();
    let changed = conn.execute(
        "UPDATE cards
         SET name_en = ?2, cost = ?3, power = ?4, ability = ?5, availability = ?6, image_url = ?7, updated_at = ?8
         WHERE name_pt = ?1",
        params![
            fields.name_pt,
            fields.name_en,
            fields.cost,
            fields.power,
            fields.ability,
            fields.availability,
            fields.image_url,
            now,
        ],
    )?;

    if changed == 0 {
        return Err(StoreError::NotFound(fields.name_pt.clone()));
    }

    debug!(name_pt = %fields.name_pt, "Card updated");
    get_card(conn, &fields.name_pt)?
        .ok_or_else(|| StoreError::NotFound(fields.name_pt.clone()))
}

/// Count cards in the catalog.
pub fn count_cards(conn: &Connection) -> StoreResult<i64> {
    conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))
        .map_err(StoreError::from)
}

// ==========================================
// Authorized senders
// ==========================================

/// Check whether an identity is in the authorization set.
pub fn is_authorized(conn: &Connection, identity: &str) -> StoreResult<bool> {
    let mut stmt =
        conn.prepare_cached("SELECT 1 FROM authorized_senders WHERE identity = ?1")?;
    let found = stmt
        .query_row(params![identity], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// Add an identity to the authorization set.
///
/// Returns false if the identity was already present.
pub fn grant_authorization(conn: &Connection, identity: &str) -> StoreResult<bool> {
    if identity.trim().is_empty() {
        return Err(StoreError::InvalidRecord(
            "identity must not be empty".to_string(),
        ));
    }

    let added = conn.execute(
        "INSERT OR IGNORE INTO authorized_senders (identity, added_at) VALUES (?1, ?2)",
        params![identity, Utc::now().to_rfc3339()],
    )?;
    Ok(added > 0)
}

/// List the authorization set ordered by identity.
pub fn list_authorized(conn: &Connection) -> StoreResult<Vec<AuthorizedSender>> {
    let mut stmt = conn
        .prepare_cached("SELECT identity, added_at FROM authorized_senders ORDER BY identity")?;

    let senders = stmt
        .query_map([], |row| {
            Ok(AuthorizedSender {
                identity: row.get(0)?,
                added_at: parse_datetime(row.get::<_, String>(1)?),
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(senders)
}

// ==========================================
// Helpers
// ==========================================

fn validate_key(name_pt: &str) -> StoreResult<()> {
    if name_pt.is_empty() {
        return Err(StoreError::InvalidRecord(
            "name_pt must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn is_key_conflict(e: &rusqlite::ffi::Error) -> bool {
    e.code == ErrorCode::ConstraintViolation
        && matches!(
            e.extended_code,
            rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY | rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
}

fn map_card(row: &Row<'_>) -> rusqlite::Result<CardRecord> {
    Ok(CardRecord {
        name_pt: row.get(0)?,
        name_en: row.get(1)?,
        cost: row.get(2)?,
        power: row.get(3)?,
        ability: row.get(4)?,
        availability: row.get(5)?,
        image_url: row.get(6)?,
        created_at: parse_datetime(row.get::<_, String>(7)?),
        updated_at: parse_datetime(row.get::<_, String>(8)?),
    })
}

/// Parse RFC 3339, falling back to SQLite's `datetime('now')` format.
fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .unwrap_or_else(|_| Utc::now())
}

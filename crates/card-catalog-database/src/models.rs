//! Record store model types.

use chrono::{DateTime, Utc};

/// A catalog entry, keyed by its Portuguese name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardRecord {
    /// Primary key. Unique, non-empty, matched case-sensitively.
    pub name_pt: String,
    /// Alternate lookup key. Not unique.
    pub name_en: Option<String>,
    pub cost: Option<i64>,
    pub power: Option<i64>,
    pub ability: Option<String>,
    pub availability: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Field values supplied by an insert or update command.
///
/// For updates, `name_pt` selects the record and is never written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFields {
    pub name_pt: String,
    pub name_en: Option<String>,
    pub cost: Option<i64>,
    pub power: Option<i64>,
    pub ability: Option<String>,
    pub availability: Option<String>,
    pub image_url: Option<String>,
}

impl CardFields {
    /// Build fields with only the primary key set.
    pub fn keyed(name_pt: impl Into<String>) -> Self {
        Self {
            name_pt: name_pt.into(),
            ..Default::default()
        }
    }
}

/// An identity allowed to mutate the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedSender {
    pub identity: String,
    pub added_at: DateTime<Utc>,
}

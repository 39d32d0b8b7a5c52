//! The record store contract consumed by the command layer.

use crate::{queries, AsyncDatabase, AuthorizedSender, CardFields, CardRecord, StoreResult};
use async_trait::async_trait;

/// Keyed storage for catalog records and the authorization set.
///
/// Every operation is atomic for a single record. Storage faults surface as
/// [`crate::StoreError`] and are never swallowed here.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Look up a record by primary key.
    async fn get(&self, name_pt: &str) -> StoreResult<Option<CardRecord>>;

    /// Look up a record whose primary key or English name equals `name`.
    async fn get_by_either(&self, name: &str) -> StoreResult<Option<CardRecord>>;

    /// Insert a record, failing with `DuplicateKey` if its key is taken.
    async fn insert(&self, fields: CardFields) -> StoreResult<CardRecord>;

    /// Overwrite the non-key fields of an existing record, failing with
    /// `NotFound` if no record has the key.
    async fn update(&self, fields: CardFields) -> StoreResult<CardRecord>;

    /// Membership test against the authorization set.
    async fn is_authorized(&self, identity: &str) -> StoreResult<bool>;
}

/// SQLite-backed record store.
#[derive(Clone)]
pub struct CardCatalog {
    db: AsyncDatabase,
}

impl CardCatalog {
    pub fn new(db: AsyncDatabase) -> Self {
        Self { db }
    }

    /// Underlying executor, for operator commands outside the trait.
    pub fn database(&self) -> &AsyncDatabase {
        &self.db
    }

    /// Add an identity to the authorization set. Returns false if present.
    pub async fn grant_authorization(&self, identity: &str) -> StoreResult<bool> {
        let identity = identity.to_string();
        self.db
            .call(move |conn| queries::grant_authorization(conn, &identity))
            .await
    }

    /// The whole authorization set, ordered by identity.
    pub async fn authorized_senders(&self) -> StoreResult<Vec<AuthorizedSender>> {
        self.db.call(queries::list_authorized).await
    }
}

#[async_trait]
impl RecordStore for CardCatalog {
    async fn get(&self, name_pt: &str) -> StoreResult<Option<CardRecord>> {
        let name_pt = name_pt.to_string();
        self.db
            .call(move |conn| queries::get_card(conn, &name_pt))
            .await
    }

    async fn get_by_either(&self, name: &str) -> StoreResult<Option<CardRecord>> {
        let name = name.to_string();
        self.db
            .call(move |conn| queries::get_card_by_either(conn, &name))
            .await
    }

    async fn insert(&self, fields: CardFields) -> StoreResult<CardRecord> {
        self.db
            .call(move |conn| queries::insert_card(conn, &fields))
            .await
    }

    async fn update(&self, fields: CardFields) -> StoreResult<CardRecord> {
        self.db
            .call(move |conn| queries::update_card(conn, &fields))
            .await
    }

    async fn is_authorized(&self, identity: &str) -> StoreResult<bool> {
        let identity = identity.to_string();
        self.db
            .call(move |conn| queries::is_authorized(conn, &identity))
            .await
    }
}

//! Catalog service error types.

use card_catalog_database::StoreError;
use thiserror::Error;

/// Outcome of a catalog operation that did not succeed.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Requester is not in the authorization set
    #[error("Sender not authorized: {0}")]
    Unauthorized(String),

    /// Record store rejected or failed the operation
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type alias using CatalogError.
pub type CatalogResult<T> = Result<T, CatalogError>;

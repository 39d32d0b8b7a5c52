//! SQLite record store for the card catalog bot.
//!
//! This crate provides:
//! - Async SQLite executor with a dedicated thread
//! - Schema migrations for the `cards` and `authorized_senders` tables
//! - Model types for catalog records
//! - Query helpers that work on any `rusqlite::Connection`
//! - The [`RecordStore`] trait consumed by the command layer, implemented by
//!   [`CardCatalog`]
//!
//! # Architecture
//!
//! All statements run on one executor thread, so writes are serialized in
//! FIFO order. Two concurrent inserts of the same primary key therefore
//! resolve to exactly one success and one [`StoreError::DuplicateKey`].
//!
//! ```ignore
//! let db = AsyncDatabase::open(path).await?;
//! let catalog = CardCatalog::new(db);
//! let card = catalog.get_by_either("Spider-Man").await?;
//! ```

mod error;
mod executor;
mod migrations;
mod models;
pub mod queries;
mod store;

pub use error::{StoreError, StoreResult};
pub use executor::AsyncDatabase;
pub use migrations::{run_migrations, CURRENT_VERSION};
pub use models::{AuthorizedSender, CardFields, CardRecord};
pub use store::{CardCatalog, RecordStore};

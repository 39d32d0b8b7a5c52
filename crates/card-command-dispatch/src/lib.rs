//! Command handling for the card catalog bot.
//!
//! This crate provides:
//! - The `!` command language ([`command::parse`])
//! - [`AuthorizationGate`], which fails closed on store errors
//! - [`CatalogService`]: lookup, insert and update over a
//!   [`card_catalog_database::RecordStore`]
//! - [`Dispatcher`], which turns one inbound message into at most one reply
//! - [`LaneRouter`], which keeps each sender's commands in arrival order
//!
//! ```ignore
//! let service = CatalogService::new(Arc::new(catalog));
//! let dispatcher = Arc::new(Dispatcher::new(service, config.bot_identity.clone()));
//! LaneRouter::new(dispatcher, config.lane_idle_timeout()).run(events).await;
//! ```

mod auth_gate;
pub mod command;
mod dispatcher;
mod error;
mod lanes;
pub mod render;
mod service;

#[cfg(test)]
mod test_support;

pub use auth_gate::AuthorizationGate;
pub use command::{CardArgs, Command, MutationKind};
pub use dispatcher::Dispatcher;
pub use error::{CatalogError, CatalogResult};
pub use lanes::LaneRouter;
pub use service::CatalogService;

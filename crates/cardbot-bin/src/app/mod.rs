//! Application wiring and operator commands.

mod admin;
mod init;
mod state;

pub use admin::{authorize, list_authorized, lookup};
pub use init::run_bot;
pub use state::BotState;

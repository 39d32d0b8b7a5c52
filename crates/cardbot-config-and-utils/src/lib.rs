//! Core types, configuration, and utilities for the card catalog bot.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, DEFAULT_LANE_IDLE_TIMEOUT_SECS, DEFAULT_LOG_LEVEL, DEFAULT_REPLY_QUEUE_CAPACITY,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, init_logging_for_service, parse_level};
pub use paths::Paths;

//! Configuration management for the bot.

use crate::{CoreError, CoreResult, Paths};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Seconds a sender lane may sit idle before its worker task retires.
pub const DEFAULT_LANE_IDLE_TIMEOUT_SECS: u64 = 300;

/// Outbound frames buffered per bridge connection.
pub const DEFAULT_REPLY_QUEUE_CAPACITY: usize = 64;

/// Main bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// The bot's own messaging identity. Inbound messages from it are ignored
    /// even when the bridge does not flag them as `from_me`.
    #[serde(default)]
    pub bot_identity: Option<String>,
    /// Idle timeout for per-sender processing lanes.
    #[serde(default = "default_lane_idle_timeout_secs")]
    pub lane_idle_timeout_secs: u64,
    /// Outbound frame buffer per bridge connection.
    #[serde(default = "default_reply_queue_capacity")]
    pub reply_queue_capacity: usize,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_lane_idle_timeout_secs() -> u64 {
    DEFAULT_LANE_IDLE_TIMEOUT_SECS
}

fn default_reply_queue_capacity() -> usize {
    DEFAULT_REPLY_QUEUE_CAPACITY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            bot_identity: None,
            lane_idle_timeout_secs: DEFAULT_LANE_IDLE_TIMEOUT_SECS,
            reply_queue_capacity: DEFAULT_REPLY_QUEUE_CAPACITY,
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults,
    /// then apply environment overrides.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Lane idle timeout as a Duration.
    pub fn lane_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.lane_idle_timeout_secs)
    }

    fn validate(&self) -> CoreResult<()> {
        if self.lane_idle_timeout_secs == 0 {
            return Err(CoreError::Config(
                "lane_idle_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.reply_queue_capacity == 0 {
            return Err(CoreError::Config(
                "reply_queue_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("CARDBOT_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(identity) = std::env::var("CARDBOT_BOT_IDENTITY") {
            let identity = identity.trim();
            if !identity.is_empty() {
                self.bot_identity = Some(identity.to_string());
            }
        }
    }
}

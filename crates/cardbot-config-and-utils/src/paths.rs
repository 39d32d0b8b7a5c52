//! File system paths for the bot.

use crate::{CoreError, CoreResult};
use std::path::PathBuf;

/// Runtime directory name under the user's home.
const BASE_DIR_NAME: &str = ".cardbot";
/// Gateway socket filename under the base runtime directory.
const GATEWAY_SOCKET_NAME: &str = "gateway.sock";

/// Manages file system paths for the bot.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Base directory for runtime files (~/.cardbot)
    base_dir: PathBuf,
}

impl Paths {
    /// Create a new Paths instance rooted at `~/.cardbot`.
    pub fn new() -> CoreResult<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| CoreError::Path("Could not determine home directory".to_string()))?;

        Ok(Self {
            base_dir: home.join(BASE_DIR_NAME),
        })
    }

    /// Create a new Paths instance with a custom base directory.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.cardbot).
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the config file path (~/.cardbot/config.json).
    pub fn config_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the card catalog database path (~/.cardbot/cards.sqlite).
    pub fn database_file(&self) -> PathBuf {
        self.base_dir.join("cards.sqlite")
    }

    /// Get the socket the messaging bridge connects to (~/.cardbot/gateway.sock).
    pub fn gateway_socket_file(&self) -> PathBuf {
        self.base_dir.join(GATEWAY_SOCKET_NAME)
    }

    /// Get the PID file path (~/.cardbot/cardbot.pid).
    pub fn pid_file(&self) -> PathBuf {
        self.base_dir.join("cardbot.pid")
    }

    /// Get the logs directory (~/.cardbot/logs).
    pub fn logs_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    /// Get the central JSONL log file (~/.cardbot/logs/dev.jsonl).
    pub fn log_file(&self) -> PathBuf {
        self.logs_dir().join("dev.jsonl")
    }

    /// Ensure all required directories exist.
    pub fn ensure_dirs(&self) -> CoreResult<()> {
        std::fs::create_dir_all(&self.base_dir)?;
        std::fs::create_dir_all(self.logs_dir())?;
        Ok(())
    }
}

//! Logging initialization for the bot.
//!
//! Thin wrapper over the observability crate. Every cardbot process writes
//! structured JSONL to the central log file and mirrors it to stderr.

use observability::LogConfig;
use std::path::PathBuf;

/// Service name of the long-running bot.
const BOT_SERVICE: &str = "cardbot";

/// Initialize logging for the bot process.
///
/// `RUST_LOG` takes precedence over `level`.
///
/// ```ignore
/// init_logging(&config.log_level, Some(paths.log_file()));
/// tracing::info!("Bot started");
/// ```
pub fn init_logging(level: &str, log_path: Option<PathBuf>) {
    init_logging_for_service(BOT_SERVICE, level, log_path);
}

/// Initialize logging under another service name, e.g. `cardbot-admin`.
pub fn init_logging_for_service(service_name: &str, level: &str, log_path: Option<PathBuf>) {
    observability::init_with_config(LogConfig {
        service_name: service_name.to_string(),
        default_level: parse_level(level).as_str().to_lowercase(),
        log_path,
        also_stderr: true,
    });
}

/// Map a user-supplied level name to a tracing level. Unknown names mean info.
pub fn parse_level(level: &str) -> tracing::Level {
    level
        .trim()
        .parse::<tracing::Level>()
        .or_else(|_| match level.trim().to_ascii_lowercase().as_str() {
            "warning" => Ok(tracing::Level::WARN),
            _ => Err(()),
        })
        .unwrap_or(tracing::Level::INFO)
}

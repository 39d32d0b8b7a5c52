//! # Observability
//!
//! Structured logging shared by every cardbot binary.
//!
//! A binary calls [`init_with_config`] once at startup; library
//! crates only use the `tracing` macros. With the default `dev` feature each
//! event is appended as one JSON line to `~/.cardbot/logs/dev.jsonl`:
//!
//! ```text
//! tail -f ~/.cardbot/logs/dev.jsonl | jq 'select(.level != "DEBUG")'
//! ```
//!
//! `RUST_LOG` overrides the configured level.

#[cfg(feature = "dev")]
mod dev;

mod json_layer;

#[cfg(feature = "dev")]
pub use dev::default_log_path;
pub use json_layer::{JsonLayer, LogEntry};

use std::path::PathBuf;

/// Logging setup for one process.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Written into every line, e.g. `cardbot` or `cardbot-admin`.
    pub service_name: String,
    /// Filter used when `RUST_LOG` is unset.
    pub default_level: String,
    /// Central log file; `None` means [`default_log_path`].
    pub log_path: Option<PathBuf>,
    /// Mirror events to stderr in compact form.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "cardbot".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: false,
        }
    }
}

/// Initialize logging. Only the first call in a process has any effect.
pub fn init_with_config(config: LogConfig) {
    #[cfg(feature = "dev")]
    dev::init_dev_subscriber(&config);

    #[cfg(not(feature = "dev"))]
    {
        use tracing_subscriber::util::SubscriberInitExt;
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.default_level));
        let _ = tracing_subscriber::fmt()
            .compact()
            .with_env_filter(filter)
            .finish()
            .try_init();
    }
}

//! Central JSONL file output.
//!
//! All cardbot processes (the bot and the admin subcommands) append to the
//! same file, so `tail -f` shows one interleaved stream.

use crate::json_layer::JsonLayer;
use crate::LogConfig;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// `~/.cardbot/logs/dev.jsonl`, or `./.cardbot/...` without a home directory.
pub fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cardbot")
        .join("logs")
        .join("dev.jsonl")
}

/// Shared append-only handle to the central log file.
#[derive(Clone)]
pub struct LogFile {
    file: Arc<Mutex<File>>,
}

impl LogFile {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open(path: &Path) -> io::Result<Self> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
        })
    }
}

impl Write for LogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.lock().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.lock().flush()
    }
}

impl<'a> MakeWriter<'a> for LogFile {
    type Writer = LogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber: JSONL file plus optional stderr.
///
/// Stderr is forced on when the file cannot be opened. Returns without
/// effect if a subscriber is already installed.
pub fn init_dev_subscriber(config: &LogConfig) {
    let path = config.log_path.clone().unwrap_or_else(default_log_path);

    let file_layer = match LogFile::open(&path) {
        Ok(file) => Some(
            JsonLayer::new(config.service_name.clone(), file)
                .with_filter(filter(&config.default_level)),
        ),
        Err(e) => {
            eprintln!("cardbot: cannot open log file {}: {}", path.display(), e);
            None
        }
    };
    let to_file = file_layer.is_some();

    let stderr_layer = (config.also_stderr || !to_file).then(|| {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(io::stderr)
            .with_filter(filter(&config.default_level))
    });

    let installed = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_ok();

    if installed && to_file {
        tracing::debug!(log_path = %path.display(), service = %config.service_name, "Logging to central file");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("nested").join("dev.jsonl");

        let mut log = LogFile::open(&path).unwrap();
        log.write_all(b"{\"message\":\"hi\"}\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{\"message\":\"hi\"}\n");
    }

    #[test]
    fn test_clones_append_to_the_same_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dev.jsonl");
        std::fs::write(&path, "old\n").unwrap();

        let log = LogFile::open(&path).unwrap();
        log.make_writer().write_all(b"bot\n").unwrap();
        log.make_writer().write_all(b"admin\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\nbot\nadmin\n");
    }

    #[test]
    fn test_default_path_is_under_cardbot_logs() {
        let path = default_log_path();
        assert!(path.ends_with(".cardbot/logs/dev.jsonl"));
    }
}

//! Async SQLite executor using a dedicated background thread.
//!
//! - One dedicated thread runs every SQLite statement
//! - Callers send closures through a channel and await the result
//! - The Tokio runtime stays free for gateway and dispatcher work
//!
//! Only SQL and lightweight row mapping belong inside [`AsyncDatabase::call`];
//! anything slower starves every other query queued behind it.

use crate::{migrations, StoreError, StoreResult};
use std::path::Path;
use tokio_rusqlite::Connection;
use tracing::{debug, info};

const PRAGMAS: &str = "
    PRAGMA journal_mode = WAL;
    PRAGMA synchronous = NORMAL;
    PRAGMA cache_size = -16000;
    PRAGMA temp_store = MEMORY;
    PRAGMA busy_timeout = 5000;
";

fn from_tokio_rusqlite(e: tokio_rusqlite::Error) -> StoreError {
    match e {
        tokio_rusqlite::Error::Rusqlite(e) => StoreError::Sqlite(e),
        tokio_rusqlite::Error::Close(_) => StoreError::Connection("Connection closed".to_string()),
        other => StoreError::Connection(other.to_string()),
    }
}

/// Async SQLite database with a dedicated executor thread.
///
/// Cloning is cheap; every clone talks to the same executor thread.
#[derive(Clone)]
pub struct AsyncDatabase {
    conn: Connection,
    path: String,
}

impl AsyncDatabase {
    /// Open a database at the given path.
    ///
    /// Creates the file and its parent directory if needed, enables WAL
    /// mode, and runs pending migrations.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let path_str = path.to_string_lossy().to_string();
        info!(path = %path_str, "Opening card catalog database");

        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let db = Self {
            conn,
            path: path_str,
        };
        db.call_sqlite(|conn| conn.execute_batch(PRAGMAS)).await?;
        db.call(|conn| migrations::run_migrations(conn)).await?;

        info!(path = %db.path, "Card catalog database initialized with WAL mode");
        Ok(db)
    }

    /// Open an in-memory database, mainly for tests.
    pub async fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let db = Self {
            conn,
            path: ":memory:".to_string(),
        };
        db.call_sqlite(|conn| conn.execute_batch("PRAGMA temp_store = MEMORY;"))
            .await?;
        db.call(|conn| migrations::run_migrations(conn)).await?;
        Ok(db)
    }

    /// Execute a closure on the database connection.
    ///
    /// The closure runs on the dedicated SQLite thread; the caller's task is
    /// parked until the result is ready.
    pub async fn call<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        // The store result rides inside the executor's Ok so domain errors
        // like DuplicateKey survive the channel hop unchanged.
        let outer_result = self.conn.call(move |conn| Ok(f(conn))).await;

        match outer_result {
            Ok(inner) => inner,
            Err(e) => Err(from_tokio_rusqlite(e)),
        }
    }

    /// Execute a closure that returns a rusqlite::Result.
    pub async fn call_sqlite<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.conn
            .call(move |conn| Ok(f(conn)?))
            .await
            .map_err(from_tokio_rusqlite)
    }

    /// Check if the database is healthy by executing a simple query.
    pub async fn health_check(&self) -> StoreResult<()> {
        self.call_sqlite(|conn| conn.execute_batch("SELECT 1"))
            .await?;
        debug!("Database health check passed");
        Ok(())
    }

    /// Close the database connection after pending operations drain.
    pub async fn close(self) -> StoreResult<()> {
        self.conn
            .close()
            .await
            .map_err(|e| StoreError::Connection(format!("Failed to close database: {:?}", e)))?;
        info!(path = %self.path, "Database closed");
        Ok(())
    }
}

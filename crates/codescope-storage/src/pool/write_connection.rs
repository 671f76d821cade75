//! Single write connection. Serialized writes, no contention.
//!
//! The connection sits behind a `std::sync::Mutex`, held only for the span of
//! one closure, so synchronous callers never block an async runtime worker.
//! Async callers additionally queue on a `tokio::sync::Mutex` turn, which
//! hands the writer out fairly without parking a worker thread.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use codescope_core::config::defaults::DEFAULT_BUSY_TIMEOUT_MS;
use codescope_core::errors::CodescopeResult;

use super::functions::register_functions;
use super::pragmas::apply_pragmas;
use crate::to_storage_err;

/// A single write connection, usable from sync code and from async tasks.
pub struct WriteConnection {
    conn: Mutex<Connection>,
    async_turn: tokio::sync::Mutex<()>,
}

impl WriteConnection {
    /// Open a new write connection to the given database path.
    pub fn open(path: &Path, busy_timeout_ms: u32) -> CodescopeResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        Self::prepare(conn, busy_timeout_ms)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> CodescopeResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        Self::prepare(conn, DEFAULT_BUSY_TIMEOUT_MS)
    }

    fn prepare(conn: Connection, busy_timeout_ms: u32) -> CodescopeResult<Self> {
        apply_pragmas(&conn, busy_timeout_ms)?;
        register_functions(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            async_turn: tokio::sync::Mutex::new(()),
        })
    }

    fn lock(&self) -> CodescopeResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| to_storage_err(format!("write connection lock poisoned: {e}")))
    }

    /// Wait for the async turn, then execute a closure with the connection.
    pub async fn with_conn<F, T>(&self, f: F) -> CodescopeResult<T>
    where
        F: FnOnce(&Connection) -> CodescopeResult<T>,
    {
        let _turn = self.async_turn.lock().await;
        let guard = self.lock()?;
        f(&guard)
    }

    /// Synchronous access. Safe to call from inside an async runtime.
    pub fn with_conn_sync<F, T>(&self, f: F) -> CodescopeResult<T>
    where
        F: FnOnce(&Connection) -> CodescopeResult<T>,
    {
        let guard = self.lock()?;
        f(&guard)
    }
}

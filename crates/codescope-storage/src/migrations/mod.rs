//! Schema migrations using PRAGMA user_version.

pub mod v001_code_chunks;

use rusqlite::Connection;

use codescope_core::errors::{CodescopeResult, StorageError};

type Migration = fn(&Connection) -> CodescopeResult<()>;

const MIGRATIONS: &[(u32, Migration)] = &[(1, v001_code_chunks::migrate)];

/// Latest schema version this build knows about.
pub const LATEST_VERSION: u32 = 1;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> CodescopeResult<()> {
    let current = current_version(conn)?;

    for (version, migrate) in MIGRATIONS {
        if current >= *version {
            continue;
        }
        migrate(conn).map_err(|e| StorageError::MigrationFailed {
            version: *version,
            reason: e.to_string(),
        })?;
        conn.pragma_update(None, "user_version", version)
            .map_err(|e| StorageError::MigrationFailed {
                version: *version,
                reason: e.to_string(),
            })?;
        tracing::info!(version = version, "applied migration");
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> CodescopeResult<u32> {
    conn.pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| {
            StorageError::SqliteError {
                message: e.to_string(),
            }
            .into()
        })
}

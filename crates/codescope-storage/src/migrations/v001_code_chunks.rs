//! v001: code_chunks table, scope and recency indexes.
//!
//! `seq` is the scan order used as the final ranking tie-break.
//! `created_at` is fixed-width RFC 3339 with microseconds, so text order is
//! chronological order.

use rusqlite::Connection;

use codescope_core::errors::CodescopeResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CodescopeResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS code_chunks (
            seq            INTEGER PRIMARY KEY AUTOINCREMENT,
            id             TEXT NOT NULL UNIQUE,
            tenant_id      TEXT NOT NULL,
            repository_id  TEXT NOT NULL,
            content        TEXT NOT NULL,
            file_name      TEXT NOT NULL,
            file_path      TEXT NOT NULL,
            file_size      INTEGER NOT NULL DEFAULT 0,
            commit_number  TEXT NOT NULL DEFAULT '',
            embedding      BLOB,
            dimensions     INTEGER,
            metadata       TEXT NOT NULL DEFAULT '{}',
            created_at     TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_code_chunks_scope
            ON code_chunks(tenant_id, repository_id);
        CREATE INDEX IF NOT EXISTS idx_code_chunks_scope_created
            ON code_chunks(tenant_id, repository_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_code_chunks_repo
            ON code_chunks(repository_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

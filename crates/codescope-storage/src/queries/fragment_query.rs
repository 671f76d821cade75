//! Scoped listing queries.

use rusqlite::{params, Connection};

use codescope_core::errors::CodescopeResult;
use codescope_core::models::{CodeFragment, TenantScope};

use super::row::{row_to_fragment, FRAGMENT_COLUMNS};
use crate::to_storage_err;

/// Fragments of a repository in insertion order, at most `limit`.
pub fn find_by_repository(
    conn: &Connection,
    repository_id: &str,
    limit: usize,
) -> CodescopeResult<Vec<CodeFragment>> {
    let sql = format!(
        "SELECT {FRAGMENT_COLUMNS} FROM code_chunks c
         WHERE c.repository_id = ?1
         ORDER BY c.seq ASC
         LIMIT ?2"
    );
    collect(conn, &sql, params![repository_id, limit as i64])
}

/// Contents of in-scope fragments whose file name contains `file_name`,
/// ASCII case-insensitively, newest first.
pub fn file_chunks(
    conn: &Connection,
    scope: &TenantScope,
    file_name: &str,
) -> CodescopeResult<Vec<String>> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT c.content FROM code_chunks c
             WHERE c.tenant_id = ?1 AND c.repository_id = ?2
               AND instr(lower(c.file_name), lower(?3)) > 0
             ORDER BY c.created_at DESC, c.seq ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(
            params![scope.tenant_id, scope.repository_id, file_name],
            |row| row.get::<_, String>(0),
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Every fragment in `scope`, in insertion order.
pub fn list_scope(conn: &Connection, scope: &TenantScope) -> CodescopeResult<Vec<CodeFragment>> {
    let sql = format!(
        "SELECT {FRAGMENT_COLUMNS} FROM code_chunks c
         WHERE c.tenant_id = ?1 AND c.repository_id = ?2
         ORDER BY c.seq ASC"
    );
    collect(conn, &sql, params![scope.tenant_id, scope.repository_id])
}

fn collect(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> CodescopeResult<Vec<CodeFragment>> {
    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params, row_to_fragment)
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

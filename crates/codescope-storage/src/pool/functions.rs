//! Scalar SQL functions backing in-database ranking.
//!
//! - `codescope_cosine(stored, query)`: cosine of two little-endian `f32`
//!   blobs via [`codescope_core::similarity::score`]; `NULL` when either
//!   side is `NULL` or the pair is degenerate.
//! - `codescope_fsum(stored, queries, dim)` and `codescope_fmax(...)`: sum
//!   and peak of the valid cosines of `stored` against each `dim`-wide
//!   query packed back to back in the `queries` blob, folded in query
//!   order via [`codescope_core::similarity::fuse`]. `NULL` when no query
//!   gives a valid cosine.
//!
//! `NULL` stands in for the degenerate sentinel so `ORDER BY ... DESC NULLS
//! LAST` sinks it.

use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::ValueRef;
use rusqlite::Connection;

use codescope_core::constants::SQL_COSINE_FN;
use codescope_core::errors::CodescopeResult;
use codescope_core::models::{bytes_to_f32s, f32s_to_bytes};
use codescope_core::similarity;

use crate::to_storage_err;

pub const SQL_FUSION_SUM_FN: &str = "codescope_fsum";
pub const SQL_FUSION_MAX_FN: &str = "codescope_fmax";

/// Register every ranking function on `conn`.
pub fn register_functions(conn: &Connection) -> CodescopeResult<()> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    conn.create_scalar_function(SQL_COSINE_FN, 2, flags, cosine)
        .map_err(|e| to_storage_err(format!("register {SQL_COSINE_FN}: {e}")))?;
    conn.create_scalar_function(SQL_FUSION_SUM_FN, 3, flags, |ctx| {
        Ok(fused(ctx).map(|(sum, _)| sum))
    })
    .map_err(|e| to_storage_err(format!("register {SQL_FUSION_SUM_FN}: {e}")))?;
    conn.create_scalar_function(SQL_FUSION_MAX_FN, 3, flags, |ctx| {
        Ok(fused(ctx).map(|(_, max)| max))
    })
    .map_err(|e| to_storage_err(format!("register {SQL_FUSION_MAX_FN}: {e}")))?;
    Ok(())
}

fn cosine(ctx: &Context<'_>) -> rusqlite::Result<Option<f64>> {
    let (stored, query) = match (ctx.get_raw(0), ctx.get_raw(1)) {
        (ValueRef::Blob(stored), ValueRef::Blob(query)) => (stored, query),
        _ => return Ok(None),
    };
    Ok(similarity::score_opt(&bytes_to_f32s(stored), &bytes_to_f32s(query)))
}

fn fused(ctx: &Context<'_>) -> Option<(f64, f64)> {
    let (stored, packed, dim) = match (ctx.get_raw(0), ctx.get_raw(1), ctx.get_raw(2)) {
        (ValueRef::Blob(stored), ValueRef::Blob(packed), ValueRef::Integer(dim)) if dim > 0 => {
            (stored, packed, dim as usize)
        }
        _ => return None,
    };
    let stored = bytes_to_f32s(stored);
    let queries = bytes_to_f32s(packed);
    similarity::fuse(queries.chunks(dim).map(|q| similarity::score(&stored, q)))
}

/// Pack query embeddings back to back for the fusion functions.
pub fn pack_queries(queries: &[Vec<f32>]) -> Vec<u8> {
    queries.iter().flat_map(|q| f32s_to_bytes(q)).collect()
}

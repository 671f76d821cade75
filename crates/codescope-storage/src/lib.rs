//! # codescope-storage
//!
//! SQLite persistence for code fragments and the persistent ranking backend.
//! Per-candidate cosine scoring runs inside SQLite through scalar functions
//! registered on every connection, so each search is one scoped statement.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use codescope_core::errors::{CodescopeError, StorageError};

/// Wrap a driver error message as a storage error.
pub(crate) fn to_storage_err(message: String) -> CodescopeError {
    StorageError::SqliteError { message }.into()
}

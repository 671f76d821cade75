// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "codescope.db";
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 768;

// --- Retrieval ---
pub const DEFAULT_SEARCH_LIMIT: i64 = 5;
pub const DEFAULT_REPO_LISTING_LIMIT: usize = 100;
pub const DEFAULT_README_FILE_NAME: &str = "readme";

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;

/// codescope version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Norms below this are treated as zero; the pair cannot be ranked.
pub const ZERO_NORM_TOLERANCE: f64 = 1e-12;

/// Score assigned to a degenerate pair (zero-norm, missing, or
/// length-mismatched embedding). Sorts below every real cosine value.
pub const DEGENERATE_SCORE: f64 = f64::NEG_INFINITY;

/// Maximum rows per insert batch for bulk operations.
pub const MAX_BULK_BATCH_SIZE: usize = 1000;

/// Name of the scalar SQL function that scores two embedding blobs.
pub const SQL_COSINE_FN: &str = "codescope_cosine";

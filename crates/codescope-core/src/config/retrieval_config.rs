use serde::{Deserialize, Serialize};

use super::defaults;

/// Retrieval subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Result bound used when a caller does not pass one.
    pub default_limit: i64,
    /// Row cap for `find_all_by_repo_id_with_limit`.
    pub repo_listing_limit: usize,
    /// File-name fragment used by `get_repo_file_chunks`.
    pub readme_file_name: String,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_limit: defaults::DEFAULT_SEARCH_LIMIT,
            repo_listing_limit: defaults::DEFAULT_REPO_LISTING_LIMIT,
            readme_file_name: defaults::DEFAULT_README_FILE_NAME.to_string(),
        }
    }
}

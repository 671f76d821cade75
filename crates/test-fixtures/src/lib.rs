//! Shared fixtures for codescope tests and benches: fragment builders,
//! synthetic embeddings, and the golden fusion scenario.

use std::path::PathBuf;

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use codescope_core::models::{Embedding, NewCodeFragment};

/// Root directory of the fixture data files.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Fixed base time so ordering tests are reproducible.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("base time is unambiguous")
}

/// `base_time() + offset_secs`.
pub fn at(offset_secs: i64) -> DateTime<Utc> {
    base_time() + Duration::seconds(offset_secs)
}

/// A fragment in `(tenant, repo)` with the given file name and embedding.
pub fn fragment(
    tenant: &str,
    repo: &str,
    file_name: &str,
    embedding: Option<Vec<f32>>,
) -> NewCodeFragment {
    NewCodeFragment {
        tenant_id: tenant.to_string(),
        repository_id: repo.to_string(),
        content: format!("// contents of {file_name}"),
        file_name: file_name.to_string(),
        file_path: format!("src/{file_name}"),
        file_size: 128,
        commit_number: "0000000".to_string(),
        embedding: embedding.map(Embedding::new),
        created_at: None,
        metadata: serde_json::json!({}),
    }
}

/// Like [`fragment`], with an explicit creation time.
pub fn fragment_at(
    tenant: &str,
    repo: &str,
    file_name: &str,
    embedding: Option<Vec<f32>>,
    created_at: DateTime<Utc>,
) -> NewCodeFragment {
    NewCodeFragment {
        created_at: Some(created_at),
        ..fragment(tenant, repo, file_name, embedding)
    }
}

/// Unit vector along axis `k` in `dims` dimensions.
pub fn one_hot(dims: usize, k: usize) -> Vec<f32> {
    let mut v = vec![0.0; dims];
    v[k % dims] = 1.0;
    v
}

/// Deterministic pseudo-random embedding (xorshift), components in `[-1, 1)`.
pub fn pseudo_random_embedding(dims: usize, seed: u64) -> Vec<f32> {
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    (0..dims)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            ((state >> 40) as f32 / (1u64 << 23) as f32) - 1.0
        })
        .collect()
}

/// The golden fusion scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct FusionScenario {
    pub description: String,
    pub tenant_id: String,
    pub repository_id: String,
    pub dimensions: usize,
    pub queries: Vec<Vec<f32>>,
    pub fragments: Vec<ScenarioFragment>,
    pub expected: Vec<ExpectedRow>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioFragment {
    pub name: String,
    pub file_name: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpectedRow {
    pub name: String,
    pub fusion_score: f64,
    pub max_sim: f64,
}

impl FusionScenario {
    pub fn load() -> Self {
        load_fixture("fusion_scenario.json")
    }

    /// Fragments to insert, one second apart in file order.
    pub fn new_fragments(&self) -> Vec<NewCodeFragment> {
        self.fragments
            .iter()
            .enumerate()
            .map(|(i, f)| {
                fragment_at(
                    &self.tenant_id,
                    &self.repository_id,
                    &f.file_name,
                    Some(f.embedding.clone()),
                    at(i as i64),
                )
            })
            .collect()
    }

    /// Scenario name of the fragment stored with `file_name`.
    pub fn name_of(&self, file_name: &str) -> Option<&str> {
        self.fragments
            .iter()
            .find(|f| f.file_name == file_name)
            .map(|f| f.name.as_str())
    }
}

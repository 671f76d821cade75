use chrono::{DateTime, Datelike, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::Embedding;
use crate::errors::{CodescopeError, CodescopeResult};

/// The `(tenant_id, repository_id)` pair that isolates one user's data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantScope {
    pub tenant_id: String,
    pub repository_id: String,
}

impl TenantScope {
    pub fn new(tenant_id: impl Into<String>, repository_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            repository_id: repository_id.into(),
        }
    }

    /// Both identifiers present and non-blank.
    pub fn is_valid(&self) -> bool {
        !self.tenant_id.trim().is_empty() && !self.repository_id.trim().is_empty()
    }

    pub fn contains(&self, fragment: &CodeFragment) -> bool {
        fragment.tenant_id == self.tenant_id && fragment.repository_id == self.repository_id
    }
}

/// A stored source-code fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeFragment {
    pub id: String,
    pub tenant_id: String,
    pub repository_id: String,
    pub content: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub commit_number: String,
    pub embedding: Option<Embedding>,
    pub metadata: serde_json::Value,
    /// Microsecond precision.
    pub created_at: DateTime<Utc>,
}

impl CodeFragment {
    /// Materialize a creation request with a fresh id and timestamp.
    pub fn from_new(new: &NewCodeFragment) -> Self {
        Self::from_new_at(new, Utc::now())
    }

    /// Materialize a creation request with an explicit creation time.
    pub fn from_new_at(new: &NewCodeFragment, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tenant_id: new.tenant_id.clone(),
            repository_id: new.repository_id.clone(),
            content: new.content.clone(),
            file_name: new.file_name.clone(),
            file_path: new.file_path.clone(),
            file_size: new.file_size,
            commit_number: new.commit_number.clone(),
            embedding: new.embedding.clone(),
            metadata: new.metadata.clone(),
            created_at: normalize_timestamp(created_at),
        }
    }

    pub fn scope(&self) -> TenantScope {
        TenantScope::new(self.tenant_id.clone(), self.repository_id.clone())
    }

    pub fn embedding_slice(&self) -> Option<&[f32]> {
        self.embedding.as_ref().map(Embedding::as_slice)
    }
}

/// Years with a four-digit RFC 3339 rendering; the store orders timestamps
/// as fixed-width text.
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// A fragment as submitted by the ingestion pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCodeFragment {
    pub tenant_id: String,
    pub repository_id: String,
    pub content: String,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub commit_number: String,
    #[serde(default)]
    pub embedding: Option<Embedding>,
    /// Caller override for the creation time (backfills, fixtures).
    /// `None` means "now".
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default = "empty_object")]
    pub metadata: serde_json::Value,
}

impl NewCodeFragment {
    /// Scope present, embedding (if any) of the deployment dimension and finite.
    pub fn validate(&self, dimensions: usize) -> CodescopeResult<()> {
        if !TenantScope::new(self.tenant_id.as_str(), self.repository_id.as_str()).is_valid() {
            return Err(CodescopeError::InvalidFragment {
                reason: "tenant_id and repository_id are required".to_string(),
            });
        }
        if let Some(embedding) = &self.embedding {
            Embedding::check(embedding.as_slice(), dimensions)?;
        }
        if let Some(at) = self.created_at {
            if !STORABLE_YEARS.contains(&at.year()) {
                return Err(CodescopeError::InvalidFragment {
                    reason: format!("created_at year {} is outside 0..=9999", at.year()),
                });
            }
        }
        Ok(())
    }

    pub fn materialize(&self) -> CodeFragment {
        match self.created_at {
            Some(at) => CodeFragment::from_new_at(self, at),
            None => CodeFragment::from_new(self),
        }
    }
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

/// Truncate to whole microseconds, the precision the store keeps.
pub fn normalize_timestamp(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(6)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn new_fragment() -> NewCodeFragment {
        NewCodeFragment {
            tenant_id: "u".into(),
            repository_id: "r".into(),
            content: "x = 1".into(),
            file_name: "file.py".into(),
            file_path: "src/file.py".into(),
            file_size: 5,
            commit_number: "c1".into(),
            embedding: None,
            created_at: None,
            metadata: serde_json::json!({"k": "v"}),
        }
    }

    #[test]
    fn scope_validity() {
        assert!(TenantScope::new("u", "r").is_valid());
        assert!(!TenantScope::new("", "r").is_valid());
        assert!(!TenantScope::new("u", "  ").is_valid());
    }

    #[test]
    fn materialize_assigns_id_and_truncates_time() {
        let at = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let mut new = new_fragment();
        new.created_at = Some(at);
        let f = new.materialize();
        assert_eq!(f.created_at.timestamp_subsec_nanos(), 123_456_000);
        assert!(uuid::Uuid::parse_str(&f.id).is_ok());
        assert!(f.scope() == TenantScope::new("u", "r"));
    }

    #[test]
    fn validate_checks_scope_and_dimensions() {
        let mut new = new_fragment();
        assert!(new.validate(4).is_ok());
        new.embedding = Some(Embedding::new(vec![1.0; 3]));
        assert!(new.validate(4).is_err());
        new.embedding = Some(Embedding::new(vec![1.0; 4]));
        assert!(new.validate(4).is_ok());
        new.tenant_id = String::new();
        assert!(matches!(
            new.validate(4),
            Err(CodescopeError::InvalidFragment { .. })
        ));
    }

    #[test]
    fn validate_rejects_created_at_without_four_digit_year() {
        let mut new = new_fragment();
        new.created_at = Some(Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap());
        assert!(new.validate(4).is_ok());
        new.created_at = Some(Utc.with_ymd_and_hms(10_000, 1, 1, 0, 0, 0).unwrap());
        assert!(matches!(
            new.validate(4),
            Err(CodescopeError::InvalidFragment { .. })
        ));
        new.created_at = Some(Utc.with_ymd_and_hms(-1, 6, 1, 0, 0, 0).unwrap());
        assert!(new.validate(4).is_err());
    }

    #[test]
    fn metadata_defaults_to_empty_object() {
        let json = r#"{"tenant_id":"u","repository_id":"r","content":"c","file_name":"f",
                       "file_path":"p","file_size":1,"commit_number":"c1"}"#;
        let new: NewCodeFragment = serde_json::from_str(json).unwrap();
        assert_eq!(new.metadata, serde_json::json!({}));
        assert!(new.embedding.is_none());
    }
}

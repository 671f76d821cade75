use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CodeFragment;
use crate::similarity;

/// Score fields of a ranked row. Degenerate rows carry the sentinel
/// ([`crate::constants::DEGENERATE_SCORE`]) in every field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreFields {
    /// Single-query mode.
    Single { score: f64 },
    /// Multi-query mode: sum and peak of the valid per-query similarities.
    Fusion { fusion_score: f64, max_sim: f64 },
}

impl ScoreFields {
    /// The leading sort key: `score` or `fusion_score`.
    pub fn primary(&self) -> f64 {
        match *self {
            Self::Single { score } => score,
            Self::Fusion { fusion_score, .. } => fusion_score,
        }
    }

    /// Secondary sort key: `max_sim` in fusion mode, none in single mode.
    pub fn secondary(&self) -> Option<f64> {
        match *self {
            Self::Single { .. } => None,
            Self::Fusion { max_sim, .. } => Some(max_sim),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        similarity::is_degenerate(self.primary())
    }
}

/// One ranked result row. Exists only for the duration of a retrieval call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredFragment {
    pub fragment: CodeFragment,
    #[serde(flatten)]
    pub scores: ScoreFields,
    pub created_at: DateTime<Utc>,
}

impl ScoredFragment {
    pub fn new(fragment: CodeFragment, scores: ScoreFields) -> Self {
        let created_at = fragment.created_at;
        Self {
            fragment,
            scores,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.fragment.id
    }

    pub fn file_name(&self) -> &str {
        &self.fragment.file_name
    }

    pub fn file_path(&self) -> &str {
        &self.fragment.file_path
    }

    pub fn content(&self) -> &str {
        &self.fragment.content
    }
}

/// Ranking order: primary score desc, secondary score desc, `created_at` desc.
///
/// Returns `Equal` for rows that tie on every key, so a stable sort keeps
/// scan order among them. The sentinel is `-inf`, which compares below every
/// finite score.
pub fn rank_order(a: &ScoredFragment, b: &ScoredFragment) -> Ordering {
    desc(a.scores.primary(), b.scores.primary())
        .then_with(|| match (a.scores.secondary(), b.scores.secondary()) {
            (Some(sa), Some(sb)) => desc(sa, sb),
            _ => Ordering::Equal,
        })
        .then_with(|| b.created_at.cmp(&a.created_at))
}

fn desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::constants::DEGENERATE_SCORE;

    fn row(id: &str, scores: ScoreFields, secs: i64) -> ScoredFragment {
        let created_at = Utc.timestamp_opt(secs, 0).unwrap();
        ScoredFragment::new(
            CodeFragment {
                id: id.into(),
                tenant_id: "u".into(),
                repository_id: "r".into(),
                content: String::new(),
                file_name: String::new(),
                file_path: String::new(),
                file_size: 0,
                commit_number: String::new(),
                embedding: None,
                metadata: serde_json::json!({}),
                created_at,
            },
            scores,
        )
    }

    #[test]
    fn sentinel_sorts_last() {
        let mut rows = vec![
            row("bad", ScoreFields::Single { score: DEGENERATE_SCORE }, 100),
            row("neg", ScoreFields::Single { score: -1.0 }, 0),
        ];
        rows.sort_by(rank_order);
        assert_eq!(rows[0].id(), "neg");
        assert!(rows[1].scores.is_degenerate());
    }

    #[test]
    fn ties_break_on_recency_then_scan_order() {
        let mut rows = vec![
            row("old", ScoreFields::Single { score: 0.5 }, 1),
            row("first", ScoreFields::Single { score: 0.5 }, 2),
            row("second", ScoreFields::Single { score: 0.5 }, 2),
        ];
        rows.sort_by(rank_order);
        let ids: Vec<&str> = rows.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["first", "second", "old"]);
    }

    #[test]
    fn fusion_breaks_ties_on_max_sim() {
        let mut rows = vec![
            row("flat", ScoreFields::Fusion { fusion_score: 1.0, max_sim: 0.5 }, 9),
            row("peak", ScoreFields::Fusion { fusion_score: 1.0, max_sim: 0.9 }, 1),
        ];
        rows.sort_by(rank_order);
        assert_eq!(rows[0].id(), "peak");
    }

    #[test]
    fn serializes_flat_score_fields() {
        let r = row("a", ScoreFields::Fusion { fusion_score: 1.5, max_sim: 1.0 }, 0);
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["fusion_score"], 1.5);
        assert_eq!(v["max_sim"], 1.0);
        assert_eq!(v["fragment"]["id"], "a");
    }
}

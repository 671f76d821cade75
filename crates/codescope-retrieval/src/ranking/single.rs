//! Single-query ranking: score desc, created_at desc, scan order.

use codescope_core::constants::DEGENERATE_SCORE;
use codescope_core::models::{rank_order, CodeFragment, ScoreFields, ScoredFragment};
use codescope_core::similarity;

/// Score every candidate against `query` and keep the best `limit`.
///
/// Candidates without an embedding get the degenerate sentinel.
pub fn rank_single(candidates: &[CodeFragment], query: &[f32], limit: usize) -> Vec<ScoredFragment> {
    let mut scored: Vec<ScoredFragment> = candidates
        .iter()
        .map(|fragment| {
            let score = fragment
                .embedding_slice()
                .map_or(DEGENERATE_SCORE, |e| similarity::score(e, query));
            ScoredFragment::new(fragment.clone(), ScoreFields::Single { score })
        })
        .collect();

    // Stable: full ties keep scan order.
    scored.sort_by(rank_order);
    scored.truncate(limit);
    scored
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use codescope_core::models::Embedding;

    fn candidate(id: &str, embedding: Option<Vec<f32>>, secs: i64) -> CodeFragment {
        CodeFragment {
            id: id.to_string(),
            tenant_id: "u".to_string(),
            repository_id: "r".to_string(),
            content: String::new(),
            file_name: format!("{id}.rs"),
            file_path: format!("src/{id}.rs"),
            file_size: 0,
            commit_number: String::new(),
            embedding: embedding.map(Embedding::new),
            metadata: serde_json::json!({}),
            created_at: Utc.timestamp_opt(secs, 0).unwrap(),
        }
    }

    fn ids(rows: &[ScoredFragment]) -> Vec<&str> {
        rows.iter().map(|r| r.id()).collect()
    }

    #[test]
    fn orders_by_score_then_recency_then_scan() {
        let candidates = vec![
            candidate("low", Some(vec![0.0, 1.0]), 9),
            candidate("tie-old", Some(vec![1.0, 0.0]), 1),
            candidate("tie-new", Some(vec![3.0, 0.0]), 5),
            candidate("tie-old-2", Some(vec![2.0, 0.0]), 1),
        ];
        let rows = rank_single(&candidates, &[1.0, 0.0], 10);
        assert_eq!(ids(&rows), ["tie-new", "tie-old", "tie-old-2", "low"]);
    }

    #[test]
    fn missing_and_zero_embeddings_sink() {
        let candidates = vec![
            candidate("none", None, 100),
            candidate("zero", Some(vec![0.0, 0.0]), 99),
            candidate("opposite", Some(vec![-1.0, 0.0]), 0),
        ];
        let rows = rank_single(&candidates, &[1.0, 0.0], 10);
        assert_eq!(ids(&rows), ["opposite", "none", "zero"]);
        assert!(rows[1].scores.is_degenerate());
        assert!(rows[2].scores.is_degenerate());
    }

    #[test]
    fn truncates_after_ordering() {
        let candidates: Vec<_> = (0..10)
            .map(|i| candidate(&format!("c{i}"), Some(vec![i as f32, 1.0]), 0))
            .collect();
        let rows = rank_single(&candidates, &[1.0, 0.0], 3);
        assert_eq!(ids(&rows), ["c9", "c8", "c7"]);
        assert!(rank_single(&candidates, &[1.0, 0.0], 0).is_empty());
    }
}

//! Multi-query sum fusion.
//!
//! Each candidate gets one cosine per query; degenerate values are dropped,
//! the rest are summed (`fusion_score`) and maxed (`max_sim`). A candidate
//! with no valid value carries the sentinel in both fields.

use std::collections::HashMap;

use codescope_core::constants::DEGENERATE_SCORE;
use codescope_core::models::{rank_order, CodeFragment, ScoreFields, ScoredFragment};
use codescope_core::similarity;

/// Per-candidate accumulator, keyed by fragment id.
struct FusionAccumulator<'a> {
    fragment: &'a CodeFragment,
    /// Position of the candidate's first appearance in the scan.
    first_seen: usize,
    similarities: Vec<f64>,
}

/// Rank `candidates` against every query in `queries`, best `limit` first.
///
/// Empty when `queries` is empty or any query is not `emb_dim` wide.
/// Order: fusion score desc, peak similarity desc, `created_at` desc,
/// first scan position.
pub fn rank_fusion(
    candidates: &[CodeFragment],
    queries: &[Vec<f32>],
    emb_dim: usize,
    limit: usize,
) -> Vec<ScoredFragment> {
    if queries.is_empty() || queries.iter().any(|q| q.len() != emb_dim) {
        return Vec::new();
    }

    let mut accumulators: HashMap<&str, FusionAccumulator<'_>> = HashMap::new();
    for query in queries {
        for (position, fragment) in candidates.iter().enumerate() {
            let similarity = fragment
                .embedding_slice()
                .map_or(DEGENERATE_SCORE, |e| similarity::score(e, query));
            accumulators
                .entry(fragment.id.as_str())
                .or_insert_with(|| FusionAccumulator {
                    fragment,
                    first_seen: position,
                    similarities: Vec::with_capacity(queries.len()),
                })
                .similarities
                .push(similarity);
        }
    }

    let mut fused: Vec<(usize, ScoredFragment)> = accumulators
        .into_values()
        .map(|acc| {
            let (fusion_score, max_sim) = similarity::fuse(acc.similarities)
                .unwrap_or((DEGENERATE_SCORE, DEGENERATE_SCORE));
            let row = ScoredFragment::new(
                acc.fragment.clone(),
                ScoreFields::Fusion {
                    fusion_score,
                    max_sim,
                },
            );
            (acc.first_seen, row)
        })
        .collect();

    fused.sort_by(|(pa, a), (pb, b)| rank_order(a, b).then_with(|| pa.cmp(pb)));
    fused.into_iter().take(limit).map(|(_, row)| row).collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::ranking::rank_single;
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
    fn sums_valid_similarities() {
        let candidates = vec![
            candidate("a", Some(vec![0.0, 0.0, 1.0]), 0),
            candidate("b", Some(vec![1.0, 1.0, 0.0]), 1),
            candidate("c", Some(vec![1.0, 0.0, 0.0]), 2),
        ];
        let queries = vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]];
        let rows = rank_fusion(&candidates, &queries, 3, 10);
        assert_eq!(ids(&rows), ["b", "c", "a"]);
        assert!((rows[0].scores.primary() - std::f64::consts::SQRT_2).abs() < 1e-9);
        assert_eq!(rows[1].scores, ScoreFields::Fusion { fusion_score: 1.0, max_sim: 1.0 });
        assert_eq!(rows[2].scores, ScoreFields::Fusion { fusion_score: 0.0, max_sim: 0.0 });
    }

    #[test]
    fn one_row_per_candidate() {
        let candidates = vec![candidate("x", Some(vec![1.0, 0.0]), 0)];
        let queries = vec![vec![1.0, 0.0]; 5];
        let rows = rank_fusion(&candidates, &queries, 2, 10);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].scores, ScoreFields::Fusion { fusion_score: 5.0, max_sim: 1.0 });
    }

    #[test]
    fn all_degenerate_candidate_carries_sentinel() {
        let candidates = vec![
            candidate("zero", Some(vec![0.0, 0.0]), 5),
            candidate("ok", Some(vec![-1.0, 0.0]), 0),
        ];
        let rows = rank_fusion(&candidates, &[vec![1.0, 0.0]], 2, 10);
        assert_eq!(ids(&rows), ["ok", "zero"]);
        assert_eq!(
            rows[1].scores,
            ScoreFields::Fusion {
                fusion_score: DEGENERATE_SCORE,
                max_sim: DEGENERATE_SCORE
            }
        );
    }

    #[test]
    fn max_sim_breaks_fusion_ties() {
        let candidates = vec![
            candidate("even", Some(vec![1.0, 1.0, 1.0, 1.0]), 10),
            candidate("peaked", Some(vec![1.0, 0.0, 0.0, 0.0]), 0),
        ];
        let queries = vec![vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 1.0, 0.0, 0.0]];
        let rows = rank_fusion(&candidates, &queries, 4, 10);
        assert_eq!(ids(&rows), ["peaked", "even"]);
    }

    #[test]
    fn full_ties_keep_scan_order() {
        let candidates: Vec<_> = (0..20)
            .map(|i| candidate(&format!("c{i:02}"), Some(vec![1.0, 0.0]), 0))
            .collect();
        let rows = rank_fusion(&candidates, &[vec![1.0, 0.0]], 2, 20);
        let expected: Vec<String> = (0..20).map(|i| format!("c{i:02}")).collect();
        assert_eq!(ids(&rows), expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn single_query_matches_single_ranker() {
        let candidates: Vec<_> = (0..8)
            .map(|i| candidate(&format!("c{i}"), Some(vec![i as f32 - 3.0, 1.0, 0.5]), i % 3))
            .collect();
        let q = vec![0.2, -0.7, 1.0];
        let single = rank_single(&candidates, &q, 8);
        let fused = rank_fusion(&candidates, &[q], 3, 8);
        assert_eq!(ids(&single), ids(&fused));
        for (s, f) in single.iter().zip(&fused) {
            assert_eq!(s.scores.primary().to_bits(), f.scores.primary().to_bits());
        }
    }

    #[test]
    fn rejects_empty_or_mismatched_queries() {
        let candidates = vec![candidate("x", Some(vec![1.0, 0.0]), 0)];
        assert!(rank_fusion(&candidates, &[], 2, 10).is_empty());
        assert!(rank_fusion(&candidates, &[vec![1.0, 0.0], vec![1.0]], 2, 10).is_empty());
        assert!(rank_fusion(&candidates, &[vec![1.0, 0.0]], 3, 10).is_empty());
    }
}

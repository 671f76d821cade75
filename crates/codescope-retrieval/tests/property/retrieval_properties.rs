//! Property tests: SQLite and in-memory backends return the same rows in the
//! same order with bit-identical scores; single-query fusion reduces to
//! single-query ranking.

use std::sync::Arc;

use proptest::prelude::*;

use codescope_core::models::{NewCodeFragment, ScoredFragment};
use codescope_core::traits::{ICodeFragmentStorage, ISimilaritySearch};
use codescope_retrieval::{InMemoryFragmentStore, RetrievalGateway};
use codescope_storage::StorageEngine;
use test_fixtures::{at, fragment_at};

const DIMS: usize = 4;

/// Coarse components so ties and zero vectors are common.
fn component() -> impl Strategy<Value = f32> {
    prop_oneof![Just(0.0f32), Just(1.0f32), Just(-1.0f32), Just(0.5f32), -2.0f32..2.0f32]
}

fn embedding() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(component(), DIMS)
}

/// (tenant index, optional embedding, created_at offset)
fn stored() -> impl Strategy<Value = Vec<(u8, Option<Vec<f32>>, i64)>> {
    prop::collection::vec((0u8..2, prop::option::weighted(0.9, embedding()), 0i64..3), 0..24)
}

fn build(rows: &[(u8, Option<Vec<f32>>, i64)]) -> (RetrievalGateway, RetrievalGateway) {
    let news: Vec<NewCodeFragment> = rows
        .iter()
        .enumerate()
        .map(|(i, (tenant, e, t))| {
            fragment_at(&format!("u{tenant}"), "r", &format!("f{i}.rs"), e.clone(), at(*t))
        })
        .collect();
    let sqlite = Arc::new(StorageEngine::open_in_memory(DIMS).unwrap());
    let memory = Arc::new(InMemoryFragmentStore::new(DIMS));
    sqlite.bulk_save(&news).unwrap();
    memory.bulk_save(&news).unwrap();
    (
        RetrievalGateway::persistent(sqlite),
        RetrievalGateway::in_memory(memory),
    )
}

fn key(rows: &[ScoredFragment]) -> Vec<(String, u64, Option<u64>)> {
    rows.iter()
        .map(|r| {
            (
                r.file_name().to_string(),
                r.scores.primary().to_bits(),
                r.scores.secondary().map(f64::to_bits),
            )
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_single_parity(rows in stored(), query in embedding(), limit in 1i64..30) {
        let (sqlite, memory) = build(&rows);
        let a = sqlite.similarity_search(&query, "u0", "r", limit);
        let b = memory.similarity_search(&query, "u0", "r", limit);
        prop_assert_eq!(key(&a), key(&b));
        prop_assert!(a.iter().all(|r| r.fragment.tenant_id == "u0"));
    }

    #[test]
    fn prop_fusion_parity(
        rows in stored(),
        queries in prop::collection::vec(embedding(), 1..5),
        limit in 1i64..30,
    ) {
        let (sqlite, memory) = build(&rows);
        let a = sqlite.fusion_search(&queries, "u1", "r", DIMS, limit);
        let b = memory.fusion_search(&queries, "u1", "r", DIMS, limit);
        prop_assert_eq!(key(&a), key(&b));
        let in_scope = rows.iter().filter(|(t, _, _)| *t == 1).count();
        prop_assert_eq!(a.len(), in_scope.min(limit as usize));
    }

    #[test]
    fn prop_single_query_fusion_is_single_ranking(rows in stored(), query in embedding()) {
        let (sqlite, memory) = build(&rows);
        for gateway in [&sqlite, &memory] {
            let single = gateway.similarity_search(&query, "u0", "r", 50);
            let fused = gateway.fusion_search(&[query.clone()], "u0", "r", DIMS, 50);
            prop_assert_eq!(single.len(), fused.len());
            for (s, f) in single.iter().zip(&fused) {
                prop_assert_eq!(s.file_name(), f.file_name());
                prop_assert_eq!(s.scores.primary().to_bits(), f.scores.primary().to_bits());
            }
        }
    }

    #[test]
    fn prop_degenerate_rows_trail(rows in stored(), query in embedding()) {
        let (_, memory) = build(&rows);
        let ranked = memory.similarity_search(&query, "u0", "r", 50);
        if let Some(first) = ranked.iter().position(|r| r.scores.is_degenerate()) {
            prop_assert!(ranked[first..].iter().all(|r| r.scores.is_degenerate()));
        }
    }
}

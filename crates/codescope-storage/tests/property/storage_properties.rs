//! Property tests: in-database ranking agrees with a brute-force sort over
//! the core scorer; insert/get roundtrip.

use proptest::prelude::*;

use codescope_core::models::{rank_order, ScoreFields, ScoredFragment, TenantScope};
use codescope_core::similarity;
use codescope_core::traits::{ICodeFragmentStorage, IFragmentRanker};
use codescope_storage::StorageEngine;
use test_fixtures::{at, fragment_at};

const DIMS: usize = 4;

fn component() -> impl Strategy<Value = f32> {
    prop_oneof![Just(0.0f32), -4.0f32..4.0f32]
}

fn embedding() -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(component(), DIMS)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_sql_single_ranking_matches_brute_force(
        stored in prop::collection::vec((embedding(), 0i64..5), 1..20),
        query in embedding(),
        limit in 1usize..25,
    ) {
        let engine = StorageEngine::open_in_memory(DIMS).unwrap();
        let scope = TenantScope::new("u", "r");
        let mut expected = Vec::new();
        for (i, (e, t)) in stored.iter().enumerate() {
            let saved = engine
                .save(&fragment_at("u", "r", &format!("f{i}.rs"), Some(e.clone()), at(*t)))
                .unwrap();
            let score = similarity::score(e, &query);
            expected.push(ScoredFragment::new(saved, ScoreFields::Single { score }));
        }
        expected.sort_by(rank_order);
        expected.truncate(limit);

        let got = engine.rank_single(&query, &scope, limit).unwrap();
        prop_assert_eq!(got.len(), expected.len());
        for (g, e) in got.iter().zip(&expected) {
            prop_assert_eq!(g.id(), e.id());
            prop_assert_eq!(g.scores.primary().to_bits(), e.scores.primary().to_bits());
        }
    }

    #[test]
    fn prop_insert_get_roundtrip(
        content in "[a-zA-Z0-9 _(){};]{0,200}",
        e in embedding(),
    ) {
        let engine = StorageEngine::open_in_memory(DIMS).unwrap();
        let mut new = fragment_at("u", "r", "x.rs", Some(e), at(0));
        new.content = content.clone();
        let saved = engine.save(&new).unwrap();
        let loaded = engine.get(&saved.id).unwrap().unwrap();
        prop_assert_eq!(loaded.content, content);
        prop_assert_eq!(loaded.embedding, saved.embedding);
    }
}

//! Property tests for the cosine scorer: symmetry, bounds, degeneracy safety.

use proptest::prelude::*;

use codescope_core::constants::DEGENERATE_SCORE;
use codescope_core::similarity::{is_degenerate, is_degenerate_vector, score};

fn vector(dims: usize) -> impl Strategy<Value = Vec<f32>> {
    prop::collection::vec(-100.0f32..100.0, dims)
}

fn pair() -> impl Strategy<Value = (Vec<f32>, Vec<f32>)> {
    (1usize..48).prop_flat_map(|d| (vector(d), vector(d)))
}

proptest! {
    #[test]
    fn prop_symmetric((a, b) in pair()) {
        let ab = score(&a, &b);
        let ba = score(&b, &a);
        prop_assert_eq!(ab.to_bits(), ba.to_bits());
    }

    #[test]
    fn prop_bounded((a, b) in pair()) {
        prop_assume!(!is_degenerate_vector(&a) && !is_degenerate_vector(&b));
        let s = score(&a, &b);
        prop_assert!((-1.0..=1.0).contains(&s), "score {} out of bounds", s);
    }

    #[test]
    fn prop_deterministic((a, b) in pair()) {
        prop_assert_eq!(score(&a, &b).to_bits(), score(&a, &b).to_bits());
    }

    #[test]
    fn prop_zero_vector_never_outranks(b in vector(16), c in vector(16)) {
        prop_assume!(!is_degenerate_vector(&b) && !is_degenerate_vector(&c));
        let zero = vec![0.0f32; 16];
        let degenerate = score(&zero, &b);
        prop_assert!(is_degenerate(degenerate));
        prop_assert_eq!(degenerate, DEGENERATE_SCORE);
        prop_assert!(degenerate < score(&c, &b));
    }

    #[test]
    fn prop_self_similarity_is_one(a in vector(24)) {
        prop_assume!(!is_degenerate_vector(&a));
        prop_assert!((score(&a, &a) - 1.0).abs() < 1e-9);
    }
}

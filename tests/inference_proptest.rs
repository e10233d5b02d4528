//! Property-based tests for prediction.
//!
//! Models are random forests of stumps and two-level trees built with
//! [`EnsembleBuilder`]; feature vectors are arbitrary `i16` values.

use proptest::collection::vec as prop_vec;
use proptest::prelude::*;

use boosters_lite::testing::{EnsembleBuilder, TreeSpec};
use boosters_lite::{select_class, ErrorKind, LeafEncoding, TreeEnsemble};

// =============================================================================
// Arbitrary Model Generators
// =============================================================================

/// Leaf strategy for an encoding with `n_classes` classes.
fn arb_leaf(encoding: LeafEncoding, n_classes: u8) -> BoxedStrategy<TreeSpec> {
    match encoding {
        LeafEncoding::Majority => (0..n_classes).prop_map(TreeSpec::class).boxed(),
        LeafEncoding::SoftVote => prop_vec(any::<u8>(), n_classes as usize)
            .prop_map(|bytes| TreeSpec::proportions(&bytes))
            .boxed(),
        LeafEncoding::Regression => (-1e3f32..1e3).prop_map(TreeSpec::value).boxed(),
    }
}

/// Tree of depth 0..=2 over `n_features` features.
fn arb_tree(encoding: LeafEncoding, n_features: u8, n_classes: u8) -> impl Strategy<Value = TreeSpec> {
    let leaf = arb_leaf(encoding, n_classes);
    leaf.prop_recursive(2, 8, 2, move |inner| {
        (0..n_features as i8, any::<i16>(), inner.clone(), inner)
            .prop_map(|(f, t, l, r)| TreeSpec::split(f, t, l, r))
    })
}

fn arb_model(encoding: LeafEncoding) -> impl Strategy<Value = TreeEnsemble> {
    let classes = match encoding {
        LeafEncoding::Regression => Just(0u8).boxed(),
        _ => (1u8..=8).boxed(),
    };
    (1u8..=6, classes).prop_flat_map(move |(n_features, n_classes)| {
        prop_vec(arb_tree(encoding, n_features, n_classes), 1..=8).prop_map(move |trees| {
            trees
                .into_iter()
                .fold(EnsembleBuilder::new(encoding, n_features, n_classes), |b, t| b.tree(t))
                .build()
                .expect("generated model is valid")
        })
    })
}

fn arb_model_and_features(encoding: LeafEncoding) -> impl Strategy<Value = (TreeEnsemble, Vec<i16>)> {
    arb_model(encoding).prop_flat_map(|model| {
        let n = model.n_features();
        (Just(model), prop_vec(any::<i16>(), n))
    })
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every majority tree casts exactly one whole vote.
    #[test]
    fn majority_votes_sum_to_tree_count((model, features) in arb_model_and_features(LeafEncoding::Majority)) {
        let mut out = vec![0.0f32; model.n_classes()];
        model.predict_proba(&features, &mut out).unwrap();

        let n_trees = model.n_trees() as f32;
        let votes: f32 = out.iter().map(|p| p * n_trees).sum();
        prop_assert!((votes - n_trees).abs() < 1e-4, "votes {} != trees {}", votes, n_trees);
        for p in &out {
            let whole = p * n_trees;
            prop_assert!((whole - whole.round()).abs() < 1e-4);
        }
        prop_assert!(model.predict(&features).unwrap().is_some());
    }

    /// Averaged soft-vote scores stay within [0, 1].
    #[test]
    fn soft_vote_scores_in_unit_range((model, features) in arb_model_and_features(LeafEncoding::SoftVote)) {
        let mut out = vec![0.0f32; model.n_classes()];
        model.predict_proba(&features, &mut out).unwrap();
        for &p in &out {
            prop_assert!((0.0..=1.0 + 1e-6).contains(&p), "score {} out of range", p);
        }
    }

    /// The predicted class is the first index of the maximum score.
    #[test]
    fn predict_agrees_with_proba((model, features) in arb_model_and_features(LeafEncoding::SoftVote)) {
        let mut out = vec![0.0f32; model.n_classes()];
        model.predict_proba(&features, &mut out).unwrap();

        let max = out.iter().cloned().fold(0.0f32, f32::max);
        let expected = if max > 0.0 { out.iter().position(|&p| p == max) } else { None };
        prop_assert_eq!(model.predict(&features).unwrap(), expected);
    }

    /// Regression output is the plain mean of the reached leaf values.
    #[test]
    fn regression_is_mean_of_leaves((model, features) in arb_model_and_features(LeafEncoding::Regression)) {
        let predictor = model.predictor();
        let mut leaves = vec![0usize; model.n_trees()];
        predictor.leaf_indices(&features, &mut leaves).unwrap();

        let sum: f32 = leaves
            .iter()
            .map(|&leaf| {
                let bytes = model.leaf_bytes(leaf).unwrap();
                f32::from_le_bytes(bytes.try_into().unwrap())
            })
            .sum();
        let expected = sum / model.n_trees() as f32;
        prop_assert!((model.regress1(&features) - expected).abs() < 1e-3);
    }

    /// Classification models refuse regression and leave the output alone.
    #[test]
    fn regress_on_classifier_is_unsupported(
        (model, features) in prop_oneof![
            arb_model_and_features(LeafEncoding::Majority),
            arb_model_and_features(LeafEncoding::SoftVote),
        ],
        sentinel in -1e6f32..1e6,
    ) {
        let mut out = [sentinel];
        let err = model.regress(&features, &mut out).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Unsupported);
        prop_assert_eq!(out, [sentinel]);
    }

    /// A wrong output size is reported and nothing is written.
    #[test]
    fn size_mismatch_never_writes(
        (model, features) in arb_model_and_features(LeafEncoding::Majority),
        extra in 1usize..4,
        shrink in any::<bool>(),
        sentinel in -1e6f32..1e6,
    ) {
        let n = model.n_classes();
        let len = if shrink { n.saturating_sub(extra) } else { n + extra };
        prop_assume!(len != n);

        let mut out = vec![sentinel; len];
        let err = model.predict_proba(&features, &mut out).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::SizeMismatch);
        prop_assert!(out.iter().all(|&v| v == sentinel));
    }

    /// Any feature vector of the wrong length fails, whatever it holds.
    #[test]
    fn feature_length_mismatch_for_any_contents(
        model in arb_model(LeafEncoding::Majority),
        features in prop_vec(any::<i16>(), 0..10),
    ) {
        prop_assume!(features.len() != model.n_features());

        let mut out = vec![0.0f32; model.n_classes()];
        let err = model.predict_proba(&features, &mut out).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::LengthMismatch);
        prop_assert_eq!(model.predict(&features).unwrap_err().kind(), ErrorKind::LengthMismatch);
    }

    /// Ties go to the lower class index.
    #[test]
    fn select_class_prefers_lower_index(scores in prop_vec(0u8..4, 1..12)) {
        let scores: Vec<f32> = scores.into_iter().map(f32::from).collect();
        let max = scores.iter().cloned().fold(0.0f32, f32::max);
        let expected = if max > 0.0 { scores.iter().position(|&s| s == max) } else { None };
        prop_assert_eq!(select_class(&scores), expected);
    }
}

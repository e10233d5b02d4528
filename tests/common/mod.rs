//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::path::PathBuf;

use boosters_lite::testing::{EnsembleBuilder, TreeSpec};
use boosters_lite::{LeafEncoding, TreeEnsemble};

/// Directory holding the JSON ensemble fixtures.
pub fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/test-cases/ensembles")
}

/// Single stump: `f0 < 10` -> class 0, else class 1.
pub fn binary_stump() -> TreeEnsemble {
    EnsembleBuilder::new(LeafEncoding::Majority, 1, 2)
        .tree(TreeSpec::split(0, 10, TreeSpec::class(0), TreeSpec::class(1)))
        .build()
        .expect("valid stump")
}

/// Two regression trees: 2.0 and 4.0 below zero on feature 0, 1.0 and 3.0 above.
pub fn regression_pair() -> TreeEnsemble {
    EnsembleBuilder::new(LeafEncoding::Regression, 1, 0)
        .tree(TreeSpec::split(0, 0, TreeSpec::value(2.0), TreeSpec::value(1.0)))
        .tree(TreeSpec::split(0, 0, TreeSpec::value(4.0), TreeSpec::value(3.0)))
        .build()
        .expect("valid regression pair")
}

/// Depth-`depth` complete tree over `n_features` features, leaves cycling
/// through `n_classes` classes.
pub fn complete_tree(depth: u32, n_features: u8, n_classes: u8, seed: u8) -> TreeSpec {
    fn grow(level: u32, depth: u32, n_features: u8, n_classes: u8, next: &mut u32) -> TreeSpec {
        if level == depth {
            let class = (*next % u32::from(n_classes)) as u8;
            *next += 1;
            return TreeSpec::class(class);
        }
        let feature = ((level + *next) % u32::from(n_features)) as i8;
        let threshold = ((level as i32 * 37 + *next as i32 * 11) % 200 - 100) as i16;
        let left = grow(level + 1, depth, n_features, n_classes, next);
        let right = grow(level + 1, depth, n_features, n_classes, next);
        TreeSpec::split(feature, threshold, left, right)
    }

    let mut next = u32::from(seed);
    grow(0, depth, n_features, n_classes, &mut next)
}

/// Majority forest of `n_trees` complete trees.
pub fn majority_forest(n_trees: usize, depth: u32, n_features: u8, n_classes: u8) -> TreeEnsemble {
    (0..n_trees)
        .fold(
            EnsembleBuilder::new(LeafEncoding::Majority, n_features, n_classes),
            |builder, t| builder.tree(complete_tree(depth, n_features, n_classes, t as u8)),
        )
        .build()
        .expect("valid forest")
}

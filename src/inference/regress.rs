//! Regression: mean of packed `f32` leaf values over all trees.

use tracing::{debug, trace};

use crate::error::PredictError;
use crate::repr::leaf::regression_value;
use crate::repr::LeafEncoding;

use super::predictor::Predictor;
use super::walker::walk_tree;

impl<'m> Predictor<'m> {
    /// Mean leaf value over all trees, written into `out[0]`.
    ///
    /// Only `out[0]` is written, and only on success.
    ///
    /// # Errors
    ///
    /// - [`PredictError::SizeMismatch`] if `out` is empty
    /// - [`PredictError::Unsupported`] unless leaves are packed `f32` (`leaf_bits == 32`)
    /// - [`PredictError::FeatureLengthMismatch`] if `features.len() != n_features`
    /// - [`PredictError::EmptyEnsemble`] for a model without trees
    /// - any walk error
    pub fn regress(&self, features: &[i16], out: &mut [f32]) -> Result<(), PredictError> {
        let ensemble = self.ensemble;
        debug!(
            trees = ensemble.n_trees(),
            features_model = ensemble.n_features(),
            features_input = features.len(),
            "regress start"
        );

        if out.is_empty() {
            return Err(PredictError::SizeMismatch {
                expected: 1,
                actual: 0,
            });
        }
        if ensemble.encoding() != LeafEncoding::Regression {
            return Err(PredictError::Unsupported {
                operation: "regress",
                leaf_bits: ensemble.leaf_bits(),
            });
        }
        self.check_features(features)?;
        self.check_trees()?;

        let limit = self.depth_limit();
        let mut sum = 0.0f32;
        for (tree, &root) in ensemble.tree_roots().iter().enumerate() {
            let leaf = walk_tree(ensemble, root, features, limit)?;
            let bytes = self.leaf(leaf)?;
            let value = regression_value(bytes).unwrap_or(f32::NAN);
            trace!(tree, leaf, value, "tree value");
            sum += value;
        }

        out[0] = sum / ensemble.n_trees() as f32;
        debug!(output = out[0], "regress end");

        Ok(())
    }

    /// Mean leaf value over all trees, or `NaN` on any failure.
    ///
    /// A computed `NaN` and a failure look the same here; use
    /// [`regress`](Self::regress) when the distinction matters.
    pub fn regress1(&self, features: &[i16]) -> f32 {
        let mut out = [0.0f32; 1];
        match self.regress(features, &mut out) {
            Ok(()) => out[0],
            Err(_) => f32::NAN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::repr::{DecisionNode, TreeEnsemble};
    use approx::assert_abs_diff_eq;

    fn packed(values: &[f32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    /// Two stumps on feature 0 sharing the leaf buffer.
    fn two_stumps() -> TreeEnsemble {
        let nodes = vec![
            DecisionNode::new(0, 0, -1, -2),
            DecisionNode::new(0, 0, -3, -4),
        ];
        TreeEnsemble::new(nodes, vec![0, 1], packed(&[2.0, -1.0, 4.0, 5.0]), 32, 1, 0).unwrap()
    }

    #[test]
    fn mean_over_trees() {
        let model = two_stumps();
        let mut out = [0.0];
        model.regress(&[-3], &mut out).unwrap();
        assert_abs_diff_eq!(out[0], 3.0);
        model.regress(&[3], &mut out).unwrap();
        assert_abs_diff_eq!(out[0], 2.0);
    }

    #[test]
    fn writes_only_first_slot() {
        let model = two_stumps();
        let mut out = [0.0, 42.0];
        model.regress(&[-3], &mut out).unwrap();
        assert_eq!(out, [3.0, 42.0]);
    }

    #[test]
    fn regress1_matches_regress() {
        let model = two_stumps();
        assert_abs_diff_eq!(model.regress1(&[-3]), 3.0);
        assert!(model.regress1(&[]).is_nan());
    }

    #[test]
    fn empty_output_is_size_mismatch() {
        let model = two_stumps();
        let err = model.regress(&[0], &mut []).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SizeMismatch);
    }

    #[test]
    fn classifier_is_unsupported_and_untouched() {
        let model = TreeEnsemble::new(
            vec![DecisionNode::new(0, 10, -1, -2)],
            vec![0],
            vec![0, 1],
            0,
            1,
            2,
        )
        .unwrap();
        let mut out = [-7.5];
        let err = model.regress(&[5], &mut out).unwrap_err();
        assert_eq!(
            err,
            PredictError::Unsupported {
                operation: "regress",
                leaf_bits: 0
            }
        );
        assert_eq!(out, [-7.5]);
        assert!(model.regress1(&[5]).is_nan());
    }

    #[test]
    fn soft_vote_is_unsupported_and_untouched() {
        let model = TreeEnsemble::new(
            vec![DecisionNode::new(0, 10, -1, -2)],
            vec![0],
            vec![255, 0, 0, 255],
            8,
            1,
            2,
        )
        .unwrap();
        let mut out = [2.25];
        let err = model.regress(&[5], &mut out).unwrap_err();
        assert_eq!(
            err,
            PredictError::Unsupported {
                operation: "regress",
                leaf_bits: 8
            }
        );
        assert_eq!(out, [2.25]);
        assert!(model.regress1(&[5]).is_nan());
    }

    #[test]
    fn empty_ensemble_fails_instead_of_nan() {
        let model = TreeEnsemble::new_unchecked(
            vec![DecisionNode::new(0, 0, -1, -1)],
            vec![],
            packed(&[1.0]),
            LeafEncoding::Regression,
            1,
            0,
        );
        let mut out = [6.0];
        let err = model.regress(&[0], &mut out).unwrap_err();
        assert_eq!(err, PredictError::EmptyEnsemble);
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(out, [6.0]);
    }

    #[test]
    fn feature_length_mismatch() {
        let model = two_stumps();
        let mut out = [1.5];
        let err = model.regress(&[1, 2], &mut out).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LengthMismatch);
        assert_eq!(out, [1.5]);
    }
}

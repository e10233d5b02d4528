//! Classification: per-class score aggregation and the class decision.
//!
//! # Aggregation
//!
//! Each tree is walked to a leaf and contributes to the per-class scores:
//!
//! - majority leaves add `1.0` to the class they name
//! - soft-vote leaves add `byte / 255` to every class
//!
//! Scores are then divided by the number of trees. For majority models this
//! is the vote fraction per class; for soft-vote models it is the mean
//! proportion, which is not renormalized and need not sum to one.
//!
//! # Decision
//!
//! [`select_class`] picks the first class whose score is strictly greater
//! than every earlier one, starting from a floor of `0.0`. Ties go to the
//! lower class index; a vector of zeros selects nothing.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::config::DEFAULT_MAX_CLASSES;
use crate::error::PredictError;
use crate::repr::leaf::{accumulate_proportions, majority_class};
use crate::repr::LeafEncoding;

use super::predictor::Predictor;
use super::walker::walk_tree;

/// Stack-resident vote buffer; spills to the heap only when a configuration
/// raises `max_classes` above the default and the model uses it.
type Votes = SmallVec<[f32; DEFAULT_MAX_CLASSES]>;

/// Index of the class with the strictly greatest positive score.
///
/// Returns `None` when no score exceeds `0.0`.
pub fn select_class(scores: &[f32]) -> Option<usize> {
    let mut best_class = None;
    let mut best_score = 0.0f32;
    for (class, &score) in scores.iter().enumerate() {
        if score > best_score {
            best_class = Some(class);
            best_score = score;
        }
    }
    best_class
}

impl<'m> Predictor<'m> {
    /// Per-class scores averaged over all trees, written into `out`.
    ///
    /// `out` must hold exactly `n_classes` values. On any error other than a
    /// size mismatch, `out` is left zeroed.
    ///
    /// # Errors
    ///
    /// - [`PredictError::SizeMismatch`] if `out.len() != n_classes` (nothing is written)
    /// - [`PredictError::FeatureLengthMismatch`] if `features.len() != n_features`
    /// - [`PredictError::EmptyEnsemble`] for a model without trees
    /// - [`PredictError::Unsupported`] for regression models
    /// - [`PredictError::InvalidClassPredicted`] if a majority leaf names an unknown class
    /// - any walk error
    pub fn predict_proba(&self, features: &[i16], out: &mut [f32]) -> Result<(), PredictError> {
        let ensemble = self.ensemble;
        let n_classes = ensemble.n_classes();
        if out.len() != n_classes {
            return Err(PredictError::SizeMismatch {
                expected: n_classes,
                actual: out.len(),
            });
        }
        self.check_features(features)?;
        self.check_trees()?;

        out.fill(0.0);

        let accumulated = match ensemble.encoding() {
            LeafEncoding::Majority => self.accumulate_majority(features, out),
            LeafEncoding::SoftVote => self.accumulate_soft(features, out),
            LeafEncoding::Regression => Err(PredictError::Unsupported {
                operation: "predict_proba",
                leaf_bits: ensemble.leaf_bits(),
            }),
        };
        if let Err(err) = accumulated {
            out.fill(0.0);
            return Err(err);
        }

        let n_trees = ensemble.n_trees() as f32;
        for score in out.iter_mut() {
            *score /= n_trees;
        }

        Ok(())
    }

    /// Most probable class, or `None` if no class scored above zero.
    ///
    /// # Errors
    ///
    /// - [`PredictError::FeatureLengthMismatch`] if `features.len() != n_features`
    /// - [`PredictError::ClassCapacityExceeded`] if `n_classes > max_classes`
    /// - [`PredictError::Aggregation`] wrapping any [`predict_proba`](Self::predict_proba) failure
    pub fn predict(&self, features: &[i16]) -> Result<Option<usize>, PredictError> {
        let ensemble = self.ensemble;
        let n_classes = ensemble.n_classes();

        debug!(
            classes = n_classes,
            features_model = ensemble.n_features(),
            features_input = features.len(),
            "predict start"
        );

        self.check_features(features)?;
        if n_classes > self.config.max_classes {
            return Err(PredictError::ClassCapacityExceeded {
                n_classes,
                capacity: self.config.max_classes,
            });
        }

        let mut votes = Votes::from_elem(0.0, n_classes);
        self.predict_proba(features, &mut votes)
            .map_err(|err| PredictError::Aggregation {
                source: Box::new(err),
            })?;

        let class = select_class(&votes);
        debug!(
            trees = ensemble.n_trees(),
            votes = ?votes.as_slice(),
            class = ?class,
            "predict end"
        );

        Ok(class)
    }

    fn accumulate_majority(&self, features: &[i16], out: &mut [f32]) -> Result<(), PredictError> {
        let limit = self.depth_limit();
        for (tree, &root) in self.ensemble.tree_roots().iter().enumerate() {
            let leaf = walk_tree(self.ensemble, root, features, limit)?;
            let class = majority_class(self.leaf(leaf)?).unwrap_or(usize::MAX);
            trace!(tree, leaf, class, "tree vote");

            let n_classes = out.len();
            let slot = out
                .get_mut(class)
                .ok_or(PredictError::InvalidClassPredicted {
                    tree,
                    class,
                    n_classes,
                })?;
            *slot += 1.0;
        }
        Ok(())
    }

    fn accumulate_soft(&self, features: &[i16], out: &mut [f32]) -> Result<(), PredictError> {
        let limit = self.depth_limit();
        for (tree, &root) in self.ensemble.tree_roots().iter().enumerate() {
            let leaf = walk_tree(self.ensemble, root, features, limit)?;
            let proportions = self.leaf(leaf)?;
            trace!(tree, leaf, proportions = ?proportions, "tree proportions");
            accumulate_proportions(proportions, out);
        }
        Ok(())
    }
}

//! Predictor: a tree ensemble paired with runtime limits.
//!
//! [`Predictor`] borrows a [`TreeEnsemble`] and carries the
//! [`PredictorConfig`] used by every call. It holds no mutable state, so one
//! predictor (or many) can serve any number of threads at once as long as
//! each call gets its own feature and output buffers.
//!
//! # Usage
//!
//! ```
//! use boosters_lite::{DecisionNode, Predictor, PredictorConfig, TreeEnsemble};
//!
//! // One stump: feature 0 < 10 -> class 0, else class 1
//! let model = TreeEnsemble::new(
//!     vec![DecisionNode::new(0, 10, -1, -2)],
//!     vec![0],
//!     vec![0, 1],
//!     0,
//!     1,
//!     2,
//! )
//! .unwrap();
//!
//! let config = PredictorConfig::builder().max_classes(8).build().unwrap();
//! let predictor = Predictor::with_config(&model, config);
//!
//! assert_eq!(predictor.predict(&[5]).unwrap(), Some(0));
//! assert_eq!(predictor.predict(&[15]).unwrap(), Some(1));
//! ```
//!
//! The classification entry points live in [`classify`](super::classify),
//! the regression ones in [`regress`](super::regress).

use crate::config::PredictorConfig;
use crate::error::PredictError;
use crate::repr::TreeEnsemble;

use super::walker::walk_tree;

/// Prediction front-end for a [`TreeEnsemble`].
#[derive(Debug, Clone, Copy)]
pub struct Predictor<'m> {
    pub(super) ensemble: &'m TreeEnsemble,
    pub(super) config: PredictorConfig,
}

impl<'m> Predictor<'m> {
    /// Create a predictor with default limits.
    #[inline]
    pub fn new(ensemble: &'m TreeEnsemble) -> Self {
        Self::with_config(ensemble, PredictorConfig::default())
    }

    /// Create a predictor with explicit limits.
    #[inline]
    pub fn with_config(ensemble: &'m TreeEnsemble, config: PredictorConfig) -> Self {
        Self { ensemble, config }
    }

    /// Underlying ensemble.
    #[inline]
    pub fn ensemble(&self) -> &'m TreeEnsemble {
        self.ensemble
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    /// Walk limit applied to each tree.
    #[inline]
    pub fn depth_limit(&self) -> usize {
        self.config.depth_limit(self.ensemble.n_nodes())
    }

    /// Leaf index reached by tree `tree`.
    ///
    /// # Errors
    ///
    /// [`PredictError::TreeOutOfBounds`] if `tree >= n_trees`, or any walk error.
    pub fn leaf_index(&self, tree: usize, features: &[i16]) -> Result<usize, PredictError> {
        let root = *self
            .ensemble
            .tree_roots()
            .get(tree)
            .ok_or(PredictError::TreeOutOfBounds {
                tree,
                n_trees: self.ensemble.n_trees(),
            })?;
        walk_tree(self.ensemble, root, features, self.depth_limit())
    }

    /// Leaf index reached by every tree, written into `out` (one per tree).
    ///
    /// # Errors
    ///
    /// [`PredictError::SizeMismatch`] if `out.len() != n_trees`,
    /// [`PredictError::FeatureLengthMismatch`] if `features.len() != n_features`,
    /// or any walk error.
    pub fn leaf_indices(&self, features: &[i16], out: &mut [usize]) -> Result<(), PredictError> {
        let n_trees = self.ensemble.n_trees();
        if out.len() != n_trees {
            return Err(PredictError::SizeMismatch {
                expected: n_trees,
                actual: out.len(),
            });
        }
        self.check_features(features)?;

        let limit = self.depth_limit();
        for (slot, &root) in out.iter_mut().zip(self.ensemble.tree_roots()) {
            *slot = walk_tree(self.ensemble, root, features, limit)?;
        }
        Ok(())
    }

    /// Fail with `FeatureLengthMismatch` unless `features` matches the model.
    #[inline]
    pub(super) fn check_features(&self, features: &[i16]) -> Result<(), PredictError> {
        let expected = self.ensemble.n_features();
        if features.len() != expected {
            return Err(PredictError::FeatureLengthMismatch {
                expected,
                actual: features.len(),
            });
        }
        Ok(())
    }

    /// Fail with `EmptyEnsemble` if there is nothing to average over.
    #[inline]
    pub(super) fn check_trees(&self) -> Result<(), PredictError> {
        if self.ensemble.n_trees() == 0 {
            return Err(PredictError::EmptyEnsemble);
        }
        Ok(())
    }

    /// Bytes of `leaf` under the model's encoding.
    #[inline]
    pub(super) fn leaf(&self, leaf: usize) -> Result<&'m [u8], PredictError> {
        let ensemble = self.ensemble;
        ensemble.leaf_bytes(leaf).ok_or_else(|| {
            let region = ensemble.encoding().region(leaf, ensemble.n_classes());
            PredictError::LeafOutOfBounds {
                leaf,
                start: region.start,
                end: region.end,
                n_leaves: ensemble.n_leaves(),
            }
        })
    }
}

// =============================================================================
// Convenience methods with default limits
// =============================================================================

impl TreeEnsemble {
    /// Predictor with default limits.
    #[inline]
    pub fn predictor(&self) -> Predictor<'_> {
        Predictor::new(self)
    }

    /// See [`Predictor::predict_proba`].
    pub fn predict_proba(&self, features: &[i16], out: &mut [f32]) -> Result<(), PredictError> {
        self.predictor().predict_proba(features, out)
    }

    /// See [`Predictor::predict`].
    pub fn predict(&self, features: &[i16]) -> Result<Option<usize>, PredictError> {
        self.predictor().predict(features)
    }

    /// See [`Predictor::regress`].
    #[cfg(feature = "regression")]
    pub fn regress(&self, features: &[i16], out: &mut [f32]) -> Result<(), PredictError> {
        self.predictor().regress(features, out)
    }

    /// See [`Predictor::regress1`].
    #[cfg(feature = "regression")]
    pub fn regress1(&self, features: &[i16]) -> f32 {
        self.predictor().regress1(features)
    }
}

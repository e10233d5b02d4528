//! Serializable mirror of [`TreeEnsemble`].
//!
//! [`EnsemblePayload`] carries the exported arrays exactly as the export
//! pipeline produces them (raw `leaf_bits`, raw root offsets). Converting it
//! into a [`TreeEnsemble`] runs the full structural validation.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::repr::{DecisionNode, TreeEnsemble};

/// Exported tree-ensemble arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnsemblePayload {
    /// Shared node store.
    pub nodes: Vec<DecisionNode>,
    /// Root node offset of each tree.
    pub tree_roots: Vec<i32>,
    /// Leaf byte buffer.
    pub leaves: Vec<u8>,
    /// Leaf encoding discriminant (0, 8 or 32).
    pub leaf_bits: i8,
    /// Number of input features.
    pub n_features: u8,
    /// Number of classes (0 is fine for regression models).
    #[serde(default)]
    pub n_classes: u8,
}

impl From<&TreeEnsemble> for EnsemblePayload {
    fn from(ensemble: &TreeEnsemble) -> Self {
        Self {
            nodes: ensemble.nodes().to_vec(),
            tree_roots: ensemble.tree_roots().to_vec(),
            leaves: ensemble.leaves().to_vec(),
            leaf_bits: ensemble.leaf_bits() as i8,
            n_features: ensemble.n_features() as u8,
            n_classes: ensemble.n_classes() as u8,
        }
    }
}

impl TryFrom<EnsemblePayload> for TreeEnsemble {
    type Error = ModelError;

    fn try_from(payload: EnsemblePayload) -> Result<Self, Self::Error> {
        TreeEnsemble::new(
            payload.nodes,
            payload.tree_roots,
            payload.leaves,
            payload.leaf_bits,
            payload.n_features,
            payload.n_classes,
        )
    }
}

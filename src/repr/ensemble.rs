//! Tree ensemble representation (shared node store, tree roots, leaf store).

use crate::error::ModelError;

use super::leaf::LeafEncoding;
use super::node::{Child, DecisionNode};

/// A read-only tree ensemble.
///
/// All trees share one node store. Tree `i` starts at node `tree_roots[i]`;
/// child references inside a node are relative (see [`Child`]), so a tree's
/// nodes only ever point forward. Leaves live in a flat byte buffer read
/// according to [`LeafEncoding`].
///
/// A single decision tree is just an ensemble with one root.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    nodes: Vec<DecisionNode>,
    tree_roots: Vec<i32>,
    leaves: Vec<u8>,
    encoding: LeafEncoding,
    n_features: u8,
    n_classes: u8,
}

impl TreeEnsemble {
    /// Build and validate an ensemble from its exported arrays.
    ///
    /// Validation makes every walk terminate inside the node store and every
    /// reachable leaf region fit inside the leaf buffer.
    pub fn new(
        nodes: Vec<DecisionNode>,
        tree_roots: Vec<i32>,
        leaves: Vec<u8>,
        leaf_bits: i8,
        n_features: u8,
        n_classes: u8,
    ) -> Result<Self, ModelError> {
        let encoding =
            LeafEncoding::from_bits(leaf_bits).ok_or(ModelError::UnsupportedLeafBits(leaf_bits))?;
        let ensemble = Self::new_unchecked(nodes, tree_roots, leaves, encoding, n_features, n_classes);
        ensemble.validate()?;
        Ok(ensemble)
    }

    /// Build an ensemble without structural validation.
    ///
    /// Intended for trusted, generated models. Prediction still bounds-checks
    /// every access and caps walk length, so a malformed model yields errors
    /// rather than panics or endless loops.
    pub fn new_unchecked(
        nodes: Vec<DecisionNode>,
        tree_roots: Vec<i32>,
        leaves: Vec<u8>,
        encoding: LeafEncoding,
        n_features: u8,
        n_classes: u8,
    ) -> Self {
        Self {
            nodes,
            tree_roots,
            leaves,
            encoding,
            n_features,
            n_classes,
        }
    }

    /// Number of nodes in the shared node store.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of trees.
    #[inline]
    pub fn n_trees(&self) -> usize {
        self.tree_roots.len()
    }

    /// Length of the leaf buffer in bytes.
    #[inline]
    pub fn n_leaves(&self) -> usize {
        self.leaves.len()
    }

    /// Number of input features.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features as usize
    }

    /// Number of classes.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes as usize
    }

    /// Number of values produced per prediction: `n_classes` for
    /// classifiers, 1 for regressors.
    #[inline]
    pub fn n_outputs(&self) -> usize {
        if self.encoding.is_classification() {
            self.n_classes()
        } else {
            1
        }
    }

    /// Leaf encoding.
    #[inline]
    pub fn encoding(&self) -> LeafEncoding {
        self.encoding
    }

    /// Serialized `leaf_bits` discriminant.
    #[inline]
    pub fn leaf_bits(&self) -> u8 {
        self.encoding.bits()
    }

    /// Whether leaves hold class votes or proportions.
    #[inline]
    pub fn is_classifier(&self) -> bool {
        self.encoding.is_classification()
    }

    /// Node store.
    #[inline]
    pub fn nodes(&self) -> &[DecisionNode] {
        &self.nodes
    }

    /// Root node offset of every tree.
    #[inline]
    pub fn tree_roots(&self) -> &[i32] {
        &self.tree_roots
    }

    /// Leaf buffer.
    #[inline]
    pub fn leaves(&self) -> &[u8] {
        &self.leaves
    }

    /// Bytes of leaf `leaf`, or `None` if the region escapes the buffer.
    #[inline]
    pub fn leaf_bytes(&self, leaf: usize) -> Option<&[u8]> {
        self.leaves.get(self.encoding.region(leaf, self.n_classes()))
    }

    /// Validate structural invariants.
    ///
    /// Node offsets are non-negative and must be non-zero, so every
    /// step strictly advances through the node store; together with the bounds
    /// checks this guarantees termination.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.tree_roots.is_empty() {
            return Err(ModelError::NoTrees);
        }
        if self.encoding == LeafEncoding::SoftVote && self.n_classes == 0 {
            return Err(ModelError::NoClasses);
        }

        let n_nodes = self.nodes.len();
        for (tree, &root) in self.tree_roots.iter().enumerate() {
            if root < 0 || root as usize >= n_nodes {
                return Err(ModelError::RootOutOfBounds {
                    tree,
                    root,
                    n_nodes,
                });
            }
        }

        for (idx, node) in self.nodes.iter().enumerate() {
            if node.feature < 0 || node.feature as u8 >= self.n_features {
                return Err(ModelError::FeatureOutOfRange {
                    node: idx,
                    feature: node.feature,
                    n_features: self.n_features,
                });
            }

            for (side, raw) in node.children() {
                match Child::decode(raw) {
                    Child::Offset(0) => return Err(ModelError::SelfLoop { node: idx, side }),
                    Child::Offset(offset) => {
                        if idx + offset as usize >= n_nodes {
                            return Err(ModelError::ChildOutOfBounds {
                                node: idx,
                                side,
                                offset: raw,
                                n_nodes,
                            });
                        }
                    }
                    Child::Leaf(leaf) => self.validate_leaf(idx, side, leaf as usize)?,
                }
            }
        }

        Ok(())
    }

    fn validate_leaf(&self, node: usize, side: &'static str, leaf: usize) -> Result<(), ModelError> {
        let region = self.encoding.region(leaf, self.n_classes());
        if region.end > self.leaves.len() {
            return Err(ModelError::LeafOutOfBounds {
                node,
                side,
                leaf,
                required: region.end,
                n_leaves: self.leaves.len(),
            });
        }

        if self.encoding == LeafEncoding::Majority {
            let class = self.leaves[region.start];
            if class >= self.n_classes {
                return Err(ModelError::ClassOutOfRange {
                    leaf,
                    class,
                    n_classes: self.n_classes,
                });
            }
        }

        Ok(())
    }
}

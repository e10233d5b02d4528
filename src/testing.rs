//! Testing utilities for boosters-lite.
//!
//! Unit tests, integration tests and benches share these helpers:
//!
//! - [`TreeSpec`] / [`EnsembleBuilder`]: write trees as nested splits and let
//!   the builder lay them out with relative child offsets
//! - [`assert_slice_approx_eq`]: element-wise float comparison with context
//!
//! ```
//! use boosters_lite::testing::{EnsembleBuilder, TreeSpec};
//! use boosters_lite::LeafEncoding;
//!
//! let model = EnsembleBuilder::new(LeafEncoding::Majority, 1, 2)
//!     .tree(TreeSpec::split(0, 10, TreeSpec::class(0), TreeSpec::class(1)))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(model.predict(&[15]).unwrap(), Some(1));
//! ```

use approx::AbsDiffEq;

use crate::error::ModelError;
use crate::repr::{Child, DecisionNode, LeafEncoding, TreeEnsemble};

/// Default tolerance for floating point comparisons.
pub const DEFAULT_TOLERANCE: f32 = 1e-6;

// =============================================================================
// Tree specs
// =============================================================================

/// Payload of one leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafSpec {
    /// Majority-vote class number.
    Class(u8),
    /// Soft-vote proportions, one byte per class.
    Proportions(Vec<u8>),
    /// Regression value.
    Value(f32),
}

/// A tree written as nested splits.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeSpec {
    /// Go left iff `features[feature] < threshold`.
    Split {
        feature: i8,
        threshold: i16,
        left: Box<TreeSpec>,
        right: Box<TreeSpec>,
    },
    /// Terminal leaf.
    Leaf(LeafSpec),
}

impl TreeSpec {
    /// Split node.
    pub fn split(feature: i8, threshold: i16, left: TreeSpec, right: TreeSpec) -> Self {
        TreeSpec::Split {
            feature,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Majority-vote leaf.
    pub fn class(class: u8) -> Self {
        TreeSpec::Leaf(LeafSpec::Class(class))
    }

    /// Soft-vote leaf.
    pub fn proportions(bytes: &[u8]) -> Self {
        TreeSpec::Leaf(LeafSpec::Proportions(bytes.to_vec()))
    }

    /// Regression leaf.
    pub fn value(value: f32) -> Self {
        TreeSpec::Leaf(LeafSpec::Value(value))
    }
}

// =============================================================================
// EnsembleBuilder
// =============================================================================

/// Lays out [`TreeSpec`]s into a node store and leaf buffer.
///
/// Nodes are emitted in pre-order, so every child offset is positive. Each
/// leaf gets the next leaf index. A tree that is a bare leaf becomes one node
/// testing feature 0 whose children both terminate at that leaf.
///
/// # Panics
///
/// [`tree`](Self::tree) panics if a leaf payload does not match the encoding
/// (e.g. a [`LeafSpec::Value`] in a majority model, or proportions of the
/// wrong length), or if a leaf index or child offset does not fit a raw
/// `i16` reference.
#[derive(Debug, Clone)]
pub struct EnsembleBuilder {
    encoding: LeafEncoding,
    n_features: u8,
    n_classes: u8,
    nodes: Vec<DecisionNode>,
    tree_roots: Vec<i32>,
    leaves: Vec<u8>,
    n_leaf_records: usize,
}

impl EnsembleBuilder {
    /// Start an empty ensemble.
    pub fn new(encoding: LeafEncoding, n_features: u8, n_classes: u8) -> Self {
        Self {
            encoding,
            n_features,
            n_classes,
            nodes: Vec::new(),
            tree_roots: Vec::new(),
            leaves: Vec::new(),
            n_leaf_records: 0,
        }
    }

    /// Append a tree.
    pub fn tree(mut self, spec: TreeSpec) -> Self {
        let root = match &spec {
            TreeSpec::Split {
                feature,
                threshold,
                left,
                right,
            } => self.emit_split(*feature, *threshold, left, right),
            TreeSpec::Leaf(leaf) => {
                let child = leaf_ref(self.push_leaf(leaf));
                self.nodes.push(DecisionNode::new(0, 0, child, child));
                self.nodes.len() - 1
            }
        };
        self.tree_roots.push(root as i32);
        self
    }

    /// Validate and build.
    pub fn build(self) -> Result<TreeEnsemble, ModelError> {
        TreeEnsemble::new(
            self.nodes,
            self.tree_roots,
            self.leaves,
            self.encoding.bits() as i8,
            self.n_features,
            self.n_classes,
        )
    }

    /// Build without validation.
    pub fn build_unchecked(self) -> TreeEnsemble {
        TreeEnsemble::new_unchecked(
            self.nodes,
            self.tree_roots,
            self.leaves,
            self.encoding,
            self.n_features,
            self.n_classes,
        )
    }

    fn emit_split(&mut self, feature: i8, threshold: i16, left: &TreeSpec, right: &TreeSpec) -> usize {
        let idx = self.nodes.len();
        self.nodes.push(DecisionNode::new(feature, threshold, 0, 0));
        let left = self.child_ref(idx, left);
        let right = self.child_ref(idx, right);
        self.nodes[idx].left = left;
        self.nodes[idx].right = right;
        idx
    }

    fn child_ref(&mut self, parent: usize, spec: &TreeSpec) -> i16 {
        match spec {
            TreeSpec::Leaf(leaf) => leaf_ref(self.push_leaf(leaf)),
            TreeSpec::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                let idx = self.emit_split(*feature, *threshold, left, right);
                offset_ref(idx - parent)
            }
        }
    }

    fn push_leaf(&mut self, leaf: &LeafSpec) -> usize {
        match (self.encoding, leaf) {
            (LeafEncoding::Majority, LeafSpec::Class(class)) => self.leaves.push(*class),
            (LeafEncoding::SoftVote, LeafSpec::Proportions(bytes)) => {
                assert_eq!(
                    bytes.len(),
                    self.n_classes as usize,
                    "soft-vote leaf needs one byte per class"
                );
                self.leaves.extend_from_slice(bytes);
            }
            (LeafEncoding::Regression, LeafSpec::Value(value)) => {
                self.leaves.extend_from_slice(&value.to_le_bytes())
            }
            (encoding, leaf) => panic!("leaf {leaf:?} does not fit encoding {encoding:?}"),
        }
        let index = self.n_leaf_records;
        self.n_leaf_records += 1;
        index
    }
}

/// Raw reference to leaf `index`.
fn leaf_ref(index: usize) -> i16 {
    u16::try_from(index)
        .ok()
        .and_then(|leaf| Child::Leaf(leaf).encode())
        .unwrap_or_else(|| panic!("leaf index {index} exceeds {}", Child::MAX_INDEX))
}

/// Raw forward reference spanning `delta` nodes.
fn offset_ref(delta: usize) -> i16 {
    u16::try_from(delta)
        .ok()
        .and_then(|offset| Child::Offset(offset).encode())
        .unwrap_or_else(|| panic!("child offset {delta} exceeds {}", Child::MAX_INDEX))
}

// =============================================================================
// Float assertions
// =============================================================================

/// Assert that two slices of f32 values are approximately equal element-wise.
///
/// # Panics
///
/// Panics if lengths differ or any element differs by more than tolerance.
pub fn assert_slice_approx_eq(actual: &[f32], expected: &[f32], tolerance: f32, context: &str) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "{context}: length mismatch - got {}, expected {}",
        actual.len(),
        expected.len()
    );

    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        assert!(
            a.abs_diff_eq(e, tolerance),
            "{context}[{i}]: {a} ≠ {e} (diff={}, tolerance={tolerance})",
            (a - e).abs()
        );
    }
}

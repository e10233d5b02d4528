//! Single-tree traversal.
//!
//! A walk starts at a tree's root and follows one child per node until a
//! child reference terminates at a leaf. Node children are relative:
//!
//! - `child >= 0`: continue at `node + child`
//! - `child < 0`: stop at leaf `-(child + 1)`
//!
//! Every access is bounds-checked and the number of visited nodes is capped,
//! so a corrupt node store yields an error instead of a panic or a walk that
//! never ends.

use tracing::{debug, trace};

use crate::error::PredictError;
use crate::repr::{Child, TreeEnsemble};

/// Walk the tree rooted at `root` and return the leaf index reached.
///
/// Goes left iff `features[feature] < threshold`; equality goes right.
///
/// # Errors
///
/// - [`PredictError::NodeOutOfBounds`] if the root or an offset leaves the node store
/// - [`PredictError::FeatureOutOfBounds`] if a node reads past `features`
/// - [`PredictError::DepthExceeded`] if no leaf is reached within `depth_limit` nodes
pub fn walk_tree(
    ensemble: &TreeEnsemble,
    root: i32,
    features: &[i16],
    depth_limit: usize,
) -> Result<usize, PredictError> {
    let nodes = ensemble.nodes();
    let mut idx = i64::from(root);

    for _ in 0..depth_limit {
        let node_idx = usize::try_from(idx)
            .ok()
            .filter(|&i| i < nodes.len())
            .ok_or(PredictError::NodeOutOfBounds {
                node: idx,
                n_nodes: nodes.len(),
            })?;
        let node = &nodes[node_idx];

        let value = usize::try_from(node.feature)
            .ok()
            .and_then(|f| features.get(f))
            .copied()
            .ok_or(PredictError::FeatureOutOfBounds {
                node: node_idx,
                feature: node.feature,
                n_features: features.len(),
            })?;

        let child = node.select(value);
        trace!(
            node = node_idx,
            feature = node.feature,
            value,
            threshold = node.threshold,
            child,
            "walk step"
        );

        match Child::decode(child) {
            Child::Offset(offset) => idx += i64::from(offset),
            Child::Leaf(leaf) => {
                debug!(root, node = child, leaf, "walk reached leaf");
                return Ok(leaf as usize);
            }
        }
    }

    Err(PredictError::DepthExceeded {
        root,
        limit: depth_limit,
    })
}

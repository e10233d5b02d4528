//! Inference over a [`TreeEnsemble`](crate::repr::TreeEnsemble).
//!
//! # Module Structure
//!
//! - [`walker`]: single-tree traversal to a leaf index
//! - [`predictor`]: [`Predictor`], the model + limits front-end
//! - [`classify`]: `predict_proba` and `predict`
//! - `regress`: `regress` and `regress1` (feature `regression`)
//!
//! # Quick Start
//!
//! ```
//! use boosters_lite::{DecisionNode, TreeEnsemble};
//!
//! // Two regression trees with the same split, leaves 2.0 | 1.0 and 4.0 | 3.0
//! let leaves: Vec<u8> = [2.0f32, 1.0, 4.0, 3.0]
//!     .iter()
//!     .flat_map(|v| v.to_le_bytes())
//!     .collect();
//! let model = TreeEnsemble::new(
//!     vec![DecisionNode::new(0, 0, -1, -2), DecisionNode::new(0, 0, -3, -4)],
//!     vec![0, 1],
//!     leaves,
//!     32,
//!     1,
//!     0,
//! )
//! .unwrap();
//!
//! assert_eq!(model.regress1(&[-5]), 3.0);
//! ```

pub mod classify;
pub mod predictor;
#[cfg(feature = "regression")]
pub mod regress;
pub mod walker;

pub use classify::select_class;
pub use predictor::Predictor;
pub use walker::walk_tree;

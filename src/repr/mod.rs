//! Canonical tree-ensemble representation.
//!
//! - [`DecisionNode`] / [`Child`]: one feature test and its relative child references
//! - [`LeafEncoding`]: how the leaf buffer is read
//! - [`TreeEnsemble`]: node store, tree roots and leaf store, validated once at load

pub mod ensemble;
pub mod leaf;
pub mod node;

pub use ensemble::TreeEnsemble;
pub use leaf::LeafEncoding;
pub use node::{Child, DecisionNode};

//! boosters-lite: fixed-footprint inference for quantized tree ensembles.
//!
//! A model is a forest of binary decision trees sharing one node store, one
//! list of tree roots and one byte buffer of leaf payloads. Features are
//! `i16` values on the same quantized scale as the node thresholds.
//! Prediction allocates nothing per call beyond a small stack buffer and
//! never mutates the model.
//!
//! # Key Types
//!
//! - [`TreeEnsemble`] - the model, validated once at construction
//! - [`Predictor`] / [`PredictorConfig`] - prediction front-end and its limits
//! - [`PredictError`] / [`ErrorKind`] - failures and their numeric codes
//! - `io::ModelCodec` - binary model container (feature `storage`)
//!
//! # Prediction
//!
//! ```
//! use boosters_lite::{DecisionNode, TreeEnsemble};
//!
//! // feature 0 < 10 -> class 0, else class 1
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
//! let mut proba = [0.0f32; 2];
//! model.predict_proba(&[5], &mut proba).unwrap();
//! assert_eq!(proba, [1.0, 0.0]);
//! assert_eq!(model.predict(&[10]).unwrap(), Some(1));
//! ```
//!
//! # Feature Flags
//!
//! - `regression`: `regress` / `regress1` for packed `f32` leaves (default)
//! - `storage`: the binary container in [`io`] (default)

// Re-export approx traits for users who want to compare predictions
pub use approx;

pub mod config;
pub mod error;
pub mod inference;
#[cfg(feature = "storage")]
pub mod io;
pub mod repr;
pub mod testing;

// =============================================================================
// Convenience Re-exports
// =============================================================================

// Model representation
pub use repr::{Child, DecisionNode, LeafEncoding, TreeEnsemble};

// Prediction
pub use inference::{select_class, walk_tree, Predictor};

// Configuration
pub use config::{ConfigError, PredictorConfig, DEFAULT_MAX_CLASSES};

// Errors
pub use error::{ErrorKind, ModelError, PredictError};

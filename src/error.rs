//! Error types for model loading and prediction.
//!
//! Every prediction failure maps onto an [`ErrorKind`] with a stable numeric
//! code, so hosts that only speak integer status codes can still report it.
//! The rich [`PredictError`] keeps the context (which tree, which node, what
//! sizes) for Rust callers.

use thiserror::Error;

// ============================================================================
// ErrorKind
// ============================================================================

/// Coarse failure category with a stable numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ErrorKind {
    /// No error.
    Ok = 0,
    /// Unspecified failure (e.g. aggregation failed underneath `predict`).
    Unknown = 1,
    /// A leaf named a class outside `[0, n_classes)`.
    InvalidClassPredicted = 2,
    /// A required buffer was missing.
    ///
    /// Slices cannot be null, so the Rust API never reports this; the code is
    /// kept so host-side tables stay aligned.
    Uninitialized = 3,
    /// Output buffer length or capacity does not match what the model needs.
    SizeMismatch = 4,
    /// Feature count mismatch, or class count above the vote capacity.
    LengthMismatch = 5,
    /// Leaf encoding is not usable for the requested operation.
    Unsupported = 6,
}

impl ErrorKind {
    /// Numeric status code.
    #[inline]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Parse a numeric status code.
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Ok),
            1 => Some(Self::Unknown),
            2 => Some(Self::InvalidClassPredicted),
            3 => Some(Self::Uninitialized),
            4 => Some(Self::SizeMismatch),
            5 => Some(Self::LengthMismatch),
            6 => Some(Self::Unsupported),
            _ => None,
        }
    }

    /// Short human-readable description.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Unknown => "unknown error",
            Self::InvalidClassPredicted => "invalid class predicted",
            Self::Uninitialized => "uninitialized",
            Self::SizeMismatch => "size mismatch",
            Self::LengthMismatch => "length mismatch",
            Self::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// PredictError
// ============================================================================

/// Errors returned by the prediction entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// Output buffer has the wrong length.
    #[error("output buffer size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Feature vector length does not match the model.
    #[error("feature length mismatch: model has {expected} features, got {actual}")]
    FeatureLengthMismatch { expected: usize, actual: usize },

    /// Model has more classes than the vote accumulator holds.
    #[error("model has {n_classes} classes, vote capacity is {capacity}")]
    ClassCapacityExceeded { n_classes: usize, capacity: usize },

    /// The leaf encoding cannot serve this operation.
    #[error("{operation} is not supported for leaf_bits={leaf_bits}")]
    Unsupported {
        operation: &'static str,
        leaf_bits: u8,
    },

    /// A majority-vote leaf holds a class number outside the model's classes.
    #[error("tree {tree} predicted class {class}, model has {n_classes} classes")]
    InvalidClassPredicted {
        tree: usize,
        class: usize,
        n_classes: usize,
    },

    /// A root or child offset escaped the node store.
    #[error("node index {node} out of bounds (n_nodes={n_nodes})")]
    NodeOutOfBounds { node: i64, n_nodes: usize },

    /// A node tests a feature the input does not have.
    #[error("node {node} reads feature {feature}, input has {n_features}")]
    FeatureOutOfBounds {
        node: usize,
        feature: i8,
        n_features: usize,
    },

    /// A leaf region escaped the leaf buffer.
    #[error("leaf {leaf} needs bytes {start}..{end}, leaf buffer has {n_leaves}")]
    LeafOutOfBounds {
        leaf: usize,
        start: usize,
        end: usize,
        n_leaves: usize,
    },

    /// Walk did not reach a leaf within the step limit.
    #[error("tree rooted at {root} did not reach a leaf within {limit} steps")]
    DepthExceeded { root: i32, limit: usize },

    /// Model has no trees to average over.
    #[error("model has no trees")]
    EmptyEnsemble,

    /// Tree index outside `[0, n_trees)`.
    #[error("tree {tree} out of bounds (n_trees={n_trees})")]
    TreeOutOfBounds { tree: usize, n_trees: usize },

    /// Class-score aggregation failed underneath `predict`.
    #[error("class-score aggregation failed")]
    Aggregation {
        #[source]
        source: Box<PredictError>,
    },
}

impl PredictError {
    /// Coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            Self::FeatureLengthMismatch { .. } | Self::ClassCapacityExceeded { .. } => {
                ErrorKind::LengthMismatch
            }
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::InvalidClassPredicted { .. } => ErrorKind::InvalidClassPredicted,
            Self::NodeOutOfBounds { .. }
            | Self::FeatureOutOfBounds { .. }
            | Self::LeafOutOfBounds { .. }
            | Self::DepthExceeded { .. }
            | Self::EmptyEnsemble
            | Self::TreeOutOfBounds { .. }
            | Self::Aggregation { .. } => ErrorKind::Unknown,
        }
    }

    /// Numeric status code of [`Self::kind`].
    #[inline]
    pub fn code(&self) -> i32 {
        self.kind().code()
    }
}

// ============================================================================
// ModelError
// ============================================================================

/// Structural validation errors raised when constructing a [`TreeEnsemble`].
///
/// [`TreeEnsemble`]: crate::repr::TreeEnsemble
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Model has no trees.
    #[error("model has no trees")]
    NoTrees,

    /// `leaf_bits` is not one of 0, 8 or 32.
    #[error("unsupported leaf_bits {0} (expected 0, 8 or 32)")]
    UnsupportedLeafBits(i8),

    /// Soft-voting leaves need at least one class.
    #[error("soft-voting model must have at least one class")]
    NoClasses,

    /// A tree root is outside the node store.
    #[error("tree {tree} root {root} out of bounds (n_nodes={n_nodes})")]
    RootOutOfBounds {
        tree: usize,
        root: i32,
        n_nodes: usize,
    },

    /// A node tests a feature outside `[0, n_features)`.
    #[error("node {node} tests feature {feature}, model has {n_features}")]
    FeatureOutOfRange {
        node: usize,
        feature: i8,
        n_features: u8,
    },

    /// A child offset of zero points a node at itself.
    #[error("node {node} {side} child points at itself")]
    SelfLoop { node: usize, side: &'static str },

    /// A child offset lands outside the node store.
    #[error("node {node} {side} child offset {offset} lands outside the node store (n_nodes={n_nodes})")]
    ChildOutOfBounds {
        node: usize,
        side: &'static str,
        offset: i16,
        n_nodes: usize,
    },

    /// A leaf region does not fit in the leaf buffer.
    #[error("node {node} {side} leaf {leaf} needs {required} leaf bytes, buffer has {n_leaves}")]
    LeafOutOfBounds {
        node: usize,
        side: &'static str,
        leaf: usize,
        required: usize,
        n_leaves: usize,
    },

    /// A majority-vote leaf names a class the model does not have.
    #[error("leaf {leaf} holds class {class}, model has {n_classes} classes")]
    ClassOutOfRange { leaf: usize, class: u8, n_classes: u8 },
}

//! Predictor configuration with builder pattern.
//!
//! # Example
//!
//! ```
//! use boosters_lite::PredictorConfig;
//!
//! // All defaults: 30-class vote capacity, walk limit = node count
//! let config = PredictorConfig::builder().build().unwrap();
//! assert_eq!(config.max_classes, 30);
//!
//! let config = PredictorConfig::builder()
//!     .max_classes(64)
//!     .max_depth(32)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.max_depth, Some(32));
//! ```

use bon::Builder;
use thiserror::Error;

/// Default capacity of the class-vote accumulator.
pub const DEFAULT_MAX_CLASSES: usize = 30;

// =============================================================================
// ConfigError
// =============================================================================

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Vote capacity must hold at least one class.
    #[error("max_classes must be at least 1")]
    InvalidMaxClasses,
    /// Walk limit must allow at least one step.
    #[error("max_depth must be at least 1")]
    InvalidMaxDepth,
}

// =============================================================================
// PredictorConfig
// =============================================================================

/// Runtime limits for prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct PredictorConfig {
    /// Largest class count `predict` accepts. Default: 30.
    ///
    /// Up to [`DEFAULT_MAX_CLASSES`] votes are accumulated on the stack.
    #[builder(default = DEFAULT_MAX_CLASSES)]
    pub max_classes: usize,

    /// Maximum nodes visited per tree walk. `None` uses the model's node
    /// count, which is enough for any well-formed tree.
    pub max_depth: Option<usize>,
}

impl<S: predictor_config_builder::IsComplete> PredictorConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `max_classes == 0` or `max_depth == Some(0)`.
    pub fn build(self) -> Result<PredictorConfig, ConfigError> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl PredictorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_classes == 0 {
            return Err(ConfigError::InvalidMaxClasses);
        }
        if self.max_depth == Some(0) {
            return Err(ConfigError::InvalidMaxDepth);
        }
        Ok(())
    }

    /// Walk limit for a model with `n_nodes` nodes.
    #[inline]
    pub fn depth_limit(&self, n_nodes: usize) -> usize {
        self.max_depth.unwrap_or(n_nodes)
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            max_classes: DEFAULT_MAX_CLASSES,
            max_depth: None,
        }
    }
}

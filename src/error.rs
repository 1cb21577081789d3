//! Error types for the segmentation engine.

use thiserror::Error;

/// Errors raised by the segmentation and feature extraction engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SegFeatError {
    /// A construction parameter was not a positive integer.
    #[error("{parameter} must be larger than zero")]
    Configuration { parameter: &'static str },

    /// A sample did not carry exactly `sample_size` values.
    #[error("sample of wrong size ({actual} != {expected})")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, SegFeatError>;

impl SegFeatError {
    /// Create a configuration error for the named parameter.
    #[must_use]
    pub const fn configuration(parameter: &'static str) -> Self {
        Self::Configuration { parameter }
    }

    /// Create a dimension mismatch error.
    #[must_use]
    pub const fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }
}

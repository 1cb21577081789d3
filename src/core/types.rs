//! Input sample type.

use serde::{Deserialize, Serialize};

/// A single multi-channel sample with an optional label.
///
/// Samples are transient: the engine copies their values into its window
/// buffer and does not keep the sample itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Class label for this sample (absent means unlabeled)
    pub label: Option<String>,
    /// One value per channel
    pub values: Vec<f64>,
}

impl Sample {
    /// Create a labeled sample.
    pub fn labeled(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: Some(label.into()),
            values,
        }
    }

    /// Create an unlabeled sample.
    pub fn unlabeled(values: Vec<f64>) -> Self {
        Self {
            label: None,
            values,
        }
    }

    /// Number of channels carried by this sample.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the sample carries no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

//! Feature computation from completed windows.
//!
//! Each channel of a window is summarized by its arithmetic mean, maximum and
//! minimum. The window's label is the most frequent label among its samples.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::HashMap;

/// Number of features emitted per channel (mean, max, min).
pub const FEATURES_PER_CHANNEL: usize = 3;

/// Summary of one channel over one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelFeatures {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl ChannelFeatures {
    /// Features in output order.
    pub fn to_array(self) -> [f64; FEATURES_PER_CHANNEL] {
        [self.mean, self.max, self.min]
    }
}

/// Aggregated output for one completed window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Majority label of the window (absent if unlabeled samples won the vote)
    pub label: Option<String>,
    /// Channel-major `[mean, max, min]` triples, `3 * sample_size` values
    pub vector: Vec<f64>,
}

impl FeatureVector {
    /// Label as a string slice.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Number of channels summarized by this vector.
    pub fn channel_count(&self) -> usize {
        self.vector.len() / FEATURES_PER_CHANNEL
    }

    /// Features of the given channel, if it exists.
    pub fn channel(&self, index: usize) -> Option<ChannelFeatures> {
        let start = index * FEATURES_PER_CHANNEL;
        match self.vector.get(start..start + FEATURES_PER_CHANNEL) {
            Some(&[mean, max, min]) => Some(ChannelFeatures { mean, max, min }),
            _ => None,
        }
    }
}

/// Compute the features of a full window.
///
/// `channels` holds one slice per channel, each covering the whole window;
/// `labels` holds one slot per sample position.
pub fn compute_features<C: AsRef<[f64]>>(
    channels: &[C],
    labels: &[Option<String>],
) -> FeatureVector {
    let vector = channels
        .iter()
        .flat_map(|channel| compute_channel_features(channel.as_ref()).to_array())
        .collect();

    FeatureVector {
        label: majority_label(labels),
        vector,
    }
}

/// Compute mean, maximum and minimum of one channel.
///
/// A NaN anywhere in the channel makes all three features NaN. The mean is
/// taken from the plain sum, so an infinite value yields an infinite mean.
pub fn compute_channel_features(values: &[f64]) -> ChannelFeatures {
    ChannelFeatures {
        mean: values.iter().sum::<f64>() / values.len() as f64,
        max: Statistics::max(values.iter()),
        min: Statistics::min(values.iter()),
    }
}

/// Select the most frequent label, counting "absent" as its own label.
///
/// Ties go to the label that occurs first in the window.
pub fn majority_label(labels: &[Option<String>]) -> Option<String> {
    let mut counts: HashMap<Option<&str>, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label.as_deref()).or_insert(0) += 1;
    }

    let top = counts.values().copied().max().unwrap_or(0);

    labels
        .iter()
        .find(|label| counts.get(&label.as_deref()) == Some(&top))
        .cloned()
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[Option<&str>]) -> Vec<Option<String>> {
        raw.iter().map(|l| l.map(str::to_string)).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_channel_features_basic() {
        let features = compute_channel_features(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_close(features.mean, 5.0);
        assert_eq!(features.max, 9.0);
        assert_eq!(features.min, 2.0);
    }

    #[test]
    fn test_channel_features_negative_values() {
        let features = compute_channel_features(&[-3.5, -1.0, -8.25]);
        assert_close(features.mean, -12.75 / 3.0);
        assert_eq!(features.max, -1.0);
        assert_eq!(features.min, -8.25);
    }

    #[test]
    fn test_channel_features_nan_propagates() {
        let features = compute_channel_features(&[1.0, f64::NAN, 3.0]);
        assert!(features.mean.is_nan());
        assert!(features.max.is_nan());
        assert!(features.min.is_nan());
    }

    #[test]
    fn test_channel_features_infinite_mean() {
        let features = compute_channel_features(&[f64::INFINITY, 1.0]);
        assert_eq!(features.mean, f64::INFINITY);
        assert_eq!(features.max, f64::INFINITY);
        assert_eq!(features.min, 1.0);

        let features = compute_channel_features(&[-2.0, f64::NEG_INFINITY, 5.0]);
        assert_eq!(features.mean, f64::NEG_INFINITY);
        assert_eq!(features.min, f64::NEG_INFINITY);
    }

    #[test]
    fn test_majority_label_clear_winner() {
        let window = labels(&[Some("A"), Some("A"), Some("A"), Some("B"), Some("B")]);
        assert_eq!(majority_label(&window).as_deref(), Some("A"));
    }

    #[test]
    fn test_majority_label_tie_prefers_first_occurrence() {
        let window = labels(&[Some("C"), Some("B"), Some("A")]);
        assert_eq!(majority_label(&window).as_deref(), Some("C"));

        let window = labels(&[Some("B"), Some("A"), Some("A"), Some("B")]);
        assert_eq!(majority_label(&window).as_deref(), Some("B"));
    }

    #[test]
    fn test_majority_label_absent_is_a_category() {
        let window = labels(&[None, None, Some("walk")]);
        assert_eq!(majority_label(&window), None);

        let window = labels(&[None, Some("walk"), Some("walk")]);
        assert_eq!(majority_label(&window).as_deref(), Some("walk"));
    }

    #[test]
    fn test_compute_features_channel_major() {
        let channels = vec![vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 0.0]];
        let window = labels(&[Some("x"), Some("x"), Some("y")]);

        let features = compute_features(&channels, &window);
        assert_eq!(features.label(), Some("x"));
        assert_eq!(features.channel_count(), 2);

        let expected = [2.0, 3.0, 1.0, 10.0, 20.0, 0.0];
        for (actual, expected) in features.vector.iter().zip(expected) {
            assert_close(*actual, expected);
        }

        let second = features.channel(1).unwrap();
        assert_eq!(second.max, 20.0);
        assert!(features.channel(2).is_none());
    }
}

//! Window management for segmenting a sample stream into fixed-length windows.
//!
//! Samples are written one at a time into a preallocated window buffer. When
//! the buffer holds `window_length` samples the window is summarized, the
//! result is queued, and the cursor wraps to the start of the buffer.

use crate::core::features::{compute_features, FeatureVector};
use crate::core::types::Sample;
use crate::error::{Result, SegFeatError};
use std::collections::VecDeque;

/// Window length used when none is configured.
pub const DEFAULT_WINDOW_LENGTH: usize = 100;

/// Immutable engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Number of samples per window
    window_length: usize,
    /// Number of channels per sample
    sample_size: usize,
}

impl EngineConfig {
    /// Validate and create an engine configuration.
    pub fn new(window_length: usize, sample_size: usize) -> Result<Self> {
        if window_length == 0 {
            return Err(SegFeatError::configuration("window length"));
        }
        if sample_size == 0 {
            return Err(SegFeatError::configuration("sample size"));
        }

        Ok(Self {
            window_length,
            sample_size,
        })
    }

    pub fn window_length(&self) -> usize {
        self.window_length
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

/// Builder for [`SegFeat`].
///
/// The window length defaults to [`DEFAULT_WINDOW_LENGTH`]; the sample size
/// has no default and must be set.
#[derive(Debug, Clone)]
pub struct SegFeatBuilder {
    window_length: usize,
    sample_size: Option<usize>,
}

impl SegFeatBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            window_length: DEFAULT_WINDOW_LENGTH,
            sample_size: None,
        }
    }

    /// Set the number of samples that make up one window.
    pub fn window_length(mut self, window_length: usize) -> Self {
        self.window_length = window_length;
        self
    }

    /// Set the number of values in each sample.
    pub fn sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = Some(sample_size);
        self
    }

    /// Validate the settings and create the engine.
    pub fn build(self) -> Result<SegFeat> {
        let sample_size = self
            .sample_size
            .ok_or_else(|| SegFeatError::configuration("sample size"))?;
        let config = EngineConfig::new(self.window_length, sample_size)?;
        Ok(SegFeat::with_config(config))
    }
}

impl Default for SegFeatBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Streaming segmentation and feature extraction engine.
///
/// Not synchronized; wrap in a mutex to share between threads.
#[derive(Debug, Clone)]
pub struct SegFeat {
    config: EngineConfig,
    /// Window buffer, one row of `window_length` slots per channel
    channels: Vec<Vec<f64>>,
    /// Label of each sample position in the current window
    labels: Vec<Option<String>>,
    /// Next slot to fill, always in `[0, window_length)`
    cursor: usize,
    /// Completed windows awaiting `read`, oldest first
    completed: VecDeque<FeatureVector>,
    /// Total windows completed since construction
    windows_completed: u64,
}

impl SegFeat {
    /// Create an engine for the given window length and sample size.
    pub fn new(window_length: usize, sample_size: usize) -> Result<Self> {
        let config = EngineConfig::new(window_length, sample_size)?;
        Ok(Self::with_config(config))
    }

    /// Create an engine from an already validated configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            channels: vec![vec![0.0; config.window_length]; config.sample_size],
            labels: vec![None; config.window_length],
            cursor: 0,
            completed: VecDeque::new(),
            windows_completed: 0,
            config,
        }
    }

    /// Start building an engine.
    pub fn builder() -> SegFeatBuilder {
        SegFeatBuilder::new()
    }

    /// Write one sample into the current window.
    ///
    /// Completes the window and queues its features when this sample fills
    /// the last slot. A sample of the wrong width is rejected without
    /// touching any state.
    pub fn write(&mut self, label: Option<&str>, values: &[f64]) -> Result<()> {
        self.check_dimension(values.len())?;
        self.labels[self.cursor] = label.map(str::to_owned);
        self.store_values(values);
        self.advance();
        Ok(())
    }

    /// Write an owned sample into the current window.
    pub fn write_sample(&mut self, sample: Sample) -> Result<()> {
        self.check_dimension(sample.values.len())?;
        self.labels[self.cursor] = sample.label;
        self.store_values(&sample.values);
        self.advance();
        Ok(())
    }

    /// Remove and return the oldest completed window, if any.
    pub fn read(&mut self) -> Option<FeatureVector> {
        self.completed.pop_front()
    }

    /// Remove and return all completed windows in completion order.
    pub fn take_results(&mut self) -> Vec<FeatureVector> {
        self.completed.drain(..).collect()
    }

    /// Check if there are completed windows waiting to be read.
    pub fn has_results(&self) -> bool {
        !self.completed.is_empty()
    }

    /// Get the number of completed windows waiting to be read.
    pub fn queued_results(&self) -> usize {
        self.completed.len()
    }

    /// Number of samples written into the current, incomplete window.
    pub fn buffered_samples(&self) -> usize {
        self.cursor
    }

    /// Total number of windows completed since construction.
    pub fn windows_completed(&self) -> u64 {
        self.windows_completed
    }

    pub fn config(&self) -> EngineConfig {
        self.config
    }

    pub fn window_length(&self) -> usize {
        self.config.window_length
    }

    pub fn sample_size(&self) -> usize {
        self.config.sample_size
    }

    fn check_dimension(&self, actual: usize) -> Result<()> {
        if actual != self.config.sample_size {
            return Err(SegFeatError::dimension_mismatch(
                self.config.sample_size,
                actual,
            ));
        }
        Ok(())
    }

    fn store_values(&mut self, values: &[f64]) {
        for (channel, &value) in self.channels.iter_mut().zip(values) {
            channel[self.cursor] = value;
        }
    }

    fn advance(&mut self) {
        if self.cursor == self.config.window_length - 1 {
            self.complete_window();
            self.cursor = 0;
        } else {
            self.cursor += 1;
        }
    }

    /// Summarize the full buffer and queue the result.
    ///
    /// Buffers are not cleared; the next window overwrites every slot before
    /// it is read again.
    fn complete_window(&mut self) {
        let features = compute_features(&self.channels, &self.labels);
        self.windows_completed += 1;
        tracing::trace!(
            window = self.windows_completed,
            label = ?features.label,
            "window completed"
        );
        self.completed.push_back(features);
    }
}

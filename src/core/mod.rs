//! Core functionality for segfeat.
//!
//! This module contains:
//! - The sample type fed into the engine
//! - Feature computation for completed windows
//! - The windowing engine and its result queue

pub mod features;
pub mod types;
pub mod windowing;

// Re-export commonly used types
pub use features::{
    compute_channel_features, compute_features, majority_label, ChannelFeatures, FeatureVector,
    FEATURES_PER_CHANNEL,
};
pub use types::Sample;
pub use windowing::{EngineConfig, SegFeat, SegFeatBuilder, DEFAULT_WINDOW_LENGTH};

//! segfeat - windowed segmentation and feature extraction for sensor streams.
//!
//! This library turns a stream of fixed-width numeric samples, optionally
//! labeled, into one feature vector per fixed-length window. Each feature
//! vector holds the mean, maximum and minimum of every channel plus the
//! window's most frequent label, ready for a downstream classifier.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          segfeat                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐       │
//! │  │    Input    │──▶│  Windowing  │──▶│  Features   │       │
//! │  │ (row parse) │   │ (N samples) │   │ (mean/max/  │       │
//! │  └─────────────┘   └─────────────┘   │  min/label) │       │
//! │                                      └─────────────┘       │
//! │                                             │              │
//! │                                             ▼              │
//! │  ┌─────────────┐                     ┌─────────────┐       │
//! │  │  Run stats  │                     │   Output    │       │
//! │  └─────────────┘                     │ (text/json) │       │
//! │                                      └─────────────┘       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use segfeat::SegFeat;
//!
//! let mut engine = SegFeat::new(3, 2).unwrap();
//! engine.write(Some("x"), &[1.0, 10.0]).unwrap();
//! engine.write(Some("x"), &[2.0, 20.0]).unwrap();
//! engine.write(Some("y"), &[3.0, 0.0]).unwrap();
//!
//! let features = engine.read().unwrap();
//! assert_eq!(features.label(), Some("x"));
//! assert_eq!(features.vector.len(), 6);
//! assert!(engine.read().is_none());
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod stats;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use core::{EngineConfig, FeatureVector, Sample, SegFeat, SegFeatBuilder};
pub use error::SegFeatError;
pub use input::{InputError, InputSource, RowCollector, RowParser};
pub use output::OutputFormat;
pub use pipeline::{Pipeline, PipelineError, PipelineOptions};
pub use stats::{create_shared_stats, RunStats, SharedRunStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

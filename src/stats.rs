//! Run statistics.
//!
//! Counts what happened to the input during a run so it can be reported at
//! the end, including after Ctrl+C.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for one run.
#[derive(Debug)]
pub struct RunStats {
    /// Lines read from the input
    rows_read: AtomicU64,
    /// Blank and comment lines
    rows_skipped: AtomicU64,
    /// Samples accepted by the engine
    samples_written: AtomicU64,
    /// Rows rejected (unparseable or wrong width)
    samples_rejected: AtomicU64,
    /// Feature vectors emitted
    windows_emitted: AtomicU64,
    /// Run start time
    started: DateTime<Utc>,
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            rows_read: AtomicU64::new(0),
            rows_skipped: AtomicU64::new(0),
            samples_written: AtomicU64::new(0),
            samples_rejected: AtomicU64::new(0),
            windows_emitted: AtomicU64::new(0),
            started: Utc::now(),
        }
    }

    pub fn record_row_read(&self) {
        self.rows_read.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_row_skipped(&self) {
        self.rows_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sample_written(&self) {
        self.samples_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sample_rejected(&self) {
        self.samples_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_window_emitted(&self) {
        self.windows_emitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            rows_read: self.rows_read.load(Ordering::Relaxed),
            rows_skipped: self.rows_skipped.load(Ordering::Relaxed),
            samples_written: self.samples_written.load(Ordering::Relaxed),
            samples_rejected: self.samples_rejected.load(Ordering::Relaxed),
            windows_emitted: self.windows_emitted.load(Ordering::Relaxed),
            started: self.started,
            duration_ms: (Utc::now() - self.started).num_milliseconds().max(0) as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.snapshot();
        format!(
            "Run Statistics:\n\
             - Rows read: {}\n\
             - Rows skipped: {}\n\
             - Samples written: {}\n\
             - Samples rejected: {}\n\
             - Windows emitted: {}\n\
             - Duration: {} ms",
            stats.rows_read,
            stats.rows_skipped,
            stats.samples_written,
            stats.samples_rejected,
            stats.windows_emitted,
            stats.duration_ms
        )
    }

    /// Write the current statistics to `path` as JSON.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json =
            serde_json::to_string_pretty(&self.snapshot()).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time copy of the run statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub rows_read: u64,
    pub rows_skipped: u64,
    pub samples_written: u64,
    pub samples_rejected: u64,
    pub windows_emitted: u64,
    pub started: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Statistics shared between the processing loop and the Ctrl+C handler.
pub type SharedRunStats = Arc<RunStats>;

/// Create a new shared statistics instance.
pub fn create_shared_stats() -> SharedRunStats {
    Arc::new(RunStats::new())
}

//! Row-by-row driver connecting the parser, the engine and the formatter.
//!
//! The engine is created lazily from the first data row, whose width fixes the
//! sample size. After every accepted sample the engine is polled once, and any
//! completed window is formatted for output.

use crate::core::windowing::SegFeat;
use crate::error::SegFeatError;
use crate::input::{InputError, InputLine, RowParser};
use crate::output::{format_result, OutputFormat};
use crate::stats::SharedRunStats;
use thiserror::Error;

/// Errors that stop a run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("line {line}: {source}")]
    Rejected { line: usize, source: SegFeatError },

    #[error("cannot create engine: {0}")]
    Engine(SegFeatError),

    #[error("cannot serialize window: {0}")]
    Output(#[from] serde_json::Error),
}

/// Settings for a run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub window_length: usize,
    pub format: OutputFormat,
    /// Fail on the first rejected row instead of skipping it
    pub strict: bool,
}

/// Turns input lines into formatted output lines.
pub struct Pipeline {
    options: PipelineOptions,
    parser: RowParser,
    engine: Option<SegFeat>,
    stats: SharedRunStats,
}

impl Pipeline {
    pub fn new(options: PipelineOptions, stats: SharedRunStats) -> Self {
        Self {
            options,
            parser: RowParser::new(),
            engine: None,
            stats,
        }
    }

    /// The engine, once a data row has parsed.
    ///
    /// Its sample size is the width of the first data row, even if that row
    /// itself was rejected.
    pub fn engine(&self) -> Option<&SegFeat> {
        self.engine.as_ref()
    }

    /// Process one input line.
    ///
    /// Returns the formatted result if this line completed a window.
    pub fn process_line(&mut self, line: &InputLine) -> Result<Option<String>, PipelineError> {
        self.stats.record_row_read();

        let sample = match self.parser.parse_line(line.number, &line.text) {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                self.stats.record_row_skipped();
                return Ok(None);
            }
            Err(e @ InputError::InvalidNumber { .. }) if !self.options.strict => {
                tracing::warn!("skipping row: {e}");
                self.stats.record_sample_rejected();
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let engine = match self.engine.take() {
            Some(engine) => engine,
            None => {
                let sample_size = self
                    .parser
                    .layout()
                    .map_or(sample.len(), |layout| layout.sample_size);
                let engine = SegFeat::builder()
                    .window_length(self.options.window_length)
                    .sample_size(sample_size)
                    .build()
                    .map_err(PipelineError::Engine)?;
                tracing::info!(
                    window_length = self.options.window_length,
                    sample_size,
                    "engine created"
                );
                engine
            }
        };
        let engine = self.engine.insert(engine);

        match engine.write_sample(sample) {
            Ok(()) => self.stats.record_sample_written(),
            Err(source) if !self.options.strict => {
                tracing::warn!(line = line.number, "skipping row: {source}");
                self.stats.record_sample_rejected();
                return Ok(None);
            }
            Err(source) => {
                return Err(PipelineError::Rejected {
                    line: line.number,
                    source,
                })
            }
        }

        match engine.read() {
            Some(features) => {
                self.stats.record_window_emitted();
                let window = engine.windows_completed();
                Ok(Some(format_result(self.options.format, window, &features)?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::create_shared_stats;

    fn line(number: usize, text: &str) -> InputLine {
        InputLine {
            number,
            text: text.to_string(),
        }
    }

    fn options(window_length: usize, strict: bool) -> PipelineOptions {
        PipelineOptions {
            window_length,
            format: OutputFormat::Text,
            strict,
        }
    }

    #[test]
    fn test_emits_after_full_window() {
        let mut pipeline = Pipeline::new(options(2, false), create_shared_stats());

        assert_eq!(pipeline.process_line(&line(1, "# comment")).unwrap(), None);
        assert_eq!(pipeline.process_line(&line(2, "a 1 4")).unwrap(), None);
        let output = pipeline.process_line(&line(3, "a 3 2")).unwrap();

        assert_eq!(output.as_deref(), Some("a 2.0 3.0 1.0 3.0 4.0 2.0"));
        assert_eq!(pipeline.engine().unwrap().sample_size(), 2);
    }

    #[test]
    fn test_lenient_mode_skips_bad_rows() {
        let stats = create_shared_stats();
        let mut pipeline = Pipeline::new(options(2, false), stats.clone());

        pipeline.process_line(&line(1, "1 2")).unwrap();
        assert_eq!(pipeline.process_line(&line(2, "1 2 3")).unwrap(), None);
        assert_eq!(pipeline.process_line(&line(3, "1 x")).unwrap(), None);
        let output = pipeline.process_line(&line(4, "3 4")).unwrap();

        assert_eq!(output.as_deref(), Some("null 2.0 3.0 1.0 3.0 4.0 2.0"));
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.samples_rejected, 2);
        assert_eq!(snapshot.samples_written, 2);
        assert_eq!(snapshot.windows_emitted, 1);
    }

    #[test]
    fn test_engine_sized_from_first_data_row() {
        let stats = create_shared_stats();
        let mut pipeline = Pipeline::new(options(1, false), stats.clone());

        assert_eq!(pipeline.process_line(&line(1, "1 x 3")).unwrap(), None);
        assert_eq!(pipeline.process_line(&line(2, "1 2")).unwrap(), None);
        assert_eq!(pipeline.engine().unwrap().sample_size(), 3);

        let output = pipeline.process_line(&line(3, "4 5 6")).unwrap();
        assert_eq!(
            output.as_deref(),
            Some("null 4.0 4.0 4.0 5.0 5.0 5.0 6.0 6.0 6.0")
        );
        assert_eq!(stats.snapshot().samples_rejected, 2);
    }

    #[test]
    fn test_strict_mode_fails_on_wrong_width() {
        let mut pipeline = Pipeline::new(options(2, true), create_shared_stats());

        pipeline.process_line(&line(1, "1 2")).unwrap();
        let err = pipeline.process_line(&line(2, "1")).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Rejected {
                line: 2,
                source: SegFeatError::DimensionMismatch {
                    expected: 2,
                    actual: 1
                }
            }
        ));
    }

    #[test]
    fn test_zero_window_length_is_fatal() {
        let mut pipeline = Pipeline::new(options(0, false), create_shared_stats());
        let err = pipeline.process_line(&line(1, "1 2")).unwrap_err();
        assert!(matches!(err, PipelineError::Engine(_)));
    }
}

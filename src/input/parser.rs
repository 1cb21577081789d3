//! Row parsing for whitespace-separated sample files.
//!
//! Each data row is either `v1 v2 ... vn` or `label v1 v2 ... vn`. Which of
//! the two applies is decided once, from the first data row: if its first
//! field is a number the input is unlabeled.
//!
//! Numbers are decimal literals with an optional exponent. The only spelled
//! out values are `NaN` and `Infinity` (optionally signed), so fields such as
//! `inf` or `nan` are labels, not numbers.

use crate::core::types::Sample;
use thiserror::Error;

/// Errors raised while reading input rows.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: '{value}' is not a number")]
    InvalidNumber { line: usize, value: String },
}

/// Shape of the data rows, fixed by the first data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    /// Whether the first field of every row is a label
    pub labeled: bool,
    /// Number of numeric fields in the first data row
    pub sample_size: usize,
}

/// Stateful parser turning text rows into samples.
#[derive(Debug, Default)]
pub struct RowParser {
    layout: Option<RowLayout>,
}

impl RowParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout detected from the first data row, if one has been seen.
    pub fn layout(&self) -> Option<RowLayout> {
        self.layout
    }

    /// Parse one input line.
    ///
    /// Returns `Ok(None)` for blank and comment lines. `line_number` is used
    /// only for error messages.
    pub fn parse_line(
        &mut self,
        line_number: usize,
        line: &str,
    ) -> Result<Option<Sample>, InputError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let first = match fields.first() {
            Some(first) if !first.starts_with('#') => *first,
            _ => return Ok(None),
        };

        let layout = *self.layout.get_or_insert_with(|| {
            let labeled = parse_number(first).is_none();
            let layout = RowLayout {
                labeled,
                sample_size: fields.len() - usize::from(labeled),
            };
            tracing::debug!(
                labeled = layout.labeled,
                sample_size = layout.sample_size,
                "detected input layout"
            );
            layout
        });

        let (label, value_fields) = if layout.labeled {
            (Some(first.to_string()), &fields[1..])
        } else {
            (None, &fields[..])
        };

        let values = value_fields
            .iter()
            .map(|field| {
                parse_number(field).ok_or_else(|| InputError::InvalidNumber {
                    line: line_number,
                    value: field.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, InputError>>()?;

        Ok(Some(Sample { label, values }))
    }
}

/// Parse a numeric field, accepting only `NaN` and `Infinity` as words.
fn parse_number(field: &str) -> Option<f64> {
    let unsigned = field
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(field);
    let spelled = unsigned.starts_with(|c: char| c.is_ascii_alphabetic());
    if spelled && unsigned != "NaN" && unsigned != "Infinity" {
        return None;
    }
    field.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_blank_and_comment_lines() {
        let mut parser = RowParser::new();
        assert!(parser.parse_line(1, "").unwrap().is_none());
        assert!(parser.parse_line(2, "   ").unwrap().is_none());
        assert!(parser.parse_line(3, "# header").unwrap().is_none());
        assert!(parser.parse_line(4, "  #indented comment").unwrap().is_none());
        assert!(parser.layout().is_none());
    }

    #[test]
    fn test_unlabeled_layout() {
        let mut parser = RowParser::new();
        let sample = parser.parse_line(1, "1.5 -2 3e2").unwrap().unwrap();

        assert_eq!(sample, Sample::unlabeled(vec![1.5, -2.0, 300.0]));
        assert_eq!(
            parser.layout(),
            Some(RowLayout {
                labeled: false,
                sample_size: 3
            })
        );
    }

    #[test]
    fn test_labeled_layout() {
        let mut parser = RowParser::new();
        let sample = parser.parse_line(1, "walk  0.1   0.2").unwrap().unwrap();

        assert_eq!(sample, Sample::labeled("walk", vec![0.1, 0.2]));
        assert_eq!(parser.layout().unwrap().sample_size, 2);

        let sample = parser.parse_line(2, "run 1 2").unwrap().unwrap();
        assert_eq!(sample.label.as_deref(), Some("run"));
    }

    #[test]
    fn test_layout_fixed_by_first_row() {
        let mut parser = RowParser::new();
        parser.parse_line(1, "1 2").unwrap();

        let err = parser.parse_line(2, "sit 1 2").unwrap_err();
        match err {
            InputError::InvalidNumber { line, value } => {
                assert_eq!(line, 2);
                assert_eq!(value, "sit");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_lowercase_special_values_are_labels() {
        for first in ["inf", "nan", "infinity", "INF"] {
            let mut parser = RowParser::new();
            let sample = parser
                .parse_line(1, &format!("{first} 1 2"))
                .unwrap()
                .unwrap();
            assert_eq!(sample.label.as_deref(), Some(first));
            assert_eq!(
                parser.layout(),
                Some(RowLayout {
                    labeled: true,
                    sample_size: 2
                })
            );
        }
    }

    #[test]
    fn test_spelled_numbers() {
        assert_eq!(parse_number("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_number("-Infinity"), Some(f64::NEG_INFINITY));
        assert!(parse_number("NaN").unwrap().is_nan());
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-nan"), None);
        assert_eq!(parse_number("2.5e-3"), Some(0.0025));

        let mut parser = RowParser::new();
        let sample = parser.parse_line(1, "Infinity 1").unwrap().unwrap();
        assert_eq!(sample, Sample::unlabeled(vec![f64::INFINITY, 1.0]));
        assert!(matches!(
            parser.parse_line(2, "1 inf"),
            Err(InputError::InvalidNumber { line: 2, .. })
        ));
    }

    #[test]
    fn test_width_is_not_checked() {
        let mut parser = RowParser::new();
        parser.parse_line(1, "a 1 2").unwrap();
        let sample = parser.parse_line(2, "a 1 2 3").unwrap().unwrap();
        assert_eq!(sample.len(), 3);
    }
}

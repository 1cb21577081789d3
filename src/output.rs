//! Serialization of feature vectors for output.
//!
//! The text format is one line per window: the label (or `null`) followed by
//! the feature values, all separated by single spaces. Values use the
//! `Double.toString` notation consumers of the text format expect: plain
//! decimals with at least one fractional digit in `[1e-3, 1e7)`, otherwise
//! `d.dddE±n`, and `NaN` or `Infinity` for non-finite values.

use crate::core::features::FeatureVector;
use serde::{Deserialize, Serialize};

/// Field separator of the text format.
pub const SEPARATOR: &str = " ";

/// Placeholder printed for windows whose majority label is absent.
pub const ABSENT_LABEL: &str = "null";

/// Output format for completed windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `<label> <mean max min ...>` per line
    #[default]
    Text,
    /// One JSON object per line
    Jsonl,
}

/// A completed window as written in JSON-lines output.
#[derive(Debug, Serialize)]
pub struct WindowRecord<'a> {
    /// 1-based window index
    pub window: u64,
    pub label: Option<&'a str>,
    pub vector: &'a [f64],
}

/// Format a result as one text line (without trailing newline).
pub fn format_text(features: &FeatureVector) -> String {
    let mut line = String::from(features.label().unwrap_or(ABSENT_LABEL));
    for &value in &features.vector {
        line.push_str(SEPARATOR);
        line.push_str(&format_value(value));
    }
    line
}

/// Format a result as one JSON line.
pub fn format_jsonl(window: u64, features: &FeatureVector) -> serde_json::Result<String> {
    serde_json::to_string(&WindowRecord {
        window,
        label: features.label(),
        vector: &features.vector,
    })
}

/// Format a result in the requested format.
pub fn format_result(
    format: OutputFormat,
    window: u64,
    features: &FeatureVector,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(format_text(features)),
        OutputFormat::Jsonl => format_jsonl(window, features),
    }
}

/// Magnitudes from here up are printed in scientific notation.
const SCIENTIFIC_UPPER: f64 = 1e7;

/// Non-zero magnitudes below this are printed in scientific notation.
const SCIENTIFIC_LOWER: f64 = 1e-3;

/// Format one feature value for the text output.
pub fn format_value(value: f64) -> String {
    if value == f64::INFINITY {
        return "Infinity".to_string();
    }
    if value == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    }

    let magnitude = value.abs();
    let decimal = magnitude == 0.0 || (SCIENTIFIC_LOWER..SCIENTIFIC_UPPER).contains(&magnitude);
    if value.is_nan() || decimal {
        return format!("{value:?}");
    }

    // `{:e}` gives the shortest round-trip digits, e.g. `5e-4` or `1.2345678e7`.
    let scientific = format!("{value:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) if mantissa.contains('.') => format!("{mantissa}E{exponent}"),
        Some((mantissa, exponent)) => format!("{mantissa}.0E{exponent}"),
        None => scientific,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(label: Option<&str>, vector: Vec<f64>) -> FeatureVector {
        FeatureVector {
            label: label.map(str::to_string),
            vector,
        }
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(2.0), "2.0");
        assert_eq!(format_value(-0.25), "-0.25");
        assert_eq!(format_value(f64::NAN), "NaN");
        assert_eq!(format_value(f64::INFINITY), "Infinity");
        assert_eq!(format_value(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(-0.0), "-0.0");
    }

    #[test]
    fn test_format_value_scientific_range() {
        assert_eq!(format_value(0.0005), "5.0E-4");
        assert_eq!(format_value(-0.0005), "-5.0E-4");
        assert_eq!(format_value(1e-7), "1.0E-7");
        assert_eq!(format_value(1e7), "1.0E7");
        assert_eq!(format_value(12345678.0), "1.2345678E7");
        assert_eq!(format_value(1e20), "1.0E20");
    }

    #[test]
    fn test_format_value_decimal_range_bounds() {
        assert_eq!(format_value(0.001), "0.001");
        assert_eq!(format_value(9999999.0), "9999999.0");
        assert_eq!(format_value(0.125), "0.125");
    }

    #[test]
    fn test_format_text() {
        let result = features(Some("x"), vec![2.0, 3.0, 1.0, 10.0, 20.0, 0.0]);
        assert_eq!(format_text(&result), "x 2.0 3.0 1.0 10.0 20.0 0.0");
    }

    #[test]
    fn test_format_text_absent_label() {
        let result = features(None, vec![1.5, 2.0, 1.0]);
        assert_eq!(format_text(&result), "null 1.5 2.0 1.0");
    }

    #[test]
    fn test_format_jsonl() {
        let result = features(Some("walk"), vec![1.0, 2.0, 0.5]);
        let line = format_result(OutputFormat::Jsonl, 3, &result).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["window"], 3);
        assert_eq!(parsed["label"], "walk");
        assert_eq!(parsed["vector"][2], 0.5);
        assert!(!line.contains('\n'));
    }
}

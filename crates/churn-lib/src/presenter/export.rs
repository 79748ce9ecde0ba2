//! CSV export of a single prediction
//!
//! One header row and one data row. `probability_churn` is left empty when
//! the classifier has no probability capability.

use crate::models::{ChurnLabel, InputRecord, PredictionResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::path::Path;
use thiserror::Error;

pub const EXPORT_HEADER: &str = "age,subscription_months,complaint_count,prediction,probability_churn";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export contains no prediction row")]
    Empty,
}

/// One exported prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub age: u32,
    pub subscription_months: u32,
    pub complaint_count: u32,
    #[serde(serialize_with = "label_text", deserialize_with = "parse_label_text")]
    pub prediction: ChurnLabel,
    pub probability_churn: Option<f64>,
}

impl ExportRow {
    pub fn new(record: &InputRecord, result: &PredictionResult) -> Self {
        Self {
            age: record.age,
            subscription_months: record.subscription_months,
            complaint_count: record.complaint_count,
            prediction: result.label,
            probability_churn: result.probability,
        }
    }

    pub fn record(&self) -> InputRecord {
        InputRecord {
            age: self.age,
            subscription_months: self.subscription_months,
            complaint_count: self.complaint_count,
        }
    }

    pub fn result(&self) -> PredictionResult {
        PredictionResult {
            label: self.prediction,
            probability: self.probability_churn,
        }
    }

    /// Header plus this row as a CSV document
    pub fn to_csv(&self) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(self)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Io(e.into_error()))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.serialize(self)?;
        writer.flush()?;
        Ok(())
    }
}

/// Read the prediction row back from an export
pub fn parse_export(text: &str) -> Result<ExportRow, ExportError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    match reader.deserialize::<ExportRow>().next() {
        Some(row) => Ok(row?),
        None => Err(ExportError::Empty),
    }
}

fn label_text<S: Serializer>(label: &ChurnLabel, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(label.as_str())
}

fn parse_label_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ChurnLabel, D::Error> {
    let text = String::deserialize(deserializer)?;
    ChurnLabel::parse(&text)
        .ok_or_else(|| serde::de::Error::custom(format!("unknown prediction label '{}'", text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record() -> InputRecord {
        InputRecord {
            age: 52,
            subscription_months: 3,
            complaint_count: 7,
        }
    }

    #[test]
    fn test_header_and_row() {
        let result = PredictionResult {
            label: ChurnLabel::Churn,
            probability: Some(0.85),
        };
        let csv = ExportRow::new(&record(), &result).to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], EXPORT_HEADER);
        assert_eq!(lines[1], "52,3,7,Churn,0.85");
    }

    #[test]
    fn test_missing_probability_is_empty_field() {
        let result = PredictionResult {
            label: ChurnLabel::Retained,
            probability: None,
        };
        let csv = ExportRow::new(&record(), &result).to_csv().unwrap();
        assert_eq!(csv.lines().nth(1), Some("52,3,7,Retained,"));
    }

    #[test]
    fn test_export_parses_back() {
        for result in [
            PredictionResult {
                label: ChurnLabel::Churn,
                probability: Some(0.7310585786300049),
            },
            PredictionResult {
                label: ChurnLabel::Retained,
                probability: None,
            },
        ] {
            let csv = ExportRow::new(&record(), &result).to_csv().unwrap();
            let row = parse_export(&csv).unwrap();
            assert_eq!(row.record(), record());
            assert_eq!(row.result(), result);
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        let text = format!("{}\n52,3,7,Maybe,0.5\n", EXPORT_HEADER);
        assert!(parse_export(&text).is_err());
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(matches!(parse_export(EXPORT_HEADER), Err(ExportError::Empty)));
    }

    #[test]
    fn test_write_to_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("prediction.csv");
        let result = PredictionResult {
            label: ChurnLabel::Churn,
            probability: Some(0.5),
        };
        ExportRow::new(&record(), &result).write_to_path(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(parse_export(&text).unwrap().result(), result);
    }
}

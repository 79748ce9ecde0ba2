//! Core data models for the churn dashboard

use serde::{Deserialize, Serialize};
use std::fmt;

/// One customer's attributes as entered by the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub age: u32,
    pub subscription_months: u32,
    pub complaint_count: u32,
}

/// Binary classifier output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChurnLabel {
    /// Customer keeps the subscription (class 0)
    Retained,
    /// Customer leaves (class 1, the positive class)
    Churn,
}

impl ChurnLabel {
    /// Map a raw class value to a label; anything other than 0 or 1 is rejected
    pub fn from_class(class: i64) -> Option<Self> {
        match class {
            0 => Some(ChurnLabel::Retained),
            1 => Some(ChurnLabel::Churn),
            _ => None,
        }
    }

    pub fn class(&self) -> i64 {
        match self {
            ChurnLabel::Retained => 0,
            ChurnLabel::Churn => 1,
        }
    }

    /// Text used in exports and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            ChurnLabel::Retained => "Retained",
            ChurnLabel::Churn => "Churn",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "Retained" => Some(ChurnLabel::Retained),
            "Churn" => Some(ChurnLabel::Churn),
            _ => None,
        }
    }
}

impl fmt::Display for ChurnLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one InputRecord
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: ChurnLabel,
    /// Probability of churn, present only when the classifier exposes it
    pub probability: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_class() {
        assert_eq!(ChurnLabel::from_class(1), Some(ChurnLabel::Churn));
        assert_eq!(ChurnLabel::from_class(0), Some(ChurnLabel::Retained));
        assert_eq!(ChurnLabel::from_class(2), None);
        assert_eq!(ChurnLabel::from_class(-1), None);
    }

    #[test]
    fn test_label_text_parses_back() {
        for label in [ChurnLabel::Churn, ChurnLabel::Retained] {
            assert_eq!(ChurnLabel::parse(label.as_str()), Some(label));
        }
        assert_eq!(ChurnLabel::parse("churn"), None);
    }

    #[test]
    fn test_input_record_json_field_names() {
        let record = InputRecord {
            age: 30,
            subscription_months: 12,
            complaint_count: 2,
        };
        let json = serde_json::to_value(record).unwrap();
        assert_eq!(json["age"], 30);
        assert_eq!(json["subscription_months"], 12);
        assert_eq!(json["complaint_count"], 2);
    }
}

//! Error types for the prediction pipeline
//!
//! Every error carries the detail needed for logs through `Display`, and a
//! plain-language `user_message()` that is safe to show to an operator.

use thiserror::Error;

/// Failure to produce a classifier handle from the model artifact
#[derive(Error, Debug)]
pub enum ModelLoadError {
    /// Artifact file does not exist
    #[error("Model artifact not found: {0}")]
    NotFound(String),

    /// Artifact exists but could not be read
    #[error("Failed to read model artifact {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// File extension does not map to a supported format
    #[error("Unsupported model format: {0}")]
    UnsupportedFormat(String),

    /// Artifact bytes do not decode to a usable classifier
    #[error("Failed to decode model artifact: {0}")]
    Malformed(String),

    /// Artifact was trained on a different feature layout
    #[error("Feature contract mismatch: {0}")]
    FeatureMismatch(String),

    /// Artifact fingerprint differs from the configured checksum
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

impl ModelLoadError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ModelLoadError::NotFound(_) | ModelLoadError::Unreadable { .. } => {
                "The prediction model file could not be found or opened."
            }
            ModelLoadError::ChecksumMismatch { .. } => {
                "The prediction model file does not match the expected version."
            }
            _ => "The prediction model file is damaged or in an unsupported format.",
        }
    }
}

/// Failure while invoking the classifier for a single record
#[derive(Error, Debug)]
pub enum PredictionError {
    /// Feature vector length differs from what the classifier expects
    #[error("Feature vector has {actual} values, classifier expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Classifier returned something other than 0 or 1
    #[error("Classifier returned unexpected label {0}")]
    InvalidLabel(i64),

    /// Probability requested from a classifier without that capability
    #[error("Classifier does not expose class probabilities")]
    ProbabilityUnsupported,

    /// Inference runtime failure
    #[error("Inference failed: {0}")]
    Inference(String),
}

impl PredictionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            PredictionError::ShapeMismatch { .. } => {
                "The model expects different customer data than this form provides. Please contact the model owner."
            }
            _ => "The prediction could not be completed. Please try again.",
        }
    }
}

/// A field value outside its declared bounds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field} must be between {min} and {max}, got {value}")]
pub struct InputError {
    pub field: &'static str,
    pub value: i64,
    pub min: u32,
    pub max: u32,
}

impl InputError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

/// Golden-vector contract check failure
#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Golden input was rejected: {0}")]
    Input(#[from] InputError),

    #[error("Golden prediction failed: {0}")]
    Prediction(#[from] PredictionError),

    #[error("Golden prediction returned {actual}, expected {expected}")]
    LabelMismatch { expected: String, actual: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_hide_internal_detail() {
        let err = ModelLoadError::Malformed("expected value at line 1 column 1".to_string());
        assert!(!err.user_message().contains("line 1"));

        let err = PredictionError::Inference("tract: shape [1,4] vs [1,3]".to_string());
        assert!(!err.user_message().contains("tract"));
    }

    #[test]
    fn test_input_error_message_names_field_and_range() {
        let err = InputError {
            field: "age",
            value: 150,
            min: 18,
            max: 100,
        };
        assert_eq!(err.user_message(), "age must be between 18 and 100, got 150");
    }
}

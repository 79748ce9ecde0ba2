//! Linear classifiers stored as JSON documents
//!
//! The document carries the feature names the model was trained on, one
//! coefficient per feature and an intercept:
//!
//! ```json
//! {
//!   "kind": "logistic_regression",
//!   "feature_names": ["age", "subscription_months", "complaint_count"],
//!   "coefficients": [-0.02, -0.05, 0.6],
//!   "intercept": -0.4
//! }
//! ```
//!
//! `logistic_regression` exposes probabilities through the logistic function;
//! `linear_svc` only predicts a class.

use super::{check_shape, Classifier};
use crate::error::{ModelLoadError, PredictionError};
use crate::predictor::FEATURE_NAMES;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearKind {
    LogisticRegression,
    LinearSvc,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LinearDocument {
    kind: LinearKind,
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

#[derive(Debug, Clone)]
pub struct LinearClassifier {
    kind: LinearKind,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearClassifier {
    pub fn new(kind: LinearKind, coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            kind,
            coefficients,
            intercept,
        }
    }

    /// Decode a JSON document and check it against the fixed feature order
    pub fn from_json(bytes: &[u8]) -> Result<Self, ModelLoadError> {
        let doc: LinearDocument =
            serde_json::from_slice(bytes).map_err(|e| ModelLoadError::Malformed(e.to_string()))?;

        if doc.feature_names.len() != FEATURE_NAMES.len()
            || doc
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .any(|(got, want)| got != want)
        {
            return Err(ModelLoadError::FeatureMismatch(format!(
                "model trained on {:?}, expected {:?}",
                doc.feature_names, FEATURE_NAMES
            )));
        }

        if doc.coefficients.len() != doc.feature_names.len() {
            return Err(ModelLoadError::Malformed(format!(
                "{} coefficients for {} features",
                doc.coefficients.len(),
                doc.feature_names.len()
            )));
        }

        if !doc.intercept.is_finite() || doc.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelLoadError::Malformed(
                "non-finite coefficient or intercept".to_string(),
            ));
        }

        Ok(Self::new(doc.kind, doc.coefficients, doc.intercept))
    }

    pub fn kind(&self) -> LinearKind {
        self.kind
    }

    fn decision(&self, features: &[f32]) -> f64 {
        self.coefficients
            .iter()
            .zip(features)
            .fold(self.intercept, |acc, (w, x)| acc + w * f64::from(*x))
    }
}

impl Classifier for LinearClassifier {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &[f32]) -> Result<i64, PredictionError> {
        check_shape(self.n_features(), features)?;
        Ok(if self.decision(features) > 0.0 { 1 } else { 0 })
    }

    fn supports_probability(&self) -> bool {
        self.kind == LinearKind::LogisticRegression
    }

    fn predict_probability(&self, features: &[f32]) -> Result<[f64; 2], PredictionError> {
        if !self.supports_probability() {
            return Err(PredictionError::ProbabilityUnsupported);
        }
        check_shape(self.n_features(), features)?;
        let p1 = 1.0 / (1.0 + (-self.decision(features)).exp());
        Ok([1.0 - p1, p1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGISTIC: &str = r#"{
        "kind": "logistic_regression",
        "feature_names": ["age", "subscription_months", "complaint_count"],
        "coefficients": [0.0, 0.0, 1.0],
        "intercept": -2.0
    }"#;

    #[test]
    fn test_logistic_decodes_with_probability() {
        let model = LinearClassifier::from_json(LOGISTIC.as_bytes()).unwrap();
        assert_eq!(model.kind(), LinearKind::LogisticRegression);
        assert!(model.supports_probability());
        assert_eq!(model.n_features(), 3);
    }

    #[test]
    fn test_decision_boundary() {
        let model = LinearClassifier::from_json(LOGISTIC.as_bytes()).unwrap();
        // decision = complaints - 2
        assert_eq!(model.predict(&[30.0, 12.0, 2.0]).unwrap(), 0);
        assert_eq!(model.predict(&[30.0, 12.0, 3.0]).unwrap(), 1);

        let [p0, p1] = model.predict_probability(&[30.0, 12.0, 2.0]).unwrap();
        assert!((p1 - 0.5).abs() < 1e-12);
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_svc_has_no_probability() {
        let doc = LOGISTIC.replace("logistic_regression", "linear_svc");
        let model = LinearClassifier::from_json(doc.as_bytes()).unwrap();
        assert!(!model.supports_probability());
        assert!(matches!(
            model.predict_probability(&[30.0, 12.0, 2.0]),
            Err(PredictionError::ProbabilityUnsupported)
        ));
    }

    #[test]
    fn test_reordered_feature_names_rejected() {
        let doc = LOGISTIC.replace(
            r#"["age", "subscription_months", "complaint_count"]"#,
            r#"["subscription_months", "age", "complaint_count"]"#,
        );
        let err = LinearClassifier::from_json(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelLoadError::FeatureMismatch(_)));
    }

    #[test]
    fn test_coefficient_count_mismatch_rejected() {
        let doc = LOGISTIC.replace("[0.0, 0.0, 1.0]", "[0.0, 1.0]");
        let err = LinearClassifier::from_json(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, ModelLoadError::Malformed(_)));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let doc = LOGISTIC.replace("logistic_regression", "random_forest");
        assert!(LinearClassifier::from_json(doc.as_bytes()).is_err());
    }

    #[test]
    fn test_shape_mismatch() {
        let model = LinearClassifier::from_json(LOGISTIC.as_bytes()).unwrap();
        let err = model.predict(&[30.0, 12.0]).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::ShapeMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }
}

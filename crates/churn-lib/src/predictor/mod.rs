//! Churn prediction for a single InputRecord

mod features;
mod golden;

pub use features::{FeatureVector, FEATURE_NAMES, NUM_FEATURES};
pub use golden::{verify_golden, GoldenVector};

use crate::error::PredictionError;
use crate::model::ClassifierHandle;
use crate::models::{ChurnLabel, InputRecord, PredictionResult};
use tracing::debug;

/// Classify one record, adding the churn probability when the classifier supports it
pub fn predict(
    handle: &ClassifierHandle,
    record: &InputRecord,
) -> Result<PredictionResult, PredictionError> {
    let features = FeatureVector::from_record(record);

    let (class, probabilities) = handle.classify(features.as_slice())?;
    let label = ChurnLabel::from_class(class).ok_or(PredictionError::InvalidLabel(class))?;

    let probability = match probabilities {
        Some([_, churn]) if !churn.is_finite() => {
            return Err(PredictionError::Inference(format!(
                "non-finite churn probability {}",
                churn
            )));
        }
        Some([_, churn]) => Some(churn.clamp(0.0, 1.0)),
        None => None,
    };

    debug!(
        features = ?features.named().collect::<Vec<_>>(),
        label = %label,
        probability = ?probability,
        "Prediction completed"
    );

    Ok(PredictionResult { label, probability })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputBounds;
    use crate::model::{test_handle, Classifier, LinearClassifier, LinearKind};

    /// Classifier trained on four features
    struct WideClassifier;

    impl Classifier for WideClassifier {
        fn n_features(&self) -> usize {
            4
        }

        fn predict(&self, features: &[f32]) -> Result<i64, PredictionError> {
            crate::model::check_shape(4, features)?;
            Ok(0)
        }
    }

    /// Multiclass classifier that leaks a third class
    struct ThreeClass;

    impl Classifier for ThreeClass {
        fn n_features(&self) -> usize {
            3
        }

        fn predict(&self, _features: &[f32]) -> Result<i64, PredictionError> {
            Ok(2)
        }
    }

    fn logistic() -> ClassifierHandle {
        test_handle(LinearClassifier::new(
            LinearKind::LogisticRegression,
            vec![-0.02, -0.04, 0.9],
            -1.0,
        ))
    }

    #[test]
    fn test_predict_with_probability() {
        let record = InputRecord {
            age: 25,
            subscription_months: 1,
            complaint_count: 10,
        };
        let result = predict(&logistic(), &record).unwrap();
        assert_eq!(result.label, ChurnLabel::Churn);
        let p = result.probability.unwrap();
        assert!(p > 0.5 && p <= 1.0);
    }

    #[test]
    fn test_predict_without_probability_capability() {
        let handle = test_handle(LinearClassifier::new(
            LinearKind::LinearSvc,
            vec![-0.02, -0.04, 0.9],
            -1.0,
        ));
        let result = predict(&handle, &InputRecord::default()).unwrap();
        assert!(result.probability.is_none());
    }

    #[test]
    fn test_shape_mismatch_surfaces_as_error() {
        let err = predict(&test_handle(WideClassifier), &InputRecord::default()).unwrap_err();
        assert!(matches!(
            err,
            PredictionError::ShapeMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_unexpected_class_rejected() {
        let err = predict(&test_handle(ThreeClass), &InputRecord::default()).unwrap_err();
        assert!(matches!(err, PredictionError::InvalidLabel(2)));
    }

    #[test]
    fn test_every_in_bounds_record_predicts() {
        let bounds = InputBounds::canonical();
        let handle = logistic();
        for age in [bounds.age.min, bounds.age.default, bounds.age.max] {
            for months in (bounds.subscription_months.min..=bounds.subscription_months.max).step_by(10) {
                for complaints in bounds.complaint_count.min..=bounds.complaint_count.max {
                    let record = bounds.validate_raw(age as i64, months as i64, complaints as i64).unwrap();
                    let result = predict(&handle, &record).unwrap();
                    let p = result.probability.unwrap();
                    assert!((0.0..=1.0).contains(&p));
                }
            }
        }
    }
}

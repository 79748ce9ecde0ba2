//! Classifier abstraction and model artifact loading

mod linear;
mod loader;
mod onnx;

pub use linear::{LinearClassifier, LinearKind};
pub use loader::{
    compute_checksum, decode, ArtifactSource, FileSource, ModelFormat, ModelInfo, ModelLoader,
};
pub use onnx::OnnxClassifier;

use crate::error::PredictionError;
use std::ops::Deref;
use std::sync::Arc;

/// A loaded binary classifier
///
/// `predict` is required. Class probabilities are an optional capability:
/// callers check [`Classifier::supports_probability`] before asking for them.
pub trait Classifier: Send + Sync {
    /// Number of positional features the classifier was trained on
    fn n_features(&self) -> usize;

    /// Predicted class for one feature vector
    fn predict(&self, features: &[f32]) -> Result<i64, PredictionError>;

    fn supports_probability(&self) -> bool {
        false
    }

    /// `[p(class 0), p(class 1)]` for one feature vector
    fn predict_probability(&self, _features: &[f32]) -> Result<[f64; 2], PredictionError> {
        Err(PredictionError::ProbabilityUnsupported)
    }

    /// Label plus probabilities when supported
    ///
    /// Backends that produce both from one evaluation should override this.
    fn classify(&self, features: &[f32]) -> Result<(i64, Option<[f64; 2]>), PredictionError> {
        let label = self.predict(features)?;
        let probabilities = if self.supports_probability() {
            Some(self.predict_probability(features)?)
        } else {
            None
        };
        Ok((label, probabilities))
    }
}

/// Shared, read-only handle to a loaded classifier
#[derive(Clone)]
pub struct ClassifierHandle {
    classifier: Arc<dyn Classifier>,
    info: ModelInfo,
}

impl ClassifierHandle {
    pub fn new(classifier: Arc<dyn Classifier>, info: ModelInfo) -> Self {
        Self { classifier, info }
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }
}

impl Deref for ClassifierHandle {
    type Target = dyn Classifier;

    fn deref(&self) -> &Self::Target {
        self.classifier.as_ref()
    }
}

impl std::fmt::Debug for ClassifierHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierHandle")
            .field("info", &self.info)
            .field("supports_probability", &self.classifier.supports_probability())
            .finish()
    }
}

pub(crate) fn check_shape(expected: usize, features: &[f32]) -> Result<(), PredictionError> {
    if features.len() != expected {
        return Err(PredictionError::ShapeMismatch {
            expected,
            actual: features.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn test_handle(classifier: impl Classifier + 'static) -> ClassifierHandle {
    let info = ModelInfo {
        version: "test".to_string(),
        checksum: "test".to_string(),
        format: ModelFormat::Json,
        source: "memory".to_string(),
        size_bytes: 0,
        supports_probability: classifier.supports_probability(),
        loaded_at: 0,
        load_duration: std::time::Duration::ZERO,
    };
    ClassifierHandle::new(Arc::new(classifier), info)
}

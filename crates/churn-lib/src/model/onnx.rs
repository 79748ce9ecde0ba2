//! ONNX classifier inference using tract
//!
//! Expects a graph exported with a single `f32[1, 3]` input. Output 0 holds
//! the predicted class; when the graph has a second output it is read as the
//! `[1, 2]` class probability tensor. Exporters that wrap probabilities in a
//! sequence of maps must have that wrapping disabled.

use super::{check_shape, Classifier};
use crate::error::{ModelLoadError, PredictionError};
use crate::predictor::NUM_FEATURES;
use tract_onnx::prelude::*;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

pub struct OnnxClassifier {
    model: TractModel,
    has_probabilities: bool,
}

impl OnnxClassifier {
    /// Parse, type and optimize an ONNX graph for a single-row input
    pub fn from_bytes(model_bytes: &[u8]) -> Result<Self, ModelLoadError> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .map_err(|e| ModelLoadError::Malformed(format!("{:#}", e)))?
            .with_input_fact(0, f32::fact([1, NUM_FEATURES]).into())
            .map_err(|e| ModelLoadError::FeatureMismatch(format!("{:#}", e)))?
            .into_optimized()
            .map_err(|e| {
                ModelLoadError::FeatureMismatch(format!(
                    "graph does not accept {} features: {:#}",
                    NUM_FEATURES, e
                ))
            })?
            .into_runnable()
            .map_err(|e| ModelLoadError::Malformed(format!("{:#}", e)))?;

        let outputs = model
            .model()
            .output_outlets()
            .map_err(|e| ModelLoadError::Malformed(format!("{:#}", e)))?
            .len();
        if outputs == 0 {
            return Err(ModelLoadError::Malformed("graph has no outputs".to_string()));
        }

        Ok(Self {
            model,
            has_probabilities: outputs >= 2,
        })
    }

    fn run(&self, features: &[f32]) -> Result<TVec<TValue>, PredictionError> {
        check_shape(NUM_FEATURES, features)?;
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, NUM_FEATURES), features.to_vec())
            .map_err(|e| PredictionError::Inference(e.to_string()))?
            .into();
        self.model
            .run(tvec!(input.into()))
            .map_err(|e| PredictionError::Inference(format!("{:#}", e)))
    }
}

fn read_label(outputs: &[TValue]) -> Result<i64, PredictionError> {
    let labels = outputs
        .first()
        .ok_or_else(|| PredictionError::Inference("no label output".to_string()))?
        .cast_to::<i64>()
        .map_err(|e| PredictionError::Inference(format!("{:#}", e)))?;
    let values = labels
        .as_slice::<i64>()
        .map_err(|e| PredictionError::Inference(format!("{:#}", e)))?;
    values
        .first()
        .copied()
        .ok_or_else(|| PredictionError::Inference("empty label output".to_string()))
}

fn read_probabilities(outputs: &[TValue]) -> Result<[f64; 2], PredictionError> {
    let probs = outputs
        .get(1)
        .ok_or_else(|| PredictionError::Inference("no probability output".to_string()))?
        .cast_to::<f32>()
        .map_err(|e| PredictionError::Inference(format!("{:#}", e)))?;
    let values = probs
        .as_slice::<f32>()
        .map_err(|e| PredictionError::Inference(format!("{:#}", e)))?;

    if values.len() != 2 {
        return Err(PredictionError::Inference(format!(
            "probability output has {} values, expected 2",
            values.len()
        )));
    }
    Ok([f64::from(values[0]), f64::from(values[1])])
}

impl Classifier for OnnxClassifier {
    fn n_features(&self) -> usize {
        NUM_FEATURES
    }

    fn predict(&self, features: &[f32]) -> Result<i64, PredictionError> {
        read_label(&self.run(features)?)
    }

    fn supports_probability(&self) -> bool {
        self.has_probabilities
    }

    fn predict_probability(&self, features: &[f32]) -> Result<[f64; 2], PredictionError> {
        if !self.has_probabilities {
            return Err(PredictionError::ProbabilityUnsupported);
        }
        read_probabilities(&self.run(features)?)
    }

    fn classify(&self, features: &[f32]) -> Result<(i64, Option<[f64; 2]>), PredictionError> {
        let outputs = self.run(features)?;
        let label = read_label(&outputs)?;
        let probabilities = if self.has_probabilities {
            Some(read_probabilities(&outputs)?)
        } else {
            None
        };
        Ok((label, probabilities))
    }
}

//! End-to-end prediction for one operator action
//!
//! Validate the record against the input bounds, classify it with the shared
//! handle and present the result. Metrics and structured logs are recorded
//! along the way; nothing is retained between calls.

use crate::error::{InputError, PredictionError};
use crate::input::InputBounds;
use crate::model::{ClassifierHandle, ModelInfo};
use crate::models::{InputRecord, PredictionResult};
use crate::observability::{DashboardMetrics, StructuredLogger};
use crate::predictor::predict;
use crate::presenter::{present, ExportError, ExportRow, ViewModel};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Maximum prediction latency before warning
const SLOW_PREDICTION_MS: u128 = 5;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Prediction(#[from] PredictionError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ServiceError {
    /// Plain-language text for the operator
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Input(e) => e.user_message(),
            ServiceError::Prediction(e) => e.user_message().to_string(),
            ServiceError::Export(_) => "The prediction could not be exported.".to_string(),
        }
    }
}

/// Everything produced for one prediction request
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub record: InputRecord,
    pub result: PredictionResult,
    pub view: ViewModel,
}

/// Runs the validate, predict, present pipeline against a loaded classifier
#[derive(Clone)]
pub struct PredictionService {
    handle: ClassifierHandle,
    bounds: InputBounds,
    metrics: DashboardMetrics,
    logger: StructuredLogger,
}

impl PredictionService {
    pub fn new(handle: ClassifierHandle, metrics: DashboardMetrics, logger: StructuredLogger) -> Self {
        Self {
            handle,
            bounds: InputBounds::canonical(),
            metrics,
            logger,
        }
    }

    pub fn bounds(&self) -> &InputBounds {
        &self.bounds
    }

    pub fn model_info(&self) -> &ModelInfo {
        self.handle.info()
    }

    /// Predict and present one record
    pub fn run(&self, record: InputRecord) -> Result<PredictionOutcome, ServiceError> {
        let (record, result, elapsed) = self.classify(record)?;
        self.metrics.inc_predictions(result.label.as_str());

        let view = present(&result);
        self.logger
            .log_prediction(&record, &result, view.risk_tier, elapsed.as_micros());

        Ok(PredictionOutcome {
            record,
            result,
            view,
        })
    }

    /// Predict and render the single-row CSV export
    ///
    /// Counted as an export, not as another prediction.
    pub fn export(&self, record: InputRecord) -> Result<String, ServiceError> {
        let (record, result, _) = self.classify(record)?;
        let csv = ExportRow::new(&record, &result).to_csv()?;
        self.metrics.inc_exports();
        tracing::debug!(label = %result.label, "Prediction exported");
        Ok(csv)
    }

    fn classify(
        &self,
        record: InputRecord,
    ) -> Result<(InputRecord, PredictionResult, Duration), ServiceError> {
        let record = self.bounds.validate(record).map_err(|e| {
            self.metrics.inc_input_rejections(e.field);
            self.logger.log_input_rejected(&e);
            e
        })?;

        let start = Instant::now();
        let result = predict(&self.handle, &record).map_err(|e| {
            self.metrics.inc_prediction_errors();
            self.logger.log_prediction_failed(&record, &e);
            e
        })?;
        let elapsed = start.elapsed();

        self.metrics.observe_prediction_latency(elapsed.as_secs_f64());
        if elapsed.as_millis() > SLOW_PREDICTION_MS {
            tracing::warn!(
                elapsed_ms = elapsed.as_millis() as u64,
                "Prediction exceeded {}ms target",
                SLOW_PREDICTION_MS
            );
        }

        Ok((record, result, elapsed))
    }
}

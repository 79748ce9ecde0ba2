//! Observability infrastructure for the churn dashboard
//!
//! Provides:
//! - Prometheus metrics (prediction latency, verdict counts, errors, model info)
//! - Structured JSON logging with tracing

use crate::error::{InputError, ModelLoadError, PredictionError};
use crate::model::ModelInfo;
use crate::models::{InputRecord, PredictionResult};
use crate::presenter::RiskTier;
use prometheus::{
    register_gauge, register_gauge_vec, register_histogram, register_int_counter,
    register_int_counter_vec, Gauge, GaugeVec, Histogram, IntCounter, IntCounterVec,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Histogram buckets for prediction latency (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<DashboardMetricsInner> = OnceLock::new();

struct DashboardMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions: IntCounterVec,
    prediction_errors: IntCounter,
    input_rejections: IntCounterVec,
    exports: IntCounter,
    model_info: GaugeVec,
    model_load_seconds: Gauge,
}

impl DashboardMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "churn_dashboard_prediction_latency_seconds",
                "Time spent classifying one customer record",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions: register_int_counter_vec!(
                "churn_dashboard_predictions_total",
                "Predictions served, by verdict",
                &["verdict"]
            )
            .expect("Failed to register predictions_total"),

            prediction_errors: register_int_counter!(
                "churn_dashboard_prediction_errors_total",
                "Predictions that failed after input validation"
            )
            .expect("Failed to register prediction_errors_total"),

            input_rejections: register_int_counter_vec!(
                "churn_dashboard_input_rejections_total",
                "Operator inputs rejected for being out of bounds, by field",
                &["field"]
            )
            .expect("Failed to register input_rejections_total"),

            exports: register_int_counter!(
                "churn_dashboard_exports_total",
                "Predictions exported as CSV"
            )
            .expect("Failed to register exports_total"),

            model_info: register_gauge_vec!(
                "churn_dashboard_model_info",
                "Information about the loaded classifier artifact",
                &["version", "format"]
            )
            .expect("Failed to register model_info"),

            model_load_seconds: register_gauge!(
                "churn_dashboard_model_load_seconds",
                "Time taken to read and decode the classifier artifact"
            )
            .expect("Failed to register model_load_seconds"),
        }
    }
}

/// Dashboard metrics for Prometheus exposition
///
/// Lightweight handle to the global metrics instance; clones share the same
/// underlying metrics.
#[derive(Clone)]
pub struct DashboardMetrics {
    _private: (),
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(DashboardMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &DashboardMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self, verdict: &str) {
        self.inner().predictions.with_label_values(&[verdict]).inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors.inc();
    }

    pub fn inc_input_rejections(&self, field: &str) {
        self.inner().input_rejections.with_label_values(&[field]).inc();
    }

    pub fn inc_exports(&self) {
        self.inner().exports.inc();
    }

    pub fn set_model_info(&self, info: &ModelInfo) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[info.version.as_str(), info.format.as_str()])
            .set(1.0);
        self.inner()
            .model_load_seconds
            .set(info.load_duration.as_secs_f64());
    }
}

/// Structured logger for dashboard events
#[derive(Clone)]
pub struct StructuredLogger {
    instance: String,
}

impl StructuredLogger {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
        }
    }

    pub fn log_startup(&self, version: &str, model_path: &str) {
        info!(
            event = "dashboard_started",
            instance = %self.instance,
            dashboard_version = %version,
            model_path = %model_path,
            "Churn dashboard started"
        );
    }

    pub fn log_model_loaded(&self, info: &ModelInfo) {
        info!(
            event = "model_loaded",
            instance = %self.instance,
            source = %info.source,
            model_version = %info.version,
            format = info.format.as_str(),
            supports_probability = info.supports_probability,
            "Classifier ready"
        );
    }

    pub fn log_model_load_failed(&self, source: &str, err: &ModelLoadError) {
        error!(
            event = "model_load_failed",
            instance = %self.instance,
            source = %source,
            error = %err,
            "Classifier could not be loaded"
        );
    }

    pub fn log_prediction(
        &self,
        record: &InputRecord,
        result: &PredictionResult,
        risk_tier: Option<RiskTier>,
        elapsed_us: u128,
    ) {
        info!(
            event = "prediction_generated",
            instance = %self.instance,
            age = record.age,
            subscription_months = record.subscription_months,
            complaint_count = record.complaint_count,
            verdict = %result.label,
            probability = ?result.probability,
            risk_tier = ?risk_tier.map(|t| t.as_str()),
            elapsed_us = elapsed_us as u64,
            "Generated churn prediction"
        );
    }

    pub fn log_prediction_failed(&self, record: &InputRecord, err: &PredictionError) {
        warn!(
            event = "prediction_failed",
            instance = %self.instance,
            age = record.age,
            subscription_months = record.subscription_months,
            complaint_count = record.complaint_count,
            error = %err,
            "Churn prediction failed"
        );
    }

    pub fn log_input_rejected(&self, err: &InputError) {
        info!(
            event = "input_rejected",
            instance = %self.instance,
            field = err.field,
            value = err.value,
            min = err.min,
            max = err.max,
            "Operator input out of bounds"
        );
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "dashboard_shutdown",
            instance = %self.instance,
            reason = %reason,
            "Churn dashboard shutting down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelFormat;
    use std::time::Duration;

    #[test]
    fn test_dashboard_metrics_creation() {
        // Metrics live in the global Prometheus registry, so creating several
        // handles must reuse the same instance.
        let metrics = DashboardMetrics::new();
        let again = DashboardMetrics::new();

        metrics.observe_prediction_latency(0.0002);
        metrics.inc_predictions("Churn");
        again.inc_predictions("Retained");
        metrics.inc_prediction_errors();
        metrics.inc_input_rejections("age");
        metrics.inc_exports();
        metrics.set_model_info(&ModelInfo {
            version: "abc123def456".to_string(),
            checksum: "abc123def456".to_string(),
            format: ModelFormat::Json,
            source: "memory".to_string(),
            size_bytes: 10,
            supports_probability: true,
            loaded_at: 0,
            load_duration: Duration::from_millis(3),
        });
    }

    #[test]
    fn test_structured_logger_creation() {
        let logger = StructuredLogger::new("test-instance");
        assert_eq!(logger.instance, "test-instance");
    }
}

//! Golden-vector contract check
//!
//! Predicts a known input at startup and compares against a known label. A
//! model trained on a different feature layout usually fails this check
//! instead of silently producing wrong verdicts.

use super::predict;
use crate::error::ContractError;
use crate::input::InputBounds;
use crate::model::ClassifierHandle;
use crate::models::{ChurnLabel, InputRecord, PredictionResult};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Fixed input and the label the artifact must produce for it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoldenVector {
    pub input: InputRecord,
    pub expected_label: ChurnLabel,
}

pub fn verify_golden(
    handle: &ClassifierHandle,
    golden: &GoldenVector,
) -> Result<PredictionResult, ContractError> {
    let record = InputBounds::canonical().validate(golden.input)?;
    let result = predict(handle, &record)?;

    if result.label != golden.expected_label {
        return Err(ContractError::LabelMismatch {
            expected: golden.expected_label.to_string(),
            actual: result.label.to_string(),
        });
    }

    info!(
        age = record.age,
        subscription_months = record.subscription_months,
        complaint_count = record.complaint_count,
        label = %result.label,
        "Golden vector check passed"
    );
    Ok(result)
}

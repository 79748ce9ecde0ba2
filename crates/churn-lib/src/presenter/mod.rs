//! Presentation of prediction results
//!
//! Maps a [`PredictionResult`] to everything an operator surface renders:
//! verdict, indicator color, probability text, risk tier, advisory and the
//! churn/retained proportion chart. Everything here is pure.

mod export;
mod risk;

pub use export::{parse_export, ExportError, ExportRow, EXPORT_HEADER};
pub use risk::{RiskTier, HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};

use crate::models::{ChurnLabel, PredictionResult};
use serde::Serialize;

/// Visual emphasis for the verdict banner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndicatorColor {
    Red,
    Green,
}

impl IndicatorColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorColor::Red => "red",
            IndicatorColor::Green => "green",
        }
    }
}

/// One slice of the proportion chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartSlice {
    pub label: ChurnLabel,
    pub share: f64,
}

/// Churn vs retained proportion of the predicted probability
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProportionChart {
    pub slices: [ChartSlice; 2],
}

impl ProportionChart {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            slices: [
                ChartSlice {
                    label: ChurnLabel::Retained,
                    share: 1.0 - probability,
                },
                ChartSlice {
                    label: ChurnLabel::Churn,
                    share: probability,
                },
            ],
        }
    }
}

/// Everything the results region shows for one prediction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub label: ChurnLabel,
    /// "Churn" or "Retained"
    pub verdict: &'static str,
    pub headline: &'static str,
    pub color: IndicatorColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tier: Option<RiskTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<ProportionChart>,
}

pub fn present(result: &PredictionResult) -> ViewModel {
    let (headline, color) = match result.label {
        ChurnLabel::Churn => ("Customer is likely to churn", IndicatorColor::Red),
        ChurnLabel::Retained => ("Customer is likely to stay", IndicatorColor::Green),
    };
    let risk_tier = result.probability.map(RiskTier::from_probability);

    ViewModel {
        label: result.label,
        verdict: result.label.as_str(),
        headline,
        color,
        probability: result.probability,
        probability_text: result.probability.map(format_probability),
        risk_tier,
        advisory: risk_tier.map(|tier| tier.advisory()),
        chart: result.probability.map(ProportionChart::from_probability),
    }
}

/// Percentage with two decimals, e.g. `0.8512` -> `85.12%`
pub fn format_probability(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}

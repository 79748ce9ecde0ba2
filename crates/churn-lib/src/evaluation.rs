//! Evaluation panel figures
//!
//! These are illustrative example values shown on the dashboard, not results
//! computed from held-out data. Nothing here depends on the loaded model or on
//! any prediction.

use crate::models::ChurnLabel;
use serde::Serialize;

/// Example accuracy shown on the evaluation panel
pub const EXAMPLE_ACCURACY: f64 = 0.89;

/// Example F1-score shown on the evaluation panel
pub const EXAMPLE_F1_SCORE: f64 = 0.85;

/// Example confusion matrix; rows are actual, columns predicted, [Retained, Churn]
pub const EXAMPLE_CONFUSION_MATRIX: [[u32; 2]; 2] = [[80, 10], [5, 30]];

/// Class order used for both axes of the confusion matrix
pub const MATRIX_CLASSES: [ChurnLabel; 2] = [ChurnLabel::Retained, ChurnLabel::Churn];

/// Meaning of one confusion matrix cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellInterpretation {
    pub name: &'static str,
    pub actual: ChurnLabel,
    pub predicted: ChurnLabel,
    pub count: u32,
    pub meaning: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StaticMetrics {
    pub accuracy: f64,
    pub f1_score: f64,
    pub confusion_matrix: [[u32; 2]; 2],
    /// Always true: these figures are examples, not measurements
    pub simulated: bool,
}

impl StaticMetrics {
    pub const EXAMPLE: StaticMetrics = StaticMetrics {
        accuracy: EXAMPLE_ACCURACY,
        f1_score: EXAMPLE_F1_SCORE,
        confusion_matrix: EXAMPLE_CONFUSION_MATRIX,
        simulated: true,
    };

    pub fn accuracy_text(&self) -> String {
        format!("{:.2}%", self.accuracy * 100.0)
    }

    pub fn f1_text(&self) -> String {
        format!("{:.2}%", self.f1_score * 100.0)
    }

    pub fn cell(&self, actual: ChurnLabel, predicted: ChurnLabel) -> u32 {
        self.confusion_matrix[actual.class() as usize][predicted.class() as usize]
    }

    /// The four cells in reading order: TP, FP, TN, FN
    pub fn interpretation(&self) -> [CellInterpretation; 4] {
        use ChurnLabel::{Churn, Retained};
        [
            CellInterpretation {
                name: "True Positive",
                actual: Churn,
                predicted: Churn,
                count: self.cell(Churn, Churn),
                meaning: "Churned customers correctly predicted to churn.",
            },
            CellInterpretation {
                name: "False Positive",
                actual: Retained,
                predicted: Churn,
                count: self.cell(Retained, Churn),
                meaning: "Customers who stayed but were predicted to churn.",
            },
            CellInterpretation {
                name: "True Negative",
                actual: Retained,
                predicted: Retained,
                count: self.cell(Retained, Retained),
                meaning: "Customers who stayed and were predicted to stay.",
            },
            CellInterpretation {
                name: "False Negative",
                actual: Churn,
                predicted: Retained,
                count: self.cell(Churn, Retained),
                meaning: "Churned customers wrongly predicted to stay.",
            },
        ]
    }
}

/// Evaluation panel payload served to operator surfaces
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub metrics: StaticMetrics,
    pub accuracy_text: String,
    pub f1_text: String,
    pub classes: [ChurnLabel; 2],
    pub cells: [CellInterpretation; 4],
}

impl EvaluationReport {
    pub fn example() -> Self {
        let metrics = StaticMetrics::EXAMPLE;
        Self {
            accuracy_text: metrics.accuracy_text(),
            f1_text: metrics.f1_text(),
            classes: MATRIX_CLASSES,
            cells: metrics.interpretation(),
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_values() {
        let metrics = StaticMetrics::EXAMPLE;
        assert_eq!(metrics.accuracy, 0.89);
        assert_eq!(metrics.f1_score, 0.85);
        assert_eq!(metrics.confusion_matrix, [[80, 10], [5, 30]]);
        assert!(metrics.simulated);
    }

    #[test]
    fn test_display_text() {
        let metrics = StaticMetrics::EXAMPLE;
        assert_eq!(metrics.accuracy_text(), "89.00%");
        assert_eq!(metrics.f1_text(), "85.00%");
    }

    #[test]
    fn test_cells() {
        let cells = StaticMetrics::EXAMPLE.interpretation();
        let counts: Vec<u32> = cells.iter().map(|c| c.count).collect();
        // TP, FP, TN, FN
        assert_eq!(counts, vec![30, 10, 80, 5]);
    }

    #[test]
    fn test_report_serializes() {
        let json = serde_json::to_value(EvaluationReport::example()).unwrap();
        assert_eq!(json["accuracy_text"], "89.00%");
        assert_eq!(json["metrics"]["simulated"], true);
        assert_eq!(json["classes"][1], "churn");
    }
}

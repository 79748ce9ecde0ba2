//! Single-customer prediction and CSV export

use anyhow::{Context, Result};
use churn_lib::presenter::ExportRow;
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::client::{ApiClient, PredictRequest, PredictionView};
use crate::output::{
    color_tier, color_verdict, print_info, print_json, print_success, proportion_bar, OutputFormat,
};

/// Score one customer and optionally write the result to CSV
pub async fn predict(
    client: &ApiClient,
    request: PredictRequest,
    export: Option<PathBuf>,
    format: OutputFormat,
) -> Result<()> {
    let view: PredictionView = client.post("api/v1/predict", &request).await?;

    match format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Table => print_view(&view),
    }

    if let Some(path) = export {
        export_prediction(&view, &path)?;
        if matches!(format, OutputFormat::Table) {
            print_success(&format!("Prediction exported to {}", path.display()));
        }
    }

    Ok(())
}

fn print_view(view: &PredictionView) {
    println!("{}", "Prediction Result".bold());
    println!("{}", "=".repeat(50));
    println!(
        "Customer:       age {}, {} months subscribed, {} complaints",
        view.input.age, view.input.subscription_months, view.input.complaint_count
    );
    println!(
        "Verdict:        {}",
        color_verdict(view.label, &format!("{}: {}", view.verdict, view.headline))
    );

    match (view.probability, &view.probability_text) {
        (Some(probability), Some(text)) => {
            println!("Churn chance:   {}", text.bold());
            if let Some(tier) = view.risk_tier {
                println!("Risk tier:      {}", color_tier(tier));
            }
            if let Some(advisory) = &view.advisory {
                println!();
                println!("{}", advisory.italic());
            }
            println!();
            println!("{}", proportion_bar(probability));
            println!(
                "{} retained {:.2}%   {} churn {:.2}%",
                "■".green(),
                (1.0 - probability) * 100.0,
                "■".red(),
                probability * 100.0
            );
        }
        _ => print_info("This model does not report a churn probability"),
    }

    println!();
    println!("Model version:  {}", view.model_version.dimmed());
}

/// Write the prediction as a one-row CSV file
pub fn export_prediction(view: &PredictionView, path: &Path) -> Result<()> {
    ExportRow::new(&view.input, &view.result())
        .write_to_path(path)
        .with_context(|| format!("Failed to export prediction to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use churn_lib::{presenter::parse_export, ChurnLabel, InputRecord};
    use tempfile::TempDir;

    fn view(probability: Option<f64>) -> PredictionView {
        PredictionView {
            input: InputRecord {
                age: 52,
                subscription_months: 3,
                complaint_count: 7,
            },
            model_version: "3f2a9c01bd44".to_string(),
            label: ChurnLabel::Churn,
            verdict: "Churn".to_string(),
            headline: "Customer is likely to churn".to_string(),
            color: "red".to_string(),
            probability,
            probability_text: probability.map(|p| format!("{:.2}%", p * 100.0)),
            risk_tier: None,
            advisory: None,
        }
    }

    #[test]
    fn test_export_writes_one_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prediction.csv");

        export_prediction(&view(Some(0.85)), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "age,subscription_months,complaint_count,prediction,probability_churn\n52,3,7,Churn,0.85\n"
        );
        let row = parse_export(&text).unwrap();
        assert_eq!(row.record().age, 52);
    }

    #[test]
    fn test_export_without_probability_leaves_field_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prediction.csv");

        export_prediction(&view(None), &path).unwrap();

        let row = parse_export(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(row.prediction, ChurnLabel::Churn);
        assert!(row.probability_churn.is_none());
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("prediction.csv");
        assert!(export_prediction(&view(Some(0.5)), &path).is_err());
    }
}

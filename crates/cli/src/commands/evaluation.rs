//! Evaluation panel in the terminal

use anyhow::Result;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::client::{ApiClient, Evaluation};
use crate::output::{print_json, print_warning, OutputFormat};

/// Row for the confusion matrix table
#[derive(Tabled)]
struct MatrixRow {
    #[tabled(rename = "Actual \\ Predicted")]
    actual: String,
    #[tabled(rename = "Retained")]
    retained: u32,
    #[tabled(rename = "Churn")]
    churn: u32,
}

/// Row for the cell interpretation table
#[derive(Tabled)]
struct CellRow {
    #[tabled(rename = "Cell")]
    name: String,
    #[tabled(rename = "Count")]
    count: u32,
    #[tabled(rename = "Meaning")]
    meaning: String,
}

fn matrix_rows(report: &Evaluation) -> Vec<MatrixRow> {
    report
        .classes
        .iter()
        .zip(report.metrics.confusion_matrix.iter())
        .map(|(class, row)| MatrixRow {
            actual: class.to_string(),
            retained: row[0],
            churn: row[1],
        })
        .collect()
}

pub async fn show_evaluation(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let report: Evaluation = client.get("api/v1/evaluation").await?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => {
            println!("{}", "Model Evaluation".bold());
            println!("{}", "=".repeat(50));
            if report.metrics.simulated {
                print_warning("Figures are a simulated example, not measured on this model");
                println!();
            }
            println!("Accuracy:   {}", report.accuracy_text.cyan());
            println!("F1-score:   {}", report.f1_text.cyan());
            println!();

            println!("{}", "Confusion Matrix".bold());
            let table = Table::new(matrix_rows(&report))
                .with(Style::rounded())
                .to_string();
            println!("{}", table);
            println!();

            let cells: Vec<CellRow> = report
                .cells
                .iter()
                .map(|c| CellRow {
                    name: c.name.clone(),
                    count: c.count,
                    meaning: c.meaning.clone(),
                })
                .collect();
            let table = Table::new(cells).with(Style::rounded()).to_string();
            println!("{}", table);
        }
    }

    Ok(())
}

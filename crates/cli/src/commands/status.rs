//! Service status and input ranges

use anyhow::Result;
use churn_lib::{
    health::{HealthResponse, ReadinessResponse},
    input::FieldBounds,
    InputBounds,
};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use crate::client::{ApiClient, ModelSummary};
use crate::output::{color_status, format_timestamp, print_json, print_warning, OutputFormat};

/// Row for the components table
#[derive(Tabled)]
struct ComponentRow {
    #[tabled(rename = "Component")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last Check")]
    last_check: String,
    #[tabled(rename = "Message")]
    message: String,
}

/// Row for the bounds table
#[derive(Tabled)]
struct BoundsRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Min")]
    min: u32,
    #[tabled(rename = "Max")]
    max: u32,
    #[tabled(rename = "Default")]
    default: u32,
}

impl BoundsRow {
    fn new(field: &'static str, bounds: FieldBounds) -> Self {
        Self {
            field,
            min: bounds.min,
            max: bounds.max,
            default: bounds.default,
        }
    }
}

fn bounds_rows(bounds: &InputBounds) -> Vec<BoundsRow> {
    vec![
        BoundsRow::new("age", bounds.age),
        BoundsRow::new("subscription_months", bounds.subscription_months),
        BoundsRow::new("complaint_count", bounds.complaint_count),
    ]
}

#[derive(Serialize)]
struct StatusReport {
    health: HealthResponse,
    readiness: ReadinessResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<ModelSummary>,
}

pub async fn show_health(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let (_, health): (_, HealthResponse) = client.get_with_status("healthz").await?;
    let (_, readiness): (_, ReadinessResponse) = client.get_with_status("readyz").await?;
    // model info is only served once a classifier is loaded
    let model: Option<ModelSummary> = client.get("api/v1/model").await.ok();

    let report = StatusReport {
        health,
        readiness,
        model,
    };

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Table => print_status(&report),
    }

    Ok(())
}

fn print_status(report: &StatusReport) {
    let health = &report.health;
    let ready = if report.readiness.ready {
        "ready"
    } else {
        "not ready"
    };

    println!("{}", "Dashboard Status".bold());
    println!("{}", "=".repeat(50));
    println!("Health:         {}", color_status(health.status.as_str()));
    println!("Readiness:      {}", color_status(ready));
    if let Some(reason) = &report.readiness.reason {
        println!("Reason:         {}", reason);
    }
    println!();

    match &report.model {
        Some(model) => {
            println!("{}", "Model".bold());
            println!("{}", "-".repeat(50));
            println!("Version:        {}", model.version.cyan());
            println!("Format:         {}", model.format);
            println!("Source:         {}", model.source);
            println!("Size:           {} bytes", model.size_bytes);
            println!(
                "Probability:    {}",
                if model.supports_probability { "yes" } else { "no" }
            );
            println!("Loaded:         {}", format_timestamp(model.loaded_at));
            println!();
        }
        None => print_warning("No model information available"),
    }

    let mut rows: Vec<ComponentRow> = health
        .components
        .iter()
        .map(|(name, c)| ComponentRow {
            name: name.clone(),
            status: color_status(c.status.as_str()),
            last_check: format_timestamp(c.last_check_timestamp),
            message: c.message.clone().unwrap_or_default(),
        })
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

pub async fn show_bounds(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let bounds: InputBounds = client.get("api/v1/bounds").await?;

    match format {
        OutputFormat::Json => print_json(&bounds)?,
        OutputFormat::Table => {
            println!("{}", "Accepted Input Ranges".bold());
            let table = Table::new(bounds_rows(&bounds))
                .with(Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_rows() {
        let rows = bounds_rows(&InputBounds::canonical());
        assert_eq!(rows.len(), 3);
        assert_eq!((rows[0].field, rows[0].min, rows[0].max, rows[0].default), ("age", 18, 100, 30));
        assert_eq!(rows[1].max, 120);
        assert_eq!(rows[2].default, 2);
    }
}

//! Output formatting utilities

use chrono::{TimeZone, Utc};
use churn_lib::{presenter::RiskTier, ChurnLabel};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Width of the churn proportion bar in characters
const BAR_WIDTH: usize = 40;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print one underlying cause of an error, indented under it
pub fn print_detail(message: &str) {
    eprintln!("  {} {}", "caused by:".dimmed(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Verdict in the indicator color: red for churn, green for retained
pub fn color_verdict(label: ChurnLabel, text: &str) -> String {
    match label {
        ChurnLabel::Churn => text.red().bold().to_string(),
        ChurnLabel::Retained => text.green().bold().to_string(),
    }
}

pub fn color_tier(tier: RiskTier) -> String {
    match tier {
        RiskTier::High => tier.as_str().red().to_string(),
        RiskTier::Medium => tier.as_str().yellow().to_string(),
        RiskTier::Low => tier.as_str().green().to_string(),
    }
}

/// Color status based on value
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "healthy" | "ready" => status.green().to_string(),
        "degraded" => status.yellow().to_string(),
        "unhealthy" | "not ready" => status.red().to_string(),
        _ => status.to_string(),
    }
}

/// Number of bar cells given to churn; the rest go to retained
pub fn churn_cells(probability: f64, width: usize) -> usize {
    ((probability.clamp(0.0, 1.0) * width as f64).round() as usize).min(width)
}

/// Horizontal churn/retained proportion bar
pub fn proportion_bar(probability: f64) -> String {
    let churn = churn_cells(probability, BAR_WIDTH);
    format!(
        "{}{}",
        "█".repeat(BAR_WIDTH - churn).green(),
        "█".repeat(churn).red()
    )
}

/// Format a unix timestamp for display
pub fn format_timestamp(secs: i64) -> String {
    Utc.timestamp_opt(secs, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| secs.to_string())
}

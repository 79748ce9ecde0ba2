//! Churn Prediction Dashboard CLI
//!
//! A command-line tool for scoring customers against a running dashboard,
//! exporting predictions and checking the service status.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use churn_lib::input::{
    FieldBounds, AGE_BOUNDS, COMPLAINT_COUNT_BOUNDS, SUBSCRIPTION_MONTHS_BOUNDS,
};
use clap::{builder::RangedI64ValueParser, Parser, Subcommand};
use commands::{evaluation, predict, status};
use std::path::PathBuf;

const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Churn Prediction Dashboard CLI
#[derive(Parser)]
#[command(name = "churnctl")]
#[command(author, version, about = "CLI for the Churn Prediction Dashboard", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via CHURN_API_URL env var)
    #[arg(long, env = "CHURN_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    pub format: Option<output::OutputFormat>,

    /// Show the full cause chain when a command fails
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict churn for one customer
    Predict {
        /// Customer age in years
        #[arg(long, default_value_t = AGE_BOUNDS.default, value_parser = bounded(AGE_BOUNDS))]
        age: u32,

        /// Subscription length in months
        #[arg(
            long,
            default_value_t = SUBSCRIPTION_MONTHS_BOUNDS.default,
            value_parser = bounded(SUBSCRIPTION_MONTHS_BOUNDS)
        )]
        subscription_months: u32,

        /// Number of complaints filed
        #[arg(
            long,
            default_value_t = COMPLAINT_COUNT_BOUNDS.default,
            value_parser = bounded(COMPLAINT_COUNT_BOUNDS)
        )]
        complaints: u32,

        /// Write the prediction to this CSV file
        #[arg(long, short)]
        export: Option<PathBuf>,
    },

    /// Show the example evaluation figures
    Evaluation,

    /// Show the accepted input ranges
    Bounds,

    /// Show service health, readiness and the loaded model
    Health,
}

/// Reject out-of-range values at parse time
fn bounded(bounds: FieldBounds) -> RangedI64ValueParser<u32> {
    clap::value_parser!(u32).range(bounds.min as i64..=bounds.max as i64)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = run(cli).await {
        output::print_error(&e.to_string());
        if verbose {
            for cause in e.chain().skip(1) {
                output::print_detail(&cause.to_string());
            }
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = config::Config::load()?;

    let api_url = cli
        .api_url
        .or(settings.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let format = cli
        .format
        .or_else(|| settings.output_format())
        .unwrap_or_default();

    // Initialize client
    let client = client::ApiClient::new(&api_url)?;

    // Execute command
    match cli.command {
        Commands::Predict {
            age,
            subscription_months,
            complaints,
            export,
        } => {
            let request = client::PredictRequest {
                age,
                subscription_months,
                complaint_count: complaints,
            };
            predict::predict(&client, request, export, format).await?;
        }
        Commands::Evaluation => {
            evaluation::show_evaluation(&client, format).await?;
        }
        Commands::Bounds => {
            status::show_bounds(&client, format).await?;
        }
        Commands::Health => {
            status::show_health(&client, format).await?;
        }
    }

    Ok(())
}

//! Churn Dashboard - single-page churn prediction service
//!
//! Loads the churn classifier once at startup and serves the operator page
//! and prediction API until interrupted.

use anyhow::{Context, Result};
use churn_dashboard::{api, config};
use churn_lib::{
    health::components, predictor::verify_golden, DashboardMetrics, HealthRegistry, ModelLoader,
    PredictionService, StructuredLogger,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DASHBOARD_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting churn-dashboard");

    let config_file = std::env::var("CHURN_CONFIG_FILE")
        .unwrap_or_else(|_| config::DEFAULT_CONFIG_FILE.to_string());
    let config = config::DashboardConfig::load(&config_file)?;
    info!(model_path = %config.model_path, port = config.api_port, "Dashboard configured");

    let logger = StructuredLogger::new(&config.instance_name);
    logger.log_startup(DASHBOARD_VERSION, &config.model_path);

    let health_registry = HealthRegistry::new();
    health_registry.register(components::PREDICTOR).await;
    let metrics = DashboardMetrics::new();

    let mut loader = ModelLoader::from_path(&config.model_path);
    if let Some(checksum) = &config.model_checksum {
        loader = loader.with_expected_checksum(checksum);
    }

    // A missing or corrupt artifact is fatal: there is nothing to serve without it.
    let handle = match loader.load() {
        Ok(handle) => handle,
        Err(e) => {
            logger.log_model_load_failed(&config.model_path, &e);
            error!("{}", e.user_message());
            return Err(e).context("Failed to load classifier");
        }
    };
    logger.log_model_loaded(handle.info());
    metrics.set_model_info(handle.info());

    match &config.golden {
        Some(golden) => {
            verify_golden(&handle, golden).context("Classifier failed the golden-vector check")?;
        }
        None => warn!("No golden vector configured; feature layout of the artifact is unchecked"),
    }

    health_registry.mark_model_loaded(&handle.info().version).await;

    let service = PredictionService::new(handle, metrics, logger.clone());
    let app_state = Arc::new(api::AppState::new(service, health_registry));

    api::serve(config.api_port, app_state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
    })
    .await?;

    logger.log_shutdown("SIGINT received");
    info!("Shutting down");

    Ok(())
}

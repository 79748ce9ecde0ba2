//! Dashboard configuration

use anyhow::{Context, Result};
use churn_lib::predictor::GoldenVector;
use serde::Deserialize;

/// Config file looked up next to the working directory (any format the config crate reads)
pub const DEFAULT_CONFIG_FILE: &str = "churn-dashboard";

#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Instance name attached to structured logs
    #[serde(default = "default_instance_name")]
    pub instance_name: String,

    /// Port for the operator page, API, health and metrics
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Path to the classifier artifact (.json or .onnx)
    #[serde(default = "default_model_path")]
    pub model_path: String,

    /// Expected SHA256 of the artifact, checked before decoding
    #[serde(default)]
    pub model_checksum: Option<String>,

    /// Fixed input and expected label verified at startup
    #[serde(default)]
    pub golden: Option<GoldenVector>,
}

fn default_instance_name() -> String {
    std::env::var("HOSTNAME").unwrap_or_else(|_| "churn-dashboard".to_string())
}

fn default_api_port() -> u16 {
    8080
}

fn default_model_path() -> String {
    "models/churn_model.json".to_string()
}

impl DashboardConfig {
    /// Load from the optional config file, then `CHURN_*` environment variables
    ///
    /// Nested keys use a double underscore, e.g. `CHURN_GOLDEN__INPUT__AGE=25`.
    pub fn load(file: &str) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix("CHURN")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read dashboard configuration")?;

        config
            .try_deserialize()
            .context("Invalid dashboard configuration")
    }
}

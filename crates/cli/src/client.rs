//! API client for communicating with the churn dashboard

use anyhow::{Context, Result};
use churn_lib::{presenter::RiskTier, ChurnLabel, InputRecord, PredictionResult};
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Non-success answer from the dashboard
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{message} (HTTP {status})")]
    Rejected { status: StatusCode, message: String },
}

/// API client for the churn dashboard
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = Url::parse(base_url).context("Invalid API URL")?;

        Ok(Self { client, base_url })
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send_get(path).await?;
        Self::parse(response).await
    }

    /// GET that also decodes a 503 body; health endpoints report failure that way
    pub async fn get_with_status<T: DeserializeOwned>(&self, path: &str) -> Result<(StatusCode, T)> {
        let response = self.send_get(path).await?;
        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            let body = response.json().await.context("Failed to parse response")?;
            return Ok((status, body));
        }
        Ok((status, Self::parse(response).await?))
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.base_url.join(path).context("Invalid path")?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to send request")?;

        Self::parse(response).await
    }

    async fn send_get(&self, path: &str) -> Result<Response> {
        let url = self.base_url.join(path).context("Invalid path")?;

        self.client
            .get(url)
            .send()
            .await
            .context("Failed to send request")
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // the dashboard answers errors with {"error": "..."}
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(ApiError::Rejected { status, message }.into());
        }

        response.json().await.context("Failed to parse response")
    }
}

// API request and response types

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PredictRequest {
    pub age: u32,
    pub subscription_months: u32,
    pub complaint_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionView {
    pub input: InputRecord,
    pub model_version: String,
    pub label: ChurnLabel,
    pub verdict: String,
    pub headline: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tier: Option<RiskTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

impl PredictionView {
    pub fn result(&self) -> PredictionResult {
        PredictionResult {
            label: self.label,
            probability: self.probability,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub f1_score: f64,
    pub confusion_matrix: [[u32; 2]; 2],
    pub simulated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixCell {
    pub name: String,
    pub actual: ChurnLabel,
    pub predicted: ChurnLabel,
    pub count: u32,
    pub meaning: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub metrics: EvaluationMetrics,
    pub accuracy_text: String,
    pub f1_text: String,
    pub classes: [ChurnLabel; 2],
    pub cells: Vec<MatrixCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub version: String,
    pub checksum: String,
    pub format: String,
    pub source: String,
    pub size_bytes: u64,
    pub supports_probability: bool,
    pub loaded_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

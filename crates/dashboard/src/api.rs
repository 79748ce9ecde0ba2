//! HTTP surface: operator page, prediction API, CSV export, health and metrics

use crate::page::{self, PageView};
use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use churn_lib::{
    evaluation::EvaluationReport,
    health::{components, ComponentStatus},
    presenter::ViewModel,
    HealthRegistry, InputRecord, PredictionOutcome, PredictionService, ServiceError,
};
use prometheus::{Encoder, TextEncoder};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: PredictionService,
    pub health_registry: HealthRegistry,
}

impl AppState {
    pub fn new(service: PredictionService, health_registry: HealthRegistry) -> Self {
        Self {
            service,
            health_registry,
        }
    }
}

/// Raw operator input; values are checked against the bounds before prediction
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PredictRequest {
    pub age: i64,
    pub subscription_months: i64,
    pub complaint_count: i64,
}

impl PredictRequest {
    /// Check raw values against the input bounds
    fn into_candidate(self, state: &AppState) -> Result<InputRecord, ServiceError> {
        state
            .service
            .bounds()
            .validate_raw(self.age, self.subscription_months, self.complaint_count)
            .map_err(ServiceError::from)
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub input: InputRecord,
    pub model_version: String,
    #[serde(flatten)]
    pub view: ViewModel,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Shown when the submitted values cannot be read as whole numbers at all
pub const MALFORMED_INPUT: &str =
    "Age, subscription months and complaint count must each be a whole number.";

/// Request failure rendered as a plain-language JSON body
pub enum ApiError {
    Service(ServiceError),
    /// Body or query string did not decode into a request
    Malformed,
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "Rejected undecodable JSON request");
        Self::Malformed
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        warn!(error = %rejection, "Rejected undecodable query string");
        Self::Malformed
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Service(e) => {
                let status = match e {
                    ServiceError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    ServiceError::Prediction(_) | ServiceError::Export(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.user_message())
            }
            ApiError::Malformed => (StatusCode::UNPROCESSABLE_ENTITY, MALFORMED_INPUT.to_string()),
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// A failed inference or export degrades the predictor until the next success
async fn track<T>(state: &AppState, result: Result<T, ServiceError>) -> Result<T, ServiceError> {
    match &result {
        Ok(_) => state.health_registry.set_healthy(components::PREDICTOR).await,
        Err(e @ (ServiceError::Prediction(_) | ServiceError::Export(_))) => {
            state
                .health_registry
                .set_degraded(components::PREDICTOR, e.to_string())
                .await
        }
        Err(ServiceError::Input(_)) => {}
    }

    result
}

async fn run_tracked(
    state: &AppState,
    request: PredictRequest,
) -> Result<PredictionOutcome, ServiceError> {
    let record = request.into_candidate(state)?;
    track(state, state.service.run(record)).await
}

async fn export_tracked(state: &AppState, request: PredictRequest) -> Result<String, ServiceError> {
    let record = request.into_candidate(state)?;
    track(state, state.service.export(record)).await
}

/// Operator page with defaults filled in and no prediction yet
async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let bounds = *state.service.bounds();
    Html(page::render(&PageView::initial(bounds)))
}

/// Form submission: the only way the page triggers a prediction
async fn submit(
    State(state): State<Arc<AppState>>,
    submission: Result<Form<PredictRequest>, FormRejection>,
) -> impl IntoResponse {
    let bounds = *state.service.bounds();
    let view = match submission {
        Ok(Form(request)) => match run_tracked(&state, request).await {
            Ok(outcome) => PageView::with_outcome(bounds, outcome),
            Err(e) => {
                // keep what the operator typed, clamped into range for redisplay
                let form = bounds.clamp_raw(request.age, request.subscription_months, request.complaint_count);
                PageView::with_error(bounds, form, e.user_message())
            }
        },
        Err(rejection) => {
            warn!(error = %rejection, "Rejected undecodable form submission");
            PageView::with_error(bounds, bounds.defaults(), MALFORMED_INPUT.to_string())
        }
    };
    Html(page::render(&view))
}

async fn predict(
    State(state): State<Arc<AppState>>,
    request: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Json(request) = request?;
    let outcome = run_tracked(&state, request).await?;

    Ok(Json(PredictResponse {
        input: outcome.record,
        model_version: state.service.model_info().version.clone(),
        view: outcome.view,
    }))
}

fn csv_response(csv: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"churn_prediction.csv\"",
            ),
        ],
        csv,
    )
        .into_response()
}

async fn export(
    State(state): State<Arc<AppState>>,
    request: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = request?;
    Ok(csv_response(export_tracked(&state, request).await?))
}

/// Download link target on the operator page
async fn export_link(
    State(state): State<Arc<AppState>>,
    request: Result<Query<PredictRequest>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(request) = request?;
    Ok(csv_response(export_tracked(&state, request).await?))
}

async fn evaluation() -> Json<EvaluationReport> {
    Json(EvaluationReport::example())
}

async fn bounds(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(*state.service.bounds())
}

async fn model(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.service.model_info().clone())
}

/// Health check response - returns 200 if healthy or degraded, 503 if unhealthy
async fn healthz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness check response - returns 200 if ready, 503 if not ready
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index).post(submit))
        .route("/export.csv", get(export_link))
        .route("/api/v1/predict", post(predict))
        .route("/api/v1/export", post(export))
        .route("/api/v1/evaluation", get(evaluation))
        .route("/api/v1/bounds", get(bounds))
        .route("/api/v1/model", get(model))
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the HTTP server and run until `shutdown` resolves
pub async fn serve(
    port: u16,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting dashboard server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

//! Churn prediction library
//!
//! This crate provides the core functionality for:
//! - Loading and caching the churn classifier artifact
//! - Bounded operator input
//! - Single-record churn prediction
//! - Presentation of verdicts, risk tiers and CSV exports
//! - Health checks and observability

pub mod error;
pub mod evaluation;
pub mod health;
pub mod input;
pub mod model;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod presenter;
pub mod service;

pub use error::{ContractError, InputError, ModelLoadError, PredictionError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use input::InputBounds;
pub use model::{ClassifierHandle, ModelLoader};
pub use models::*;
pub use observability::{DashboardMetrics, StructuredLogger};
pub use service::{PredictionOutcome, PredictionService, ServiceError};

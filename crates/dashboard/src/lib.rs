//! Churn dashboard service
//!
//! Serves the operator page, the prediction API and the health and metrics
//! endpoints on top of `churn-lib`.

pub mod api;
pub mod config;
pub mod page;

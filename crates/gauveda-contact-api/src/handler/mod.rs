//! Transport adapters for the contact endpoint
//!
//! The same contract is served two ways:
//! - `routes`: an axum router for a long-running HTTP server
//! - `function`: a serverless-style function taking one event per call
//!
//! Both go through [`AppState`], which wraps the shared `ContactService`
//! and records metrics, so status codes and bodies are identical.

pub mod function;
pub mod middleware;
pub mod routes;

pub use function::{ContactFunction, FunctionEvent, FunctionResponse};
pub use middleware::request_logging_middleware;
pub use routes::{create_router, ApiError};

use gauveda_contact_core::{
    ContactError, ContactInquiry, ContactService, FieldError, StoreHealth,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::telemetry::{ContactMetrics, SubmissionOutcome};

pub const MSG_CREATED: &str = "Thank you for your inquiry. We will get back to you soon!";
pub const MSG_INVALID_FORM: &str = "Invalid form data";
pub const MSG_SUBMIT_FAILED: &str = "Something went wrong. Please try again later.";
pub const MSG_LIST_FAILED: &str = "Failed to fetch inquiries";
pub const MSG_METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// Response envelope for every contact endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            errors: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    /// Failure response with a message and no data
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            errors: None,
        }
    }

    /// Failure response listing field errors
    pub fn invalid(errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: Some(MSG_INVALID_FORM.to_string()),
            data: None,
            errors: Some(errors),
        }
    }
}

/// State shared by both adapters
#[derive(Debug, Clone)]
pub struct AppState {
    service: ContactService,
    metrics: Option<Arc<ContactMetrics>>,
    max_body_size: usize,
    started_at: Instant,
}

impl AppState {
    pub fn new(service: ContactService) -> Self {
        Self {
            service,
            metrics: None,
            max_body_size: 64 * 1024,
            started_at: Instant::now(),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<ContactMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    pub fn service(&self) -> &ContactService {
        &self.service
    }

    pub fn metrics(&self) -> Option<&ContactMetrics> {
        self.metrics.as_deref()
    }

    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Submit a raw body, mapping the outcome to an API result
    pub async fn submit(&self, body: &[u8]) -> Result<ContactInquiry, ApiError> {
        let _timer = self.metrics().map(|m| m.start_timer("submit"));
        let result = self.service.submit_body(body).await;

        let outcome = match &result {
            Ok(_) => SubmissionOutcome::Created,
            Err(ContactError::Validation(_)) => SubmissionOutcome::Invalid,
            Err(ContactError::MalformedRequest(_)) => SubmissionOutcome::Malformed,
            Err(_) => SubmissionOutcome::Error,
        };
        if let Some(metrics) = self.metrics() {
            metrics.record_submission(outcome);
            if outcome == SubmissionOutcome::Created {
                metrics.inc_stored_inquiries();
            }
        }

        result.map_err(ApiError::from_submission)
    }

    /// List every stored inquiry, mapping failure to an API error
    pub async fn list(&self) -> Result<Vec<ContactInquiry>, ApiError> {
        let _timer = self.metrics().map(|m| m.start_timer("list"));
        let result = self.service.list().await;

        if let Some(metrics) = self.metrics() {
            metrics.record_list(result.is_ok());
            if let Ok(inquiries) = &result {
                metrics.set_stored_inquiries(inquiries.len());
            }
        }

        result.map_err(ApiError::from_listing)
    }

    /// Store health, resyncing the stored-inquiries gauge from the count
    pub async fn health(&self) -> StoreHealth {
        let health = self.service.health().await;
        if let (Some(metrics), Some(count)) = (self.metrics(), health.inquiries) {
            metrics.set_stored_inquiries(count);
        }
        health
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub store: StoreHealth,
    pub version: String,
    pub uptime_secs: u64,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

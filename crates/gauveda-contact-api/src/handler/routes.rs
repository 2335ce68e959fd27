//! Route definitions for the contact service
//!
//! - POST /api/contact - submit an inquiry
//! - GET /api/contact - list stored inquiries
//! - OPTIONS /api/contact - CORS preflight, answered by the CORS layer
//! - GET /health - store health
//! - GET /metrics - Prometheus exposition
//!
//! Any other method on /api/contact, HEAD included, answers 405 with the
//! JSON envelope.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, MethodFilter},
    Json, Router,
};
use gauveda_contact_core::{ContactError, ContactInquiry, ValidationErrors};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{
    request_logging_middleware, ApiResponse, AppState, HealthResponse, HealthStatus,
    MSG_CREATED, MSG_LIST_FAILED, MSG_METHOD_NOT_ALLOWED, MSG_SUBMIT_FAILED,
};

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// Form data failed validation
    InvalidForm(ValidationErrors),
    /// Body missing, unreadable or not a JSON object
    BadRequest(String),
    PayloadTooLarge,
    MethodNotAllowed,
    /// Submission failed on the server; detail is logged, never returned
    SubmissionFailed(String),
    /// Listing failed on the server; detail is logged, never returned
    ListFailed(String),
}

impl ApiError {
    /// Map a failed submission
    pub fn from_submission(err: ContactError) -> Self {
        match err {
            ContactError::Validation(errors) => ApiError::InvalidForm(errors),
            ContactError::MalformedRequest(msg) => ApiError::BadRequest(msg),
            other => ApiError::SubmissionFailed(other.to_string()),
        }
    }

    /// Map a failed listing
    pub fn from_listing(err: ContactError) -> Self {
        ApiError::ListFailed(err.to_string())
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidForm(_) => "INVALID_FORM",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ApiError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            ApiError::SubmissionFailed(_) => "SUBMISSION_FAILED",
            ApiError::ListFailed(_) => "LIST_FAILED",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidForm(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::SubmissionFailed(_) | ApiError::ListFailed(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Response envelope for this error
    pub fn to_body(&self) -> ApiResponse<()> {
        match self {
            ApiError::InvalidForm(errors) => ApiResponse::invalid(errors.errors().to_vec()),
            ApiError::BadRequest(msg) => ApiResponse::failure(msg.clone()),
            ApiError::PayloadTooLarge => ApiResponse::failure("Request body is too large"),
            ApiError::MethodNotAllowed => ApiResponse::failure(MSG_METHOD_NOT_ALLOWED),
            ApiError::SubmissionFailed(_) => ApiResponse::failure(MSG_SUBMIT_FAILED),
            ApiError::ListFailed(_) => ApiResponse::failure(MSG_LIST_FAILED),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_body())).into_response()
    }
}

impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            tracing::debug!(error = %rejection.body_text(), "Failed to read request body");
            ApiError::BadRequest("Invalid request body".to_string())
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);
    let body_limit = DefaultBodyLimit::max(state.max_body_size());

    Router::new()
        .route(
            "/api/contact",
            get(list_inquiries)
                .post(submit_inquiry)
                .on(MethodFilter::HEAD, method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(body_limit)
        .layer(middleware::from_fn(request_logging_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /api/contact
///
/// The body is parsed as JSON whatever its Content-Type.
pub async fn submit_inquiry(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ContactInquiry>>), ApiError> {
    let body = body?;
    let inquiry = state.submit(&body).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(inquiry).with_message(MSG_CREATED)),
    ))
}

/// GET /api/contact
pub async fn list_inquiries(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ContactInquiry>>>, ApiError> {
    let inquiries = state.list().await?;
    Ok(Json(ApiResponse::success(inquiries)))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// GET /health
///
/// 503 when the store is unreachable.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let store = state.health().await;
    let (status, code) = if store.healthy {
        (HealthStatus::Healthy, StatusCode::OK)
    } else {
        (HealthStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        code,
        Json(HealthResponse {
            status,
            store,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_secs: state.uptime_secs(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }),
    )
}

/// GET /metrics
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    let Some(metrics) = state.metrics() else {
        return (StatusCode::NOT_FOUND, "metrics disabled").into_response();
    };

    match metrics.encode_text() {
        Ok(text) => (
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            )],
            text,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

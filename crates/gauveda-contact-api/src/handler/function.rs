//! Serverless function entry point
//!
//! Platforms that invoke one function per request hand over a
//! [`FunctionEvent`] and expect a [`FunctionResponse`]. The contract matches
//! the axum router: same status codes, same bodies. CORS headers are added to
//! every response here because there is no layer to do it.
//!
//! A `ContactFunction` is built once at cold start and reused across warm
//! invocations, so the store outlives single requests.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use super::middleware::REQUEST_ID_HEADER;
use super::{ApiError, ApiResponse, AppState, MSG_CREATED};

const FALLBACK_BODY: &str =
    r#"{"success":false,"message":"Something went wrong. Please try again later."}"#;

/// Incoming invocation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl FunctionEvent {
    pub fn new(http_method: impl Into<String>) -> Self {
        Self {
            http_method: http_method.into(),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Outgoing result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl FunctionResponse {
    fn new(status: StatusCode, body: String) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
        headers.insert(
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type".to_string(),
        );
        headers.insert(
            "Access-Control-Allow-Methods".to_string(),
            "GET, POST, OPTIONS".to_string(),
        );
        headers.insert("Content-Type".to_string(), "application/json".to_string());

        Self {
            status_code: status.as_u16(),
            headers,
            body,
        }
    }

    /// Response with no body
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, String::new())
    }

    /// Response with a JSON body.
    ///
    /// Falls back to a fixed 500 body if `value` cannot be serialized.
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self::new(status, body),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize function response");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, FALLBACK_BODY.to_string())
            }
        }
    }

    pub fn from_error(err: &ApiError) -> Self {
        Self::json(err.status_code(), &err.to_body())
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Contact endpoint as a serverless function
#[derive(Debug, Clone)]
pub struct ContactFunction {
    state: AppState,
}

impl ContactFunction {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Handle one invocation
    pub async fn handle(&self, event: FunctionEvent) -> FunctionResponse {
        let start = Instant::now();
        let request_id = event
            .header(REQUEST_ID_HEADER)
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let method = event.http_method.to_ascii_uppercase();

        let response = match method.as_str() {
            "OPTIONS" => FunctionResponse::empty(StatusCode::OK),
            "POST" => self.submit(event.body.as_deref().unwrap_or_default()).await,
            "GET" => self.list().await,
            _ => FunctionResponse::from_error(&ApiError::MethodNotAllowed),
        };

        tracing::info!(
            request_id = %request_id,
            method = %method,
            status = response.status_code,
            duration_ms = %start.elapsed().as_millis(),
            "Function invocation completed"
        );

        response.with_header("X-Request-ID", request_id)
    }

    async fn submit(&self, body: &str) -> FunctionResponse {
        if body.len() > self.state.max_body_size() {
            return FunctionResponse::from_error(&ApiError::PayloadTooLarge);
        }

        match self.state.submit(body.as_bytes()).await {
            Ok(inquiry) => FunctionResponse::json(
                StatusCode::CREATED,
                &ApiResponse::success(inquiry).with_message(MSG_CREATED),
            ),
            Err(e) => FunctionResponse::from_error(&e),
        }
    }

    async fn list(&self) -> FunctionResponse {
        match self.state.list().await {
            Ok(inquiries) => FunctionResponse::json(StatusCode::OK, &ApiResponse::success(inquiries)),
            Err(e) => FunctionResponse::from_error(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gauveda_contact_core::{ContactService, MemoryInquiryStore};
    use std::sync::Arc;

    fn function() -> ContactFunction {
        let service = ContactService::new(Arc::new(MemoryInquiryStore::new()));
        ContactFunction::new(AppState::new(service).with_max_body_size(256))
    }

    #[test]
    fn test_event_from_platform_json() {
        let event: FunctionEvent = serde_json::from_str(
            r#"{"httpMethod":"POST","headers":{"Content-Type":"application/json"},"body":"{}"}"#,
        )
        .unwrap();
        assert_eq!(event.http_method, "POST");
        assert_eq!(event.header("content-type"), Some("application/json"));
        assert_eq!(event.body.as_deref(), Some("{}"));

        let event: FunctionEvent = serde_json::from_str(r#"{"httpMethod":"GET"}"#).unwrap();
        assert!(event.headers.is_empty());
        assert!(event.body.is_none());
    }

    #[test]
    fn test_every_response_has_cors_headers() {
        let response = FunctionResponse::from_error(&ApiError::MethodNotAllowed);
        assert_eq!(response.headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(response.headers["Access-Control-Allow-Headers"], "Content-Type");
        assert_eq!(response.headers["Access-Control-Allow-Methods"], "GET, POST, OPTIONS");
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_options_is_empty() {
        let response = function().handle(FunctionEvent::new("OPTIONS")).await;
        assert_eq!(response.status_code, 200);
        assert!(response.body.is_empty());
    }

    #[tokio::test]
    async fn test_missing_body() {
        let response = function().handle(FunctionEvent::new("POST")).await;
        assert_eq!(response.status_code, 400);
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["message"], "Request body is required");
        assert!(body.get("errors").is_none());
    }

    #[tokio::test]
    async fn test_oversized_body() {
        let body = format!(r#"{{"message":"{}"}}"#, "x".repeat(512));
        let response = function()
            .handle(FunctionEvent::new("POST").with_body(body))
            .await;
        assert_eq!(response.status_code, 413);
    }

    #[tokio::test]
    async fn test_request_id_echoed() {
        let response = function()
            .handle(FunctionEvent::new("GET").with_header("X-Request-Id", "fn-7"))
            .await;
        assert_eq!(response.status_code, 200);
        assert_eq!(response.headers["X-Request-ID"], "fn-7");
    }

    #[tokio::test]
    async fn test_head_not_allowed() {
        let response = function().handle(FunctionEvent::new("HEAD")).await;
        assert_eq!(response.status_code, 405);
        let body: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["message"], "Method not allowed");
    }

    #[tokio::test]
    async fn test_lowercase_method() {
        let response = function().handle(FunctionEvent::new("get")).await;
        assert_eq!(response.status_code, 200);
    }
}

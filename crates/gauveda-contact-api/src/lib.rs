//! Gauveda Contact API
//!
//! HTTP and serverless front ends for the contact form pipeline in
//! `gauveda-contact-core`.
//!
//! ## Architecture
//!
//! 1. **Config** (`config`): layered `ServiceConfig` (defaults, TOML file,
//!    environment, command-line flags).
//!
//! 2. **Handler** (`handler`): shared `AppState`, the axum router with its
//!    middleware, and the `ContactFunction` serverless adapter.
//!
//! 3. **Telemetry** (`telemetry`): tracing subscriber set-up and Prometheus
//!    metrics.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gauveda_contact_api::{build_state, create_router, ServiceConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = ServiceConfig::load(None)?;
//! let router = create_router(build_state(&config)?);
//!
//! let listener = tokio::net::TcpListener::bind(config.socket_addr()?).await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod telemetry;

pub use config::{BackendKind, ConfigError, LogFormat, ServiceConfig};
pub use error::StartupError;
pub use handler::{
    create_router, ApiError, ApiResponse, AppState, ContactFunction, FunctionEvent,
    FunctionResponse, HealthResponse, HealthStatus,
};
pub use telemetry::{init_tracing, ContactMetrics};

use gauveda_contact_core::ContactService;
use std::sync::Arc;

/// Open the configured store and assemble the shared state
pub fn build_state(config: &ServiceConfig) -> Result<AppState, StartupError> {
    let store = config.store_backend().open()?;
    tracing::info!(
        backend = store.backend(),
        "Inquiry store opened"
    );

    let mut state = AppState::new(ContactService::new(store))
        .with_max_body_size(config.server.max_body_size);
    if config.metrics.enabled {
        state = state.with_metrics(Arc::new(ContactMetrics::new()?));
    }
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_state_memory() {
        let state = build_state(&ServiceConfig::default()).unwrap();
        assert!(state.metrics().is_some());
        assert_eq!(state.max_body_size(), 64 * 1024);
        assert_eq!(state.service().store().backend(), "memory");
    }

    #[test]
    fn test_build_state_without_metrics() {
        let mut config = ServiceConfig::default();
        config.metrics.enabled = false;
        let state = build_state(&config).unwrap();
        assert!(state.metrics().is_none());
    }

    #[test]
    fn test_build_state_sled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ServiceConfig::default();
        config.store.backend = BackendKind::Sled;
        config.store.data_dir = dir.path().join("inquiries");
        let state = build_state(&config).unwrap();
        assert_eq!(state.service().store().backend(), "sled");
    }
}

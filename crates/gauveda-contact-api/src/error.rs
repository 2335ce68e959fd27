//! Start-up errors

use gauveda_contact_core::StoreError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;

/// Failures while assembling the service
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to open inquiry store: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

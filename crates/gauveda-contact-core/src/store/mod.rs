//! Inquiry storage
//!
//! The [`InquiryStore`] trait owns the collection of persisted inquiries.
//! Stores never re-validate: callers hand them a [`NewInquiry`] that already
//! passed the validator, and the store assigns `id` and `createdAt`.
//!
//! Two implementations ship with the crate:
//! - [`MemoryInquiryStore`]: process-lifetime `Vec`, lost on restart
//! - [`SledInquiryStore`]: embedded sled database on disk

mod durable;
mod memory;

pub use durable::SledInquiryStore;
pub use memory::MemoryInquiryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::model::{ContactInquiry, NewInquiry};

/// Errors raised by inquiry stores
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing medium could not be reached or written
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be decoded
    #[error("Corrupt record at key {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        StoreError::Unavailable(msg.into())
    }
}

impl From<sled::Error> for StoreError {
    fn from(err: sled::Error) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for contact inquiries.
///
/// `create` appends atomically with respect to concurrent callers and
/// `list` returns records in insertion order.
#[async_trait]
pub trait InquiryStore: Send + Sync + fmt::Debug {
    /// Short name of the backend, for health reports and logs
    fn backend(&self) -> &'static str;

    /// Assign identity to a validated record and append it
    async fn create(&self, record: NewInquiry) -> StoreResult<ContactInquiry>;

    /// All stored records, oldest first
    async fn list(&self) -> StoreResult<Vec<ContactInquiry>>;

    /// Number of stored records
    async fn len(&self) -> StoreResult<usize>;

    /// Report backend availability.
    ///
    /// Default implementation counts records and reports any failure.
    async fn health_check(&self) -> StoreHealth {
        match self.len().await {
            Ok(count) => StoreHealth::healthy(self.backend(), count),
            Err(e) => StoreHealth::unhealthy(self.backend(), e.to_string()),
        }
    }
}

/// Health status for a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHealth {
    pub backend: String,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inquiries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StoreHealth {
    pub fn healthy(backend: impl Into<String>, inquiries: usize) -> Self {
        Self {
            backend: backend.into(),
            healthy: true,
            inquiries: Some(inquiries),
            message: None,
        }
    }

    pub fn unhealthy(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
            healthy: false,
            inquiries: None,
            message: Some(message.into()),
        }
    }
}

/// Which store to open at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sled { path: PathBuf },
}

impl StoreBackend {
    /// Open the selected store as a shared handle
    pub fn open(&self) -> StoreResult<Arc<dyn InquiryStore>> {
        match self {
            StoreBackend::Memory => Ok(Arc::new(MemoryInquiryStore::new())),
            StoreBackend::Sled { path } => Ok(Arc::new(SledInquiryStore::open(path)?)),
        }
    }
}

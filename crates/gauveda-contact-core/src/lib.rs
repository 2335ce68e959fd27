//! Gauveda Contact Core
//!
//! Validation and storage of contact inquiries submitted through the
//! Gauveda Global website contact form.
//!
//! ## Architecture
//!
//! 1. **Model** (`model`): the `ContactInquiry` record and the validated
//!    `NewInquiry` that precedes it.
//!
//! 2. **Validation** (`validation`): turns an untyped JSON mapping into a
//!    `NewInquiry` or an ordered list of field errors.
//!
//! 3. **Store** (`store`): the `InquiryStore` trait with an in-memory and a
//!    sled-backed implementation. The store alone assigns `id` and `createdAt`.
//!
//! 4. **Service** (`service`): the submit/list pipeline shared by every
//!    transport adapter.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gauveda_contact_core::{ContactService, MemoryInquiryStore};
//!
//! # async fn run() -> gauveda_contact_core::Result<()> {
//! let service = ContactService::new(Arc::new(MemoryInquiryStore::new()));
//!
//! let body = br#"{"name":"John Doe","email":"john@example.com","message":"I need 500kg of manure for my farm"}"#;
//! let inquiry = service.submit_body(body).await?;
//! assert_eq!(inquiry.name, "John Doe");
//!
//! let all = service.list().await?;
//! assert_eq!(all.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod model;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{ContactError, Result};
pub use model::{ContactInquiry, NewInquiry};
pub use service::ContactService;
pub use store::{
    InquiryStore, MemoryInquiryStore, SledInquiryStore, StoreBackend, StoreError, StoreHealth,
    StoreResult,
};
pub use validation::{parse_payload, FieldError, FieldSpec, ValidationErrors, Validator};

//! Submit/list pipeline shared by every transport adapter

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::{ContactError, Result};
use crate::model::ContactInquiry;
use crate::store::{InquiryStore, StoreHealth};
use crate::validation::{parse_payload, Validator};

/// Validates submissions and hands valid ones to the store.
///
/// Cheap to clone; clones share the same validator and store.
#[derive(Debug, Clone)]
pub struct ContactService {
    validator: Arc<Validator>,
    store: Arc<dyn InquiryStore>,
}

impl ContactService {
    /// Create a service using the contact form schema
    pub fn new(store: Arc<dyn InquiryStore>) -> Self {
        Self::with_validator(Validator::contact_form(), store)
    }

    pub fn with_validator(validator: Validator, store: Arc<dyn InquiryStore>) -> Self {
        Self {
            validator: Arc::new(validator),
            store,
        }
    }

    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    pub fn store(&self) -> &Arc<dyn InquiryStore> {
        &self.store
    }

    /// Parse a raw request body and submit it
    pub async fn submit_body(&self, body: &[u8]) -> Result<ContactInquiry> {
        let payload = parse_payload(body).inspect_err(|e| {
            tracing::debug!(error = %e, "Rejected malformed contact request");
        })?;
        self.submit(&payload).await
    }

    /// Validate a payload and store it.
    ///
    /// Invalid payloads never reach the store.
    pub async fn submit(&self, payload: &Map<String, Value>) -> Result<ContactInquiry> {
        let record = self.validator.validate(payload).map_err(|errors| {
            tracing::debug!(fields = ?errors.fields(), "Contact form failed validation");
            ContactError::from(errors)
        })?;

        let inquiry_type = record.inquiry_type.clone();
        let inquiry = self.store.create(record).await.map_err(|e| {
            tracing::error!(backend = self.store.backend(), error = %e, "Failed to store contact inquiry");
            ContactError::from(e)
        })?;

        tracing::info!(
            inquiry_id = %inquiry.id,
            inquiry_type = inquiry_type.as_deref().unwrap_or("general"),
            "Contact inquiry stored"
        );

        Ok(inquiry)
    }

    /// All stored inquiries, oldest first
    pub async fn list(&self) -> Result<Vec<ContactInquiry>> {
        self.store.list().await.map_err(|e| {
            tracing::error!(backend = self.store.backend(), error = %e, "Failed to list contact inquiries");
            ContactError::from(e)
        })
    }

    pub async fn health(&self) -> StoreHealth {
        self.store.health_check().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewInquiry;
    use crate::store::{MemoryInquiryStore, StoreError, StoreResult};
    use async_trait::async_trait;

    #[derive(Debug)]
    struct UnavailableStore;

    #[async_trait]
    impl InquiryStore for UnavailableStore {
        fn backend(&self) -> &'static str {
            "unavailable"
        }

        async fn create(&self, _record: NewInquiry) -> StoreResult<ContactInquiry> {
            Err(StoreError::unavailable("database offline"))
        }

        async fn list(&self) -> StoreResult<Vec<ContactInquiry>> {
            Err(StoreError::unavailable("database offline"))
        }

        async fn len(&self) -> StoreResult<usize> {
            Err(StoreError::unavailable("database offline"))
        }
    }

    fn memory_service() -> ContactService {
        ContactService::new(Arc::new(MemoryInquiryStore::new()))
    }

    const VALID: &[u8] =
        br#"{"name":"John Doe","email":"john@example.com","message":"I need 500kg of manure for my farm"}"#;

    #[tokio::test]
    async fn test_submit_valid_body() {
        let service = memory_service();
        let inquiry = service.submit_body(VALID).await.unwrap();

        assert_eq!(inquiry.name, "John Doe");
        assert_eq!(service.list().await.unwrap(), vec![inquiry]);
    }

    #[tokio::test]
    async fn test_invalid_submission_not_stored() {
        let service = memory_service();
        let err = service
            .submit_body(br#"{"name":"J","email":"bad","message":"short"}"#)
            .await
            .unwrap_err();

        match err {
            ContactError::Validation(errors) => {
                assert_eq!(errors.fields(), vec!["name", "email", "message"])
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_not_stored() {
        let service = memory_service();
        let err = service.submit_body(b"").await.unwrap_err();
        assert!(matches!(err, ContactError::MalformedRequest(_)));
        assert_eq!(service.store().len().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces() {
        let service = ContactService::new(Arc::new(UnavailableStore));

        let err = service.submit_body(VALID).await.unwrap_err();
        assert!(matches!(err, ContactError::Storage(StoreError::Unavailable(_))));
        assert!(!err.is_client_error());

        assert!(service.list().await.is_err());
        assert!(!service.health().await.healthy);
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let service = memory_service();
        let clone = service.clone();
        clone.submit_body(VALID).await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 1);
    }
}

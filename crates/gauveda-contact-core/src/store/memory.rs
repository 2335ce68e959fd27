//! In-memory inquiry store

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use super::{InquiryStore, StoreError, StoreResult};
use crate::model::{ContactInquiry, NewInquiry};

/// Process-lifetime store backed by a `Vec`.
///
/// All data is lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryInquiryStore {
    records: RwLock<Vec<ContactInquiry>>,
}

impl MemoryInquiryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<ContactInquiry>>> {
        self.records
            .read()
            .map_err(|_| StoreError::unavailable("inquiry lock poisoned"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<ContactInquiry>>> {
        self.records
            .write()
            .map_err(|_| StoreError::unavailable("inquiry lock poisoned"))
    }
}

#[async_trait]
impl InquiryStore for MemoryInquiryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, record: NewInquiry) -> StoreResult<ContactInquiry> {
        let inquiry = ContactInquiry::new(Uuid::new_v4(), record, Utc::now());
        self.write()?.push(inquiry.clone());
        Ok(inquiry)
    }

    async fn list(&self) -> StoreResult<Vec<ContactInquiry>> {
        Ok(self.read()?.clone())
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn record(name: &str) -> NewInquiry {
        NewInquiry {
            name: name.to_string(),
            email: "buyer@example.com".to_string(),
            phone: None,
            message: "Need organic manure for 10 acres".to_string(),
            inquiry_type: None,
            quantity: Some("500kg".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_identity() {
        let store = MemoryInquiryStore::new();
        let before = Utc::now();
        let inquiry = store.create(record("Meera")).await.unwrap();

        assert!(inquiry.created_at >= before);
        assert_eq!(inquiry.fields(), record("Meera"));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemoryInquiryStore::new();
        let first = store.create(record("First")).await.unwrap();
        let second = store.create(record("Second")).await.unwrap();

        assert_ne!(first.id, second.id);
        let all = store.list().await.unwrap();
        assert_eq!(all, vec![first, second]);
    }

    #[tokio::test]
    async fn test_list_is_idempotent() {
        let store = MemoryInquiryStore::new();
        store.create(record("Only")).await.unwrap();

        assert_eq!(store.list().await.unwrap(), store.list().await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_creates_all_land() {
        let store = Arc::new(MemoryInquiryStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store.create(record(&format!("Buyer {}", i))).await.unwrap()
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 32);
        let ids: std::collections::HashSet<_> = all.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), 32);
    }
}

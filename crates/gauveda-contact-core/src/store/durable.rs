//! Sled-backed inquiry store
//!
//! Records live in the `contact_inquiries` tree. Keys are big-endian ids from
//! `Db::generate_id`, which is monotonic across restarts, so iterating the
//! tree yields insertion order. Values are the JSON encoding of the record.

use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

use super::{InquiryStore, StoreError, StoreResult};
use crate::model::{ContactInquiry, NewInquiry};

const TREE_NAME: &str = "contact_inquiries";

/// Durable store on an embedded sled database
#[derive(Debug, Clone)]
pub struct SledInquiryStore {
    db: sled::Db,
    tree: sled::Tree,
}

impl SledInquiryStore {
    /// Open (or create) a store at `path`
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let db = sled::open(path).map_err(|e| {
            StoreError::unavailable(format!("failed to open {}: {}", path.display(), e))
        })?;
        Self::from_db(db)
    }

    /// Open a store that is deleted when dropped
    pub fn temporary() -> StoreResult<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> StoreResult<Self> {
        let tree = db.open_tree(TREE_NAME)?;
        tracing::debug!(records = tree.len(), "Opened sled inquiry store");
        Ok(Self { db, tree })
    }

    fn decode(key: &[u8], value: &[u8]) -> StoreResult<ContactInquiry> {
        serde_json::from_slice(value).map_err(|e| StoreError::Corrupt {
            key: key_label(key),
            reason: e.to_string(),
        })
    }
}

fn key_label(key: &[u8]) -> String {
    match <[u8; 8]>::try_from(key) {
        Ok(bytes) => u64::from_be_bytes(bytes).to_string(),
        Err(_) => format!("{:?}", key),
    }
}

#[async_trait]
impl InquiryStore for SledInquiryStore {
    fn backend(&self) -> &'static str {
        "sled"
    }

    async fn create(&self, record: NewInquiry) -> StoreResult<ContactInquiry> {
        let inquiry = ContactInquiry::new(Uuid::new_v4(), record, Utc::now());
        let value = serde_json::to_vec(&inquiry)
            .map_err(|e| StoreError::unavailable(format!("failed to encode inquiry: {}", e)))?;

        let key = self.db.generate_id()?.to_be_bytes();
        self.tree.insert(key, value)?;
        self.tree.flush_async().await?;

        Ok(inquiry)
    }

    async fn list(&self) -> StoreResult<Vec<ContactInquiry>> {
        self.tree
            .iter()
            .map(|entry| {
                let (key, value) = entry?;
                Self::decode(&key, &value)
            })
            .collect()
    }

    async fn len(&self) -> StoreResult<usize> {
        Ok(self.tree.len())
    }
}

//! Contact inquiry records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A contact form submission that passed validation but has not been stored.
///
/// Holds exactly the recognized form fields; anything else the caller sent
/// was dropped by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInquiry {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inquiry_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

/// A stored contact inquiry.
///
/// `id` and `created_at` are assigned once by the store that persisted the
/// record. There is no way to modify a record afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInquiry {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inquiry_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContactInquiry {
    /// Merge store-generated identity with validated form fields.
    ///
    /// Intended for `InquiryStore` implementations only.
    pub fn new(id: Uuid, record: NewInquiry, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: record.name,
            email: record.email,
            phone: record.phone,
            message: record.message,
            inquiry_type: record.inquiry_type,
            quantity: record.quantity,
            created_at,
        }
    }

    /// The form fields of this record, without the generated identity
    pub fn fields(&self) -> NewInquiry {
        NewInquiry {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            message: self.message.clone(),
            inquiry_type: self.inquiry_type.clone(),
            quantity: self.quantity.clone(),
        }
    }
}

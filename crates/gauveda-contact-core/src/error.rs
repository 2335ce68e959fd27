//! Error types for the contact pipeline
//!
//! Separates caller mistakes (bad form data, unparseable bodies) from
//! server faults (storage, anything unexpected).

use thiserror::Error;

use crate::store::StoreError;
use crate::validation::ValidationErrors;

/// Main error type for contact operations
#[derive(Error, Debug)]
pub enum ContactError {
    /// Form data violated one or more field rules
    #[error("Invalid form data: {0}")]
    Validation(#[from] ValidationErrors),

    /// Request body missing or not parseable as a JSON object
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Backing store failed
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// Anything else not attributable to caller input
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl ContactError {
    /// Create a malformed request error
    pub fn malformed(msg: impl Into<String>) -> Self {
        ContactError::MalformedRequest(msg.into())
    }

    /// Create an unexpected error
    pub fn unexpected(msg: impl Into<String>) -> Self {
        ContactError::Unexpected(msg.into())
    }

    /// Check if this error was caused by the caller (vs a server fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ContactError::Validation(_) | ContactError::MalformedRequest(_)
        )
    }
}

/// Result type alias for contact operations
pub type Result<T> = std::result::Result<T, ContactError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FieldError;

    #[test]
    fn test_error_display() {
        let err = ContactError::malformed("Request body is required");
        assert_eq!(err.to_string(), "Malformed request: Request body is required");

        let err = ContactError::from(StoreError::unavailable("disk gone"));
        assert_eq!(err.to_string(), "Storage unavailable: disk gone");
    }

    #[test]
    fn test_is_client_error() {
        let invalid = ValidationErrors::from(vec![FieldError::new("name", "invalid_type", "Required")]);
        assert!(ContactError::from(invalid).is_client_error());
        assert!(ContactError::malformed("bad").is_client_error());
        assert!(!ContactError::from(StoreError::unavailable("x")).is_client_error());
        assert!(!ContactError::unexpected("boom").is_client_error());
    }
}

//! Contact form validation
//!
//! Turns an untyped JSON mapping into a [`NewInquiry`] or an ordered list of
//! field errors. Validation is pure: nothing is stored or logged here.
//!
//! Fields are checked in form order (name, email, phone, message,
//! inquiryType, quantity) and each field reports at most one error, from the
//! first rule it fails. Unknown fields are dropped without error. Values are
//! never trimmed or otherwise rewritten.

pub mod rules;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::error::ContactError;
use crate::model::NewInquiry;
use rules::{EmailSyntax, MinLength, StringRule, CODE_INVALID_TYPE};

/// A single violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field as sent by the caller
    pub field: String,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Ordered set of field errors from one validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(transparent)]
#[error("{}", describe(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the offending fields, in report order
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

/// Declaration of one form field: presence plus an ordered list of rules
pub struct FieldSpec {
    field: &'static str,
    required: bool,
    rules: Vec<Box<dyn StringRule>>,
}

impl FieldSpec {
    /// A field that must be present
    pub fn required(field: &'static str) -> Self {
        Self {
            field,
            required: true,
            rules: Vec::new(),
        }
    }

    /// A field that may be absent
    pub fn optional(field: &'static str) -> Self {
        Self {
            field,
            required: false,
            rules: Vec::new(),
        }
    }

    /// Append a rule, evaluated after those already added
    pub fn rule(mut self, rule: impl StringRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn name(&self) -> &'static str {
        self.field
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Evaluate the field's value (`None` when the key is absent).
    ///
    /// Returns the accepted string, `Ok(None)` for an absent optional field,
    /// or the first violated constraint.
    pub fn evaluate(&self, value: Option<&Value>) -> Result<Option<String>, FieldError> {
        match value {
            None if self.required => Err(FieldError::new(self.field, CODE_INVALID_TYPE, "Required")),
            None => Ok(None),
            Some(Value::String(s)) => {
                if let Some(rule) = self.rules.iter().find(|rule| !rule.check(s)) {
                    return Err(FieldError::new(self.field, rule.code(), rule.message()));
                }
                Ok(Some(s.clone()))
            }
            Some(other) => Err(FieldError::new(
                self.field,
                CODE_INVALID_TYPE,
                format!("Expected string, received {}", json_type_name(other)),
            )),
        }
    }
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("field", &self.field)
            .field("required", &self.required)
            .field("rules", &self.rules)
            .finish()
    }
}

/// Validator for the contact form schema
#[derive(Debug)]
pub struct Validator {
    name: FieldSpec,
    email: FieldSpec,
    phone: FieldSpec,
    message: FieldSpec,
    inquiry_type: FieldSpec,
    quantity: FieldSpec,
}

impl Validator {
    /// The contact form schema used by the website
    pub fn contact_form() -> Self {
        Self {
            name: FieldSpec::required("name")
                .rule(MinLength::new(2, "Name must be at least 2 characters")),
            email: FieldSpec::required("email")
                .rule(EmailSyntax::new("Please enter a valid email address")),
            phone: FieldSpec::optional("phone"),
            message: FieldSpec::required("message")
                .rule(MinLength::new(10, "Message must be at least 10 characters")),
            inquiry_type: FieldSpec::optional("inquiryType"),
            quantity: FieldSpec::optional("quantity"),
        }
    }

    /// Field declarations in evaluation order
    pub fn fields(&self) -> [&FieldSpec; 6] {
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.message,
            &self.inquiry_type,
            &self.quantity,
        ]
    }

    /// Validate a payload, collecting one error per offending field
    pub fn validate(&self, payload: &Map<String, Value>) -> Result<NewInquiry, ValidationErrors> {
        let mut errors = Vec::new();
        let mut take = |spec: &FieldSpec| match spec.evaluate(payload.get(spec.name())) {
            Ok(value) => value,
            Err(error) => {
                errors.push(error);
                None
            }
        };

        let name = take(&self.name);
        let email = take(&self.email);
        let phone = take(&self.phone);
        let message = take(&self.message);
        let inquiry_type = take(&self.inquiry_type);
        let quantity = take(&self.quantity);

        match (name, email, message) {
            (Some(name), Some(email), Some(message)) if errors.is_empty() => Ok(NewInquiry {
                name,
                email,
                phone,
                message,
                inquiry_type,
                quantity,
            }),
            _ => Err(ValidationErrors(errors)),
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::contact_form()
    }
}

/// Parse a raw request body into the untyped mapping the validator expects
pub fn parse_payload(body: &[u8]) -> crate::Result<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ContactError::malformed("Request body is required"));
    }

    let value: Value = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Request body is not valid JSON");
        ContactError::malformed("Invalid JSON")
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ContactError::malformed("Request body must be a JSON object")),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("test payload must be an object, got {}", other),
        }
    }

    #[test]
    fn test_valid_minimal_payload() {
        let validator = Validator::contact_form();
        let record = validator
            .validate(&payload(json!({
                "name": "John Doe",
                "email": "john@example.com",
                "message": "I need 500kg of manure for my farm"
            })))
            .unwrap();

        assert_eq!(record.name, "John Doe");
        assert_eq!(record.email, "john@example.com");
        assert_eq!(record.message, "I need 500kg of manure for my farm");
        assert!(record.phone.is_none());
        assert!(record.inquiry_type.is_none());
        assert!(record.quantity.is_none());
    }

    #[test]
    fn test_valid_full_payload() {
        let validator = Validator::contact_form();
        let record = validator
            .validate(&payload(json!({
                "name": "Ravi",
                "email": "ravi@farm.in",
                "phone": "+91 77580 77875",
                "message": "Please quote for cow dung manure",
                "inquiryType": "bulk",
                "quantity": "2 tonnes"
            })))
            .unwrap();

        assert_eq!(record.phone.as_deref(), Some("+91 77580 77875"));
        assert_eq!(record.inquiry_type.as_deref(), Some("bulk"));
        assert_eq!(record.quantity.as_deref(), Some("2 tonnes"));
    }

    #[test]
    fn test_all_bad_fields_reported_in_order() {
        let validator = Validator::contact_form();
        let errors = validator
            .validate(&payload(json!({
                "name": "J",
                "email": "bad",
                "message": "short"
            })))
            .unwrap_err();

        assert_eq!(errors.fields(), vec!["name", "email", "message"]);
        assert_eq!(errors.errors()[0].message, "Name must be at least 2 characters");
        assert_eq!(errors.errors()[1].message, "Please enter a valid email address");
        assert_eq!(errors.errors()[2].message, "Message must be at least 10 characters");
    }

    #[test]
    fn test_missing_required_fields() {
        let validator = Validator::contact_form();
        let errors = validator.validate(&Map::new()).unwrap_err();

        assert_eq!(errors.len(), 3);
        assert!(errors
            .errors()
            .iter()
            .all(|e| e.code == CODE_INVALID_TYPE && e.message == "Required"));
    }

    #[test]
    fn test_wrong_type_reported_once() {
        let validator = Validator::contact_form();
        let errors = validator
            .validate(&payload(json!({
                "name": 42,
                "email": "john@example.com",
                "message": "I need 500kg of manure for my farm"
            })))
            .unwrap_err();

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors()[0].field, "name");
        assert_eq!(errors.errors()[0].code, CODE_INVALID_TYPE);
        assert_eq!(errors.errors()[0].message, "Expected string, received number");
    }

    #[test]
    fn test_null_optional_field_is_rejected() {
        let validator = Validator::contact_form();
        let errors = validator
            .validate(&payload(json!({
                "name": "John Doe",
                "email": "john@example.com",
                "message": "I need 500kg of manure for my farm",
                "phone": null
            })))
            .unwrap_err();

        assert_eq!(errors.fields(), vec!["phone"]);
        assert_eq!(errors.errors()[0].message, "Expected string, received null");
    }

    #[test]
    fn test_unknown_fields_dropped() {
        let validator = Validator::contact_form();
        let record = validator
            .validate(&payload(json!({
                "name": "John Doe",
                "email": "john@example.com",
                "message": "I need 500kg of manure for my farm",
                "foo": "bar",
                "id": "caller-chosen",
                "createdAt": "2020-01-01T00:00:00Z"
            })))
            .unwrap();

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("foo").is_none());
        assert!(json.get("id").is_none());
        assert!(json.get("createdAt").is_none());
    }

    #[test]
    fn test_whitespace_optional_kept_verbatim() {
        let validator = Validator::contact_form();
        let record = validator
            .validate(&payload(json!({
                "name": "  John  ",
                "email": "john@example.com",
                "message": "I need 500kg of manure for my farm",
                "quantity": "   "
            })))
            .unwrap();

        assert_eq!(record.name, "  John  ");
        assert_eq!(record.quantity.as_deref(), Some("   "));
    }

    #[test]
    fn test_parse_payload() {
        assert!(parse_payload(br#"{"name":"x"}"#).is_ok());

        let err = parse_payload(b"").unwrap_err();
        assert_eq!(err.to_string(), "Malformed request: Request body is required");

        let err = parse_payload(b"  \n").unwrap_err();
        assert!(matches!(err, ContactError::MalformedRequest(_)));

        let err = parse_payload(b"{not json").unwrap_err();
        assert!(matches!(err, ContactError::MalformedRequest(ref m) if m == "Invalid JSON"));

        let err = parse_payload(b"[1, 2]").unwrap_err();
        assert!(err.to_string().contains("must be a JSON object"));
    }

    #[test]
    fn test_validation_errors_display() {
        let errors = ValidationErrors::from(vec![
            FieldError::new("name", "invalid_type", "Required"),
            FieldError::new("email", "invalid_string", "Please enter a valid email address"),
        ]);
        assert_eq!(
            errors.to_string(),
            "name: Required; email: Please enter a valid email address"
        );
    }

    #[test]
    fn test_validation_errors_serialize_as_list() {
        let errors = ValidationErrors::from(vec![FieldError::new("name", "invalid_type", "Required")]);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            json!([{ "field": "name", "code": "invalid_type", "message": "Required" }])
        );
    }
}

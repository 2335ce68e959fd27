//! String rules applied to contact form fields
//!
//! Each rule checks one constraint on a field that is already known to be a
//! string. Rules are evaluated in declaration order and the first failure is
//! the one reported for that field.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Error code for a required field that is absent or holds a non-string value
pub const CODE_INVALID_TYPE: &str = "invalid_type";
/// Error code for a string shorter than its minimum
pub const CODE_TOO_SMALL: &str = "too_small";
/// Error code for a string that fails a format check
pub const CODE_INVALID_STRING: &str = "invalid_string";

/// A constraint on a string field value
pub trait StringRule: Send + Sync + fmt::Debug {
    /// Machine-readable code reported when the rule fails
    fn code(&self) -> &'static str;

    /// Human-readable message reported when the rule fails
    fn message(&self) -> &str;

    /// Returns true when the value satisfies the rule
    fn check(&self, value: &str) -> bool;
}

/// Minimum length, counted in UTF-16 code units as browsers count it
#[derive(Debug, Clone)]
pub struct MinLength {
    min: usize,
    message: String,
}

impl MinLength {
    pub fn new(min: usize, message: impl Into<String>) -> Self {
        Self {
            min,
            message: message.into(),
        }
    }
}

impl StringRule for MinLength {
    fn code(&self) -> &'static str {
        CODE_TOO_SMALL
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn check(&self, value: &str) -> bool {
        value.encode_utf16().count() >= self.min
    }
}

/// Email address syntax
#[derive(Debug, Clone)]
pub struct EmailSyntax {
    message: String,
}

impl EmailSyntax {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl StringRule for EmailSyntax {
    fn code(&self) -> &'static str {
        CODE_INVALID_STRING
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn check(&self, value: &str) -> bool {
        is_valid_email(value)
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
            .expect("email pattern is a valid regex")
    })
}

/// Check email syntax.
///
/// The local part may not start with a dot and the address may not contain
/// consecutive dots; the regex crate has no lookahead, so those two are
/// checked outside the pattern.
pub fn is_valid_email(value: &str) -> bool {
    !value.starts_with('.') && !value.contains("..") && email_pattern().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_length_counts_utf16_units() {
        let rule = MinLength::new(2, "too short");
        assert!(!rule.check(""));
        assert!(!rule.check("J"));
        assert!(rule.check("Jo"));
        // two code units, six bytes
        assert!(rule.check("गौ"));
        assert!(!MinLength::new(3, "x").check("गौ"));
    }

    #[test]
    fn test_min_length_astral_characters_count_twice() {
        // one char outside the BMP is a surrogate pair
        assert!(MinLength::new(2, "x").check("𝓐"));
        assert!(!MinLength::new(3, "x").check("𝓐"));
        assert!(MinLength::new(10, "x").check("😀😀😀😀😀"));
        assert!(!MinLength::new(10, "x").check("😀😀😀😀"));
    }

    #[test]
    fn test_valid_emails() {
        for email in [
            "john@example.com",
            "hello@gauvedaglobal.com",
            "first.last+orders@farm.co.in",
            "o'brien@example.ie",
            "a_b-c@sub-domain.example.org",
        ] {
            assert!(is_valid_email(email), "{} should be valid", email);
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in [
            "",
            "bad",
            "no-at-sign.com",
            "@example.com",
            "john@",
            "john@example",
            "john@example.c",
            ".john@example.com",
            "john..doe@example.com",
            "john.@example.com",
            "john@-example.com",
            "john doe@example.com",
        ] {
            assert!(!is_valid_email(email), "{} should be invalid", email);
        }
    }

    #[test]
    fn test_rule_codes() {
        assert_eq!(MinLength::new(1, "m").code(), CODE_TOO_SMALL);
        assert_eq!(EmailSyntax::new("m").code(), CODE_INVALID_STRING);
        assert_eq!(EmailSyntax::new("bad email").message(), "bad email");
    }
}

//! Error types for inquiry-desk
//!
//! All fallible operations in the crate return [`Result`], built on the
//! single [`InquiryDeskError`] enum. Validation problems carry a per-field
//! [`ValidationErrors`] map so callers can render messages next to the
//! offending input; allocation failures are kept distinct from validation
//! because they indicate contention rather than bad input.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Result type alias using [`InquiryDeskError`]
pub type Result<T> = std::result::Result<T, InquiryDeskError>;

/// The error type for all inquiry-desk operations
#[derive(Debug, Error)]
pub enum InquiryDeskError {
    /// Input failed per-field validation; never retried internally
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    /// The addressed ticket does not exist
    #[error("Ticket not found: {id}")]
    TicketNotFound { id: String },

    /// Ticket number allocation exhausted its retry budget
    #[error("ticket number allocation for '{prefix}' failed after {attempts} attempts")]
    AllocationFailed { prefix: String, attempts: u32 },

    /// The per-day sequence ran past 9999; surfaced instead of wrapping
    #[error("ticket number sequence overflow for '{prefix}': daily capacity exhausted")]
    NumberOverflow { prefix: String },

    /// Storage-level uniqueness violation on a ticket number
    ///
    /// Internal retry trigger for the create path; callers see
    /// [`InquiryDeskError::AllocationFailed`] once the budget is spent.
    #[error("duplicate ticket number: {number}")]
    DuplicateNumber { number: String },

    /// A day lock could not be acquired within the wait budget
    #[error("timed out waiting for lock: {path}")]
    LockTimeout { path: String },

    /// IO operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Custom error with a message
    #[error("{0}")]
    Custom(String),
}

impl InquiryDeskError {
    /// Create a custom error from any displayable value
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    /// Create a validation error for a single field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::new();
        errors.add(field, message);
        Self::Validation(errors)
    }

    /// Whether this error is recoverable by fixing caller input
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this error came out of the number-allocation path
    #[must_use]
    pub const fn is_allocation_failure(&self) -> bool {
        matches!(
            self,
            Self::AllocationFailed { .. } | Self::NumberOverflow { .. }
        )
    }
}

/// Per-field validation failures, keyed by field name
///
/// Fields are kept in a sorted map so rendered output is deterministic;
/// serializes as the plain field→messages map for machine-readable
/// surfaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Create an empty set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure message for a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// True when no failures have been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether a specific field has failures
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Messages recorded for a field, if any
    #[must_use]
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Iterate over `(field, messages)` pairs in field order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Consume into the final error, or `Ok(())` when empty
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(InquiryDeskError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_names_the_field() {
        let err = InquiryDeskError::field("customer_email", "is required");
        assert!(err.is_validation());
        match err {
            InquiryDeskError::Validation(errors) => {
                assert!(errors.contains("customer_email"));
                assert_eq!(
                    errors.messages("customer_email").unwrap(),
                    &["is required".to_string()]
                );
            },
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_errors_display_is_deterministic() {
        let mut errors = ValidationErrors::new();
        errors.add("subject", "is required");
        errors.add("body", "is required");
        // BTreeMap ordering: body before subject
        assert_eq!(errors.to_string(), "body: is required; subject: is required");
    }

    #[test]
    fn test_into_result_empty_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_allocation_failures_are_not_validation() {
        let err = InquiryDeskError::AllocationFailed {
            prefix: "INQ-20250115-".to_string(),
            attempts: 5,
        };
        assert!(err.is_allocation_failure());
        assert!(!err.is_validation());

        let overflow = InquiryDeskError::NumberOverflow {
            prefix: "INQ-20250115-".to_string(),
        };
        assert!(overflow.is_allocation_failure());
    }
}

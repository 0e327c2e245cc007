//! Field-level input checks
//!
//! Limits carried over from the intake form contract: names and emails up
//! to 100 characters, order numbers up to 50, subjects up to 200. Checks
//! accumulate into a [`ValidationErrors`] map so a caller sees every
//! problem at once instead of the first.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationErrors;

/// Maximum customer name length
pub const CUSTOMER_NAME_MAX: usize = 100;
/// Maximum customer email length
pub const CUSTOMER_EMAIL_MAX: usize = 100;
/// Maximum order number length
pub const ORDER_NUMBER_MAX: usize = 50;
/// Maximum message subject length
pub const SUBJECT_MAX: usize = 200;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"));

/// Require a non-empty value
pub fn require(errors: &mut ValidationErrors, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.add(field, "is required");
    }
}

/// Enforce a maximum length in characters
pub fn max_chars(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("must not exceed {max} characters"));
    }
}

/// Check that a value looks like an email address
pub fn email_shape(errors: &mut ValidationErrors, field: &str, value: &str) {
    if !EMAIL_RE.is_match(value) {
        errors.add(field, "must be a valid email address");
    }
}

/// Treat whitespace-only optional input as absent
#[must_use]
pub fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

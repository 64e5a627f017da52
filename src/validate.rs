//! External validation interface.
//!
//! The store never defines a schema of its own; a [`Validator`] is
//! supplied by the caller and invoked opportunistically after writes.
//! Failures are warnings, not rejections — a partially invalid
//! configuration can still be surfaced upstream.

use crate::Path;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One schema failure at a path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Where the failure occurred.
    pub path: Path,
    /// Human-readable description.
    pub message: String,
}

impl ValidationIssue {
    /// Create an issue.
    pub fn new(path: Path, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The outcome of validating a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the snapshot passed validation.
    #[serde(rename = "isValid")]
    pub is_valid: bool,
    /// The failures, empty when valid.
    pub errors: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// A passing report.
    #[inline]
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// A failing report carrying the given issues.
    #[inline]
    pub fn invalid(errors: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::valid()
    }
}

/// External schema validator consumed by the store.
pub trait Validator: Send + Sync {
    /// Validate a whole snapshot.
    fn validate(&self, tree: &Value) -> ValidationReport;
}

impl<F> Validator for F
where
    F: Fn(&Value) -> ValidationReport + Send + Sync,
{
    fn validate(&self, tree: &Value) -> ValidationReport {
        self(tree)
    }
}

/// Detect a value shaped like a serialized [`ValidationReport`].
///
/// An object carrying both an error list and a validity flag is almost
/// certainly a validation result being fed back in as state; the store
/// rejects such writes outright.
pub fn looks_like_report(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.get("errors").is_some_and(Value::is_array)
        && obj.get("isValid").is_some_and(Value::is_boolean)
}

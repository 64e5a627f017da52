//! Error types for canopy-state operations.
//!
//! Public store methods never surface these directly; they log and report
//! failure through boolean returns. The typed errors exist for the fallible
//! internals (`set_at_path`, `apply_changes`) and their tests.

use crate::Path;
use thiserror::Error;

/// Result type alias for canopy-state operations.
pub type StateResult<T> = Result<T, StateError>;

/// Errors that can occur while mutating or rebuilding a configuration tree.
#[derive(Debug, Error)]
pub enum StateError {
    /// A node had the wrong type for the requested operation.
    ///
    /// Raised when a key path tries to descend through an array (key paths
    /// address object members only) and when a non-object is offered as a
    /// whole tree.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        /// The deepest path reached before the mismatch.
        path: Path,
        /// The expected node type.
        expected: &'static str,
        /// The node type actually found.
        found: &'static str,
    },

    /// A change record could not be applied to the given tree.
    #[error("invalid change record: {message}")]
    InvalidRecord {
        /// Description of what went wrong.
        message: String,
    },
}

impl StateError {
    /// Create a type mismatch error.
    #[inline]
    pub fn type_mismatch(path: Path, expected: &'static str, found: &'static str) -> Self {
        StateError::TypeMismatch {
            path,
            expected,
            found,
        }
    }

    /// Create an invalid record error.
    #[inline]
    pub fn invalid_record(message: impl Into<String>) -> Self {
        StateError::InvalidRecord {
            message: message.into(),
        }
    }
}

/// Get the type name of a JSON value.
#[inline]
pub fn value_type_name(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

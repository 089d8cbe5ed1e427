use serde::{Deserialize, Serialize};

/// Error body produced by the service's web framework: `{"detail": ...}`.
///
/// `detail` is a string for application errors and a list of objects for
/// request validation failures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// The error payload.
    pub detail: serde_json::Value,
}

impl ErrorDetail {
    /// A human-readable rendering of `detail`.
    pub fn message(&self) -> String {
        match &self.detail {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

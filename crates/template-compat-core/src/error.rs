//! Error types for running passes over a file tree.
//!
//! Problems found *in* the template source are diagnostics, not errors; see
//! [`crate::diagnostics`]. A `CompileError` means the input could not be
//! processed at all.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// JSON (de)serialization error (malformed input or invalid tree shape).
    JsonParseError,
    /// The tree nests deeper than the configured limit.
    DepthExceeded,
    /// A pass was scheduled before a pass it must run after.
    PassOrdering,
    /// Every node id has been handed out.
    NodeIdsExhausted,
}

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("JSON (de)serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Tree depth {depth} in {path} exceeds the limit of {max_depth}")]
    DepthExceeded {
        path: String,
        depth: usize,
        max_depth: usize,
    },

    #[error("Pass `{pass}` must run after `{requires}`, which is not scheduled before it")]
    PassOrdering {
        pass: &'static str,
        requires: &'static str,
    },

    #[error("No node ids left to hand out")]
    NodeIdsExhausted,
}

impl CompileError {
    /// Returns the stable error code for this error variant.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CompileError::JsonError(_) => ErrorCode::JsonParseError,
            CompileError::DepthExceeded { .. } => ErrorCode::DepthExceeded,
            CompileError::PassOrdering { .. } => ErrorCode::PassOrdering,
            CompileError::NodeIdsExhausted => ErrorCode::NodeIdsExhausted,
        }
    }

    /// Produces a structured JSON error.
    ///
    /// Format: `{"code": "...", "message": "..."}`
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pass_ordering_message() {
        let err = CompileError::PassOrdering {
            pass: "restore-compiler-checks",
            requires: "resolve-globals",
        };
        assert_eq!(
            err.to_string(),
            "Pass `restore-compiler-checks` must run after `resolve-globals`, which is not scheduled before it"
        );
        assert_eq!(err.to_json()["code"], json!("pass_ordering"));
    }

    #[test]
    fn test_json_error_code() {
        let err: CompileError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.error_code(), ErrorCode::JsonParseError);
    }
}

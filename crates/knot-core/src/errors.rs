//! Structured error types shared across the knot crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`KnotError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, degrees, ports, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for diagram generation and resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum KnotError {
    /// Multigraph adapter misuse (unknown ids, invalid endpoints).
    #[error("graph error: {0}")]
    Graph(ErrorInfo),
    /// Malformed input handed to an operation.
    #[error("precondition violated: {0}")]
    Precondition(ErrorInfo),
    /// Internal consistency check failed after an operation completed.
    #[error("invariant violated: {0}")]
    Invariant(ErrorInfo),
    /// A random construction dead-ended; the caller is expected to retry.
    #[error("attempt rejected: {0}")]
    Rejected(ErrorInfo),
    /// The configured attempt cap was reached before a diagram was accepted.
    #[error("attempts exhausted: {0}")]
    Exhausted(ErrorInfo),
    /// The requested operation is a reserved extension point.
    #[error("unimplemented: {0}")]
    Unimplemented(ErrorInfo),
    /// Configuration loading errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl KnotError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            KnotError::Graph(info)
            | KnotError::Precondition(info)
            | KnotError::Invariant(info)
            | KnotError::Rejected(info)
            | KnotError::Exhausted(info)
            | KnotError::Unimplemented(info)
            | KnotError::Config(info)
            | KnotError::Serde(info) => info,
        }
    }

    /// Returns `true` when the error is an expected probabilistic rejection.
    pub fn is_rejection(&self) -> bool {
        matches!(self, KnotError::Rejected(_))
    }

    /// Adds a context entry to the payload regardless of the error family.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        let map = |info: ErrorInfo| info.with_context(key, value);
        match self {
            KnotError::Graph(info) => KnotError::Graph(map(info)),
            KnotError::Precondition(info) => KnotError::Precondition(map(info)),
            KnotError::Invariant(info) => KnotError::Invariant(map(info)),
            KnotError::Rejected(info) => KnotError::Rejected(map(info)),
            KnotError::Exhausted(info) => KnotError::Exhausted(map(info)),
            KnotError::Unimplemented(info) => KnotError::Unimplemented(map(info)),
            KnotError::Config(info) => KnotError::Config(map(info)),
            KnotError::Serde(info) => KnotError::Serde(map(info)),
        }
    }
}

//! Error handling utilities for the tool servers
//!
//! Two layers of errors exist:
//!
//! - [`ToolError`] is what a tool handler returns. Expected failures (access
//!   denial, missing files, rejected allow-list edits) are reported back to the
//!   caller inside the `result` payload so the server keeps running.
//! - [`ProtocolError`] is a JSON-RPC level error object (`code` + `message`).
//!   Parse failures, unknown methods, bad parameters and unexpected I/O end up
//!   here.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// JSON-RPC error codes used on the wire
pub mod codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    /// Implementation-defined server error, used for unexpected storage/OS failures
    pub const IO_FAILURE: i64 = -32000;
}

/// Failure of a single tool invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Protected entry: {0}")]
    ProtectedEntry(String),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("IO error: {0}")]
    IoFailure(String),
}

impl ToolError {
    /// Taxonomy name reported to callers
    pub fn code(&self) -> &'static str {
        match self {
            ToolError::AccessDenied(_) => "AccessDenied",
            ToolError::NotFound(_) => "NotFound",
            ToolError::AlreadyExists(_) => "AlreadyExists",
            ToolError::ProtectedEntry(_) => "ProtectedEntry",
            ToolError::DuplicateEntry(_) => "DuplicateEntry",
            ToolError::InvalidParameters(_) => "InvalidParameters",
            ToolError::IoFailure(_) => "IOFailure",
        }
    }

    /// Whether this failure is part of normal operation and belongs in the result payload
    pub fn is_expected(&self) -> bool {
        !matches!(
            self,
            ToolError::InvalidParameters(_) | ToolError::IoFailure(_)
        )
    }

    /// The `{"error": {...}}` payload returned as a tool result
    pub fn to_payload(&self) -> Value {
        json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        })
    }
}

/// A JSON-RPC error object
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message} ({code})")]
pub struct ProtocolError {
    pub code: i64,
    pub message: String,
}

impl ProtocolError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn parse_failure(message: impl Into<String>) -> Self {
        Self::new(codes::PARSE_ERROR, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(codes::INVALID_REQUEST, message)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(codes::METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(codes::INVALID_PARAMS, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL_ERROR, message)
    }
}

impl From<ToolError> for ProtocolError {
    fn from(err: ToolError) -> Self {
        match &err {
            ToolError::InvalidParameters(msg) => ProtocolError::invalid_params(msg.clone()),
            ToolError::IoFailure(_) => ProtocolError::new(codes::IO_FAILURE, err.to_string()),
            _ => ProtocolError::internal(err.to_string()),
        }
    }
}

/// Type alias for tool handler results
pub type ToolResult<T = Value> = Result<T, ToolError>;

/// Trait for converting errors into the tool taxonomy
pub trait IntoToolError {
    fn into_tool_error(self, context: &str) -> ToolError;
}

impl IntoToolError for std::io::Error {
    fn into_tool_error(self, context: &str) -> ToolError {
        match self.kind() {
            std::io::ErrorKind::NotFound => ToolError::NotFound(context.to_string()),
            std::io::ErrorKind::AlreadyExists => ToolError::AlreadyExists(context.to_string()),
            _ => ToolError::IoFailure(format!("{}: {}", context, self)),
        }
    }
}

impl IntoToolError for serde_json::Error {
    fn into_tool_error(self, context: &str) -> ToolError {
        ToolError::IoFailure(format!("{}: invalid JSON: {}", context, self))
    }
}

/// Extension trait for Result types to convert to tool errors
///
/// # Example
///
/// ```rust,ignore
/// use gateway_common::ResultExt;
///
/// let text = tokio::fs::read_to_string(&path).await.to_tool_err(&path.display().to_string())?;
/// ```
pub trait ResultExt<T> {
    fn to_tool_err(self, context: &str) -> Result<T, ToolError>;
}

impl<T, E: IntoToolError> ResultExt<T> for Result<T, E> {
    fn to_tool_err(self, context: &str) -> Result<T, ToolError> {
        self.map_err(|e| e.into_tool_error(context))
    }
}

//! Result helpers for tool responses
//!
//! Tool handlers return plain JSON values. These helpers replace the common
//! pattern:
//!
//! ```rust,ignore
//! let value = serde_json::to_value(&data)
//!     .map_err(|e| ToolError::IoFailure(e.to_string()))?;
//! Ok(value)
//! ```

use serde::Serialize;

use crate::error::{ToolError, ToolResult};

/// Create a successful JSON response from any serializable data
pub fn json_success<T: Serialize>(data: &T) -> ToolResult {
    serde_json::to_value(data)
        .map_err(|e| ToolError::IoFailure(format!("failed to serialize response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_json_success() {
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };
        let result = json_success(&data).unwrap();
        assert_eq!(result["name"], "test");
        assert_eq!(result["value"], 42);
    }
}

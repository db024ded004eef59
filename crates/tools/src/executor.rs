//! Tool Result
//!
//! The uniform outcome of a tool invocation. Tools never raise past the
//! registry boundary; every fault is folded into `ToolResult::err`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a tool execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the execution was successful
    pub success: bool,
    /// Payload (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    pub fn ok(data: impl Into<Value>) -> Self {
        Self {
            success: true,
            data: Some(data.into()),
            error: None,
        }
    }

    /// Create a successful result from any serializable value.
    ///
    /// A value that cannot be represented as JSON becomes an error result.
    pub fn ok_json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(format!("Failed to serialize tool output: {}", e)),
        }
    }

    /// Create an error result
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    /// Convert to string for LLM consumption
    pub fn to_content(&self) -> String {
        if !self.success {
            return format!(
                "Error: {}",
                self.error.as_deref().unwrap_or("Unknown error")
            );
        }
        match &self.data {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => {
                serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string())
            }
        }
    }
}

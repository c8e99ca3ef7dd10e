//! Tool manifest and function-call types.
//!
//! A tool manifest is the JSON array of [`ToolDefinition`]s a caller hands
//! to the encoder; a [`FunctionCall`] is what the model emits when it
//! decides to use one of them.

use serde::{Deserialize, Serialize};

/// A tool definition shown to the model so it knows what it can call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    #[serde(default)]
    pub description: String,

    /// JSON Schema describing the tool's parameters
    #[serde(default)]
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Parameter names listed as required by the schema.
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(serde_json::Value::as_array)
            .map(|names| names.iter().filter_map(serde_json::Value::as_str).collect())
            .unwrap_or_default()
    }
}

/// A function call: tool name plus its arguments serialized as JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the tool to invoke
    pub name: String,

    /// Arguments as a JSON string
    pub arguments: String,
}

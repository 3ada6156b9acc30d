//! Tool trait definition.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Definition of a tool exposed to the inference model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub parameters: Value,
}

/// What a tool action produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    Text(String),
    /// Serialized to JSON text before it reaches the caller.
    Structured(Value),
}

impl ToolOutput {
    pub fn into_text(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Structured(v) => serde_json::to_string(&v).unwrap_or_else(|_| v.to_string()),
        }
    }
}

impl From<String> for ToolOutput {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for ToolOutput {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Value> for ToolOutput {
    fn from(v: Value) -> Self {
        Self::Structured(v)
    }
}

/// A callable capability the agent may invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (used in function calls). Unique within a registry.
    fn name(&self) -> &str;

    /// Name shown in the host UI.
    fn display_name(&self) -> &str {
        self.name()
    }

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema (draft-04) for the tool's parameters.
    fn parameters_schema(&self) -> Value;

    /// Execute the tool with already-validated arguments.
    async fn execute(&self, args: Value) -> Result<ToolOutput>;

    /// Short notification text for this call; empty suppresses the notification.
    fn format_message(&self, _args: &Value) -> Result<String> {
        Ok(String::new())
    }

    /// Whether the tool is offered for the current prompt. Evaluated on every
    /// prompt-construction cycle.
    fn should_register(&self) -> bool {
        true
    }

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            display_name: self.display_name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

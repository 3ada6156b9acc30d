//! Tool execution boundary.
//!
//! `invoke` reports lookup and validation failures as `ToolError`; anything
//! that goes wrong inside an action comes back as an ordinary result whose
//! output starts with `Exception:`. `invoke_for_host` flattens both into the
//! string contract handed to the host.

use super::error::ToolError;
use super::registry::ToolRegistry;
use super::schema;
use crate::host::Notifier;
use crate::types::{ToolCall, ToolResult};
use tracing::{info, warn};

/// Title used for tool notifications.
pub const NOTIFY_TITLE: &str = "Tool Use";

pub struct ToolInvoker<'a> {
    registry: &'a ToolRegistry,
    notifier: &'a dyn Notifier,
}

impl<'a> ToolInvoker<'a> {
    pub fn new(registry: &'a ToolRegistry, notifier: &'a dyn Notifier) -> Self {
        Self { registry, notifier }
    }

    pub async fn invoke(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let tool = self
            .registry
            .get(&call.name)
            .ok_or_else(|| ToolError::UnknownTool(call.name.clone()))?;

        schema::validate(&tool.parameters_schema(), &call.arguments).map_err(|violations| {
            ToolError::InvalidArguments {
                tool: call.name.clone(),
                violations,
            }
        })?;

        match tool.format_message(&call.arguments) {
            Ok(msg) if !msg.is_empty() => self.notifier.info(NOTIFY_TITLE, &msg),
            Ok(_) => {}
            Err(e) => warn!("Formatter for {} failed: {}", call.name, e),
        }

        info!("Tool: {}({})", call.name, call.arguments);

        let result = match tool.execute(call.arguments.clone()).await {
            Ok(output) => ToolResult {
                tool_call_id: call.id.clone(),
                output: output.into_text(),
                success: true,
            },
            Err(e) => {
                warn!("Tool {} raised: {:#}", call.name, e);
                ToolResult {
                    tool_call_id: call.id.clone(),
                    output: ToolError::Action(format!("{:#}", e)).to_string(),
                    success: false,
                }
            }
        };

        info!("Tool result: {} chars", result.output.len());
        Ok(result)
    }

    /// Invoke and render any boundary error as the result text. Never fails.
    pub async fn invoke_for_host(&self, call: &ToolCall) -> ToolResult {
        match self.invoke(call).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Tool call rejected: {}", e);
                ToolResult {
                    tool_call_id: call.id.clone(),
                    output: e.to_string(),
                    success: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingNotifier;
    use crate::tools::{Tool, ToolOutput};
    use anyhow::{anyhow, bail, Context, Result};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "Echo"
        }
        fn description(&self) -> &str {
            "Echo the text back"
        }
        fn parameters_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }
        async fn execute(&self, args: Value) -> Result<ToolOutput> {
            match args["text"].as_str() {
                Some("explode") => bail!("kaboom"),
                Some("nested") => Err(anyhow!("disk full")).context("save failed"),
                Some("struct") => Ok(json!({"status": "ok", "count": 2}).into()),
                Some(text) => Ok(text.into()),
                None => bail!("unreachable"),
            }
        }
        fn format_message(&self, args: &Value) -> Result<String> {
            match args["text"].as_str() {
                Some("quiet") => Ok(String::new()),
                Some("bad-format") => bail!("formatter broke"),
                Some(text) => Ok(format!("Echoing {text}")),
                None => Ok(String::new()),
            }
        }
    }

    fn registry() -> ToolRegistry {
        let mut reg = ToolRegistry::new();
        reg.register(Arc::new(Echo));
        reg
    }

    #[tokio::test]
    async fn unknown_tool_is_reported_not_panicked() {
        let reg = registry();
        let notes = RecordingNotifier::default();
        let invoker = ToolInvoker::new(&reg, &notes);

        let err = invoker
            .invoke(&ToolCall::new("Nope", json!({})))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::UnknownTool("Nope".into()));

        let edge = invoker.invoke_for_host(&ToolCall::new("Nope", json!({}))).await;
        assert!(!edge.success);
        assert_eq!(edge.output, "Unknown tool: Nope");
    }

    #[tokio::test]
    async fn missing_required_field_is_named() {
        let reg = registry();
        let notes = RecordingNotifier::default();
        let invoker = ToolInvoker::new(&reg, &notes);

        let err = invoker
            .invoke(&ToolCall::new("Echo", json!({"other": 1})))
            .await
            .unwrap_err();
        assert_eq!(err.fields(), vec!["text"]);
        assert!(notes.all().is_empty());
    }

    #[tokio::test]
    async fn action_failure_is_contained() {
        let reg = registry();
        let notes = RecordingNotifier::default();
        let invoker = ToolInvoker::new(&reg, &notes);

        let mut call = ToolCall::new("Echo", json!({"text": "explode"}));
        call.id = "call_1".into();
        let result = invoker.invoke(&call).await.unwrap();
        assert!(!result.success);
        assert_eq!(result.tool_call_id, "call_1");
        assert!(result.output.contains("Exception:"));
        assert!(result.output.contains("kaboom"));
    }

    #[tokio::test]
    async fn action_failure_keeps_error_chain() {
        let reg = registry();
        let notes = RecordingNotifier::default();
        let invoker = ToolInvoker::new(&reg, &notes);

        let result = invoker
            .invoke_for_host(&ToolCall::new("Echo", json!({"text": "nested"})))
            .await;
        assert!(!result.success);
        assert_eq!(result.output, "Exception: save failed: disk full");
    }

    #[tokio::test]
    async fn structured_output_is_serialized() {
        let reg = registry();
        let notes = RecordingNotifier::default();
        let invoker = ToolInvoker::new(&reg, &notes);

        let result = invoker
            .invoke(&ToolCall::new("Echo", json!({"text": "struct"})))
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(parsed, json!({"status": "ok", "count": 2}));
    }

    #[tokio::test]
    async fn formatter_controls_notification_only() {
        let reg = registry();
        let notes = RecordingNotifier::default();
        let invoker = ToolInvoker::new(&reg, &notes);

        let shown = invoker
            .invoke(&ToolCall::new("Echo", json!({"text": "hello"})))
            .await
            .unwrap();
        assert_eq!(shown.output, "hello");
        assert_eq!(notes.messages(), vec!["Echoing hello"]);

        let quiet = invoker
            .invoke(&ToolCall::new("Echo", json!({"text": "quiet"})))
            .await
            .unwrap();
        assert_eq!(quiet.output, "quiet");

        let broken = invoker
            .invoke(&ToolCall::new("Echo", json!({"text": "bad-format"})))
            .await
            .unwrap();
        assert!(broken.success);
        assert_eq!(broken.output, "bad-format");
        assert_eq!(notes.all().len(), 1);
    }
}

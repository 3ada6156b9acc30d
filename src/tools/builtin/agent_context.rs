use super::{str_arg, DRAFT_04};
use crate::tools::{Tool, ToolContext, ToolOutput};
use crate::types::AgentMessage;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// Leaves a message in the agent-only context. Nothing is triggered; the
/// recipient reads it the next time it is active.
pub struct AddMessageTool {
    ctx: Arc<ToolContext>,
}

impl AddMessageTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for AddMessageTool {
    fn name(&self) -> &str {
        "AgentContextAddMessage"
    }

    fn display_name(&self) -> &str {
        "Add Message to Agent Context"
    }

    fn description(&self) -> &str {
        "Adds a message to the agent context. The agent context is only visible to AI agents. Common uses include:\n- Leaving notes for yourself to maintain context in future interactions\n- Passing private information to other agents without user visibility\n- Recording observations or decisions that should persist across interactions\n\nMessages will be seen by the target agent the next time they are active, but won't trigger immediate responses."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "$schema": DRAFT_04,
            "type": "object",
            "properties": {
                "from": {
                    "type": "string",
                    "description": "name of agent sending the message"
                },
                "to": {
                    "type": "string",
                    "description": "agent intended to receive the message"
                },
                "subject": {
                    "type": "string",
                    "description": "subject of message"
                },
                "message": {
                    "type": "string",
                    "description": "message body"
                }
            },
            "required": []
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let field = |key| str_arg(&args, key).unwrap_or_default().to_string();
        let msg = AgentMessage {
            id: ulid::Ulid::new().to_string(),
            from: field("from"),
            to: field("to"),
            subject: field("subject"),
            message: field("message"),
            created_at: Utc::now(),
        };

        self.ctx.db.lock().await.save_agent_message(&msg)?;
        debug!("Agent message {} saved for '{}'", msg.id, msg.to);

        Ok(format!("Message saved to context at {}", msg.created_at.to_rfc2822()).into())
    }

    fn should_register(&self) -> bool {
        self.ctx.settings.enabled(self.name(), true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockHost};

    #[tokio::test]
    async fn message_is_persisted_for_recipient() {
        let ctx = context(MockHost::default(), "");
        let tool = AddMessageTool::new(ctx.clone());

        let out = tool
            .execute(json!({
                "from": "Ava",
                "to": "Bram",
                "subject": "bridge",
                "message": "Take the ford instead."
            }))
            .await
            .unwrap()
            .into_text();
        assert!(out.starts_with("Message saved to context at "));

        tool.execute(json!({"message": "note to self"})).await.unwrap();

        let db = ctx.db.lock().await;
        let for_bram = db.agent_messages(Some("Bram")).unwrap();
        assert_eq!(for_bram.len(), 1);
        assert_eq!(for_bram[0].from, "Ava");
        assert_eq!(for_bram[0].message, "Take the ford instead.");
        assert_eq!(db.agent_messages(None).unwrap().len(), 2);
    }
}

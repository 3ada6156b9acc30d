use super::{required_str, DRAFT_04};
use crate::tools::{Tool, ToolContext, ToolOutput};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

/// Sets the author note injected into every agent's context for the active chat.
pub struct AuthorNoteTool {
    ctx: Arc<ToolContext>,
}

impl AuthorNoteTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for AuthorNoteTool {
    fn name(&self) -> &str {
        "SetChatAuthorNote"
    }

    fn display_name(&self) -> &str {
        "Set chat author note"
    }

    fn description(&self) -> &str {
        "Sets a note on the chat. This text is directly injected into the context of every agent."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "$schema": DRAFT_04,
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "New text for note."
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let text = required_str(&args, "text")?;
        let chat_id = self
            .ctx
            .active()
            .chat_id
            .filter(|c| !c.is_empty())
            .ok_or_else(|| anyhow!("No active chat"))?;

        self.ctx.db.lock().await.set_author_note(&chat_id, text)?;
        Ok("OK: Updated chat note.".into())
    }

    fn should_register(&self) -> bool {
        self.ctx.settings.enabled(self.name(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{context, MockHost};
    use crate::types::ActiveChat;

    #[tokio::test]
    async fn note_lands_on_active_chat() {
        let ctx = context(MockHost::default(), "");
        let tool = AuthorNoteTool::new(ctx.clone());

        let err = tool.execute(json!({"text": "Be brief."})).await.unwrap_err();
        assert_eq!(err.to_string(), "No active chat");

        ctx.set_active(ActiveChat {
            chat_id: Some("c1".into()),
            ..Default::default()
        });
        tool.execute(json!({"text": "Be brief."})).await.unwrap();
        assert_eq!(
            ctx.db.lock().await.author_note("c1").unwrap().as_deref(),
            Some("Be brief.")
        );
    }
}

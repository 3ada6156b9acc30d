//! Tools that hand stored conversations or web pages to a sub-agent.

use super::{required_str, str_arg, DRAFT_04};
use crate::recall::RecallOrchestrator;
use crate::tools::{Tool, ToolContext, ToolOutput};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// VisitLinkWithPrompt
// ---------------------------------------------------------------------------

pub struct VisitLinkTool {
    ctx: Arc<ToolContext>,
    recall: RecallOrchestrator,
}

impl VisitLinkTool {
    pub fn new(ctx: Arc<ToolContext>, recall: RecallOrchestrator) -> Self {
        Self { ctx, recall }
    }
}

#[async_trait]
impl Tool for VisitLinkTool {
    fn name(&self) -> &str {
        "VisitLinkWithPrompt"
    }

    fn display_name(&self) -> &str {
        "Visit Link With Prompt"
    }

    fn description(&self) -> &str {
        "Creates a copy of the current agent with all context and knowledge, presents it with the webpage content, and asks it to analyze that content using the provided prompt. The copy will maintain your understanding and goals while focusing specifically on analyzing the provided content. Use this when you need to deeply understand webpage content while maintaining consistency with your current context and purpose."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "$schema": DRAFT_04,
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "link to visit"
                },
                "prompt": {
                    "type": "string",
                    "description": "Analysis prompt for the webpage content"
                }
            },
            "required": ["url", "prompt"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let url = required_str(&args, "url")?;
        let prompt = required_str(&args, "prompt")?;
        Ok(self.recall.visit_link_with_prompt(url, prompt).await.into())
    }

    fn format_message(&self, args: &Value) -> Result<String> {
        Ok(format!("Querying Link ({})", required_str(args, "url")?))
    }

    fn should_register(&self) -> bool {
        self.ctx.settings.enabled(self.name(), true)
    }
}

// ---------------------------------------------------------------------------
// Remember
// ---------------------------------------------------------------------------

pub struct RememberTool {
    ctx: Arc<ToolContext>,
    recall: RecallOrchestrator,
}

impl RememberTool {
    pub fn new(ctx: Arc<ToolContext>, recall: RecallOrchestrator) -> Self {
        Self { ctx, recall }
    }
}

#[async_trait]
impl Tool for RememberTool {
    fn name(&self) -> &str {
        "Remember"
    }

    fn display_name(&self) -> &str {
        "Remember details from a past conversation"
    }

    fn description(&self) -> &str {
        "Revisits a past conversation and extracts information relevant to the current topic (last few messages). As conversations evolve, you may need to Remember the same conversation multiple times to surface different relevant details."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "$schema": DRAFT_04,
            "type": "object",
            "properties": {
                "chatId": {
                    "type": "string",
                    "description": "chatId of memory"
                },
                "groupId": {
                    "type": "string",
                    "description": "groupId of memory"
                },
                "timestamp": {
                    "type": "string",
                    "description": "timestamp of memory"
                },
                "whatToRemember": {
                    "type": "string",
                    "description": "A highly detailed paragraph describing what you're trying to remember. More detail will produce a better memory."
                }
            },
            "required": ["chatId", "timestamp", "whatToRemember"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let chat_id = required_str(&args, "chatId")?;
        let what = required_str(&args, "whatToRemember")?;
        let out = self
            .recall
            .remember(
                chat_id,
                str_arg(&args, "groupId"),
                str_arg(&args, "timestamp"),
                what,
            )
            .await;
        Ok(out.into())
    }

    fn format_message(&self, args: &Value) -> Result<String> {
        Ok(format!("Remembering from {}", required_str(args, "chatId")?))
    }

    fn should_register(&self) -> bool {
        self.ctx.settings.enabled(self.name(), true)
    }
}

// ---------------------------------------------------------------------------
// VisitChatWithPrompt
// ---------------------------------------------------------------------------

pub struct VisitChatTool {
    ctx: Arc<ToolContext>,
    recall: RecallOrchestrator,
}

impl VisitChatTool {
    pub fn new(ctx: Arc<ToolContext>, recall: RecallOrchestrator) -> Self {
        Self { ctx, recall }
    }
}

#[async_trait]
impl Tool for VisitChatTool {
    fn name(&self) -> &str {
        "VisitChatWithPrompt"
    }

    fn display_name(&self) -> &str {
        "Visit Chat With Prompt"
    }

    fn description(&self) -> &str {
        "Creates a copy of the current agent with all context and knowledge, presents it with the chat content, and asks it to analyze that content using the provided prompt. The copy will maintain your understanding and goals while focusing specifically on analyzing the provided content."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "$schema": DRAFT_04,
            "type": "object",
            "properties": {
                "chatId": {
                    "type": "string",
                    "description": "ID of the chat to analyze"
                },
                "groupId": {
                    "type": "string",
                    "description": "ID of the group the chat belongs to, if it is a group chat"
                },
                "prompt": {
                    "type": "string",
                    "description": "Analysis prompt for the chat content"
                },
                "timestamp": {
                    "type": "string",
                    "description": "Optional timestamp of the part of the chat of interest"
                }
            },
            "required": ["chatId", "prompt"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let chat_id = required_str(&args, "chatId")?;
        let prompt = required_str(&args, "prompt")?;
        let out = self
            .recall
            .visit_chat_with_prompt(
                chat_id,
                str_arg(&args, "groupId"),
                prompt,
                str_arg(&args, "timestamp"),
            )
            .await;
        Ok(out.into())
    }

    fn format_message(&self, args: &Value) -> Result<String> {
        Ok(format!("Revisiting {}", required_str(args, "chatId")?))
    }

    fn should_register(&self) -> bool {
        self.ctx.settings.enabled(self.name(), true)
    }
}

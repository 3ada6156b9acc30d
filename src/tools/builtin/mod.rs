//! Built-in tool set.

pub mod agent_context;
pub mod author_note;
pub mod background;
pub mod directory;
pub mod entropy;
pub mod group_chat;
pub mod recall;

pub use background::BackgroundImageTool;

use super::{Tool, ToolContext};
use crate::recall::RecallOrchestrator;
use anyhow::{anyhow, Result};
use serde_json::Value;
use std::sync::Arc;

/// `$schema` value carried by every built-in parameter schema.
pub const DRAFT_04: &str = "http://json-schema.org/draft-04/schema#";

/// Every built-in tool, in registration order. The background tool is also
/// returned on its own so its cancellation handle stays reachable.
pub fn builtin_tools(ctx: &Arc<ToolContext>) -> (Vec<Arc<dyn Tool>>, Arc<BackgroundImageTool>) {
    let recall = RecallOrchestrator::new(ctx.clone());
    let background = Arc::new(BackgroundImageTool::new(ctx.clone()));

    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(group_chat::TriggerNpcTool::new(ctx.clone())),
        Arc::new(group_chat::ListMembersTool::new(ctx.clone())),
        Arc::new(author_note::AuthorNoteTool::new(ctx.clone())),
        Arc::new(group_chat::ScenarioTextTool::new(ctx.clone())),
        background.clone(),
        Arc::new(entropy::TextEntropyTool::new(ctx.clone())),
        Arc::new(agent_context::AddMessageTool::new(ctx.clone())),
        Arc::new(recall::VisitLinkTool::new(ctx.clone(), recall.clone())),
        Arc::new(recall::RememberTool::new(ctx.clone(), recall.clone())),
        Arc::new(recall::VisitChatTool::new(ctx.clone(), recall)),
        Arc::new(directory::CharactersAndGroupsTool::new(ctx.clone())),
    ];

    (tools, background)
}

/// Optional string argument; empty strings count as absent.
fn str_arg<'a>(args: &'a Value, key: &str) -> Option<&'a str> {
    args.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

fn required_str<'a>(args: &'a Value, key: &str) -> Result<&'a str> {
    args.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("Missing '{}' argument", key))
}

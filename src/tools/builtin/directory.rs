use super::DRAFT_04;
use crate::tools::{Tool, ToolContext, ToolOutput};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryEntry {
    id: String,
    name: String,
    most_recent_chat_id: Option<String>,
}

/// Lists every character and group known to the host.
pub struct CharactersAndGroupsTool {
    ctx: Arc<ToolContext>,
}

impl CharactersAndGroupsTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for CharactersAndGroupsTool {
    fn name(&self) -> &str {
        "GetCharactersAndGroups"
    }

    fn display_name(&self) -> &str {
        "Get Characters and Groups"
    }

    fn description(&self) -> &str {
        "Get metadata for characters and groups"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "$schema": DRAFT_04,
            "type": "object",
            "properties": {},
            "required": []
        })
    }

    async fn execute(&self, _args: Value) -> Result<ToolOutput> {
        let characters = self.ctx.host.characters().await?;
        let groups = self.ctx.host.groups().await?;

        let entries: Vec<DirectoryEntry> = characters
            .into_iter()
            .map(|c| DirectoryEntry {
                id: c.avatar,
                name: c.name,
                most_recent_chat_id: c.chat,
            })
            .chain(groups.into_iter().map(|g| DirectoryEntry {
                id: g.id,
                name: g.name,
                most_recent_chat_id: g.chat_id,
            }))
            .collect();

        Ok(serde_json::to_value(entries)?.into())
    }

    fn should_register(&self) -> bool {
        self.ctx.settings.enabled(self.name(), false)
    }
}

//! Tools that act on the members of the active group chat.

use super::{required_str, DRAFT_04};
use crate::tools::{Tool, ToolContext, ToolOutput};
use crate::types::Character;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

const NOT_IN_GROUP: &str = "Error: not in group chat";

/// Members of the active group, or `None` outside a group chat.
async fn current_members(ctx: &ToolContext) -> Result<Option<Vec<Character>>> {
    let active = ctx.active();
    let Some(group_id) = active.group() else {
        return Ok(None);
    };

    let groups = ctx.host.groups().await?;
    let group = groups
        .into_iter()
        .find(|g| g.id == group_id)
        .ok_or_else(|| anyhow!("Group {} not found", group_id))?;

    let characters = ctx.host.characters().await?;
    let members = group
        .members
        .iter()
        .filter_map(|avatar| characters.iter().find(|c| &c.avatar == avatar).cloned())
        .collect();
    Ok(Some(members))
}

fn member_list(members: &[Character]) -> Value {
    Value::Array(
        members
            .iter()
            .map(|m| json!({ "name": m.name, "id": m.avatar }))
            .collect(),
    )
}

fn not_found(id: &str, members: &[Character]) -> ToolOutput {
    json!({
        "status": format!("Error: {} not found. See attached list of group chat members.", id),
        "members": member_list(members),
    })
    .into()
}

// ---------------------------------------------------------------------------
// GroupChatTriggerNPC
// ---------------------------------------------------------------------------

pub struct TriggerNpcTool {
    ctx: Arc<ToolContext>,
}

impl TriggerNpcTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for TriggerNpcTool {
    fn name(&self) -> &str {
        "GroupChatTriggerNPC"
    }

    fn display_name(&self) -> &str {
        "Group Chat Trigger NPC"
    }

    fn description(&self) -> &str {
        "Trigger an NPC to interact in a group chat. Use this when you want another agent to respond immediately in the visible chat channel. The triggered agent will see any included message or instructions, then respond in the chat where all participants can see their response.\n\nNote: Requires the agent's ID, which can be obtained using GroupChatListMembers."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "$schema": DRAFT_04,
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "ID of NPC to trigger"
                },
                "message": {
                    "type": "string",
                    "description": "a private message or instructions to include in trigger"
                }
            },
            "required": ["id"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let id = required_str(&args, "id")?;

        let Some(members) = current_members(&self.ctx).await? else {
            return Ok(NOT_IN_GROUP.into());
        };

        let Some(character) = members.iter().find(|m| m.avatar == id || m.name == id) else {
            return Ok(not_found(id, &members));
        };

        self.ctx
            .db
            .lock()
            .await
            .push_pending_input(&format!("/trigger {}", character.name))?;
        info!("Queued trigger for {}", character.name);

        Ok(format!(
            "Trigger queued; {}'s response will begin after you finish processing this result.",
            character.name
        )
        .into())
    }

    fn should_register(&self) -> bool {
        self.ctx.settings.enabled(self.name(), true)
    }
}

// ---------------------------------------------------------------------------
// GroupChatListMembers
// ---------------------------------------------------------------------------

pub struct ListMembersTool {
    ctx: Arc<ToolContext>,
}

impl ListMembersTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ListMembersTool {
    fn name(&self) -> &str {
        "GroupChatListMembers"
    }

    fn display_name(&self) -> &str {
        "List Group Chat Members"
    }

    fn description(&self) -> &str {
        "List current members of the group chat with their id strings."
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
        match current_members(&self.ctx).await? {
            Some(members) => Ok(member_list(&members).into()),
            None => Ok(NOT_IN_GROUP.into()),
        }
    }

    fn should_register(&self) -> bool {
        self.ctx.settings.enabled(self.name(), true)
    }
}

// ---------------------------------------------------------------------------
// SetNPCScenarioText
// ---------------------------------------------------------------------------

pub struct ScenarioTextTool {
    ctx: Arc<ToolContext>,
}

impl ScenarioTextTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ScenarioTextTool {
    fn name(&self) -> &str {
        "SetNPCScenarioText"
    }

    fn display_name(&self) -> &str {
        "Set Group Chat NPC Scenario Text"
    }

    fn description(&self) -> &str {
        "Sets the scenario text value for an NPC in a group chat matching the provided id. This scenario text is injected directly into that agent's context"
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "$schema": DRAFT_04,
            "type": "object",
            "properties": {
                "id": {
                    "type": "string",
                    "description": "ID of NPC to trigger"
                },
                "text": {
                    "type": "string",
                    "description": "text to set into NPC's scenario"
                }
            },
            "required": ["id", "text"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let id = required_str(&args, "id")?;
        let text = required_str(&args, "text")?;

        let Some(members) = current_members(&self.ctx).await? else {
            return Ok(NOT_IN_GROUP.into());
        };

        let Some(character) = members.iter().find(|m| m.avatar == id) else {
            return Ok(not_found(id, &members));
        };

        self.ctx.db.lock().await.set_scenario(&character.avatar, text)?;
        Ok(format!("OK: Updated {}'s scenario text.", character.name).into())
    }

    fn should_register(&self) -> bool {
        self.ctx.settings.enabled(self.name(), false)
    }
}

//! Shared types used across the plugin.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Tool calls
// ---------------------------------------------------------------------------

/// A tool call request from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            arguments,
        }
    }
}

/// Result of executing a tool, as handed back to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_call_id: String,
    pub output: String,
    pub success: bool,
}

// ---------------------------------------------------------------------------
// Host entities
// ---------------------------------------------------------------------------

/// A character known to the host. `avatar` doubles as the character id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub avatar: String,
    /// Most recent chat file for this character.
    #[serde(default)]
    pub chat: Option<String>,
    #[serde(default)]
    pub scenario: Option<String>,
}

/// A group chat known to the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Member character avatars.
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub chat_id: Option<String>,
}

/// Where the acting agent currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveChat {
    pub character_avatar: Option<String>,
    pub group_id: Option<String>,
    pub chat_id: Option<String>,
}

impl ActiveChat {
    /// The active group id, ignoring empty strings.
    pub fn group(&self) -> Option<&str> {
        self.group_id.as_deref().filter(|g| !g.is_empty())
    }
}

/// One raw record of a stored chat as returned by the host.
///
/// The first record of a solo chat file is a metadata header with no `mes`,
/// so every field is optional here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRecord {
    #[serde(default)]
    pub send_date: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mes: Option<String>,
}

// ---------------------------------------------------------------------------
// Transcripts
// ---------------------------------------------------------------------------

/// A single message of a reconstructed transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub timestamp: String,
    pub speaker: String,
    pub text: String,
}

impl TranscriptLine {
    /// Convert a host record, skipping records that carry no message text.
    pub fn from_record(record: ChatRecord) -> Option<Self> {
        let text = record.mes?;
        let timestamp = match record.send_date {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        Some(Self {
            timestamp,
            speaker: record.name.unwrap_or_default(),
            text,
        })
    }
}

impl fmt::Display for TranscriptLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.timestamp, self.speaker, self.text)
    }
}

// ---------------------------------------------------------------------------
// Agent context messages
// ---------------------------------------------------------------------------

/// A note left in the agent-only context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessage {
    pub id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    Info,
    Error,
}

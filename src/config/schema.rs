//! Configuration schema for hoss.toml.

use crate::types::ActiveChat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Database file name used when `db_path` is not set.
pub const DEFAULT_DB_FILE: &str = "state.db";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HossConfig {
    /// Base URL of the chat host's REST API.
    pub host_api_url: String,

    /// CSRF token sent as `X-CSRF-Token` on host requests (empty to omit).
    pub host_csrf_token: String,

    /// OpenAI-compatible API used for quiet sub-agent generation.
    pub generation_api_url: String,

    /// API key for the generation endpoint.
    pub generation_api_key: String,

    /// Model used for sub-agent queries.
    pub generation_model: String,

    /// Optional system prompt placed ahead of every sub-query.
    pub subagent_system_prompt: String,

    /// Token cap for a sub-agent response.
    pub subquery_max_tokens: u32,

    /// Sampling temperature for sub-agent queries.
    pub temperature: f64,

    /// Avatar id of the acting character.
    pub character_avatar: String,

    /// Active group id (empty for solo chats).
    pub group_id: String,

    /// Active chat id.
    pub chat_id: String,

    /// Path to SQLite session database. Relative paths (and the empty
    /// default) are taken relative to the home directory.
    pub db_path: String,

    /// Log level (debug, info, warn, error).
    pub log_level: String,

    /// Config version.
    pub version: u32,

    /// Per-tool registration overrides, keyed by tool name.
    pub tools: BTreeMap<String, bool>,
}

impl Default for HossConfig {
    fn default() -> Self {
        Self {
            host_api_url: "http://127.0.0.1:8000".into(),
            host_csrf_token: String::new(),
            generation_api_url: "https://api.openai.com".into(),
            generation_api_key: String::new(),
            generation_model: "gpt-4o-mini".into(),
            subagent_system_prompt: String::new(),
            subquery_max_tokens: 1000,
            temperature: 0.7,
            character_avatar: String::new(),
            group_id: String::new(),
            chat_id: String::new(),
            db_path: DEFAULT_DB_FILE.into(),
            log_level: "info".into(),
            version: 1,
            tools: BTreeMap::new(),
        }
    }
}

impl HossConfig {
    /// Expand `~` and anchor relative paths at `home`.
    pub fn resolve_path(&self, home: &Path, path: &str) -> PathBuf {
        let expanded = PathBuf::from(shellexpand::tilde(path).into_owned());
        if expanded.is_absolute() {
            expanded
        } else {
            home.join(expanded)
        }
    }

    /// Resolved database path for the given home directory.
    pub fn resolved_db_path(&self, home: &Path) -> PathBuf {
        let path = if self.db_path.is_empty() {
            DEFAULT_DB_FILE
        } else {
            self.db_path.as_str()
        };
        self.resolve_path(home, path)
    }

    /// The active chat described by this config. Empty strings mean unset.
    pub fn active_chat(&self) -> ActiveChat {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        ActiveChat {
            character_avatar: non_empty(&self.character_avatar),
            group_id: non_empty(&self.group_id),
            chat_id: non_empty(&self.chat_id),
        }
    }
}

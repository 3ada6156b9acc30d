//! State and host handles shared by every built-in tool.

use super::error::ToolError;
use crate::host::{CommandRunner, HostApi, Notifier, QuietGenerator};
use crate::state::Database;
use crate::types::{ActiveChat, Character};
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex;

/// Default token cap for a sub-agent response.
pub const DEFAULT_SUBQUERY_MAX_TOKENS: u32 = 1000;

/// Runtime enable/disable switches for tools, keyed by tool name.
#[derive(Debug, Default)]
pub struct ToolSettings {
    overrides: RwLock<BTreeMap<String, bool>>,
}

impl ToolSettings {
    pub fn from_overrides(overrides: BTreeMap<String, bool>) -> Self {
        Self {
            overrides: RwLock::new(overrides),
        }
    }

    /// The override for `name`, or `default` when none is set.
    pub fn enabled(&self, name: &str, default: bool) -> bool {
        self.overrides
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .copied()
            .unwrap_or(default)
    }

    pub fn set(&self, name: &str, enabled: bool) {
        self.overrides
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), enabled);
    }

    pub fn reset(&self, name: &str) {
        self.overrides
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(name);
    }
}

/// Context handed to tools at construction.
pub struct ToolContext {
    pub host: Arc<dyn HostApi>,
    pub generator: Arc<dyn QuietGenerator>,
    pub notifier: Arc<dyn Notifier>,
    pub commands: Arc<dyn CommandRunner>,
    pub db: Arc<Mutex<Database>>,
    pub settings: ToolSettings,
    pub subquery_max_tokens: u32,
    active: RwLock<ActiveChat>,
}

impl ToolContext {
    pub fn new(
        host: Arc<dyn HostApi>,
        generator: Arc<dyn QuietGenerator>,
        notifier: Arc<dyn Notifier>,
        commands: Arc<dyn CommandRunner>,
        db: Arc<Mutex<Database>>,
    ) -> Self {
        Self {
            host,
            generator,
            notifier,
            commands,
            db,
            settings: ToolSettings::default(),
            subquery_max_tokens: DEFAULT_SUBQUERY_MAX_TOKENS,
            active: RwLock::new(ActiveChat::default()),
        }
    }

    pub fn with_settings(mut self, settings: ToolSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_active(self, active: ActiveChat) -> Self {
        self.set_active(active);
        self
    }

    pub fn with_subquery_max_tokens(mut self, max_tokens: u32) -> Self {
        self.subquery_max_tokens = max_tokens;
        self
    }

    /// Snapshot of where the acting agent currently is.
    pub fn active(&self) -> ActiveChat {
        self.active.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_active(&self, active: ActiveChat) {
        *self.active.write().unwrap_or_else(|e| e.into_inner()) = active;
    }

    /// Resolve the acting character against the host's character list.
    pub async fn acting_character(&self) -> Result<Character, ToolError> {
        let avatar = self
            .active()
            .character_avatar
            .filter(|a| !a.is_empty())
            .ok_or(ToolError::NoActiveCharacter)?;

        let characters = self
            .host
            .characters()
            .await
            .map_err(|e| ToolError::Action(format!("{:#}", e)))?;

        characters
            .into_iter()
            .find(|c| c.avatar == avatar)
            .ok_or(ToolError::CharacterNotFound(avatar))
    }
}

//! Surfaces the plugin consumes from the chat host.
//!
//! Everything the tools touch outside their own process goes through one of
//! these traits, so the core can run against a live host over HTTP or
//! against in-memory fakes.

pub mod client;
pub mod commands;
pub mod inference;
pub mod notify;

pub use client::HostClient;
pub use commands::QueuedCommands;
pub use inference::InferenceClient;
pub use notify::ConsoleNotifier;

use crate::types::{Character, ChatRecord, Group, NotifyLevel};
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

/// Body of the solo-chat retrieval request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoloChatRequest {
    pub ch_name: String,
    pub file_name: String,
    pub avatar_url: String,
}

/// Read access to host-owned characters, groups, transcripts and pages.
#[async_trait]
pub trait HostApi: Send + Sync {
    async fn characters(&self) -> Result<Vec<Character>>;

    async fn groups(&self) -> Result<Vec<Group>>;

    /// Fetch a group transcript by chat id.
    async fn group_chat(&self, chat_id: &str) -> Result<Vec<ChatRecord>>;

    /// Fetch a solo transcript for one character.
    async fn solo_chat(&self, request: &SoloChatRequest) -> Result<Vec<ChatRecord>>;

    /// Fetch a web page and return its readable text.
    async fn visit_link(&self, url: &str) -> Result<String>;
}

/// Flags passed to the quiet-generation primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietOptions {
    pub suppress_user_visibility: bool,
    pub is_tool_response: bool,
    pub max_tokens: u32,
}

impl QuietOptions {
    pub fn tool_response(max_tokens: u32) -> Self {
        Self {
            suppress_user_visibility: true,
            is_tool_response: true,
            max_tokens,
        }
    }
}

/// Generation that never lands in the visible chat transcript.
#[async_trait]
pub trait QuietGenerator: Send + Sync {
    /// Returns the generated text; an empty string means nothing was produced.
    async fn generate_quiet(&self, prompt: &str, options: QuietOptions) -> Result<String>;
}

/// Transient user-visible notifications (toasts).
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NotifyLevel, title: &str, message: &str);

    fn info(&self, title: &str, message: &str) {
        self.notify(NotifyLevel::Info, title, message);
    }

    fn error(&self, title: &str, message: &str) {
        self.notify(NotifyLevel::Error, title, message);
    }
}

/// Runs host slash commands.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command: &str, cancel: CancellationToken) -> Result<()>;
}

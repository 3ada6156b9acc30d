//! Cross-conversation recall.
//!
//! Fetches a stored conversation (or a web page), wraps it in a sub-query
//! envelope together with a request, and hands it to a quiet sub-agent
//! generation. Every operation here resolves to a string: failures come back
//! as `ERROR: ...` text for the calling agent to read.

pub mod dispatcher;
pub mod envelope;
pub mod fetcher;

pub use dispatcher::SubAgentDispatcher;
pub use envelope::{render_transcript, AnalysisKind, SubQueryEnvelope};
pub use fetcher::{ConversationFetcher, ConversationRef};

use crate::tools::{ToolContext, ToolError};
use std::sync::Arc;
use tracing::{info, warn};

/// Instruction block placed ahead of what the acting character wants to remember.
pub fn remember_instructions(what_to_remember: &str, responding_to: &str) -> String {
    format!(
        "**You are trying to remember something:** {what_to_remember}\n\
         Analyze the following conversation and decide how it relates to what you want to remember. Focus on:\n\
         1. Details directly related to what you're trying to remember\n\
         2. Details that relate to the current topic of discussion\n\
         3. Information that adds context to the current conversation\n\
         4. Previous decisions or conclusions that impact the current situation\n\
         5. You are responding to {responding_to}, not a user\n\
         Provide only information that is directly relevant to what you are being asked to remember. \
         Write as though you are speaking to yourself, because you are!"
    )
}

fn or_now(timestamp: Option<&str>) -> String {
    match timestamp.filter(|t| !t.is_empty()) {
        Some(t) => t.to_string(),
        None => chrono::Utc::now().to_rfc3339(),
    }
}

fn as_result_text(result: Result<String, ToolError>) -> String {
    result.unwrap_or_else(|e| {
        warn!("Recall failed: {}", e);
        format!("ERROR: {}", e)
    })
}

/// Composes fetching and dispatch behind the recall tools.
#[derive(Clone)]
pub struct RecallOrchestrator {
    ctx: Arc<ToolContext>,
    fetcher: ConversationFetcher,
    dispatcher: SubAgentDispatcher,
}

impl RecallOrchestrator {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        let fetcher = ConversationFetcher::new(ctx.host.clone());
        let dispatcher = SubAgentDispatcher::new(
            ctx.generator.clone(),
            ctx.notifier.clone(),
            ctx.subquery_max_tokens,
        );
        Self {
            ctx,
            fetcher,
            dispatcher,
        }
    }

    /// Analyze a past conversation of the acting character for something it
    /// wants to remember.
    pub async fn remember(
        &self,
        chat_id: &str,
        group_id: Option<&str>,
        timestamp: Option<&str>,
        what_to_remember: &str,
    ) -> String {
        info!("Remembering from {}", chat_id);
        as_result_text(
            async {
                let acting = self.ctx.acting_character().await?;
                let request = remember_instructions(what_to_remember, &acting.name);
                let conversation = ConversationRef::resolve(&acting.avatar, chat_id, group_id);
                self.analyze(&conversation, &request, timestamp).await
            }
            .await,
        )
    }

    /// Analyze a past conversation with a caller-supplied prompt.
    pub async fn visit_chat_with_prompt(
        &self,
        chat_id: &str,
        group_id: Option<&str>,
        prompt: &str,
        timestamp: Option<&str>,
    ) -> String {
        info!("Revisiting {}", chat_id);
        as_result_text(
            async {
                let acting = self.ctx.acting_character().await?;
                let conversation = ConversationRef::resolve(&acting.avatar, chat_id, group_id);
                self.analyze(&conversation, prompt, timestamp).await
            }
            .await,
        )
    }

    /// Analyze a web page with a caller-supplied prompt.
    pub async fn visit_link_with_prompt(&self, url: &str, prompt: &str) -> String {
        info!("Querying link {}", url);
        as_result_text(
            async {
                let page = self
                    .ctx
                    .host
                    .visit_link(url)
                    .await
                    .map_err(|e| ToolError::Action(format!("{:#}", e)))?;
                self.dispatcher
                    .dispatch(prompt, &page, AnalysisKind::ContentAnalysis, &or_now(None))
                    .await
            }
            .await,
        )
    }

    /// Fetch the full transcript and dispatch it. The timestamp only travels
    /// in the envelope; no windowing is applied.
    async fn analyze(
        &self,
        conversation: &ConversationRef,
        request: &str,
        timestamp: Option<&str>,
    ) -> Result<String, ToolError> {
        let lines = self.fetcher.fetch(conversation).await?;
        let body = render_transcript(&lines);
        self.dispatcher
            .dispatch(request, &body, AnalysisKind::ContentAnalysis, &or_now(timestamp))
            .await
    }
}

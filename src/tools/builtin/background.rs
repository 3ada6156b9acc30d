use super::DRAFT_04;
use crate::tools::invoker::NOTIFY_TITLE;
use crate::tools::{Tool, ToolContext, ToolOutput};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

const IMAGINE_BACKGROUND: &str = "/imagine background";

/// Generates a new chat background through the host's image command.
///
/// Each call gets its own cancellation token; the most recent one is kept so
/// it can be cancelled on shutdown. Earlier in-flight generations are left
/// alone.
pub struct BackgroundImageTool {
    ctx: Arc<ToolContext>,
    latest: Mutex<Option<CancellationToken>>,
}

impl BackgroundImageTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self {
            ctx,
            latest: Mutex::new(None),
        }
    }

    /// Cancel the most recently issued generation. Returns false if none was issued.
    pub fn cancel_latest(&self) -> bool {
        match self.latest.lock().unwrap_or_else(|e| e.into_inner()).take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl Tool for BackgroundImageTool {
    fn name(&self) -> &str {
        "GenerateAndSetBackgroundImage"
    }

    fn display_name(&self) -> &str {
        "Generate and Set a Background Image"
    }

    fn description(&self) -> &str {
        "Generates and sets a new background image in the chat."
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
        let token = CancellationToken::new();
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(token.clone());

        self.ctx
            .notifier
            .info(NOTIFY_TITLE, "Generating background image...");
        self.ctx.commands.run(IMAGINE_BACKGROUND, token).await?;

        Ok("Background image generation started.".into())
    }

    fn should_register(&self) -> bool {
        self.ctx.settings.enabled(self.name(), true)
    }
}

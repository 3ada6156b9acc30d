use super::envelope::{AnalysisKind, SubQueryEnvelope};
use crate::host::{Notifier, QuietGenerator, QuietOptions};
use crate::tools::ToolError;
use std::sync::Arc;
use tracing::{debug, error};

/// Title of the notification raised when a sub-query comes back empty.
pub const SUBPROMPT_TITLE: &str = "Hoss";

/// Sends envelopes to the quiet generator and returns the raw reply.
#[derive(Clone)]
pub struct SubAgentDispatcher {
    generator: Arc<dyn QuietGenerator>,
    notifier: Arc<dyn Notifier>,
    max_tokens: u32,
}

impl SubAgentDispatcher {
    pub fn new(generator: Arc<dyn QuietGenerator>, notifier: Arc<dyn Notifier>, max_tokens: u32) -> Self {
        Self {
            generator,
            notifier,
            max_tokens,
        }
    }

    /// An empty reply, or a generator error, is `SubpromptFailed` and raises
    /// one user-visible error notification.
    pub async fn dispatch(
        &self,
        request: &str,
        body: &str,
        kind: AnalysisKind,
        timestamp: &str,
    ) -> Result<String, ToolError> {
        let prompt = SubQueryEnvelope {
            kind,
            timestamp,
            request,
            content: body,
        }
        .to_string();

        debug!("Dispatching sub-query ({} chars)", prompt.len());

        let reply = match self
            .generator
            .generate_quiet(&prompt, QuietOptions::tool_response(self.max_tokens))
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                error!("Quiet generation failed: {:#}", e);
                String::new()
            }
        };

        if reply.trim().is_empty() {
            self.notifier.error(SUBPROMPT_TITLE, "Running subprompt failed");
            return Err(ToolError::SubpromptFailed);
        }

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockGenerator, RecordingNotifier};

    #[tokio::test]
    async fn empty_reply_fails_with_one_notification() {
        let notes = Arc::new(RecordingNotifier::default());
        let dispatcher =
            SubAgentDispatcher::new(Arc::new(MockGenerator::replying("")), notes.clone(), 1000);

        let err = dispatcher
            .dispatch("summarize", "t1 Ava: hi", AnalysisKind::ContentAnalysis, "t0")
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::SubpromptFailed);
        assert_eq!(notes.errors(), 1);
        assert_eq!(notes.all().len(), 1);
    }

    #[tokio::test]
    async fn reply_is_returned_verbatim_with_tool_response_flags() {
        let notes = Arc::new(RecordingNotifier::default());
        let generator = Arc::new(MockGenerator::replying("  They agreed to meet at dawn.\n"));
        let dispatcher = SubAgentDispatcher::new(generator.clone(), notes.clone(), 321);

        let reply = dispatcher
            .dispatch("when?", "t1 Ava: dawn", AnalysisKind::ContentAnalysis, "t0")
            .await
            .unwrap();
        assert_eq!(reply, "  They agreed to meet at dawn.\n");
        assert!(notes.all().is_empty());

        let (prompt, options) = generator.prompts()[0].clone();
        assert!(prompt.starts_with("<subquery type=\"content-analysis\" timestamp=\"t0\""));
        assert!(options.suppress_user_visibility);
        assert!(options.is_tool_response);
        assert_eq!(options.max_tokens, 321);
    }
}

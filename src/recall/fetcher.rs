use crate::host::{HostApi, SoloChatRequest};
use crate::tools::ToolError;
use crate::types::TranscriptLine;
use std::sync::Arc;
use tracing::debug;

/// Identifies a stored conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationRef {
    Solo { owner_id: String, chat_id: String },
    Group { group_id: String, chat_id: String },
}

impl ConversationRef {
    /// A non-empty group id selects the group path; otherwise the chat
    /// belongs to `owner_id`.
    pub fn resolve(owner_id: &str, chat_id: &str, group_id: Option<&str>) -> Self {
        match group_id.filter(|g| !g.is_empty()) {
            Some(group_id) => Self::Group {
                group_id: group_id.to_string(),
                chat_id: chat_id.to_string(),
            },
            None => Self::Solo {
                owner_id: owner_id.to_string(),
                chat_id: chat_id.to_string(),
            },
        }
    }

    pub fn chat_id(&self) -> &str {
        match self {
            Self::Solo { chat_id, .. } | Self::Group { chat_id, .. } => chat_id,
        }
    }
}

/// Reads transcripts out of host storage.
#[derive(Clone)]
pub struct ConversationFetcher {
    host: Arc<dyn HostApi>,
}

impl ConversationFetcher {
    pub fn new(host: Arc<dyn HostApi>) -> Self {
        Self { host }
    }

    /// The full transcript in host storage order.
    pub async fn fetch(&self, conversation: &ConversationRef) -> Result<Vec<TranscriptLine>, ToolError> {
        let records = match conversation {
            ConversationRef::Group { group_id, chat_id } => {
                debug!("Fetching group transcript {} (group {})", chat_id, group_id);
                self.host
                    .group_chat(chat_id)
                    .await
                    .map_err(|e| ToolError::TranscriptFetch(format!("{:#}", e)))?
            }
            ConversationRef::Solo { owner_id, chat_id } => {
                let characters = self
                    .host
                    .characters()
                    .await
                    .map_err(|e| ToolError::TranscriptFetch(format!("{:#}", e)))?;
                let character = characters
                    .into_iter()
                    .find(|c| &c.avatar == owner_id)
                    .ok_or_else(|| ToolError::CharacterNotFound(owner_id.clone()))?;

                debug!("Fetching transcript {} for {}", chat_id, character.name);
                self.host
                    .solo_chat(&SoloChatRequest {
                        ch_name: character.name,
                        file_name: chat_id.clone(),
                        avatar_url: character.avatar,
                    })
                    .await
                    .map_err(|e| ToolError::TranscriptFetch(format!("{:#}", e)))?
            }
        };

        Ok(records
            .into_iter()
            .filter_map(TranscriptLine::from_record)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record, MockHost};
    use crate::types::ChatRecord;
    use anyhow::Context;

    #[test]
    fn empty_group_id_resolves_to_solo() {
        assert_eq!(
            ConversationRef::resolve("ava.png", "c1", Some("")),
            ConversationRef::Solo {
                owner_id: "ava.png".into(),
                chat_id: "c1".into()
            }
        );
        assert!(matches!(
            ConversationRef::resolve("ava.png", "c2", Some("g1")),
            ConversationRef::Group { .. }
        ));
    }

    #[tokio::test]
    async fn unknown_owner_is_character_not_found() {
        let fetcher = ConversationFetcher::new(Arc::new(MockHost::default()));
        let err = fetcher
            .fetch(&ConversationRef::resolve("char1", "c1", None))
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::CharacterNotFound("char1".into()));
    }

    #[tokio::test]
    async fn solo_path_uses_character_name_and_skips_header() {
        let mut host = MockHost::with_cast();
        host.solo.insert(
            ("Ava".into(), "c1".into()),
            vec![
                ChatRecord::default(),
                record("t1", "Ava", "first"),
                record("t2", "You", "second"),
            ],
        );
        let host = Arc::new(host);
        let fetcher = ConversationFetcher::new(host.clone());

        let lines = fetcher
            .fetch(&ConversationRef::resolve("ava.png", "c1", None))
            .await
            .unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].to_string(), "t2 You: second");
        assert_eq!(host.calls(), vec!["solo:Ava:c1:ava.png"]);
    }

    struct Unreachable;

    #[async_trait::async_trait]
    impl HostApi for Unreachable {
        async fn characters(&self) -> anyhow::Result<Vec<crate::types::Character>> {
            Err(anyhow::anyhow!("tcp connect error: Connection refused"))
                .context("Host characters request failed")
        }
        async fn groups(&self) -> anyhow::Result<Vec<crate::types::Group>> {
            Ok(vec![])
        }
        async fn group_chat(&self, _chat_id: &str) -> anyhow::Result<Vec<ChatRecord>> {
            Err(anyhow::anyhow!("tcp connect error: Connection refused"))
                .context("Host group chat request failed")
        }
        async fn solo_chat(&self, _request: &SoloChatRequest) -> anyhow::Result<Vec<ChatRecord>> {
            Ok(vec![])
        }
        async fn visit_link(&self, _url: &str) -> anyhow::Result<String> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn fetch_errors_carry_the_underlying_cause() {
        let fetcher = ConversationFetcher::new(Arc::new(Unreachable));

        let solo = fetcher
            .fetch(&ConversationRef::resolve("ava.png", "c1", None))
            .await
            .unwrap_err();
        assert_eq!(
            solo.to_string(),
            "Failed to fetch transcript: Host characters request failed: tcp connect error: Connection refused"
        );

        let group = fetcher
            .fetch(&ConversationRef::resolve("ava.png", "c2", Some("g1")))
            .await
            .unwrap_err();
        assert!(group.to_string().ends_with("Host group chat request failed: tcp connect error: Connection refused"));
    }

    #[tokio::test]
    async fn group_fetch_failure_is_transcript_error() {
        let host = Arc::new(MockHost::with_cast());
        let fetcher = ConversationFetcher::new(host.clone());

        let err = fetcher
            .fetch(&ConversationRef::resolve("ava.png", "missing", Some("g1")))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::TranscriptFetch(_)));
        assert_eq!(host.calls(), vec!["group:missing"]);
    }
}

//! HTTP client for the chat host's REST endpoints.

use super::{HostApi, SoloChatRequest};
use crate::types::{Character, ChatRecord, Group};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

/// Chat host API client.
#[derive(Debug, Clone)]
pub struct HostClient {
    base_url: String,
    csrf_token: String,
    http: reqwest::Client,
}

// -- Request / response types -----------------------------------------------

#[derive(Debug, Serialize)]
struct GroupChatRequest<'a> {
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct VisitRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct Empty {}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum VisitResponse {
    Page {
        #[serde(alias = "markdown", alias = "content")]
        text: String,
    },
    Raw(String),
}

impl HostClient {
    /// Create a new host client.
    pub fn new(base_url: &str, csrf_token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf_token: csrf_token.to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// POST a JSON body and fail on a non-2xx status.
    async fn send<B>(&self, path: &str, body: &B, what: &str) -> Result<reqwest::Response>
    where
        B: Serialize + Sync,
    {
        debug!("Host request: {}", path);

        let mut req = self.http.post(self.url(path)).json(body);
        if !self.csrf_token.is_empty() {
            req = req.header("X-CSRF-Token", &self.csrf_token);
        }

        let resp = req
            .send()
            .await
            .with_context(|| format!("Host {} request failed", what))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Host {} failed ({}): {}", what, status, body);
        }
        Ok(resp)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, what: &str) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.send(path, body, what)
            .await?
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", what))
    }

    async fn post_text<B>(&self, path: &str, body: &B, what: &str) -> Result<String>
    where
        B: Serialize + Sync,
    {
        self.send(path, body, what)
            .await?
            .text()
            .await
            .with_context(|| format!("Failed to read {} response", what))
    }
}

/// The page-visit endpoint answers with the page itself (HTML or text).
/// Some proxies wrap it as `{"markdown": ...}`; unwrap that when present.
fn page_text(body: String) -> String {
    match serde_json::from_str::<VisitResponse>(&body) {
        Ok(VisitResponse::Page { text }) | Ok(VisitResponse::Raw(text)) => text,
        Err(_) => body,
    }
}

#[async_trait]
impl HostApi for HostClient {
    async fn characters(&self) -> Result<Vec<Character>> {
        self.post_json("/api/characters/all", &Empty {}, "characters")
            .await
    }

    async fn groups(&self) -> Result<Vec<Group>> {
        self.post_json("/api/groups/all", &Empty {}, "groups").await
    }

    async fn group_chat(&self, chat_id: &str) -> Result<Vec<ChatRecord>> {
        self.post_json(
            "/api/chats/group/get",
            &GroupChatRequest { id: chat_id },
            "group chat",
        )
        .await
    }

    async fn solo_chat(&self, request: &SoloChatRequest) -> Result<Vec<ChatRecord>> {
        self.post_json("/api/chats/get", request, "chat").await
    }

    async fn visit_link(&self, url: &str) -> Result<String> {
        let body = self
            .post_text("/api/search/visit", &VisitRequest { url }, "page visit")
            .await?;
        Ok(page_text(body))
    }
}

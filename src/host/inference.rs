//! Quiet sub-agent generation over an OpenAI-compatible chat API.

use super::{QuietGenerator, QuietOptions};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inference client used for sub-agent queries.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    base_url: String,
    api_key: String,
    model: String,
    system_prompt: String,
    temperature: f64,
    http: reqwest::Client,
}

// -- OpenAI-compatible request/response types --------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<MessagePayload<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct MessagePayload<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl InferenceClient {
    /// Create a new inference client.
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            system_prompt: String::new(),
            temperature: 0.7,
            http: reqwest::Client::new(),
        }
    }

    /// System prompt placed ahead of each sub-query (empty for none).
    pub fn with_system_prompt(mut self, prompt: &str) -> Self {
        self.system_prompt = prompt.to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    fn build_request<'a>(&'a self, prompt: &'a str, options: QuietOptions) -> ChatRequest<'a> {
        let mut messages = Vec::with_capacity(2);
        if !self.system_prompt.is_empty() {
            messages.push(MessagePayload {
                role: "system",
                content: &self.system_prompt,
            });
        }
        messages.push(MessagePayload {
            role: "user",
            content: prompt,
        });

        ChatRequest {
            model: &self.model,
            messages,
            max_tokens: options.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl QuietGenerator for InferenceClient {
    async fn generate_quiet(&self, prompt: &str, options: QuietOptions) -> Result<String> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = self.build_request(prompt, options);

        debug!(
            "Quiet generation request to model {} ({} prompt chars)",
            self.model,
            prompt.len()
        );

        let mut req = self.http.post(&url).json(&request);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }

        let resp = req.send().await.context("Inference request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            bail!("Inference failed ({}): {}", status, body);
        }

        let body: ChatResponse = resp
            .json()
            .await
            .context("Failed to parse inference response")?;

        Ok(body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_carries_token_cap_and_optional_system_prompt() {
        let client = InferenceClient::new("http://llm/", "", "local");
        let bare = serde_json::to_value(client.build_request("hi", QuietOptions::tool_response(1000)))
            .unwrap();
        assert_eq!(bare["max_tokens"], json!(1000));
        assert_eq!(bare["messages"], json!([{"role": "user", "content": "hi"}]));

        let client = client.with_system_prompt("You are Ava.");
        let full = serde_json::to_value(client.build_request("hi", QuietOptions::tool_response(64)))
            .unwrap();
        assert_eq!(full["messages"][0]["role"], json!("system"));
        assert_eq!(full["messages"][1]["content"], json!("hi"));
    }

    #[test]
    fn missing_choices_parse_as_empty() {
        let body: ChatResponse = serde_json::from_value(json!({})).unwrap();
        assert!(body.choices.is_empty());
    }
}

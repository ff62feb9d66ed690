//! Minimal client for OpenAI-compatible `/chat/completions` endpoints.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// Sends single-message chat completions with bearer authentication.
#[derive(Debug, Clone)]
pub(crate) struct OpenAICompatibleClient {
    client: Client,
    api_key: String,
    base_url: String,
    provider: &'static str,
}

impl OpenAICompatibleClient {
    pub(crate) fn new(
        provider: &'static str,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ModelError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            provider,
        })
    }

    pub(crate) async fn complete(&self, model: &str, prompt: &str, temperature: f32) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model,
            messages: [ChatMessage { role: "user", content: prompt }],
            temperature,
        };

        debug!(provider = self.provider, model, prompt_chars = prompt.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.provider, model, error = %e, "completion request failed");
                ModelError::Request { provider: self.provider.into(), message: e.to_string() }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ModelError::Response {
            provider: self.provider.into(),
            message: format!("failed to read body: {e}"),
        })?;

        if !status.is_success() {
            error!(provider = self.provider, model, %status, "completion request rejected");
            return Err(ModelError::Response {
                provider: self.provider.into(),
                message: format!("HTTP {status}: {text}"),
            });
        }

        parse_completion(self.provider, &text)
    }
}

/// Extract the first choice's message content from a completion body.
pub(crate) fn parse_completion(provider: &str, body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body).map_err(|e| ModelError::Response {
        provider: provider.into(),
        message: format!("unexpected body: {e}"),
    })?;

    response.choices.into_iter().next().and_then(|c| c.message.content).ok_or_else(|| {
        ModelError::Response {
            provider: provider.into(),
            message: "no message content in the first choice".into(),
        }
    })
}

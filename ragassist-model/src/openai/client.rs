//! OpenAI client implementation.

use async_openai::{
    Client,
    config::OpenAIConfig as AsyncOpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;
use tracing::{debug, error};

use super::config::OpenAIConfig;
use crate::error::{ModelError, Result};
use crate::llm::Llm;

const PROVIDER: &str = "openai";

/// OpenAI client for the standard OpenAI API and OpenAI-compatible APIs.
pub struct OpenAIClient {
    client: Client<AsyncOpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIClient {
    /// Create a new OpenAI client. No request is sent until the first call.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.model.trim().is_empty() {
            return Err(ModelError::Config("OpenAI model name must not be empty".into()));
        }

        let mut openai_config = AsyncOpenAIConfig::new().with_api_key(&config.api_key);
        if let Some(base_url) = &config.base_url {
            openai_config = openai_config.with_api_base(base_url);
        }

        Ok(Self {
            client: Client::with_config(openai_config),
            model: config.model,
            temperature: config.temperature,
        })
    }
}

fn request_error(e: impl std::fmt::Display) -> ModelError {
    ModelError::Request { provider: PROVIDER.into(), message: e.to_string() }
}

#[async_trait]
impl Llm for OpenAIClient {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(request_error)?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .temperature(self.temperature)
            .messages(vec![message.into()])
            .build()
            .map_err(request_error)?;

        debug!(provider = PROVIDER, model = %self.model, prompt_chars = prompt.len(), "sending completion request");

        let response = self.client.chat().create(request).await.map_err(|e| {
            error!(provider = PROVIDER, model = %self.model, error = %e, "completion request failed");
            request_error(format!("OpenAI API error: {e}"))
        })?;

        response.choices.into_iter().next().and_then(|choice| choice.message.content).ok_or_else(
            || ModelError::Response {
                provider: PROVIDER.into(),
                message: "no message content in the first choice".into(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_reports_model_and_provider() {
        let client = OpenAIClient::new(OpenAIConfig::new("sk-test", "gpt-4o-mini")).unwrap();
        assert_eq!(client.name(), "gpt-4o-mini");
        assert_eq!(client.provider(), "openai");
    }

    #[test]
    fn blank_model_is_rejected() {
        assert!(OpenAIClient::new(OpenAIConfig::new("sk-test", " ")).is_err());
    }
}

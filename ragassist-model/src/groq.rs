//! Groq models through Groq's OpenAI-compatible API.

use async_trait::async_trait;

use crate::compat::OpenAICompatibleClient;
use crate::error::Result;
use crate::llm::{DEFAULT_TEMPERATURE, Llm};

/// Groq's OpenAI-compatible base URL.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Model used when `GROQ_MODEL` is not set.
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// A Groq-hosted chat model.
#[derive(Debug, Clone)]
pub struct GroqClient {
    inner: OpenAICompatibleClient,
    model: String,
    temperature: f32,
}

impl GroqClient {
    /// Create a client for `model` using the public Groq endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, model, GROQ_API_BASE)
    }

    /// Create a client against a different OpenAI-compatible base URL.
    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            inner: OpenAICompatibleClient::new("groq", api_key, base_url)?,
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        })
    }
}

#[async_trait]
impl Llm for GroqClient {
    fn provider(&self) -> &str {
        "groq"
    }

    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.inner.complete(&self.model, prompt, self.temperature).await
    }
}

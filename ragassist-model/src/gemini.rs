//! Google Gemini models through the `generateContent` REST endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{ModelError, Result};
use crate::llm::{DEFAULT_TEMPERATURE, Llm};

const PROVIDER: &str = "gemini";

/// Gemini API base URL.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when `GOOGLE_MODEL` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [GeminiMessage<'a>; 1],
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiMessage<'a> {
    role: &'a str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// A Gemini chat model authenticated with a Google API key.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ModelError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: GEMINI_API_BASE.to_string(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
        })
    }
}

#[async_trait]
impl Llm for GeminiClient {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateRequest {
            contents: [GeminiMessage { role: "user", parts: [RequestPart { text: prompt }] }],
            generation_config: GenerationConfig { temperature: self.temperature },
        };

        debug!(provider = PROVIDER, model = %self.model, prompt_chars = prompt.len(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = PROVIDER, model = %self.model, error = %e, "completion request failed");
                ModelError::Request { provider: PROVIDER.into(), message: e.to_string() }
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ModelError::Response {
            provider: PROVIDER.into(),
            message: format!("failed to read body: {e}"),
        })?;
        if !status.is_success() {
            error!(provider = PROVIDER, model = %self.model, %status, "completion request rejected");
            return Err(ModelError::Response {
                provider: PROVIDER.into(),
                message: format!("HTTP {status}: {text}"),
            });
        }

        parse_generate_response(&text)
    }
}

/// Concatenate the text parts of the first candidate.
fn parse_generate_response(body: &str) -> Result<String> {
    let response: GenerateResponse = serde_json::from_str(body).map_err(|e| {
        ModelError::Response { provider: PROVIDER.into(), message: format!("unexpected body: {e}") }
    })?;

    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .ok_or_else(|| ModelError::Response {
            provider: PROVIDER.into(),
            message: "no candidates returned".into(),
        })?;

    Ok(content.parts.into_iter().filter_map(|part| part.text).collect())
}

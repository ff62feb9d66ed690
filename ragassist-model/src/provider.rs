//! Credential-driven backend selection.
//!
//! A [`ProviderChain`] is an ordered list of backends. Each entry names the
//! credential variable that enables it, the variable that overrides its model,
//! and the model used otherwise. The first entry whose credential is present
//! and non-blank wins.
//!
//! ```rust
//! use std::collections::HashMap;
//! use ragassist_model::{Llm, ProviderChain};
//!
//! let mut credentials = HashMap::new();
//! credentials.insert("GROQ_API_KEY".to_string(), "gsk-test".to_string());
//!
//! let llm = ProviderChain::standard().select(&credentials).unwrap();
//! assert_eq!(llm.provider(), "groq");
//! assert_eq!(llm.name(), "llama-3.1-8b-instant");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{ModelError, Result};
use crate::gemini::{DEFAULT_GEMINI_MODEL, GeminiClient};
use crate::groq::{DEFAULT_GROQ_MODEL, GroqClient};
use crate::llm::Llm;
use crate::openai::{DEFAULT_OPENAI_MODEL, OpenAIClient, OpenAIConfig};

/// A source of credential and model-name values.
pub trait CredentialSource {
    /// Look up `key`. Absent keys return `None`.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads credentials from process environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl CredentialSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

/// Constructs a backend from an API key and a model name.
pub type ProviderFactory = fn(api_key: String, model: String) -> Result<Arc<dyn Llm>>;

/// One backend in a [`ProviderChain`].
#[derive(Debug, Clone)]
pub struct ProviderEntry {
    pub name: &'static str,
    pub credential_key: &'static str,
    pub model_key: &'static str,
    pub default_model: &'static str,
    pub factory: ProviderFactory,
}

/// An ordered list of backends, tried by credential presence.
#[derive(Debug, Clone)]
pub struct ProviderChain {
    entries: Vec<ProviderEntry>,
}

fn openai_factory(api_key: String, model: String) -> Result<Arc<dyn Llm>> {
    Ok(Arc::new(OpenAIClient::new(OpenAIConfig::new(api_key, model))?))
}

fn groq_factory(api_key: String, model: String) -> Result<Arc<dyn Llm>> {
    Ok(Arc::new(GroqClient::new(api_key, model)?))
}

fn gemini_factory(api_key: String, model: String) -> Result<Arc<dyn Llm>> {
    Ok(Arc::new(GeminiClient::new(api_key, model)?))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ProviderChain {
    /// A chain with custom entries, highest priority first.
    pub fn new(entries: Vec<ProviderEntry>) -> Self {
        Self { entries }
    }

    /// OpenAI, then Groq, then Google Gemini.
    pub fn standard() -> Self {
        Self::new(vec![
            ProviderEntry {
                name: "openai",
                credential_key: "OPENAI_API_KEY",
                model_key: "OPENAI_MODEL",
                default_model: DEFAULT_OPENAI_MODEL,
                factory: openai_factory,
            },
            ProviderEntry {
                name: "groq",
                credential_key: "GROQ_API_KEY",
                model_key: "GROQ_MODEL",
                default_model: DEFAULT_GROQ_MODEL,
                factory: groq_factory,
            },
            ProviderEntry {
                name: "gemini",
                credential_key: "GOOGLE_API_KEY",
                model_key: "GOOGLE_MODEL",
                default_model: DEFAULT_GEMINI_MODEL,
                factory: gemini_factory,
            },
        ])
    }

    /// The entries in priority order.
    pub fn entries(&self) -> &[ProviderEntry] {
        &self.entries
    }

    /// The credential variables this chain checks, in priority order.
    pub fn credential_keys(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.credential_key.to_string()).collect()
    }

    /// Bind the first backend whose credential is set.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NoProvider`] if no credential is set, or the
    /// factory's error if the chosen backend cannot be constructed. A failing
    /// factory does not fall through to lower-priority entries.
    pub fn select(&self, credentials: &dyn CredentialSource) -> Result<Arc<dyn Llm>> {
        for entry in &self.entries {
            let Some(api_key) = non_blank(credentials.get(entry.credential_key)) else {
                debug!(provider = entry.name, key = entry.credential_key, "credential not set");
                continue;
            };
            let model = non_blank(credentials.get(entry.model_key))
                .unwrap_or_else(|| entry.default_model.to_string());

            info!(provider = entry.name, model = %model, "language model selected");
            return (entry.factory)(api_key, model);
        }

        Err(ModelError::NoProvider { keys: self.credential_keys() })
    }
}

impl Default for ProviderChain {
    fn default() -> Self {
        Self::standard()
    }
}

//! # ragassist-model
//!
//! Language model backends for ragassist.
//!
//! ## Overview
//!
//! Every backend implements [`Llm`]: one prompt in, one answer out, sent at
//! temperature 0.0.
//!
//! - [`OpenAIClient`] - OpenAI chat completions via `async-openai`
//! - [`GroqClient`] - Groq's OpenAI-compatible endpoint
//! - [`GeminiClient`] - Google Gemini `generateContent`
//! - [`MockLlm`] - scripted replies for tests
//!
//! [`ProviderChain`] picks the backend from whichever credential is set:
//!
//! | Priority | Credential | Model variable | Default model |
//! |----------|------------|----------------|---------------|
//! | 1 | `OPENAI_API_KEY` | `OPENAI_MODEL` | `gpt-4o-mini` |
//! | 2 | `GROQ_API_KEY` | `GROQ_MODEL` | `llama-3.1-8b-instant` |
//! | 3 | `GOOGLE_API_KEY` | `GOOGLE_MODEL` | `gemini-2.0-flash` |
//!
//! ```rust,no_run
//! use ragassist_model::{EnvCredentials, ProviderChain};
//!
//! let llm = ProviderChain::standard().select(&EnvCredentials).unwrap();
//! ```

mod compat;
pub mod error;
pub mod gemini;
pub mod groq;
pub mod llm;
pub mod mock;
pub mod openai;
pub mod provider;

pub use error::{ModelError, Result};
pub use gemini::GeminiClient;
pub use groq::GroqClient;
pub use llm::Llm;
pub use mock::MockLlm;
pub use openai::OpenAIClient;
pub use provider::{CredentialSource, EnvCredentials, ProviderChain, ProviderEntry};

//! OpenAI chat completions through `async-openai`.
//!
//! # Example
//!
//! ```rust,ignore
//! use ragassist_model::openai::{OpenAIClient, OpenAIConfig};
//!
//! let model = OpenAIClient::new(OpenAIConfig::new(
//!     std::env::var("OPENAI_API_KEY").unwrap(),
//!     "gpt-4o-mini",
//! ))?;
//! let answer = model.complete("Why is the sky blue?").await?;
//! ```

mod client;
mod config;

pub use client::OpenAIClient;
pub use config::{DEFAULT_OPENAI_MODEL, OpenAIConfig};

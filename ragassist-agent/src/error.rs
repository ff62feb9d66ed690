//! Error types for the `ragassist-agent` crate.

use ragassist_model::ModelError;
use ragassist_rag::RagError;
use thiserror::Error;

/// Errors raised while building or running the assistant.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Retrieval or ingestion failed.
    #[error(transparent)]
    Rag(#[from] RagError),

    /// The language model call failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A prompt template is malformed.
    #[error("Invalid prompt template: {0}")]
    Prompt(String),

    /// The assistant is missing a required part.
    #[error("Assistant configuration error: {0}")]
    Config(String),
}

/// A convenience result type for assistant operations.
pub type Result<T> = std::result::Result<T, AgentError>;

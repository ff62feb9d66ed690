//! # ragassist-agent
//!
//! The question-answering side of ragassist: [`PromptComposer`] fills a YAML
//! prompt template and [`RagAssistant`] retrieves context, builds the prompt,
//! and asks the language model.

pub mod assistant;
pub mod error;
pub mod prompt;

pub use assistant::{CONTEXT_SEPARATOR, RagAssistant, RagAssistantBuilder};
pub use error::{AgentError, Result};
pub use prompt::PromptComposer;

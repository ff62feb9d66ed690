//! The language model seam.

use async_trait::async_trait;

use crate::error::Result;

/// Default sampling temperature used by every backend.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// A chat model that turns a single prompt into a single answer.
///
/// Backends send the prompt as one user message and return the text of the
/// first choice verbatim. Calls are not retried.
#[async_trait]
pub trait Llm: Send + Sync {
    /// Short backend identifier, such as `openai`.
    fn provider(&self) -> &str;

    /// The model name requests are sent to.
    fn name(&self) -> &str;

    /// Send `prompt` and wait for the complete answer.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

//! The retrieval-augmented assistant.

use std::sync::Arc;

use ragassist_model::Llm;
use ragassist_rag::{Chunk, Document, RagPipeline};
use tracing::{debug, info};

use crate::error::{AgentError, Result};
use crate::prompt::PromptComposer;

/// Separator placed between retrieved chunks in the prompt context.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Answers questions from retrieved document chunks.
///
/// Each question is embedded and matched against the pipeline's collection;
/// the nearest chunks are joined into the prompt's `{context}` and the filled
/// prompt is sent to the language model. The model's answer is returned
/// verbatim. Questions are independent: no conversation history is kept.
///
/// # Example
///
/// ```rust,ignore
/// let assistant = RagAssistant::builder()
///     .llm(llm)
///     .pipeline(Arc::new(pipeline))
///     .prompt(PromptComposer::load("./configuration/system_prompt.yaml"))
///     .build()?;
///
/// assistant.add_documents(&documents).await?;
/// let answer = assistant.invoke("Why is the sky blue?").await?;
/// ```
pub struct RagAssistant {
    llm: Arc<dyn Llm>,
    pipeline: Arc<RagPipeline>,
    prompt: PromptComposer,
    top_k: usize,
}

impl RagAssistant {
    pub fn builder() -> RagAssistantBuilder {
        RagAssistantBuilder::default()
    }

    pub fn llm(&self) -> &Arc<dyn Llm> {
        &self.llm
    }

    pub fn pipeline(&self) -> &Arc<RagPipeline> {
        &self.pipeline
    }

    pub fn prompt(&self) -> &PromptComposer {
        &self.prompt
    }

    /// Number of chunks retrieved by [`invoke`](Self::invoke).
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Chunk, embed, and store `documents`.
    pub async fn add_documents(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        Ok(self.pipeline.add(documents).await?)
    }

    /// Answer `question` using the configured number of chunks.
    pub async fn invoke(&self, question: &str) -> Result<String> {
        self.invoke_with_k(question, self.top_k).await
    }

    /// Answer `question` using the `k` nearest chunks as context.
    ///
    /// With no matching chunks the context is empty and the model is still
    /// asked.
    ///
    /// # Errors
    ///
    /// Propagates retrieval and model failures; nothing is retried.
    pub async fn invoke_with_k(&self, question: &str, k: usize) -> Result<String> {
        let context = self.retrieve_context(question, k).await?;
        let prompt = self.prompt.build(&context, question);

        debug!(
            provider = self.llm.provider(),
            model = self.llm.name(),
            prompt_chars = prompt.len(),
            "asking language model"
        );
        let answer = self.llm.complete(&prompt).await?;
        info!(question_chars = question.len(), answer_chars = answer.len(), "question answered");
        Ok(answer)
    }

    /// The `k` nearest chunk texts in rank order, joined with blank lines.
    pub async fn retrieve_context(&self, question: &str, k: usize) -> Result<String> {
        let results = self.pipeline.search(question, k).await?;
        debug!(k, retrieved = results.len(), "context retrieved");
        Ok(results.iter().map(|r| r.text.as_str()).collect::<Vec<_>>().join(CONTEXT_SEPARATOR))
    }
}

/// Builder for [`RagAssistant`]. The language model and pipeline are required.
#[derive(Default)]
pub struct RagAssistantBuilder {
    llm: Option<Arc<dyn Llm>>,
    pipeline: Option<Arc<RagPipeline>>,
    prompt: Option<PromptComposer>,
    top_k: Option<usize>,
}

impl RagAssistantBuilder {
    pub fn llm(mut self, llm: Arc<dyn Llm>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn pipeline(mut self, pipeline: Arc<RagPipeline>) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// Set the prompt template. Defaults to an empty template.
    pub fn prompt(mut self, prompt: PromptComposer) -> Self {
        self.prompt = Some(prompt);
        self
    }

    /// Override the pipeline's configured `top_k`.
    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Build a ready assistant.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] if the language model or the pipeline is
    /// missing, or `top_k` is zero.
    pub fn build(self) -> Result<RagAssistant> {
        let llm = self.llm.ok_or_else(|| AgentError::Config("llm is required".to_string()))?;
        let pipeline =
            self.pipeline.ok_or_else(|| AgentError::Config("pipeline is required".to_string()))?;
        let top_k = self.top_k.unwrap_or(pipeline.config().top_k);
        if top_k == 0 {
            return Err(AgentError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(RagAssistant { llm, pipeline, prompt: self.prompt.unwrap_or_default(), top_k })
    }
}

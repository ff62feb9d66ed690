//! Assembling a ready assistant from configuration.

use std::sync::Arc;

use anyhow::{Context, Result};
use ragassist_agent::{PromptComposer, RagAssistant};
use ragassist_model::{CredentialSource, Llm, ProviderChain};
use ragassist_rag::{EmbeddingProvider, FastEmbedProvider, LanceVectorStore, RagPipeline, VectorStore};
use tracing::info;

use crate::config::AppConfig;

/// Build the assistant: language model first, then the embedding model, the
/// vector database, and the prompt template.
///
/// Credentials are checked before anything slow is loaded, so a missing API
/// key fails fast.
pub async fn bootstrap(config: &AppConfig, credentials: &dyn CredentialSource) -> Result<RagAssistant> {
    let llm = ProviderChain::standard().select(credentials)?;

    let embedder = FastEmbedProvider::load(&config.embedding_model)
        .await
        .with_context(|| format!("loading embedding model '{}'", config.embedding_model))?;

    let store = LanceVectorStore::connect(&config.db_path)
        .await
        .with_context(|| format!("opening vector database at {}", config.db_path.display()))?;

    assemble(config, llm, Arc::new(embedder), Arc::new(store)).await
}

/// Wire already-constructed backends into an assistant.
///
/// Opens the collection, clears it when `--reset` is given, and loads the
/// prompt template (a bad template falls back to an empty one).
pub async fn assemble(
    config: &AppConfig,
    llm: Arc<dyn Llm>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
) -> Result<RagAssistant> {
    let pipeline = RagPipeline::builder()
        .config(config.rag_config()?)
        .embedding_provider(embedder)
        .vector_store(store)
        .build()
        .await?;

    if config.reset {
        pipeline.reset().await?;
    }

    let prompt = PromptComposer::load(&config.prompt_path);
    let assistant =
        RagAssistant::builder().llm(llm).pipeline(Arc::new(pipeline)).prompt(prompt).build()?;

    info!(
        provider = assistant.llm().provider(),
        model = assistant.llm().name(),
        collection = %config.collection,
        top_k = assistant.top_k(),
        "assistant ready"
    );
    Ok(assistant)
}

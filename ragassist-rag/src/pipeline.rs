//! Vector store adapter.
//!
//! The [`RagPipeline`] owns one collection and coordinates document ingestion
//! (chunk → embed → store) and retrieval (embed → search → normalise) by
//! composing an [`EmbeddingProvider`], a [`VectorStore`], and a [`Chunker`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ragassist_rag::{InMemoryVectorStore, MockEmbeddingProvider, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(MockEmbeddingProvider::default()))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .build()
//!     .await?;
//!
//! pipeline.add(&documents).await?;
//! let results = pipeline.search("search query", 3).await?;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, error, info};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::RagConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// The vector store adapter.
///
/// Document indices keep increasing across [`add`](RagPipeline::add) calls
/// on the same pipeline, so chunk IDs stay unique within a session. Running
/// the same corpus through a fresh pipeline reproduces the same IDs and
/// overwrites the earlier records instead of duplicating them.
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
    next_document: AtomicUsize,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Chunk, embed, and store a batch of documents.
    ///
    /// All chunk texts are embedded in a single batched call and written in a
    /// single upsert. Returns the stored chunks with embeddings attached.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if embedding or storage fails, or if
    /// the embedding backend returns the wrong number or size of vectors. In
    /// those cases nothing is written and document numbering does not advance.
    pub async fn add(&self, documents: &[Document]) -> Result<Vec<Chunk>> {
        let first_index = self.next_document.load(Ordering::SeqCst);

        let mut chunks: Vec<Chunk> = documents
            .iter()
            .enumerate()
            .flat_map(|(offset, document)| self.chunker.chunk(first_index + offset, document))
            .collect();

        if chunks.is_empty() {
            info!(documents = documents.len(), chunk_count = 0, "nothing to ingest");
            self.next_document.store(first_index + documents.len(), Ordering::SeqCst);
            return Ok(chunks);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(chunk_count = chunks.len(), error = %e, "embedding failed during ingestion");
            RagError::PipelineError(format!("embedding failed: {e}"))
        })?;

        if embeddings.len() != chunks.len() {
            return Err(RagError::PipelineError(format!(
                "embedding backend returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }
        let dimensions = self.embedding_provider.dimensions();
        if let Some(bad) = embeddings.iter().position(|e| e.len() != dimensions) {
            return Err(RagError::PipelineError(format!(
                "embedding for chunk '{}' has {} dimensions, expected {dimensions}",
                chunks[bad].id,
                embeddings[bad].len()
            )));
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        let collection = &self.config.collection;
        self.vector_store.upsert(collection, &chunks).await.map_err(|e| {
            error!(collection = %collection, error = %e, "upsert failed during ingestion");
            RagError::PipelineError(format!("upsert failed in collection '{collection}': {e}"))
        })?;

        self.next_document.store(first_index + documents.len(), Ordering::SeqCst);
        info!(
            collection = %collection,
            documents = documents.len(),
            chunk_count = chunks.len(),
            "ingested documents"
        );
        Ok(chunks)
    }

    /// Retrieve the `k` chunks nearest to `query`.
    ///
    /// Results are ordered by non-decreasing distance and contain at most `k`
    /// entries. `k == 0` returns an empty list without calling any backend.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if embedding or search fails.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during search");
            RagError::PipelineError(format!("query embedding failed: {e}"))
        })?;

        let collection = &self.config.collection;
        let mut results =
            self.vector_store.search(collection, &query_embedding, k).await.map_err(|e| {
                error!(collection = %collection, error = %e, "vector store search failed");
                RagError::PipelineError(format!("search failed in collection '{collection}': {e}"))
            })?;

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(k);

        debug!(collection = %collection, k, result_count = results.len(), "search completed");
        Ok(results)
    }

    /// Number of records in the collection.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if the backend cannot be queried.
    pub async fn count(&self) -> Result<usize> {
        let collection = &self.config.collection;
        self.vector_store.count(collection).await.map_err(|e| {
            RagError::PipelineError(format!("count failed in collection '{collection}': {e}"))
        })
    }

    /// Remove every record and restart document numbering at zero.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if the backend cannot be cleared.
    pub async fn reset(&self) -> Result<()> {
        let collection = &self.config.collection;
        self.vector_store.clear_collection(collection).await.map_err(|e| {
            error!(collection = %collection, error = %e, "failed to clear collection");
            RagError::PipelineError(format!("failed to clear collection '{collection}': {e}"))
        })?;
        self.next_document.store(0, Ordering::SeqCst);
        info!(collection = %collection, "collection reset");
        Ok(())
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `embedding_provider` and `vector_store` are required. The configuration
/// defaults to [`RagConfig::default()`] and the chunker to a
/// [`RecursiveChunker`] using the configured size and overlap.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Override the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`] and open (or create) its collection.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if a required field is missing or the
    /// chunking parameters are invalid, and [`RagError::PipelineError`] if the
    /// collection cannot be opened.
    pub async fn build(self) -> Result<RagPipeline> {
        let config = self.config.unwrap_or_default();
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let chunker: Arc<dyn Chunker> = match self.chunker {
            Some(chunker) => chunker,
            None => Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap)?),
        };

        let dimensions = embedding_provider.dimensions();
        vector_store.create_collection(&config.collection, dimensions).await.map_err(|e| {
            error!(collection = %config.collection, error = %e, "failed to open collection");
            RagError::PipelineError(format!(
                "failed to open collection '{}': {e}",
                config.collection
            ))
        })?;
        info!(collection = %config.collection, dimensions, "collection ready");

        Ok(RagPipeline {
            config,
            embedding_provider,
            vector_store,
            chunker,
            next_document: AtomicUsize::new(0),
        })
    }
}

//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for vector embeddings with nearest-neighbor search.
///
/// Implementations manage named collections of chunk records keyed by chunk
/// ID. Writing a record whose ID already exists replaces it.
///
/// # Example
///
/// ```rust,ignore
/// use ragassist_rag::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("docs", 384).await?;
/// store.upsert("docs", &chunks).await?;
/// let results = store.search("docs", &query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection, or open it if it already exists.
    ///
    /// Opening an existing collection whose vectors have a different
    /// dimensionality is an error.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Remove every record from a collection, keeping the collection itself.
    async fn clear_collection(&self, name: &str) -> Result<()>;

    /// Upsert chunks into a collection. Chunks must have embeddings set.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Search for the `top_k` chunks nearest to the given embedding.
    ///
    /// Returns results ordered by ascending distance. An empty collection
    /// yields an empty result.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;

    /// Number of records stored in a collection.
    async fn count(&self, collection: &str) -> Result<usize>;
}

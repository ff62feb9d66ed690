//! In-memory vector store using squared L2 distance.
//!
//! This module provides [`InMemoryVectorStore`], a vector store backed by a
//! `HashMap` protected by a `tokio::sync::RwLock`. Nothing is persisted; it is
//! intended for tests and throwaway sessions.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

#[derive(Debug, Default)]
struct Collection {
    dimensions: usize,
    records: HashMap<String, Chunk>,
}

/// An in-memory vector store ranking by squared Euclidean distance.
///
/// Collections are stored as nested `HashMap`s: collection name → chunk ID → chunk.
/// Upserts validate every chunk before writing any of them, so a rejected
/// batch leaves the collection untouched.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Squared Euclidean distance, the default metric of embedded vector stores.
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn missing_collection(name: &str) -> RagError {
    RagError::VectorStoreError {
        backend: "InMemory".to_string(),
        message: format!("collection '{name}' does not exist"),
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        let collection = collections
            .entry(name.to_string())
            .or_insert_with(|| Collection { dimensions, records: HashMap::new() });
        if collection.dimensions != dimensions {
            return Err(RagError::VectorStoreError {
                backend: "InMemory".to_string(),
                message: format!(
                    "collection '{name}' stores {}-dimensional vectors, not {dimensions}",
                    collection.dimensions
                ),
            });
        }
        Ok(())
    }

    async fn clear_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        let collection = collections.get_mut(name).ok_or_else(|| missing_collection(name))?;
        collection.records.clear();
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        let store = collections.get_mut(collection).ok_or_else(|| missing_collection(collection))?;

        if let Some(bad) = chunks.iter().find(|c| c.embedding.len() != store.dimensions) {
            return Err(RagError::VectorStoreError {
                backend: "InMemory".to_string(),
                message: format!(
                    "chunk '{}' has {} dimensions, collection '{collection}' expects {}",
                    bad.id,
                    bad.embedding.len(),
                    store.dimensions
                ),
            });
        }

        for chunk in chunks {
            store.records.insert(chunk.id.clone(), chunk.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        let store = collections.get(collection).ok_or_else(|| missing_collection(collection))?;

        let mut scored: Vec<SearchResult> = store
            .records
            .values()
            .map(|chunk| SearchResult {
                id: chunk.id.clone(),
                text: chunk.text.clone(),
                metadata: chunk.metadata.clone(),
                distance: squared_l2(&chunk.embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance).then_with(|| a.id.cmp(&b.id)));
        scored.truncate(top_k);
        Ok(scored)
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let collections = self.collections.read().await;
        let store = collections.get(collection).ok_or_else(|| missing_collection(collection))?;
        Ok(store.records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Metadata;

    fn chunk(id: &str, embedding: Vec<f32>) -> Chunk {
        Chunk {
            id: id.to_string(),
            document_index: 0,
            chunk_index: 0,
            text: format!("text of {id}"),
            metadata: Metadata::new(),
            embedding,
        }
    }

    #[tokio::test]
    async fn rejects_mismatched_dimensions_without_writing() {
        let store = InMemoryVectorStore::new();
        store.create_collection("docs", 2).await.unwrap();
        let err = store
            .upsert("docs", &[chunk("a", vec![1.0, 0.0]), chunk("b", vec![1.0])])
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::VectorStoreError { .. }));
        assert_eq!(store.count("docs").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn reopening_with_other_dimensions_fails() {
        let store = InMemoryVectorStore::new();
        store.create_collection("docs", 2).await.unwrap();
        store.create_collection("docs", 2).await.unwrap();
        assert!(store.create_collection("docs", 3).await.is_err());
    }

    #[tokio::test]
    async fn upsert_replaces_by_id_and_clear_empties() {
        let store = InMemoryVectorStore::new();
        store.create_collection("docs", 2).await.unwrap();
        store.upsert("docs", &[chunk("a", vec![1.0, 0.0])]).await.unwrap();
        store.upsert("docs", &[chunk("a", vec![0.0, 1.0])]).await.unwrap();
        assert_eq!(store.count("docs").await.unwrap(), 1);

        let hits = store.search("docs", &[0.0, 1.0], 5).await.unwrap();
        assert_eq!(hits[0].distance, 0.0);

        store.clear_collection("docs").await.unwrap();
        assert!(store.search("docs", &[0.0, 1.0], 5).await.unwrap().is_empty());
    }
}

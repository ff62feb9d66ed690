//! Property tests for in-memory vector store search ordering.

use std::collections::HashMap;

use proptest::prelude::*;
use ragassist_rag::document::{Chunk, Metadata};
use ragassist_rag::inmemory::InMemoryVectorStore;
use ragassist_rag::vectorstore::VectorStore;

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map(
        "non-zero embedding",
        |mut v| {
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm < 1e-8 {
                return None;
            }
            for val in &mut v {
                *val /= norm;
            }
            Some(v)
        },
    )
}

/// Generate a chunk with a normalized embedding.
fn arb_chunk(dim: usize) -> impl Strategy<Value = Chunk> {
    (0usize..5, 0usize..10, "[a-z ]{5,30}", arb_normalized_embedding(dim)).prop_map(
        |(document_index, chunk_index, text, embedding)| Chunk {
            id: Chunk::make_id(document_index, chunk_index),
            document_index,
            chunk_index,
            text,
            metadata: Metadata::new(),
            embedding,
        },
    )
}

/// Search results are ordered by ascending distance and never exceed `top_k`
/// or the number of stored records.
mod prop_inmemory_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn results_ordered_ascending_and_bounded_by_top_k(
            chunks in proptest::collection::vec(arb_chunk(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            top_k in 0usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, unique_count) = rt.block_on(async {
                let store = InMemoryVectorStore::new();
                store.create_collection("test", DIM).await.unwrap();

                let mut deduped: HashMap<String, Chunk> = HashMap::new();
                for chunk in &chunks {
                    deduped.insert(chunk.id.clone(), chunk.clone());
                }
                let unique_count = deduped.len();
                let unique_chunks: Vec<Chunk> = deduped.into_values().collect();

                store.upsert("test", &unique_chunks).await.unwrap();
                (store.search("test", &query, top_k).await.unwrap(), unique_count)
            });

            prop_assert!(results.len() <= top_k);
            prop_assert_eq!(results.len(), top_k.min(unique_count));

            for window in results.windows(2) {
                prop_assert!(
                    window[0].distance <= window[1].distance,
                    "results not in ascending order: {} > {}",
                    window[0].distance,
                    window[1].distance,
                );
            }
        }

        #[test]
        fn stored_vector_is_its_own_nearest_neighbour(
            chunks in proptest::collection::vec(arb_chunk(DIM), 1..20),
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let store = InMemoryVectorStore::new();
                store.create_collection("test", DIM).await.unwrap();
                store.upsert("test", &chunks).await.unwrap();

                let last = chunks.last().unwrap();
                let results = store.search("test", &last.embedding, 1).await.unwrap();
                assert_eq!(results.len(), 1);
                assert!(results[0].distance <= 1e-6);
            });
        }
    }
}

#[tokio::test]
async fn empty_collection_returns_nothing_for_any_k() {
    let store = InMemoryVectorStore::new();
    store.create_collection("empty", 4).await.unwrap();
    for k in [0, 1, 3, 100] {
        assert!(store.search("empty", &[0.5, 0.5, 0.5, 0.5], k).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn unknown_collection_is_an_error() {
    let store = InMemoryVectorStore::new();
    assert!(store.search("missing", &[1.0], 1).await.is_err());
    assert!(store.count("missing").await.is_err());
}

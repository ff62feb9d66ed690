//! Integration tests for the vector store adapter.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use proptest::prelude::*;
use ragassist_rag::{
    Document, EmbeddingProvider, InMemoryVectorStore, MockEmbeddingProvider, RagConfig, RagError,
    RagPipeline, Result, VectorStore,
};

/// An embedder whose backend is always down.
struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(RagError::EmbeddingError { provider: "failing".into(), message: "offline".into() })
    }

    fn dimensions(&self) -> usize {
        8
    }
}

/// An embedder that returns vectors shorter than it advertises.
struct ShortEmbedder;

#[async_trait]
impl EmbeddingProvider for ShortEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.0; 4])
    }

    fn dimensions(&self) -> usize {
        8
    }
}

fn config(chunk_size: usize, chunk_overlap: usize) -> RagConfig {
    RagConfig::builder().chunk_size(chunk_size).chunk_overlap(chunk_overlap).build().unwrap()
}

async fn pipeline_with(
    config: RagConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<InMemoryVectorStore>,
) -> RagPipeline {
    RagPipeline::builder()
        .config(config)
        .embedding_provider(embedder)
        .vector_store(store)
        .build()
        .await
        .unwrap()
}

async fn mock_pipeline(config: RagConfig) -> (RagPipeline, Arc<InMemoryVectorStore>) {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline =
        pipeline_with(config, Arc::new(MockEmbeddingProvider::new(32)), store.clone()).await;
    (pipeline, store)
}

fn corpus() -> Vec<Document> {
    vec![
        Document::new("The sky is blue because of Rayleigh scattering.")
            .with_metadata("source", "sky.txt"),
        Document::new("Sunsets look red because light travels through more atmosphere.")
            .with_metadata("source", "sunset.txt"),
        Document::new("Clouds are white because water droplets scatter all wavelengths equally.")
            .with_metadata("source", "clouds.txt"),
    ]
}

#[tokio::test]
async fn empty_store_search_is_empty_for_any_k() {
    let (pipeline, _) = mock_pipeline(RagConfig::default()).await;
    for k in [0, 1, 3, 50] {
        assert!(pipeline.search("why is the sky blue?", k).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn zero_k_does_not_touch_the_embedder() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = pipeline_with(RagConfig::default(), Arc::new(FailingEmbedder), store).await;
    assert!(pipeline.search("anything", 0).await.unwrap().is_empty());
    assert!(pipeline.search("anything", 1).await.is_err());
}

#[tokio::test]
async fn chunk_ids_are_unique_within_one_add() {
    let (pipeline, store) = mock_pipeline(config(20, 5)).await;
    let chunks = pipeline.add(&corpus()).await.unwrap();

    let ids: HashSet<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids.len(), chunks.len());
    assert!(chunks.len() > 3);
    assert_eq!(store.count("rag_documents").await.unwrap(), chunks.len());
}

#[tokio::test]
async fn verbatim_chunk_text_retrieves_that_chunk_first() {
    let (pipeline, _) = mock_pipeline(RagConfig::default()).await;
    let chunks = pipeline.add(&corpus()).await.unwrap();

    for chunk in &chunks {
        let results = pipeline.search(&chunk.text, 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, chunk.id);
        assert_eq!(results[0].text, chunk.text);
        assert_eq!(results[0].metadata, chunk.metadata);
    }
}

#[tokio::test]
async fn verbatim_round_trip_holds_across_a_large_corpus() {
    let (pipeline, _) = mock_pipeline(RagConfig::default()).await;
    let documents: Vec<Document> = (0..300)
        .map(|i| Document::new(format!("Document number {i} talks about topic {}.", i * 7 % 50)))
        .collect();
    let chunks = pipeline.add(&documents).await.unwrap();
    assert_eq!(chunks.len(), documents.len());

    for chunk in &chunks {
        let results = pipeline.search(&chunk.text, 1).await.unwrap();
        assert_eq!(results[0].id, chunk.id, "query {:?}", chunk.text);
        assert_eq!(results[0].text, chunk.text);
    }
}

#[tokio::test]
async fn search_orders_by_distance_and_caps_at_k() {
    let (pipeline, _) = mock_pipeline(config(30, 10)).await;
    pipeline.add(&corpus()).await.unwrap();

    let results = pipeline.search("Rayleigh scattering", 3).await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
}

#[tokio::test]
async fn failing_embedder_writes_nothing() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline =
        pipeline_with(RagConfig::default(), Arc::new(FailingEmbedder), store.clone()).await;

    let err = pipeline.add(&corpus()).await.unwrap_err();
    assert!(matches!(err, RagError::PipelineError(_)));
    assert_eq!(store.count("rag_documents").await.unwrap(), 0);
}

#[tokio::test]
async fn wrong_dimension_embeddings_are_rejected_before_writing() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline =
        pipeline_with(RagConfig::default(), Arc::new(ShortEmbedder), store.clone()).await;

    assert!(pipeline.add(&corpus()).await.is_err());
    assert_eq!(store.count("rag_documents").await.unwrap(), 0);
}

#[tokio::test]
async fn document_numbering_continues_across_add_calls() {
    let (pipeline, _) = mock_pipeline(RagConfig::default()).await;
    let docs = corpus();

    let first = pipeline.add(&docs[..2]).await.unwrap();
    let second = pipeline.add(&docs[2..]).await.unwrap();

    assert_eq!(first[0].id, "doc_0_chunk_0");
    assert_eq!(first.last().unwrap().document_index, 1);
    assert_eq!(second[0].id, "doc_2_chunk_0");
    assert_eq!(pipeline.count().await.unwrap(), first.len() + second.len());
}

#[tokio::test]
async fn re_adding_a_corpus_in_a_new_session_overwrites() {
    let store = Arc::new(InMemoryVectorStore::new());
    let embedder: Arc<dyn EmbeddingProvider> = Arc::new(MockEmbeddingProvider::new(32));

    let first = pipeline_with(RagConfig::default(), embedder.clone(), store.clone()).await;
    let stored = first.add(&corpus()).await.unwrap().len();

    let second = pipeline_with(RagConfig::default(), embedder, store.clone()).await;
    second.add(&corpus()).await.unwrap();

    assert_eq!(store.count("rag_documents").await.unwrap(), stored);
}

#[tokio::test]
async fn reset_clears_records_and_numbering() {
    let (pipeline, _) = mock_pipeline(RagConfig::default()).await;
    pipeline.add(&corpus()).await.unwrap();

    pipeline.reset().await.unwrap();
    assert_eq!(pipeline.count().await.unwrap(), 0);

    let chunks = pipeline.add(&corpus()[..1]).await.unwrap();
    assert_eq!(chunks[0].id, "doc_0_chunk_0");
}

#[tokio::test]
async fn build_requires_embedder_and_store() {
    let missing_store = RagPipeline::builder()
        .embedding_provider(Arc::new(MockEmbeddingProvider::default()))
        .build()
        .await;
    assert!(matches!(missing_store, Err(RagError::ConfigError(_))));

    let missing_embedder =
        RagPipeline::builder().vector_store(Arc::new(InMemoryVectorStore::new())).build().await;
    assert!(matches!(missing_embedder, Err(RagError::ConfigError(_))));
}

#[tokio::test]
async fn build_fails_when_collection_has_other_dimensions() {
    let store = Arc::new(InMemoryVectorStore::new());
    store.create_collection("rag_documents", 3).await.unwrap();

    let result = RagPipeline::builder()
        .embedding_provider(Arc::new(MockEmbeddingProvider::new(32)))
        .vector_store(store)
        .build()
        .await;
    assert!(matches!(result, Err(RagError::PipelineError(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn search_never_exceeds_k(
        texts in proptest::collection::vec("[a-z ]{1,60}", 0..8),
        query in "[a-z ]{1,20}",
        k in 0usize..10,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let results = rt.block_on(async {
            let (pipeline, _) = mock_pipeline(config(16, 4)).await;
            let docs: Vec<Document> = texts.iter().map(Document::new).collect();
            pipeline.add(&docs).await.unwrap();
            pipeline.search(&query, k).await.unwrap()
        });

        prop_assert!(results.len() <= k);
        prop_assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
    }
}

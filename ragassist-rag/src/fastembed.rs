//! Local sentence-embedding provider backed by `fastembed` (ONNX Runtime).
//!
//! This module is only available when the `fastembed` feature is enabled.

use std::sync::Arc;

use async_trait::async_trait;
use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, error, info};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

/// The default model, matching `sentence-transformers/all-MiniLM-L6-v2`.
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Supported model names, their fastembed identifiers, and output dimensions.
const SUPPORTED_MODELS: &[(&str, EmbeddingModel, usize)] = &[
    ("sentence-transformers/all-MiniLM-L6-v2", EmbeddingModel::AllMiniLML6V2, 384),
    ("sentence-transformers/all-MiniLM-L12-v2", EmbeddingModel::AllMiniLML12V2, 384),
    ("BAAI/bge-small-en-v1.5", EmbeddingModel::BGESmallENV15, 384),
    ("BAAI/bge-base-en-v1.5", EmbeddingModel::BGEBaseENV15, 768),
];

/// Resolve a configured model name. The `sentence-transformers/` prefix is optional.
fn resolve_model(name: &str) -> Option<(EmbeddingModel, usize)> {
    let name = name.trim();
    SUPPORTED_MODELS.iter().find_map(|(known, model, dims)| {
        let short = known.rsplit('/').next().unwrap_or(*known);
        (known.eq_ignore_ascii_case(name) || short.eq_ignore_ascii_case(name))
            .then(|| (model.clone(), *dims))
    })
}

/// An [`EmbeddingProvider`] running a sentence-embedding model locally.
///
/// The model is downloaded into the fastembed cache on first use. Inference is
/// CPU-bound, so every call runs on tokio's blocking pool and is awaited
/// before returning.
///
/// # Example
///
/// ```rust,ignore
/// use ragassist_rag::fastembed::FastEmbedProvider;
///
/// let provider = FastEmbedProvider::load("sentence-transformers/all-MiniLM-L6-v2").await?;
/// assert_eq!(provider.dimensions(), 384);
/// ```
pub struct FastEmbedProvider {
    model: Arc<TextEmbedding>,
    model_name: String,
    dimensions: usize,
}

impl FastEmbedProvider {
    /// Load the named model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmbeddingError`] if the name is not supported or the
    /// model cannot be downloaded or initialised.
    pub async fn load(model_name: &str) -> Result<Self> {
        let (model, dimensions) = resolve_model(model_name).ok_or_else(|| {
            let supported: Vec<&str> = SUPPORTED_MODELS.iter().map(|(name, _, _)| *name).collect();
            RagError::EmbeddingError {
                provider: "fastembed".into(),
                message: format!(
                    "unsupported embedding model '{model_name}' (supported: {})",
                    supported.join(", ")
                ),
            }
        })?;

        info!(provider = "fastembed", model = model_name, "loading embedding model");
        let embedding = tokio::task::spawn_blocking(move || {
            let mut options = InitOptions::default();
            options.model_name = model;
            options.show_download_progress = false;
            TextEmbedding::try_new(options)
        })
        .await
        .map_err(|e| RagError::EmbeddingError {
            provider: "fastembed".into(),
            message: format!("model initialisation task failed: {e}"),
        })?
        .map_err(|e| {
            error!(provider = "fastembed", error = %e, "failed to load embedding model");
            RagError::EmbeddingError {
                provider: "fastembed".into(),
                message: format!("failed to load '{model_name}': {e}"),
            }
        })?;

        Ok(Self { model: Arc::new(embedding), model_name: model_name.to_string(), dimensions })
    }

    /// The configured model name.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RagError::EmbeddingError {
            provider: "fastembed".into(),
            message: "model returned no embedding".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = "fastembed", batch_size = texts.len(), model = %self.model_name, "embedding batch");

        let model = Arc::clone(&self.model);
        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        tokio::task::spawn_blocking(move || model.embed(owned, None))
            .await
            .map_err(|e| RagError::EmbeddingError {
                provider: "fastembed".into(),
                message: format!("embedding task failed: {e}"),
            })?
            .map_err(|e| {
                error!(provider = "fastembed", error = %e, "embedding failed");
                RagError::EmbeddingError { provider: "fastembed".into(), message: format!("{e}") }
            })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

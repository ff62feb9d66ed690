//! Error types for the `ragassist-rag` crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading, chunking, embedding, or retrieving documents.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred during document chunking.
    #[error("Chunking error: {0}")]
    ChunkingError(String),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the ingest or retrieval pipeline.
    #[error("Pipeline error: {0}")]
    PipelineError(String),

    /// The document directory could not be read.
    #[error("Failed to read document directory {path}: {source}")]
    LoaderError {
        /// The directory that was being scanned.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;

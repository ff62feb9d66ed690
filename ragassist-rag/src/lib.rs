//! # ragassist-rag
//!
//! Document loading, chunking, embedding, and vector retrieval for ragassist.
//!
//! ## Overview
//!
//! - [`DocumentLoader`] reads `.txt` and `.md` files from a directory
//! - [`TextSplitter`] / [`RecursiveChunker`] split text into overlapping chunks
//! - [`EmbeddingProvider`] and [`VectorStore`] are the backend seams
//! - [`RagPipeline`] ties them together into `add` / `search`
//!
//! ## Backends
//!
//! | Type | Feature | Notes |
//! |------|---------|-------|
//! | [`MockEmbeddingProvider`] | always | deterministic hash vectors |
//! | [`InMemoryVectorStore`] | always | squared L2, not persisted |
//! | `FastEmbedProvider` | `fastembed` | local ONNX sentence embeddings |
//! | `LanceVectorStore` | `lancedb` | embedded on-disk LanceDB tables |
//!
//! ## Quick Start
//!
//! ```rust
//! use ragassist_rag::TextSplitter;
//!
//! let splitter = TextSplitter::new(10, 5).unwrap();
//! let chunks = splitter.split("aaaa bbbb cccc dddd");
//! assert_eq!(chunks, vec!["aaaa bbbb ", "bbbb cccc ", "cccc dddd"]);
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod loader;
pub mod mock;
pub mod pipeline;
pub mod vectorstore;

#[cfg(feature = "fastembed")]
pub mod fastembed;
#[cfg(feature = "lancedb")]
pub mod lance;

pub use chunking::{Chunker, RecursiveChunker, TextSpan, TextSplitter, chunk_text};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, Document, Metadata, MetadataValue, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use loader::{DocumentLoader, load_documents};
pub use mock::MockEmbeddingProvider;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use vectorstore::VectorStore;

#[cfg(feature = "fastembed")]
pub use crate::fastembed::FastEmbedProvider;
#[cfg(feature = "lancedb")]
pub use lance::LanceVectorStore;

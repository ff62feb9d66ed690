//! Data types for documents, chunks, and search results.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Metadata attached to documents and chunks.
pub type Metadata = HashMap<String, MetadataValue>;

/// A metadata value: either free text or a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MetadataValue {
    /// A string value.
    Text(String),
    /// A numeric value.
    Number(f64),
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

/// A source document containing text content and metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata associated with the document.
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a document with no metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), metadata: Metadata::new() }
    }

    /// Attach a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A segment of a [`Document`] with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier, `doc_{document_index}_chunk_{chunk_index}`.
    pub id: String,
    /// Position of the parent document within its ingestion session.
    pub document_index: usize,
    /// Ordinal position of this chunk within its document.
    pub chunk_index: usize,
    /// The text content of the chunk.
    pub text: String,
    /// Metadata inherited from the parent document plus `chunk_index`.
    pub metadata: Metadata,
    /// The vector embedding for this chunk's text. Empty until embedded.
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Build the composite chunk identifier.
    pub fn make_id(document_index: usize, chunk_index: usize) -> String {
        format!("doc_{document_index}_chunk_{chunk_index}")
    }
}

/// A retrieved chunk paired with its distance to the query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// The ID of the stored chunk.
    pub id: String,
    /// The chunk text.
    pub text: String,
    /// The chunk metadata.
    pub metadata: Metadata,
    /// Distance to the query vector (lower is more similar).
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_ids_are_composite() {
        assert_eq!(Chunk::make_id(0, 0), "doc_0_chunk_0");
        assert_eq!(Chunk::make_id(12, 3), "doc_12_chunk_3");
    }

    #[test]
    fn metadata_values_serialize_untagged() {
        let doc = Document::new("hello").with_metadata("source", "a.md").with_metadata("page", 2i64);
        let json = serde_json::to_value(&doc.metadata).unwrap();
        assert_eq!(json["source"], "a.md");
        assert_eq!(json["page"], 2.0);

        let back: Metadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, doc.metadata);
    }
}

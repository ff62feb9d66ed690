//! Document chunking.
//!
//! [`TextSplitter`] splits text hierarchically by a separator priority list
//! (paragraphs, lines, sentences, words, characters) and merges the resulting
//! pieces into overlapping windows. [`RecursiveChunker`] wraps it behind the
//! [`Chunker`] trait used by the pipeline.

use std::collections::VecDeque;

use crate::document::{Chunk, Document, MetadataValue};
use crate::error::{RagError, Result};

/// Separators tried in order. The empty separator means "split between characters".
pub const DEFAULT_SEPARATORS: &[&str] = &["\n\n", "\n", ". ", " ", ""];

/// A strategy for splitting documents into chunks.
///
/// Implementations produce [`Chunk`]s with text and metadata but no embeddings.
/// Embeddings are attached later by the pipeline.
pub trait Chunker: Send + Sync {
    /// Split the document at `document_index` into chunks.
    ///
    /// Returns an empty `Vec` if the document has empty text.
    fn chunk(&self, document_index: usize, document: &Document) -> Vec<Chunk>;
}

/// A chunk of text together with its byte offset in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    /// Byte offset of the first character of `text` in the source string.
    pub start: usize,
    /// The chunk text.
    pub text: String,
}

impl TextSpan {
    /// Byte offset one past the last character of the span.
    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }
}

/// An atomic piece produced by separator splitting: a byte range and its length in chars.
#[derive(Debug, Clone, Copy)]
struct Piece {
    start: usize,
    end: usize,
    chars: usize,
}

/// Recursive separator-priority text splitter with overlapping windows.
///
/// Sizes are measured in characters. Separators stay attached to the end of
/// the piece they terminate, so no input characters are ever dropped and the
/// chunks can be stitched back into the original text.
///
/// # Example
///
/// ```rust
/// use ragassist_rag::TextSplitter;
///
/// let splitter = TextSplitter::new(10, 5).unwrap();
/// let chunks = splitter.split("aaaa bbbb cccc dddd");
/// assert_eq!(chunks, vec!["aaaa bbbb ", "bbbb cccc ", "cccc dddd"]);
/// ```
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl TextSplitter {
    /// Create a splitter using [`DEFAULT_SEPARATORS`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `chunk_size` is zero or
    /// `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(RagError::ConfigError("chunk_size must be greater than zero".to_string()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Replace the separator priority list.
    ///
    /// If the list does not end with `""`, pieces that no separator can shrink
    /// are hard-split at character boundaries anyway.
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    /// Maximum chunk length in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Maximum overlap between consecutive chunks in characters.
    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into chunk strings.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_spans(text).into_iter().map(|span| span.text).collect()
    }

    /// Split `text` into chunks, keeping each chunk's byte offset.
    ///
    /// Consecutive spans satisfy `prev.start < next.start <= prev.end()`; the
    /// shared region is the overlap and is at most `chunk_overlap` characters.
    pub fn split_spans(&self, text: &str) -> Vec<TextSpan> {
        if text.is_empty() {
            return Vec::new();
        }

        let mut pieces = Vec::new();
        let total_chars = text.chars().count();
        if total_chars <= self.chunk_size {
            pieces.push(Piece { start: 0, end: text.len(), chars: total_chars });
        } else {
            self.collect_pieces(text, 0, text.len(), &self.separators, &mut pieces);
        }

        self.merge(text, &pieces)
    }

    /// Break `text[start..end]` into pieces no longer than `chunk_size`.
    fn collect_pieces(
        &self,
        text: &str,
        start: usize,
        end: usize,
        separators: &[String],
        out: &mut Vec<Piece>,
    ) {
        let segment = &text[start..end];
        let Some(position) =
            separators.iter().position(|sep| sep.is_empty() || segment.contains(sep.as_str()))
        else {
            self.hard_split(text, start, end, out);
            return;
        };
        let separator = separators[position].as_str();
        let remaining = &separators[position + 1..];

        if separator.is_empty() {
            for (offset, ch) in segment.char_indices() {
                let piece_start = start + offset;
                out.push(Piece { start: piece_start, end: piece_start + ch.len_utf8(), chars: 1 });
            }
            return;
        }

        for (piece_start, piece_end) in split_keeping_separator(segment, separator) {
            let (piece_start, piece_end) = (start + piece_start, start + piece_end);
            let chars = text[piece_start..piece_end].chars().count();
            if chars <= self.chunk_size {
                out.push(Piece { start: piece_start, end: piece_end, chars });
            } else {
                self.collect_pieces(text, piece_start, piece_end, remaining, out);
            }
        }
    }

    /// Cut `text[start..end]` every `chunk_size` characters.
    fn hard_split(&self, text: &str, start: usize, end: usize, out: &mut Vec<Piece>) {
        let mut piece_start = start;
        let mut chars = 0;
        for (offset, _) in text[start..end].char_indices() {
            if chars == self.chunk_size {
                out.push(Piece { start: piece_start, end: start + offset, chars });
                piece_start = start + offset;
                chars = 0;
            }
            chars += 1;
        }
        if chars > 0 {
            out.push(Piece { start: piece_start, end, chars });
        }
    }

    /// Merge adjacent pieces into windows of at most `chunk_size` characters,
    /// carrying up to `chunk_overlap` characters of trailing pieces forward.
    fn merge(&self, text: &str, pieces: &[Piece]) -> Vec<TextSpan> {
        let mut spans = Vec::new();
        let mut window: VecDeque<Piece> = VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            if total + piece.chars > self.chunk_size {
                if let Some(span) = window_span(text, &window) {
                    spans.push(span);
                }
                while total > self.chunk_overlap
                    || (total + piece.chars > self.chunk_size && total > 0)
                {
                    match window.pop_front() {
                        Some(dropped) => total -= dropped.chars,
                        None => break,
                    }
                }
            }
            window.push_back(*piece);
            total += piece.chars;
        }

        if let Some(span) = window_span(text, &window) {
            spans.push(span);
        }
        spans
    }
}

fn window_span(text: &str, window: &VecDeque<Piece>) -> Option<TextSpan> {
    let first = window.front()?;
    let last = window.back()?;
    Some(TextSpan { start: first.start, text: text[first.start..last.end].to_string() })
}

/// Split at a separator while keeping the separator attached to the preceding segment.
/// Returns byte ranges relative to `text`.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<(usize, usize)> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push((start, end));
        start = end;
    }

    if start < text.len() {
        result.push((start, text.len()));
    }

    result
}

/// Split `text` into overlapping chunks with the default separator list.
///
/// # Errors
///
/// Returns [`RagError::ConfigError`] if `chunk_size` is zero or
/// `overlap >= chunk_size`.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>> {
    Ok(TextSplitter::new(chunk_size, overlap)?.split(text))
}

/// Chunks documents with a [`TextSplitter`].
///
/// Chunk IDs are generated as `doc_{document_index}_chunk_{chunk_index}`. Each
/// chunk inherits the parent document's metadata plus a `chunk_index` field.
/// Documents without metadata get `source = "document_{document_index}"`.
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    splitter: TextSplitter,
}

impl RecursiveChunker {
    /// Create a chunker with the default separators.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        Ok(Self { splitter: TextSplitter::new(chunk_size, chunk_overlap)? })
    }

    /// Create a chunker from a pre-configured splitter.
    pub fn from_splitter(splitter: TextSplitter) -> Self {
        Self { splitter }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, document_index: usize, document: &Document) -> Vec<Chunk> {
        if document.text.is_empty() {
            return Vec::new();
        }

        let mut base_metadata = document.metadata.clone();
        if base_metadata.is_empty() {
            base_metadata.insert(
                "source".to_string(),
                MetadataValue::Text(format!("document_{document_index}")),
            );
        }

        self.splitter
            .split(&document.text)
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| {
                let mut metadata = base_metadata.clone();
                metadata.insert("chunk_index".to_string(), chunk_index.to_string().into());
                Chunk {
                    id: Chunk::make_id(document_index, chunk_index),
                    document_index,
                    chunk_index,
                    text,
                    metadata,
                    embedding: Vec::new(),
                }
            })
            .collect()
    }
}

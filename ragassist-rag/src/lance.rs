//! Persistent vector store backed by an embedded LanceDB database.
//!
//! This module is only available when the `lancedb` feature is enabled.
//! Each collection is one Lance table with the columns `id`, `text`,
//! `metadata` (JSON), and `vector` (fixed-size `f32` list).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow_array::types::Float32Type;
use arrow_array::{
    Array, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
};
use arrow_schema::{DataType, Field, Schema};
use async_trait::async_trait;
use futures::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, Table, connect};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::document::{Chunk, Metadata, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

const BACKEND: &str = "LanceDB";

fn store_error(message: impl Into<String>) -> RagError {
    RagError::VectorStoreError { backend: BACKEND.to_string(), message: message.into() }
}

/// A [`VectorStore`] persisted on local disk with LanceDB.
///
/// Records survive process restarts. Search uses LanceDB's default metric,
/// squared L2 distance. Each upsert is a single merge-insert commit keyed on
/// `id`: the whole batch lands or none of it does.
///
/// # Example
///
/// ```rust,ignore
/// use ragassist_rag::lance::LanceVectorStore;
///
/// let store = LanceVectorStore::connect("./vector_db").await?;
/// store.create_collection("rag_documents", 384).await?;
/// ```
pub struct LanceVectorStore {
    connection: Connection,
    path: PathBuf,
    tables: RwLock<HashMap<String, (Table, usize)>>,
}

impl LanceVectorStore {
    /// Open (or create) the database directory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStoreError`] if the directory cannot be created
    /// or the database cannot be opened.
    pub async fn connect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&path)
            .map_err(|e| store_error(format!("cannot create '{}': {e}", path.display())))?;

        let uri = path.to_string_lossy().to_string();
        let connection = connect(&uri)
            .execute()
            .await
            .map_err(|e| store_error(format!("failed to open database at '{uri}': {e}")))?;

        info!(backend = BACKEND, path = %path.display(), "vector database opened");
        Ok(Self { connection, path, tables: RwLock::new(HashMap::new()) })
    }

    /// The database directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn table(&self, name: &str) -> Result<(Table, usize)> {
        self.tables
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| store_error(format!("collection '{name}' has not been opened")))
    }
}

fn chunk_schema(dimensions: usize) -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("text", DataType::Utf8, false),
        Field::new("metadata", DataType::Utf8, false),
        Field::new(
            "vector",
            DataType::FixedSizeList(
                Arc::new(Field::new("item", DataType::Float32, true)),
                dimensions as i32,
            ),
            true,
        ),
    ]))
}

fn vector_dimensions(schema: &Schema) -> Option<usize> {
    schema.field_with_name("vector").ok().and_then(|f| match f.data_type() {
        DataType::FixedSizeList(_, dim) => Some(*dim as usize),
        _ => None,
    })
}

fn to_record_batch(chunks: &[Chunk], dimensions: usize) -> Result<RecordBatch> {
    let schema = chunk_schema(dimensions);

    let ids = StringArray::from(chunks.iter().map(|c| c.id.clone()).collect::<Vec<_>>());
    let texts = StringArray::from(chunks.iter().map(|c| c.text.clone()).collect::<Vec<_>>());
    let metadata = chunks
        .iter()
        .map(|c| serde_json::to_string(&c.metadata))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| store_error(format!("failed to encode metadata: {e}")))?;
    let metadata = StringArray::from(metadata);
    let vectors = FixedSizeListArray::from_iter_primitive::<Float32Type, _, _>(
        chunks.iter().map(|c| Some(c.embedding.iter().map(|v| Some(*v)).collect::<Vec<_>>())),
        dimensions as i32,
    );

    RecordBatch::try_new(
        schema,
        vec![Arc::new(ids), Arc::new(texts), Arc::new(metadata), Arc::new(vectors)],
    )
    .map_err(|e| store_error(format!("failed to build record batch: {e}")))
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| store_error(format!("result batch is missing string column '{name}'")))
}

fn results_from_batch(batch: &RecordBatch, out: &mut Vec<SearchResult>) -> Result<()> {
    let ids = string_column(batch, "id")?;
    let texts = string_column(batch, "text")?;
    let metadata = string_column(batch, "metadata")?;
    let distances = batch
        .column_by_name("_distance")
        .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
        .ok_or_else(|| store_error("result batch is missing the '_distance' column"))?;

    for i in 0..batch.num_rows() {
        let metadata: Metadata = serde_json::from_str(metadata.value(i))
            .map_err(|e| store_error(format!("corrupt metadata for '{}': {e}", ids.value(i))))?;
        out.push(SearchResult {
            id: ids.value(i).to_string(),
            text: texts.value(i).to_string(),
            metadata,
            distance: distances.value(i),
        });
    }
    Ok(())
}

#[async_trait]
impl VectorStore for LanceVectorStore {
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()> {
        let schema = chunk_schema(dimensions);
        let existing = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| store_error(format!("failed to list tables: {e}")))?;

        let table = if existing.iter().any(|t| t == name) {
            let table = self
                .connection
                .open_table(name)
                .execute()
                .await
                .map_err(|e| store_error(format!("failed to open collection '{name}': {e}")))?;
            let existing_schema = table
                .schema()
                .await
                .map_err(|e| store_error(format!("failed to read schema of '{name}': {e}")))?;
            match vector_dimensions(&existing_schema) {
                Some(dim) if dim == dimensions => table,
                other => {
                    return Err(store_error(format!(
                        "collection '{name}' stores {other:?}-dimensional vectors, not {dimensions}; \
                         use a different collection or reset it"
                    )));
                }
            }
        } else {
            debug!(backend = BACKEND, collection = name, dimensions, "creating collection");
            let batch = RecordBatch::new_empty(schema.clone());
            self.connection
                .create_table(name, RecordBatchIterator::new(vec![batch].into_iter().map(Ok), schema))
                .execute()
                .await
                .map_err(|e| store_error(format!("failed to create collection '{name}': {e}")))?
        };

        self.tables.write().await.insert(name.to_string(), (table, dimensions));
        Ok(())
    }

    async fn clear_collection(&self, name: &str) -> Result<()> {
        let (table, _) = self.table(name).await?;
        table
            .delete("id IS NOT NULL")
            .await
            .map_err(|e| store_error(format!("failed to clear collection '{name}': {e}")))?;
        info!(backend = BACKEND, collection = name, "collection cleared");
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }
        let (table, dimensions) = self.table(collection).await?;

        if let Some(bad) = chunks.iter().find(|c| c.embedding.len() != dimensions) {
            return Err(store_error(format!(
                "chunk '{}' has {} dimensions, collection '{collection}' expects {dimensions}",
                bad.id,
                bad.embedding.len()
            )));
        }

        let batch = to_record_batch(chunks, dimensions)?;
        let schema = batch.schema();

        // one commit: matched ids are rewritten, new ids appended
        let mut merge = table.merge_insert(&["id"]);
        merge.when_matched_update_all(None).when_not_matched_insert_all();
        merge
            .execute(Box::new(RecordBatchIterator::new(vec![Ok(batch)], schema)))
            .await
            .map_err(|e| store_error(format!("failed to upsert rows into '{collection}': {e}")))?;

        debug!(backend = BACKEND, collection, rows = chunks.len(), "rows upserted");
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let (table, _) = self.table(collection).await?;
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let rows = table
            .count_rows(None)
            .await
            .map_err(|e| store_error(format!("failed to count rows: {e}")))?;
        if rows == 0 {
            return Ok(Vec::new());
        }

        let query = table
            .query()
            .nearest_to(embedding.to_vec())
            .map_err(|e| store_error(format!("failed to build vector query: {e}")))?;
        let mut stream = query
            .limit(top_k)
            .execute()
            .await
            .map_err(|e| store_error(format!("search failed in '{collection}': {e}")))?;

        let mut results = Vec::new();
        while let Some(batch) = stream.next().await {
            let batch = batch.map_err(|e| store_error(format!("failed to read results: {e}")))?;
            results_from_batch(&batch, &mut results)?;
        }

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(top_k);
        Ok(results)
    }

    async fn count(&self, collection: &str) -> Result<usize> {
        let (table, _) = self.table(collection).await?;
        table
            .count_rows(None)
            .await
            .map_err(|e| store_error(format!("failed to count rows: {e}")))
    }
}

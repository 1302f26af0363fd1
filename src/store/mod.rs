// Vector-indexed catalog collection backed by LanceDB
// Provisioning, clear-then-reload writes, and similarity search


use arrow::array::{Array, FixedSizeListArray, Float32Array, RecordBatchIterator, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Utc;
use futures::TryStreamExt;
use lancedb::index::Index;
use lancedb::index::vector::IvfPqIndexBuilder;
use lancedb::{
    Connection, DistanceType,
    query::{ExecutableQuery, QueryBase},
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::Item;
use crate::config::Config;
use crate::{Result, SeedError};

/// One document persisted per item: the rendered summary, the full original
/// item as metadata, and its embedding vector. Created and written in the
/// same run, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct IndexedRecord {
    pub id: String,
    pub page_content: String,
    pub metadata: Item,
    pub embedding: Vec<f32>,
}

impl IndexedRecord {
    #[inline]
    pub fn new(metadata: Item, page_content: String, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            page_content,
            metadata,
            embedding,
        }
    }
}

/// Result of a similarity search over the seeded collection
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub item: Item,
    pub page_content: String,
    pub similarity_score: f32,
    pub distance: f32,
}

/// Catalog collection routed through the LanceDB vector-search integration
/// layer.
pub struct CatalogStore {
    connection: Connection,
    collection: String,
    index_name: String,
    text_field: String,
    embedding_field: String,
    dimension: usize,
}

impl CatalogStore {
    /// Acquire a scoped connection to the database. The connection is
    /// released when the store is dropped, on success and failure paths
    /// alike.
    #[inline]
    pub async fn connect(config: &Config) -> Result<Self> {
        let db_path = config.vector_database_path();
        debug!("Initializing LanceDB at path: {:?}", db_path);

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SeedError::Database(format!("Failed to create vector database directory: {}", e))
            })?;
        }

        let uri = format!("file://{}", db_path.display());
        let connection = lancedb::connect(&uri)
            .execute()
            .await
            .map_err(|e| SeedError::Database(format!("Failed to connect to LanceDB: {}", e)))?;

        Ok(Self {
            connection,
            collection: config.database.collection.clone(),
            index_name: config.database.index_name.clone(),
            text_field: config.database.text_field.clone(),
            embedding_field: config.database.embedding_field.clone(),
            dimension: config.ollama.embedding_dimension as usize,
        })
    }

    /// Verify liveness with a trivial round-trip command
    #[inline]
    pub async fn ping(&self) -> Result<()> {
        self.connection
            .table_names()
            .execute()
            .await
            .map_err(|e| SeedError::Database(format!("Database liveness check failed: {}", e)))?;
        debug!("Database liveness check passed");
        Ok(())
    }

    /// Idempotent: creates the collection only if absent, logs a no-op
    /// otherwise.
    #[inline]
    pub async fn ensure_collection(&self) -> Result<()> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| SeedError::Database(format!("Failed to list collections: {}", e)))?;

        if table_names.contains(&self.collection) {
            info!("Collection '{}' already exists, skipping creation", self.collection);
            return Ok(());
        }

        let schema = self.create_schema();
        self.connection
            .create_empty_table(&self.collection, schema)
            .execute()
            .await
            .map_err(|e| SeedError::Database(format!("Failed to create collection: {}", e)))?;

        info!(
            "Created collection '{}' with {}-dimension embedding column",
            self.collection, self.dimension
        );
        Ok(())
    }

    /// Drop every existing index on the collection, then create exactly one
    /// cosine vector index over the embedding column.
    ///
    /// Destructive with respect to any other indexes that might exist, and
    /// fails on a collection with too few rows to train the index. Callers
    /// are expected to treat a failure here as non-fatal.
    #[inline]
    pub async fn ensure_vector_index(&self) -> Result<()> {
        let table = self.open_collection().await?;

        let indices = table.list_indices().await.map_err(|e| {
            SeedError::IndexProvisioning(format!("Failed to list indexes: {}", e))
        })?;

        for index in indices {
            warn!("Dropping existing index '{}' before re-provisioning", index.name);
            table.drop_index(&index.name).await.map_err(|e| {
                SeedError::IndexProvisioning(format!(
                    "Failed to drop index '{}': {}",
                    index.name, e
                ))
            })?;
        }

        table
            .create_index(
                &[self.embedding_field.as_str()],
                Index::IvfPq(IvfPqIndexBuilder::default().distance_type(DistanceType::Cosine)),
            )
            .execute()
            .await
            .map_err(|e| {
                SeedError::IndexProvisioning(format!("Failed to create vector index: {}", e))
            })?;

        info!(
            "Provisioned vector index '{}' on '{}' (dimensions: {}, similarity: cosine)",
            self.index_name, self.embedding_field, self.dimension
        );
        Ok(())
    }

    /// Unconditionally delete the collection's prior contents. Seeding has no
    /// append/merge mode; every run starts from a clean collection.
    #[inline]
    pub async fn clear(&self) -> Result<()> {
        let table = self.open_collection().await?;

        table
            .delete("true")
            .await
            .map_err(|e| SeedError::Database(format!("Failed to clear collection: {}", e)))?;

        info!("Cleared collection '{}'", self.collection);
        Ok(())
    }

    /// Write one document: summary text, full item metadata, and embedding.
    /// No deduplication; re-inserting without a prior clear duplicates.
    #[inline]
    pub async fn insert(&self, record: IndexedRecord) -> Result<()> {
        if record.embedding.len() != self.dimension {
            return Err(SeedError::Persistence(format!(
                "Embedding dimension mismatch for item {}: expected {}, got {}",
                record.metadata.item_id,
                self.dimension,
                record.embedding.len()
            )));
        }

        let record_batch = self.create_record_batch(&[record])?;
        let table = self.open_collection().await?;

        let schema = record_batch.schema();
        let reader = RecordBatchIterator::new(std::iter::once(Ok(record_batch)), schema);
        table
            .add(reader)
            .execute()
            .await
            .map_err(|e| SeedError::Persistence(format!("Failed to insert document: {}", e)))?;

        Ok(())
    }

    /// Total number of documents in the collection
    #[inline]
    pub async fn count(&self) -> Result<u64> {
        let table = self.open_collection().await?;

        let count = table
            .count_rows(None)
            .await
            .map_err(|e| SeedError::Database(format!("Failed to count documents: {}", e)))?;

        Ok(count as u64)
    }

    /// Nearest-neighbor search over the embedding column
    #[inline]
    pub async fn search_similar(
        &self,
        query_vector: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchHit>> {
        debug!("Searching for similar documents with limit: {}", limit);

        let table = self.open_collection().await?;

        let results = table
            .vector_search(query_vector)
            .map_err(|e| SeedError::Database(format!("Failed to create vector search: {}", e)))?
            .column(&self.embedding_field)
            .distance_type(DistanceType::Cosine)
            .limit(limit)
            .execute()
            .await
            .map_err(|e| SeedError::Database(format!("Failed to execute search: {}", e)))?;

        self.parse_search_results_stream(results).await
    }

    async fn open_collection(&self) -> Result<lancedb::Table> {
        self.connection
            .open_table(&self.collection)
            .execute()
            .await
            .map_err(|e| SeedError::Database(format!("Failed to open collection: {}", e)))
    }

    fn create_schema(&self) -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new(
                self.embedding_field.as_str(),
                DataType::FixedSizeList(
                    Arc::new(Field::new("item", DataType::Float32, false)),
                    self.dimension as i32,
                ),
                false,
            ),
            Field::new(self.text_field.as_str(), DataType::Utf8, false),
            Field::new("metadata", DataType::Utf8, false),
            Field::new("item_id", DataType::Utf8, false),
            Field::new("created_at", DataType::Utf8, false),
        ]))
    }

    fn create_record_batch(&self, records: &[IndexedRecord]) -> Result<RecordBatch> {
        let len = records.len();

        let mut ids = Vec::with_capacity(len);
        let mut embeddings = Vec::with_capacity(len);
        let mut page_contents = Vec::with_capacity(len);
        let mut metadata_json = Vec::with_capacity(len);
        let mut item_ids = Vec::with_capacity(len);
        let mut created_ats = Vec::with_capacity(len);

        let created_at = Utc::now().to_rfc3339();
        for record in records {
            ids.push(record.id.as_str());
            embeddings.push(record.embedding.clone());
            page_contents.push(record.page_content.as_str());
            metadata_json.push(serde_json::to_string(&record.metadata).map_err(|e| {
                SeedError::Persistence(format!("Failed to serialize item metadata: {}", e))
            })?);
            item_ids.push(record.metadata.item_id.as_str());
            created_ats.push(created_at.clone());
        }

        let schema = self.create_schema();

        let mut flat_values = Vec::with_capacity(len * self.dimension);
        for embedding in &embeddings {
            flat_values.extend_from_slice(embedding);
        }
        let values_array = Float32Array::from(flat_values);
        let field = Arc::new(Field::new("item", DataType::Float32, false));
        let embedding_array = FixedSizeListArray::try_new(
            field,
            self.dimension as i32,
            Arc::new(values_array),
            None,
        )
        .map_err(|e| SeedError::Persistence(format!("Failed to create embedding array: {}", e)))?;

        let arrays: Vec<Arc<dyn arrow::array::Array>> = vec![
            Arc::new(StringArray::from(ids)),
            Arc::new(embedding_array),
            Arc::new(StringArray::from(page_contents)),
            Arc::new(StringArray::from(metadata_json)),
            Arc::new(StringArray::from(item_ids)),
            Arc::new(StringArray::from(created_ats)),
        ];

        RecordBatch::try_new(schema, arrays)
            .map_err(|e| SeedError::Persistence(format!("Failed to create record batch: {}", e)))
    }

    async fn parse_search_results_stream(
        &self,
        mut results: lancedb::arrow::SendableRecordBatchStream,
    ) -> Result<Vec<SearchHit>> {
        let mut hits = Vec::new();

        while let Some(batch) = results
            .try_next()
            .await
            .map_err(|e| SeedError::Database(format!("Failed to read result stream: {}", e)))?
        {
            hits.extend(self.parse_search_batch(&batch)?);
        }

        debug!("Parsed {} search results from stream", hits.len());
        Ok(hits)
    }

    fn parse_search_batch(&self, batch: &RecordBatch) -> Result<Vec<SearchHit>> {
        let num_rows = batch.num_rows();
        let mut hits = Vec::with_capacity(num_rows);

        let page_contents = string_column(batch, &self.text_field)?;
        let metadata_json = string_column(batch, "metadata")?;

        let distances = batch
            .column_by_name("_distance")
            .map(|col| col.as_any().downcast_ref::<Float32Array>());

        for row in 0..num_rows {
            let item: Item = serde_json::from_str(metadata_json.value(row)).map_err(|e| {
                SeedError::Database(format!("Stored item metadata failed to decode: {}", e))
            })?;

            let distance = distances
                .flatten()
                .map_or(0.0, |d| if d.is_null(row) { 0.0 } else { d.value(row) });

            hits.push(SearchHit {
                item,
                page_content: page_contents.value(row).to_string(),
                similarity_score: 1.0 - distance,
                distance,
            });
        }

        Ok(hits)
    }
}

fn string_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| SeedError::Database(format!("Missing {} column", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| SeedError::Database(format!("Invalid {} column type", name)))
}

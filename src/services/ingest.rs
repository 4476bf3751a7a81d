//! Ingestion pipeline: chunk, batch-embed, upsert.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::{IngestReceipt, Profile, SourceItem, UpsertRecord};
use crate::domain::ports::{EmbeddingProvider, VectorIndex};
use crate::infrastructure::vector::chunker;

/// Turns raw source items into stored vector records.
pub struct IngestService {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    profile: Profile,
}

impl IngestService {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        profile: Profile,
    ) -> Self {
        Self {
            index,
            embedder,
            profile,
        }
    }

    /// Chunk every item, embed all chunks in one backend round trip, and
    /// append the resulting records to the namespace.
    ///
    /// An embedding failure aborts before anything reaches the store; there
    /// is no partial commit. A chunk the backend returned no embedding for
    /// is stored with an empty vector (it scores 0 against any query) rather
    /// than failing the whole batch.
    pub async fn ingest(
        &self,
        namespace: &str,
        items: &[SourceItem],
    ) -> GatewayResult<IngestReceipt> {
        if namespace.trim().is_empty() {
            return Err(GatewayError::BadRequest("namespace is required".to_string()));
        }
        if items.is_empty() {
            return Err(GatewayError::BadRequest("items must not be empty".to_string()));
        }

        let job_id = Uuid::new_v4();
        let chunk_words = self.profile.chunking.clamped_chunk_words();
        let chunks = chunker::chunk(items, chunk_words);

        if chunks.is_empty() {
            tracing::debug!(%job_id, namespace, "no chunks produced, nothing to embed");
            return Ok(IngestReceipt {
                job_id,
                ingested_at: Utc::now(),
                chunk_count: 0,
                embedded_count: 0,
            });
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&self.profile.embed.model, &texts)
            .await?;
        let embedded_count = embeddings.len().min(chunks.len());

        let records: Vec<UpsertRecord> = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| {
                let metadata = serde_json::to_value(&chunk.metadata)
                    .unwrap_or_else(|_| serde_json::json!({}));
                UpsertRecord {
                    id: Some(chunk.id),
                    // Positional zip; a missing embedding degrades to an
                    // unretrievable record instead of failing the batch.
                    vector: embeddings.get(i).cloned().unwrap_or_default(),
                    text: chunk.text,
                    metadata,
                    timestamp: chunk.metadata.timestamp,
                    sequence: Some(chunk.sequence),
                }
            })
            .collect();

        let chunk_count = records.len();
        self.index.upsert_many(namespace, records);

        tracing::info!(%job_id, namespace, chunk_count, embedded_count, "ingested items");
        Ok(IngestReceipt {
            job_id,
            ingested_at: Utc::now(),
            chunk_count,
            embedded_count,
        })
    }
}

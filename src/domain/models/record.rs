//! Vector index record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A record as stored in a namespace.
///
/// Records are append-only: there is no update-in-place and no delete, and
/// the store does not deduplicate caller-supplied ids. Two upserts with the
/// same id coexist as two records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Identifier, unique within a namespace only by caller convention.
    pub id: String,
    /// Embedding vector. Dimensionality is fixed per namespace by convention,
    /// not enforced.
    pub vector: Vec<f32>,
    /// The chunk text this vector represents.
    pub text: String,
    /// Free-form metadata carried alongside the vector.
    #[serde(default = "empty_object")]
    pub metadata: serde_json::Value,
}

/// Input to a bulk upsert. Everything is optional except the vector and text
/// in practice; a missing id gets a generated hash id inside the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertRecord {
    /// Caller-supplied identifier. Omitted ids are replaced with a generated
    /// hash id that is effectively always unique.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Embedding vector. An empty vector is legal; it scores 0 against any
    /// query and is effectively unretrievable.
    #[serde(default)]
    pub vector: Vec<f32>,
    /// Chunk text.
    #[serde(default)]
    pub text: String,
    /// Free-form metadata.
    #[serde(default = "empty_object")]
    pub metadata: serde_json::Value,
    /// Source item timestamp, folded into generated ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Chunk sequence number within its source item, folded into generated ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<usize>,
}

/// Result of a bulk upsert: the number of records just appended, not the
/// namespace total.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UpsertReceipt {
    /// Records appended by this call.
    pub count: usize,
}

/// A single ranked similarity hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Record id.
    pub id: String,
    /// Cosine similarity against the query vector. Bounded to `[-1, 1]` in
    /// principle, unclamped in practice; 0 when either vector has zero norm.
    pub score: f32,
    /// Record text; omitted when the caller asked for ids/scores only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Record metadata.
    pub metadata: serde_json::Value,
}

/// Acknowledgement returned by the ingestion pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReceipt {
    /// Identifier for this ingestion run.
    pub job_id: Uuid,
    /// When the run completed.
    pub ingested_at: DateTime<Utc>,
    /// Chunks produced by the chunker.
    pub chunk_count: usize,
    /// Chunks for which the backend returned an embedding. A shortfall means
    /// some records were stored with empty vectors.
    pub embedded_count: usize,
}

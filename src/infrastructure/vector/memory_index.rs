//! In-memory brute-force vector index.
//!
//! Exact cosine-similarity scan over per-namespace record collections,
//! O(n * d) per query. Chosen over an indexing structure because the target
//! namespaces are small single-tenant knowledge bases; linear growth with
//! corpus size is an accepted trade-off. Larger corpora should swap in an
//! approximate index behind the same `VectorIndex` trait.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::domain::models::{QueryResult, Record, UpsertReceipt, UpsertRecord};
use crate::domain::ports::VectorIndex;

/// Cosine similarity over the overlapping prefix of two vectors.
///
/// Vectors of different lengths are compared over their shared prefix rather
/// than rejected. Zero-norm operands score 0, never a division error.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Namespaced in-memory vector store.
///
/// Records are fully constructed before they become visible to the shared
/// collection, and queries score a snapshot taken at scan start, so
/// concurrent upserts and queries never observe a half-appended record.
#[derive(Default)]
pub struct MemoryVectorIndex {
    namespaces: RwLock<HashMap<String, Vec<Arc<Record>>>>,
}

impl MemoryVectorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash id for records upserted without one: namespace, timestamp and
    /// sequence fields, plus a random salt, so generated ids are effectively
    /// always unique. 16 hex characters.
    fn generated_id(namespace: &str, record: &UpsertRecord) -> String {
        let mut hasher = DefaultHasher::new();
        namespace.hash(&mut hasher);
        record.timestamp.hash(&mut hasher);
        record.sequence.hash(&mut hasher);
        Uuid::new_v4().hash(&mut hasher);
        format!("{:016x}", hasher.finish())
    }

    /// Clone out the namespace's record list, creating the namespace (empty)
    /// if it does not exist yet. The clone is `Arc` pointers, not record data.
    fn snapshot(&self, namespace: &str) -> Vec<Arc<Record>> {
        {
            let guard = self
                .namespaces
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(records) = guard.get(namespace) {
                return records.clone();
            }
        }
        // First touch of this namespace: create it empty.
        let mut guard = self
            .namespaces
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard.entry(namespace.to_string()).or_default().clone()
    }
}

impl VectorIndex for MemoryVectorIndex {
    fn upsert_many(&self, namespace: &str, records: Vec<UpsertRecord>) -> UpsertReceipt {
        let count = records.len();

        // Build complete records before taking the lock so nothing
        // half-constructed is ever visible.
        let built: Vec<Arc<Record>> = records
            .into_iter()
            .map(|record| {
                let id = record
                    .id
                    .clone()
                    .unwrap_or_else(|| Self::generated_id(namespace, &record));
                Arc::new(Record {
                    id,
                    vector: record.vector,
                    text: record.text,
                    metadata: record.metadata,
                })
            })
            .collect();

        let mut guard = self
            .namespaces
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        guard
            .entry(namespace.to_string())
            .or_default()
            .extend(built);

        tracing::debug!(namespace, count, "appended records");
        UpsertReceipt { count }
    }

    fn query(
        &self,
        namespace: &str,
        query_vector: &[f32],
        top_k: usize,
        include_text: bool,
    ) -> Vec<QueryResult> {
        let snapshot = self.snapshot(namespace);

        let mut scored: Vec<QueryResult> = snapshot
            .iter()
            .map(|record| QueryResult {
                id: record.id.clone(),
                score: cosine_similarity(query_vector, &record.vector),
                text: include_text.then(|| record.text.clone()),
                metadata: record.metadata.clone(),
            })
            .collect();

        // Stable sort keeps encounter order for ties.
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(top_k);
        scored
    }

    fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(namespace)
            .map_or(0, Vec::len)
    }

    fn namespaces(&self) -> Vec<(String, usize)> {
        let guard = self
            .namespaces
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<(String, usize)> = guard
            .iter()
            .map(|(name, records)| (name.clone(), records.len()))
            .collect();
        out.sort();
        out
    }
}

//! Vector index port.
//!
//! The two-operation contract the pipelines depend on. The in-memory
//! brute-force implementation lives in `infrastructure::vector`; a larger
//! deployment can swap in an approximate index behind this same trait
//! without touching pipeline code.

use crate::domain::models::{QueryResult, UpsertReceipt, UpsertRecord};

/// A namespaced nearest-neighbor index.
///
/// Operations are synchronous: implementations are expected to be in-process
/// and CPU-bound. All methods must be safe to call from concurrent request
/// handlers.
pub trait VectorIndex: Send + Sync {
    /// Append every given record to the namespace, creating the namespace if
    /// it does not exist. Append-only: duplicate ids are not deduplicated.
    /// Returns the count of records just added.
    fn upsert_many(&self, namespace: &str, records: Vec<UpsertRecord>) -> UpsertReceipt;

    /// Top-K cosine similarity scan over the namespace, descending by score
    /// with ties in encounter order. Creates the namespace (empty) if it does
    /// not exist. When `include_text` is false, result text is omitted.
    fn query(
        &self,
        namespace: &str,
        query_vector: &[f32],
        top_k: usize,
        include_text: bool,
    ) -> Vec<QueryResult>;

    /// Number of records in a namespace; 0 for a namespace never written.
    fn len(&self, namespace: &str) -> usize;

    /// Whether a namespace holds no records.
    fn is_empty(&self, namespace: &str) -> bool {
        self.len(namespace) == 0
    }

    /// All namespaces with their record counts.
    fn namespaces(&self) -> Vec<(String, usize)>;
}

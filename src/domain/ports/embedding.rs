//! Embedding provider port.

use async_trait::async_trait;

use crate::domain::errors::GatewayResult;

/// Converts text into dense vectors via an external model.
///
/// Failures are surfaced, not retried, by the pipelines that call this.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Provider name, for logs.
    fn name(&self) -> &'static str;

    /// Embed a single text.
    async fn embed(&self, model: &str, text: &str) -> GatewayResult<Vec<f32>>;

    /// Embed a batch of texts in one round trip, preserving input order.
    ///
    /// The returned vector may be shorter than the input if the backend
    /// dropped entries; callers zip positionally and treat missing positions
    /// as empty vectors.
    async fn embed_batch(&self, model: &str, texts: &[String]) -> GatewayResult<Vec<Vec<f32>>>;
}

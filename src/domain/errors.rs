//! Error taxonomy for the gateway.
//!
//! Every pipeline failure carries a stable kind tag plus a human-readable
//! detail string. Collaborator errors are surfaced, never swallowed; partial
//! work is discarded rather than committed.

use thiserror::Error;

/// Errors surfaced by the ingestion and retrieval pipelines.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Caller error: missing or empty namespace, items, or query. Not retryable.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The embedding backend was unreachable or returned an error.
    /// Surfaced with the remote detail; no automatic retry.
    #[error("embedding failed: {0}")]
    EmbedFailed(String),

    /// The generation backend was unreachable or returned an error.
    #[error("generation failed: {0}")]
    GenerateFailed(String),

    /// A collaborator call exceeded its configured deadline. Distinct from a
    /// generic failure for observability; callers may treat it identically.
    #[error("{stage} call exceeded its deadline")]
    Timeout {
        /// Pipeline stage that timed out ("embedding" or "generation").
        stage: &'static str,
    },

    /// Configuration could not be loaded or failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GatewayError {
    /// Stable machine-readable tag for each error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::EmbedFailed(_) => "embed_failed",
            Self::GenerateFailed(_) => "generate_failed",
            Self::Timeout { .. } => "timeout",
            Self::InvalidConfig(_) => "invalid_config",
        }
    }
}

/// Convenience alias used throughout the crate.
pub type GatewayResult<T> = Result<T, GatewayError>;

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("malformed payload: {err}"))
    }
}

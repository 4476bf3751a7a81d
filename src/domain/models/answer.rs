//! Answer pipeline output types.

use serde::{Deserialize, Serialize};

/// Per-call overrides for the generation step. Any field left unset falls
/// back to the profile default, then to the built-in default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// The generation parameters actually used for a call, echoed back to the
/// caller so override resolution is observable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EffectiveParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// A reference from the generated answer back to a ranked source chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based rank index, matching the `[i]` labels in the prompt.
    pub index: usize,
    /// Record id of the cited chunk.
    pub id: String,
    /// Similarity score of the cited chunk.
    pub score: f32,
    /// Chunk text truncated to at most 240 characters.
    pub snippet: String,
    /// Record metadata.
    pub metadata: serde_json::Value,
}

/// A cited answer produced by the retrieval pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    /// Generated answer text.
    pub text: String,
    /// Citations parallel to the ranked retrieval results.
    pub citations: Vec<Citation>,
    /// Effective generation parameters.
    pub used: EffectiveParams,
}

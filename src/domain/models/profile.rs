//! Per-task model and parameter defaults.
//!
//! A profile is an immutable snapshot owned by whoever constructs the
//! pipelines. Merging a patch produces a new snapshot; nothing is cached in
//! process-global state.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{GatewayError, GatewayResult};

/// Bounds applied to the configured chunk size before it reaches the chunker.
pub const MIN_CHUNK_WORDS: usize = 64;
pub const MAX_CHUNK_WORDS: usize = 4096;

/// Embedding defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct EmbedProfile {
    #[serde(default = "default_embed_model")]
    pub model: String,
}

fn default_embed_model() -> String {
    "nomic-embed-text:latest".to_string()
}

impl Default for EmbedProfile {
    fn default() -> Self {
        Self {
            model: default_embed_model(),
        }
    }
}

/// Generation defaults for retrieval-backed answers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SummarizeRetrievalProfile {
    #[serde(default = "default_generation_model")]
    pub model: String,
    #[serde(default = "default_retrieval_temperature")]
    pub temperature: f32,
    #[serde(default = "default_retrieval_max_tokens")]
    pub max_tokens: u32,
}

fn default_generation_model() -> String {
    "llama3:latest".to_string()
}

const fn default_retrieval_temperature() -> f32 {
    0.1
}

const fn default_retrieval_max_tokens() -> u32 {
    256
}

impl Default for SummarizeRetrievalProfile {
    fn default() -> Self {
        Self {
            model: default_generation_model(),
            temperature: default_retrieval_temperature(),
            max_tokens: default_retrieval_max_tokens(),
        }
    }
}

/// Chunking defaults. `chunk_tokens` is interpreted as words by the chunker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ChunkingProfile {
    #[serde(default = "default_chunk_tokens")]
    pub chunk_tokens: usize,
    #[serde(default = "default_overlap_tokens")]
    pub overlap_tokens: usize,
}

const fn default_chunk_tokens() -> usize {
    512
}

const fn default_overlap_tokens() -> usize {
    50
}

impl Default for ChunkingProfile {
    fn default() -> Self {
        Self {
            chunk_tokens: default_chunk_tokens(),
            overlap_tokens: default_overlap_tokens(),
        }
    }
}

impl ChunkingProfile {
    /// Configured chunk size clamped to a sane bound. Out-of-range values are
    /// clamped rather than rejected.
    pub fn clamped_chunk_words(&self) -> usize {
        self.chunk_tokens.clamp(MIN_CHUNK_WORDS, MAX_CHUNK_WORDS)
    }
}

/// Reranker defaults. Recognized and carried through the profile even though
/// no reranking stage runs in this gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct RerankProfile {
    #[serde(default = "default_rerank_model")]
    pub model: String,
}

fn default_rerank_model() -> String {
    "bge-reranker:latest".to_string()
}

impl Default for RerankProfile {
    fn default() -> Self {
        Self {
            model: default_rerank_model(),
        }
    }
}

/// Intent-classification defaults.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct IntentProfile {
    #[serde(default = "default_intent_model")]
    pub model: String,
    #[serde(default = "default_intent_temperature")]
    pub temperature: f32,
}

fn default_intent_model() -> String {
    "phi4:3.8b".to_string()
}

const fn default_intent_temperature() -> f32 {
    0.0
}

impl Default for IntentProfile {
    fn default() -> Self {
        Self {
            model: default_intent_model(),
            temperature: default_intent_temperature(),
        }
    }
}

/// The full profile: per-task model and parameter defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Profile {
    #[serde(default)]
    pub embed: EmbedProfile,
    #[serde(default)]
    pub summarize_retrieval: SummarizeRetrievalProfile,
    #[serde(default)]
    pub chunking: ChunkingProfile,
    #[serde(default)]
    pub rerank: RerankProfile,
    #[serde(default)]
    pub intent: IntentProfile,
}

impl Profile {
    /// Deep-merge a partial patch into this profile, returning a new
    /// snapshot. Sections are merged field-by-field, never replaced
    /// wholesale: `{"chunking": {"chunk_tokens": 256}}` keeps the configured
    /// `overlap_tokens`.
    pub fn merged(&self, patch: &serde_json::Value) -> GatewayResult<Self> {
        if !patch.is_object() {
            return Err(GatewayError::BadRequest(
                "profile patch must be a JSON object".to_string(),
            ));
        }
        let mut base = serde_json::to_value(self)?;
        deep_merge(&mut base, patch);
        Ok(serde_json::from_value(base)?)
    }
}

/// Recursive object merge: objects merge per key, everything else replaces.
fn deep_merge(base: &mut serde_json::Value, patch: &serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base_map), serde_json::Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                deep_merge(
                    base_map.entry(key.clone()).or_insert(serde_json::Value::Null),
                    value,
                );
            }
        }
        (base_slot, patch_value) => *base_slot = patch_value.clone(),
    }
}

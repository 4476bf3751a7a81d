//! Source items and the transient chunks produced from them.

use serde::{Deserialize, Serialize};

/// A raw text item submitted for ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceItem {
    /// Document text to be chunked and embedded.
    pub text: String,
    /// Timestamp of the source item. Folded into chunk ids; items without a
    /// timestamp share the id prefix and may collide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Author attribution, carried into chunk metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Origin label (channel, file, url), carried into chunk metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SourceItem {
    /// Item with only text set, convenient in tests.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: None,
            author: None,
            source: None,
        }
    }
}

/// Metadata attached to every chunk and carried into the stored record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

/// A bounded span of source text, the atomic unit that gets embedded.
///
/// Chunks are transient: produced by the chunker, embedded, turned into
/// records, then discarded.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// `{timestamp}:{sequence}` where sequence is the zero-based chunk
    /// position within its item. Not globally unique across items that share
    /// a timestamp (or lack one).
    pub id: String,
    /// Chunk text.
    pub text: String,
    /// Zero-based position of this chunk within its source item.
    pub sequence: usize,
    /// Source attribution.
    pub metadata: ChunkMetadata,
}

//! Whitespace word chunker.
//!
//! A deliberately naive splitter: greedy packing of consecutive whitespace
//! words, no token awareness, no overlap between chunks. Chunk ids are
//! `{timestamp}:{sequence}`; items that share a timestamp (or lack one)
//! produce colliding ids, which the append-only store tolerates.

use crate::domain::models::{Chunk, ChunkMetadata, SourceItem};

/// Split items into chunks of at most `chunk_words` whitespace words.
///
/// Pure and deterministic: identical input always yields identical chunk
/// boundaries and ids. The last chunk of an item may be shorter; empty and
/// whitespace-only chunks are dropped. Callers resolving a configured size
/// should clamp it first (`ChunkingProfile::clamped_chunk_words`); the value
/// given here is honored as-is so tests can drive small sizes.
pub fn chunk(items: &[SourceItem], chunk_words: usize) -> Vec<Chunk> {
    let chunk_words = chunk_words.max(1);
    let mut chunks = Vec::new();

    for item in items {
        let words: Vec<&str> = item.text.split_whitespace().collect();
        let timestamp = item.timestamp.clone().unwrap_or_default();

        for (sequence, window) in words.chunks(chunk_words).enumerate() {
            let text = window.join(" ");
            if text.is_empty() {
                continue;
            }
            chunks.push(Chunk {
                id: format!("{timestamp}:{sequence}"),
                text,
                sequence,
                metadata: ChunkMetadata {
                    source: item.source.clone(),
                    timestamp: item.timestamp.clone(),
                    author: item.author.clone(),
                },
            });
        }
    }

    chunks
}

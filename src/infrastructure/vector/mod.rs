//! Vector infrastructure: the in-memory index and the word chunker.

pub mod chunker;
pub mod memory_index;

pub use memory_index::MemoryVectorIndex;

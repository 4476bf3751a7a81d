//! Ports: traits at the boundaries between the pipelines and their
//! collaborators.

pub mod embedding;
pub mod generation;
pub mod vector_index;

pub use embedding::EmbeddingProvider;
pub use generation::{ChatMessage, GenerationProvider};
pub use vector_index::VectorIndex;

//! Domain models for the gateway.

pub mod answer;
pub mod chunk;
pub mod profile;
pub mod record;

pub use answer::{Answer, Citation, EffectiveParams, ModelParams};
pub use chunk::{Chunk, ChunkMetadata, SourceItem};
pub use profile::{
    ChunkingProfile, EmbedProfile, IntentProfile, Profile, RerankProfile,
    SummarizeRetrievalProfile,
};
pub use record::{IngestReceipt, QueryResult, Record, UpsertReceipt, UpsertRecord};

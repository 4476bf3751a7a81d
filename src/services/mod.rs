//! Service layer: the ingestion and retrieval pipelines, composed from the
//! domain ports.

pub mod ingest;
pub mod retrieval;

pub use ingest::IngestService;
pub use retrieval::RetrievalService;

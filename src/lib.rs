//! Corral: a local retrieval gateway.
//!
//! Chunks documents, embeds them through an OpenAI-compatible backend, keeps
//! the vectors in a namespaced in-memory index, and answers questions with
//! citations back to the chunks the answer came from.
//!
//! Layout follows ports-and-adapters: `domain` holds the models, errors, and
//! the traits the pipelines depend on; `infrastructure` holds the concrete
//! adapters (the HTTP backend client, the in-memory index, config loading);
//! `services` composes them into the ingestion and retrieval pipelines;
//! `cli` is the binary surface.

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{GatewayError, GatewayResult};

//! Infrastructure layer: external integrations and concrete adapters.

pub mod config;
pub mod openai;
pub mod vector;

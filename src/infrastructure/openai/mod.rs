//! OpenAI-compatible backend adapter.

pub mod client;
pub mod types;

pub use client::{BackendConfig, OpenAiClient};

//! Generation provider port.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::GatewayResult;

/// One message in a chat-style generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Produces text from a prompt via an external model.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Run a chat completion and return the generated text.
    ///
    /// Implementations return an empty string when the backend answers
    /// without content; only transport or HTTP failures error.
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> GatewayResult<String>;
}

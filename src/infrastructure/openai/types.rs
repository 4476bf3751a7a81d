//! Wire types for the OpenAI-compatible backend.

use serde::{Deserialize, Serialize};

use crate::domain::ports::ChatMessage;

#[derive(Debug, Serialize)]
pub struct EmbeddingsRequest {
    pub model: String,
    pub input: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingsResponse {
    #[serde(default)]
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingData {
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub index: usize,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Always false; streaming is not part of this gateway.
    pub stream: bool,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice's message; falls back to concatenating all
    /// choices, and to an empty string when nothing is present. Missing
    /// content is not an error.
    pub fn extract_text(&self) -> String {
        if let Some(content) = self
            .choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
        {
            if !content.is_empty() {
                return content.to_string();
            }
        }
        self.choices
            .iter()
            .filter_map(|c| c.message.as_ref())
            .filter_map(|m| m.content.as_deref())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ModelsResponse {
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
pub struct ModelInfo {
    pub id: String,
}

/// Error envelope many OpenAI-compatible backends return.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_text_takes_first_choice() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [{"message": {"content": "hello"}}]
        }))
        .unwrap();
        assert_eq!(response.extract_text(), "hello");
    }

    #[test]
    fn extract_text_is_empty_when_content_missing() {
        let response: ChatResponse =
            serde_json::from_value(serde_json::json!({"choices": [{}]})).unwrap();
        assert_eq!(response.extract_text(), "");

        let response: ChatResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(response.extract_text(), "");
    }

    #[test]
    fn extract_text_joins_choices_when_first_is_empty() {
        let response: ChatResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                {"message": {"content": ""}},
                {"message": {"content": "part one "}},
                {"message": {"content": "part two"}}
            ]
        }))
        .unwrap();
        assert_eq!(response.extract_text(), "part one part two");
    }
}

//! HTTP client for an OpenAI-compatible backend (Ollama, vLLM, OpenAI).
//!
//! One client serves both collaborator boundaries: `/embeddings` for the
//! embedding step and `/chat/completions` for generation, plus `/models` as
//! a reachability probe. Requests carry the configured timeout and an
//! optional bearer token. Errors surface the remote error message; timeouts
//! are reported as a distinct kind.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::ports::{ChatMessage, EmbeddingProvider, GenerationProvider};

use super::types::{
    ApiErrorBody, ChatRequest, ChatResponse, EmbeddingsRequest, EmbeddingsResponse,
    ModelsResponse,
};

/// Connection settings for the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BackendConfig {
    /// Base URL including the `/v1` prefix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Optional bearer token; local backends usually run without one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model used when neither the caller nor the profile names one.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Deadline for every collaborator call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:11434/v1".to_string()
}

fn default_model() -> String {
    "llama3:latest".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            default_model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Failure of a single backend call, before it is attributed to a pipeline
/// stage.
enum CallError {
    TimedOut,
    Remote(String),
}

impl CallError {
    fn into_embed_error(self) -> GatewayError {
        match self {
            Self::TimedOut => GatewayError::Timeout { stage: "embedding" },
            Self::Remote(detail) => GatewayError::EmbedFailed(detail),
        }
    }

    fn into_generate_error(self) -> GatewayError {
        match self {
            Self::TimedOut => GatewayError::Timeout { stage: "generation" },
            Self::Remote(detail) => GatewayError::GenerateFailed(detail),
        }
    }
}

/// Client for one OpenAI-compatible backend.
pub struct OpenAiClient {
    config: BackendConfig,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(config: BackendConfig) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::InvalidConfig(format!("http client: {e}")))?;
        Ok(Self { config, http })
    }

    /// Default generation model from the backend config.
    pub fn default_model(&self) -> &str {
        &self.config.default_model
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.api_key.as_deref() {
            Some(key) if !key.is_empty() => request.bearer_auth(key),
            _ => request,
        }
    }

    fn classify(error: &reqwest::Error) -> CallError {
        if error.is_timeout() {
            CallError::TimedOut
        } else {
            CallError::Remote(error.to_string())
        }
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, CallError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::classify(&e))?;

        if !status.is_success() {
            // Prefer the backend's own error message over the status line.
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| {
                    if body.is_empty() {
                        status.to_string()
                    } else {
                        body.clone()
                    }
                });
            return Err(CallError::Remote(detail));
        }

        serde_json::from_str(&body)
            .map_err(|e| CallError::Remote(format!("malformed backend response: {e}")))
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, CallError> {
        let response = self
            .authorize(self.http.post(self.url(path)))
            .json(body)
            .send()
            .await
            .map_err(|e| Self::classify(&e))?;
        Self::read_json(response).await
    }

    /// `GET /models`: model ids known to the backend.
    pub async fn list_models(&self) -> GatewayResult<Vec<String>> {
        let response = self
            .authorize(self.http.get(self.url("/models")))
            .send()
            .await
            .map_err(|e| Self::classify(&e).into_generate_error())?;
        let parsed: ModelsResponse = Self::read_json(response)
            .await
            .map_err(CallError::into_generate_error)?;
        Ok(parsed.data.into_iter().map(|m| m.id).collect())
    }

    async fn call_embeddings(&self, model: &str, input: Vec<String>) -> GatewayResult<Vec<Vec<f32>>> {
        let request = EmbeddingsRequest {
            model: model.to_string(),
            input,
        };
        let response: EmbeddingsResponse = self
            .post_json("/embeddings", &request)
            .await
            .map_err(CallError::into_embed_error)?;

        // Re-sort by index so output order matches input order.
        let mut data = response.data;
        data.sort_by_key(|d| d.index);
        Ok(data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    async fn embed(&self, model: &str, text: &str) -> GatewayResult<Vec<f32>> {
        let mut vectors = self.call_embeddings(model, vec![text.to_string()]).await?;
        if vectors.is_empty() {
            return Err(GatewayError::EmbedFailed(
                "backend returned no embedding".to_string(),
            ));
        }
        Ok(vectors.swap_remove(0))
    }

    async fn embed_batch(&self, model: &str, texts: &[String]) -> GatewayResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.call_embeddings(model, texts.to_vec()).await
    }
}

#[async_trait]
impl GenerationProvider for OpenAiClient {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> GatewayResult<String> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            temperature,
            max_tokens,
            stream: false,
        };
        let response: ChatResponse = self
            .post_json("/chat/completions", &request)
            .await
            .map_err(CallError::into_generate_error)?;
        Ok(response.extract_text())
    }
}

//! Retrieval pipeline: embed the question, rank stored chunks, and either
//! return the ranking or synthesize a cited answer from it.

use std::sync::Arc;

use crate::domain::errors::{GatewayError, GatewayResult};
use crate::domain::models::{Answer, Citation, EffectiveParams, ModelParams, Profile, QueryResult};
use crate::domain::ports::{ChatMessage, EmbeddingProvider, GenerationProvider, VectorIndex};

/// Sent as the system message on every answer call.
const ANSWER_INSTRUCTION: &str = "You are a retrieval assistant. Answer the question using only the \
provided sources. Cite every source you rely on with its bracketed index, like [1]. If the sources \
do not contain the answer, say that you cannot answer from the available sources.";

/// Characters of each source included in the generation prompt.
const SOURCE_CONTEXT_CHARS: usize = 800;

/// Characters of each source echoed back as a citation snippet.
const CITATION_SNIPPET_CHARS: usize = 240;

/// Answers questions against an already-populated namespace. Read-only with
/// respect to the store.
pub struct RetrievalService {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    generator: Arc<dyn GenerationProvider>,
    profile: Profile,
    default_model: String,
}

impl RetrievalService {
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        generator: Arc<dyn GenerationProvider>,
        profile: Profile,
        default_model: impl Into<String>,
    ) -> Self {
        Self {
            index,
            embedder,
            generator,
            profile,
            default_model: default_model.into(),
        }
    }

    /// Embed the question and return the top-K ranking, without generation.
    pub async fn query(
        &self,
        namespace: &str,
        question: &str,
        top_k: usize,
        with_text: bool,
    ) -> GatewayResult<Vec<QueryResult>> {
        self.validate(namespace, question)?;
        let vector = self
            .embedder
            .embed(&self.profile.embed.model, question)
            .await?;
        Ok(self.index.query(namespace, &vector, top_k, with_text))
    }

    /// Full pipeline: embed, retrieve, assemble context, generate.
    ///
    /// Every retrieved chunk becomes a citation, in rank order, whether or
    /// not the model referenced it. The `used` parameters echo exactly what
    /// was sent to the backend.
    pub async fn answer(
        &self,
        namespace: &str,
        question: &str,
        top_k: usize,
        overrides: &ModelParams,
    ) -> GatewayResult<Answer> {
        self.validate(namespace, question)?;
        let params = self.resolve_params(overrides);

        let vector = self
            .embedder
            .embed(&self.profile.embed.model, question)
            .await?;
        let results = self.index.query(namespace, &vector, top_k, true);
        tracing::debug!(namespace, retrieved = results.len(), "assembled context");

        let context = assemble_context(&results);
        let messages = [
            ChatMessage::system(ANSWER_INSTRUCTION),
            ChatMessage::user(format!("Question: {question}\n\nSources:\n{context}")),
        ];

        let text = self
            .generator
            .complete(
                &params.model,
                &messages,
                params.temperature,
                params.max_tokens,
            )
            .await?;

        let citations = results
            .into_iter()
            .enumerate()
            .map(|(i, r)| Citation {
                index: i + 1,
                id: r.id,
                score: r.score,
                snippet: truncate_chars(r.text.as_deref().unwrap_or(""), CITATION_SNIPPET_CHARS),
                metadata: r.metadata,
            })
            .collect();

        Ok(Answer {
            text,
            citations,
            used: params,
        })
    }

    /// Caller overrides win over the profile; the backend default model is
    /// the last resort.
    fn resolve_params(&self, overrides: &ModelParams) -> EffectiveParams {
        let section = &self.profile.summarize_retrieval;
        let model = overrides
            .model
            .clone()
            .filter(|m| !m.is_empty())
            .or_else(|| Some(section.model.clone()).filter(|m| !m.is_empty()))
            .unwrap_or_else(|| self.default_model.clone());
        EffectiveParams {
            model,
            temperature: overrides.temperature.unwrap_or(section.temperature),
            max_tokens: overrides.max_tokens.unwrap_or(section.max_tokens),
        }
    }

    fn validate(&self, namespace: &str, question: &str) -> GatewayResult<()> {
        if namespace.trim().is_empty() {
            return Err(GatewayError::BadRequest("namespace is required".to_string()));
        }
        if question.trim().is_empty() {
            return Err(GatewayError::BadRequest("question is required".to_string()));
        }
        Ok(())
    }
}

/// One block per retrieved chunk, labelled with its 1-based rank so the
/// model's `[i]` citations line up with the citation list.
fn assemble_context(results: &[QueryResult]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(i, r)| {
            format!(
                "Source [{}]: {}",
                i + 1,
                truncate_chars(r.text.as_deref().unwrap_or(""), SOURCE_CONTEXT_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Truncate on a character boundary, never mid-codepoint.
fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

//! End-to-end pipeline tests: ingestion through retrieval and answering,
//! with deterministic in-process stand-ins for the embedding and generation
//! backends.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use corral::domain::errors::GatewayResult;
use corral::domain::models::{ModelParams, Profile, SourceItem};
use corral::domain::ports::{
    ChatMessage, EmbeddingProvider, GenerationProvider, VectorIndex,
};
use corral::infrastructure::vector::MemoryVectorIndex;
use corral::services::{IngestService, RetrievalService};

/// Deterministic embedder: word counts hashed into a fixed number of
/// buckets. Texts sharing words land close under cosine similarity, which is
/// all the ranking assertions need.
struct BagOfWordsEmbedder;

const DIM: usize = 64;

fn bag_of_words(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0_f32; DIM];
    for word in text.to_lowercase().split_whitespace() {
        let mut hasher = DefaultHasher::new();
        word.hash(&mut hasher);
        vector[(hasher.finish() % DIM as u64) as usize] += 1.0;
    }
    vector
}

#[async_trait]
impl EmbeddingProvider for BagOfWordsEmbedder {
    fn name(&self) -> &'static str {
        "bag-of-words"
    }

    async fn embed(&self, _model: &str, text: &str) -> GatewayResult<Vec<f32>> {
        Ok(bag_of_words(text))
    }

    async fn embed_batch(&self, _model: &str, texts: &[String]) -> GatewayResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| bag_of_words(t)).collect())
    }
}

/// Generator that records what it was asked and returns a canned answer.
struct RecordingGenerator {
    prompts: Mutex<Vec<(String, Vec<ChatMessage>, f32, u32)>>,
}

impl RecordingGenerator {
    fn new() -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn last_user_content(&self) -> String {
        let prompts = self.prompts.lock().unwrap();
        let (_, messages, _, _) = prompts.last().expect("generator was never called");
        messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GenerationProvider for RecordingGenerator {
    async fn complete(
        &self,
        model: &str,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> GatewayResult<String> {
        self.prompts.lock().unwrap().push((
            model.to_string(),
            messages.to_vec(),
            temperature,
            max_tokens,
        ));
        Ok("Based on the sources, see [1].".to_string())
    }
}

struct Harness {
    index: Arc<MemoryVectorIndex>,
    ingest: IngestService,
    retrieval: RetrievalService,
    generator: Arc<RecordingGenerator>,
}

fn harness() -> Harness {
    let index = Arc::new(MemoryVectorIndex::new());
    let embedder = Arc::new(BagOfWordsEmbedder);
    let generator = Arc::new(RecordingGenerator::new());
    let profile = Profile::default();

    Harness {
        index: index.clone(),
        ingest: IngestService::new(index.clone(), embedder.clone(), profile.clone()),
        retrieval: RetrievalService::new(
            index,
            embedder,
            generator.clone(),
            profile,
            "llama3:latest",
        ),
        generator,
    }
}

fn corpus() -> Vec<SourceItem> {
    vec![
        SourceItem {
            text: "the quick brown fox jumps over the lazy dog".to_string(),
            timestamp: Some("2024-01-01T00:00:00Z".to_string()),
            author: Some("aesop".to_string()),
            source: Some("fables".to_string()),
        },
        SourceItem {
            text: "a slow green turtle naps in the warm afternoon sun".to_string(),
            timestamp: Some("2024-01-02T00:00:00Z".to_string()),
            author: None,
            source: Some("fables".to_string()),
        },
        SourceItem {
            text: "rust programs manage memory through ownership and borrowing".to_string(),
            timestamp: Some("2024-01-03T00:00:00Z".to_string()),
            author: None,
            source: Some("notes".to_string()),
        },
    ]
}

#[tokio::test]
async fn ingest_then_query_ranks_the_matching_chunk_first() {
    let h = harness();
    let receipt = h.ingest.ingest("docs", &corpus()).await.unwrap();
    assert_eq!(receipt.chunk_count, 3);
    assert_eq!(receipt.embedded_count, 3);

    let results = h
        .retrieval
        .query("docs", "quick brown fox", 3, true)
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert!(results[0]
        .text
        .as_deref()
        .unwrap()
        .contains("quick brown fox"));
    assert!(results[0].score > results[1].score);
    // Descending throughout.
    assert!(results[1].score >= results[2].score);
}

#[tokio::test]
async fn two_word_chunks_rank_the_matching_chunk_first() {
    use corral::domain::models::UpsertRecord;
    use corral::infrastructure::vector::chunker;

    let item = SourceItem {
        text: "the quick brown fox".to_string(),
        timestamp: Some("t1".to_string()),
        author: None,
        source: None,
    };
    let chunks = chunker::chunk(&[item], 2);
    let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["the quick", "brown fox"]);

    let embedder = Arc::new(BagOfWordsEmbedder);
    let chunk_texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
    let embeddings = embedder
        .embed_batch("nomic-embed-text:latest", &chunk_texts)
        .await
        .unwrap();

    let index = Arc::new(MemoryVectorIndex::new());
    let records = chunks
        .into_iter()
        .zip(embeddings)
        .map(|(chunk, vector)| UpsertRecord {
            id: Some(chunk.id),
            vector,
            text: chunk.text,
            ..UpsertRecord::default()
        })
        .collect();
    index.upsert_many("docs", records);

    let retrieval = RetrievalService::new(
        index,
        embedder,
        Arc::new(RecordingGenerator::new()),
        Profile::default(),
        "llama3:latest",
    );
    let results = retrieval.query("docs", "the quick", 2, true).await.unwrap();

    assert_eq!(results[0].id, "t1:0");
    assert_eq!(results[0].text.as_deref(), Some("the quick"));
    assert!(results[0].score > results[1].score);
}

#[tokio::test]
async fn chunk_metadata_survives_into_query_results() {
    let h = harness();
    h.ingest.ingest("docs", &corpus()).await.unwrap();

    let results = h
        .retrieval
        .query("docs", "quick brown fox", 1, true)
        .await
        .unwrap();

    assert_eq!(results[0].metadata["author"], "aesop");
    assert_eq!(results[0].metadata["source"], "fables");
    // Id carries the item timestamp and chunk position.
    assert_eq!(results[0].id, "2024-01-01T00:00:00Z:0");
}

#[tokio::test]
async fn rejected_ingest_leaves_the_store_untouched() {
    let h = harness();
    h.ingest.ingest("docs", &corpus()).await.unwrap();
    let before = h.index.len("docs");

    let err = h.ingest.ingest("docs", &[]).await.unwrap_err();
    assert_eq!(err.kind(), "bad_request");
    assert_eq!(h.index.len("docs"), before);
}

#[tokio::test]
async fn answer_carries_one_citation_per_retrieved_chunk() {
    let h = harness();
    h.ingest.ingest("docs", &corpus()).await.unwrap();

    let answer = h
        .retrieval
        .answer("docs", "quick brown fox", 2, &ModelParams::default())
        .await
        .unwrap();

    assert_eq!(answer.text, "Based on the sources, see [1].");
    assert_eq!(answer.citations.len(), 2);
    assert_eq!(answer.citations[0].index, 1);
    assert_eq!(answer.citations[1].index, 2);
    assert!(answer.citations[0].score >= answer.citations[1].score);
    assert!(answer
        .citations
        .iter()
        .all(|c| c.snippet.chars().count() <= 240));

    // The prompt labels sources with the same indices the citations use.
    let prompt = h.generator.last_user_content();
    assert!(prompt.contains("Source [1]:"));
    assert!(prompt.contains("Source [2]:"));
    assert!(prompt.contains("Question: quick brown fox"));
}

#[tokio::test]
async fn long_chunks_are_truncated_in_the_prompt_but_stored_whole() {
    let h = harness();
    // 400 distinct-ish words, one chunk at the default chunk size, well over
    // the 800-character prompt budget.
    let text = (0..400)
        .map(|i| format!("word{i}"))
        .collect::<Vec<_>>()
        .join(" ");
    let items = [SourceItem::from_text(text.clone())];
    h.ingest.ingest("docs", &items).await.unwrap();

    h.retrieval
        .answer("docs", "word1 word2", 1, &ModelParams::default())
        .await
        .unwrap();

    let prompt = h.generator.last_user_content();
    let source_block = prompt
        .split("Source [1]: ")
        .nth(1)
        .expect("prompt should contain the source")
        .split("\n\n")
        .next()
        .unwrap();
    assert_eq!(source_block.chars().count(), 800);

    // The full text is still retrievable from the store.
    let results = h
        .retrieval
        .query("docs", "word1 word2", 1, true)
        .await
        .unwrap();
    assert_eq!(results[0].text.as_deref(), Some(text.as_str()));
}

#[tokio::test]
async fn answer_uses_profile_params_unless_overridden() {
    let h = harness();
    h.ingest.ingest("docs", &corpus()).await.unwrap();

    let answer = h
        .retrieval
        .answer("docs", "quick brown fox", 1, &ModelParams::default())
        .await
        .unwrap();
    assert_eq!(answer.used.model, "llama3:latest");
    assert!((answer.used.temperature - 0.1).abs() < f32::EPSILON);
    assert_eq!(answer.used.max_tokens, 256);

    let overrides = ModelParams {
        model: Some("mistral:7b".to_string()),
        temperature: Some(0.7),
        max_tokens: Some(64),
    };
    let answer = h
        .retrieval
        .answer("docs", "quick brown fox", 1, &overrides)
        .await
        .unwrap();
    assert_eq!(answer.used.model, "mistral:7b");

    let prompts = h.generator.prompts.lock().unwrap();
    let (model, _, temperature, max_tokens) = prompts.last().unwrap();
    assert_eq!(model, "mistral:7b");
    assert!((temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(*max_tokens, 64);
}

#[tokio::test]
async fn namespaces_are_isolated_end_to_end() {
    let h = harness();
    h.ingest.ingest("fables", &corpus()[..2].to_vec()).await.unwrap();
    h.ingest.ingest("notes", &corpus()[2..].to_vec()).await.unwrap();

    let results = h
        .retrieval
        .query("notes", "ownership and borrowing", 10, true)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].text.as_deref().unwrap().contains("ownership"));

    // Querying a namespace never written returns empty, and creates it.
    let empty = h.retrieval.query("scratch", "anything", 5, false).await.unwrap();
    assert!(empty.is_empty());
    assert_eq!(h.index.len("scratch"), 0);
}

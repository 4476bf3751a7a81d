//! Command handlers.
//!
//! Each handler wires the pipelines from configuration, runs one operation,
//! and prints either a table or JSON. The vector store lives in process
//! memory, so `query` and `ask` take an optional `--file` to ingest into the
//! store they are about to search.

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::table;
use crate::domain::models::{ModelParams, Profile, SourceItem};
use crate::infrastructure::config::{ConfigLoader, GatewayConfig, PROFILES_FILE};
use crate::infrastructure::openai::OpenAiClient;
use crate::infrastructure::vector::MemoryVectorIndex;
use crate::services::{IngestService, RetrievalService};

/// Shared wiring for every command: backend client, store, profile.
struct Gateway {
    client: Arc<OpenAiClient>,
    index: Arc<MemoryVectorIndex>,
    profile: Profile,
}

impl Gateway {
    fn new(config: GatewayConfig) -> Result<Self> {
        let client = Arc::new(OpenAiClient::new(config.backend)?);
        let profile = ConfigLoader::load_profile().context("Failed to load profile")?;
        Ok(Self {
            client,
            index: Arc::new(MemoryVectorIndex::new()),
            profile,
        })
    }

    fn ingest_service(&self) -> IngestService {
        IngestService::new(
            self.index.clone(),
            self.client.clone(),
            self.profile.clone(),
        )
    }

    fn retrieval_service(&self) -> RetrievalService {
        RetrievalService::new(
            self.index.clone(),
            self.client.clone(),
            self.client.clone(),
            self.profile.clone(),
            self.client.default_model(),
        )
    }
}

/// An ingestion item as it appears in input files: a bare string or a full
/// object.
#[derive(Deserialize)]
#[serde(untagged)]
enum ItemInput {
    Text(String),
    Item(SourceItem),
}

impl From<ItemInput> for SourceItem {
    fn from(input: ItemInput) -> Self {
        match input {
            ItemInput::Text(text) => SourceItem::from_text(text),
            ItemInput::Item(item) => item,
        }
    }
}

/// Read ingestion items from a JSON file, or stdin for `-`.
fn read_items(path: &str) -> Result<Vec<SourceItem>> {
    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?
    };

    let items: Vec<ItemInput> =
        serde_json::from_str(&raw).context("Input must be a JSON array of strings or items")?;
    Ok(items.into_iter().map(SourceItem::from).collect())
}

/// `corral models`
pub async fn models(config: GatewayConfig, json: bool) -> Result<()> {
    let gateway = Gateway::new(config)?;
    let models = gateway
        .client
        .list_models()
        .await
        .context("Failed to list backend models")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&models)?);
    } else if models.is_empty() {
        println!("No models available.");
    } else {
        println!("{}", table::format_models(&models));
    }
    Ok(())
}

/// `corral ingest`
pub async fn ingest(
    config: GatewayConfig,
    namespace: String,
    file: String,
    json: bool,
) -> Result<()> {
    let gateway = Gateway::new(config)?;
    let items = read_items(&file)?;
    let receipt = gateway
        .ingest_service()
        .ingest(&namespace, &items)
        .await
        .context("Ingestion failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&receipt)?);
    } else {
        println!(
            "Ingested {} chunk{} ({} embedded) into '{}' [job {}]",
            receipt.chunk_count,
            if receipt.chunk_count == 1 { "" } else { "s" },
            receipt.embedded_count,
            namespace,
            receipt.job_id
        );
    }
    Ok(())
}

/// `corral query`
#[allow(clippy::too_many_arguments)]
pub async fn query(
    config: GatewayConfig,
    namespace: String,
    question: String,
    file: Option<String>,
    top_k: usize,
    text: bool,
    json: bool,
) -> Result<()> {
    let gateway = Gateway::new(config)?;
    if let Some(file) = file {
        let items = read_items(&file)?;
        gateway
            .ingest_service()
            .ingest(&namespace, &items)
            .await
            .context("Ingestion failed")?;
    }

    let results = gateway
        .retrieval_service()
        .query(&namespace, &question, top_k, text)
        .await
        .context("Query failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else if results.is_empty() {
        println!("No results in '{namespace}'.");
    } else {
        println!("{}", table::format_query_results(&results));
    }
    Ok(())
}

/// `corral ask`
#[allow(clippy::too_many_arguments)]
pub async fn ask(
    config: GatewayConfig,
    namespace: String,
    question: String,
    file: Option<String>,
    top_k: usize,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    json: bool,
) -> Result<()> {
    let gateway = Gateway::new(config)?;
    if let Some(file) = file {
        let items = read_items(&file)?;
        let receipt = gateway
            .ingest_service()
            .ingest(&namespace, &items)
            .await
            .context("Ingestion failed")?;
        tracing::info!(chunks = receipt.chunk_count, namespace, "ingested before ask");
    }

    let overrides = ModelParams {
        model,
        temperature,
        max_tokens,
    };
    let answer = gateway
        .retrieval_service()
        .answer(&namespace, &question, top_k, &overrides)
        .await
        .context("Answer failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&answer)?);
    } else {
        println!("{}\n", answer.text);
        if !answer.citations.is_empty() {
            println!("Sources:");
            println!("{}", table::format_citations(&answer.citations));
        }
        println!(
            "Model: {} (temperature {}, max_tokens {})",
            answer.used.model, answer.used.temperature, answer.used.max_tokens
        );
    }
    Ok(())
}

/// `corral profile show`
pub async fn profile_show(json: bool) -> Result<()> {
    let profile = ConfigLoader::load_profile().context("Failed to load profile")?;
    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        print!("{}", serde_yaml::to_string(&profile)?);
    }
    Ok(())
}

/// `corral profile merge`
pub async fn profile_merge(patch: String, json: bool) -> Result<()> {
    let patch: serde_json::Value =
        serde_json::from_str(&patch).context("Patch must be valid JSON")?;
    let profile = ConfigLoader::load_profile().context("Failed to load profile")?;
    let merged = profile.merged(&patch).context("Failed to merge patch")?;
    ConfigLoader::save_profile(PROFILES_FILE, &merged).context("Failed to save profile")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&merged)?);
    } else {
        println!("Profile updated:");
        print!("{}", serde_yaml::to_string(&merged)?);
    }
    Ok(())
}

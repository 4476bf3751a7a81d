//! CLI type definitions
//!
//! Clap command structures defining the command-line interface.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "corral")]
#[command(about = "Corral - local retrieval gateway", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List models available on the backend
    Models,

    /// Chunk and embed documents into a namespace
    Ingest {
        /// Target namespace
        namespace: String,

        /// JSON file of items (strings or objects with text/timestamp/author/source);
        /// `-` reads stdin
        #[arg(short, long, default_value = "-")]
        file: String,
    },

    /// Rank stored chunks against a question, without generation
    Query {
        /// Namespace to search
        namespace: String,

        /// Question to rank against
        question: String,

        /// Ingest this JSON file first, then query
        #[arg(short, long)]
        file: Option<String>,

        /// Number of results to return
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,

        /// Include chunk text in the results
        #[arg(short, long)]
        text: bool,
    },

    /// Ask a question and get an answer with citations
    Ask {
        /// Namespace to search
        namespace: String,

        /// Question to answer
        question: String,

        /// Ingest this JSON file first, then answer
        #[arg(short, long)]
        file: Option<String>,

        /// Number of chunks to retrieve
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,

        /// Generation model, overriding the profile
        #[arg(short, long)]
        model: Option<String>,

        /// Sampling temperature, overriding the profile
        #[arg(long)]
        temperature: Option<f32>,

        /// Response token budget, overriding the profile
        #[arg(long)]
        max_tokens: Option<u32>,
    },

    /// Profile management commands
    #[command(subcommand)]
    Profile(ProfileCommands),
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the effective profile
    Show,

    /// Merge a JSON patch into the profile and save the result
    Merge {
        /// Partial profile as JSON, e.g. '{"chunking": {"chunk_tokens": 256}}'
        patch: String,
    },
}

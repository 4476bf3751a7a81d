//! Corral CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use corral::cli::{commands, Cli, Commands, ProfileCommands};
use corral::infrastructure::config::{ConfigLoader, LoggingConfig};

/// Subscriber setup driven by the loaded logging config: its level is the
/// default filter directive (`RUST_LOG` still wins) and its format picks the
/// stderr layer.
fn init_tracing(logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(logging.env_filter());
    if logging.is_json() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ConfigLoader::load() {
        Ok(config) => config,
        Err(err) => {
            init_tracing(&LoggingConfig::default());
            corral::cli::handle_error(
                anyhow::Error::new(err).context("Failed to load configuration"),
                cli.json,
            );
        }
    };
    init_tracing(&config.logging);

    let result = match cli.command {
        Commands::Models => commands::models(config, cli.json).await,
        Commands::Ingest { namespace, file } => {
            commands::ingest(config, namespace, file, cli.json).await
        }
        Commands::Query {
            namespace,
            question,
            file,
            top_k,
            text,
        } => commands::query(config, namespace, question, file, top_k, text, cli.json).await,
        Commands::Ask {
            namespace,
            question,
            file,
            top_k,
            model,
            temperature,
            max_tokens,
        } => {
            commands::ask(
                config,
                namespace,
                question,
                file,
                top_k,
                model,
                temperature,
                max_tokens,
                cli.json,
            )
            .await
        }
        Commands::Profile(ProfileCommands::Show) => commands::profile_show(cli.json).await,
        Commands::Profile(ProfileCommands::Merge { patch }) => {
            commands::profile_merge(patch, cli.json).await
        }
    };

    if let Err(err) = result {
        corral::cli::handle_error(err, cli.json);
    }
}

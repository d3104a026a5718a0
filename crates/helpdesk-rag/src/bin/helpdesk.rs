//! Help desk assistant CLI
//!
//! Run with: cargo run -p helpdesk-rag --bin helpdesk -- chat

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use helpdesk_rag::config::AssistantConfig;
use helpdesk_rag::ingestion::DirectoryIngestor;
use helpdesk_rag::pipeline::Assistant;
use helpdesk_rag::providers::{LocalVectorStore, OllamaProvider};
use helpdesk_rag::types::PipelineResult;

#[derive(Parser)]
#[command(name = "helpdesk", about = "Triage-routed RAG help desk assistant")]
struct Cli {
    /// Path to a TOML config file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive chat loop (type 'exit' to quit)
    Chat,
    /// Ask a single question and print the answer with sources
    Ask { question: String },
    /// Print the routed category for a question
    Classify { question: String },
    /// Ingest a directory tree into the knowledge base
    /// (subdirectory names become category tags)
    Ingest { dir: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "helpdesk_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = AssistantConfig::load_or_default(cli.config.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!("  - Top-k: {}", config.retrieval.top_k);

    // Probe Ollama up front; warn but keep going so config errors still
    // surface with useful messages.
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Start it with: ollama serve");
            tracing::warn!(
                "Then pull models: ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.generate_model
            );
        }
    }

    match cli.command {
        Command::Chat => chat(&config).await,
        Command::Ask { question } => ask(&config, &question).await,
        Command::Classify { question } => {
            let assistant = Assistant::from_config(&config)?;
            let category = assistant.classify(&question).await?;
            println!("{}", category);
            Ok(())
        }
        Command::Ingest { dir } => ingest(&config, &dir).await,
    }
}

async fn ingest(config: &AssistantConfig, dir: &std::path::Path) -> anyhow::Result<()> {
    let (embedder, _llm) = OllamaProvider::new(&config.llm, &config.embeddings)?.split();
    let store = LocalVectorStore::open(&config.vector_store, config.embeddings.dimensions)?;

    let ingestor = DirectoryIngestor::new(Arc::new(embedder), Arc::new(store));
    let report = ingestor.ingest_dir(dir).await?;

    println!(
        "Ingested {} file(s), skipped {}. Knowledge base saved to {}",
        report.files_ingested,
        report.files_skipped,
        config.vector_store.storage_path.display()
    );
    Ok(())
}

async fn ask(config: &AssistantConfig, question: &str) -> anyhow::Result<()> {
    let assistant = Assistant::from_config(config)?;
    let result = assistant.answer(question).await?;
    render(result).await
}

async fn chat(config: &AssistantConfig) -> anyhow::Result<()> {
    let assistant = Assistant::from_config(config)?;

    println!("Help desk assistant ready. Type 'exit' to stop.");

    let stdin = std::io::stdin();
    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") {
            break;
        }

        // Show the routing decision before retrieval runs.
        let category = assistant.classify(query).await?;
        println!("Routed to: {}", category.as_str().to_uppercase());

        let result = assistant.respond(query, category).await?;
        render(result).await?;
    }

    Ok(())
}

async fn render(mut result: PipelineResult) -> anyhow::Result<()> {
    let sources = result.sources();

    print!("Assistant: ");
    std::io::stdout().flush()?;
    while let Some(token) = result.stream.next_token().await {
        let token = token?;
        print!("{}", token);
        std::io::stdout().flush()?;
    }
    println!();

    if !sources.is_empty() {
        println!("\nSources:");
        for source in &sources {
            println!("  - {}", source.format_inline());
        }
    }

    Ok(())
}

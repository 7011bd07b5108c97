//! SkyQuery CLI - ask hybrid retrieval questions from the terminal.

mod config;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use config::Config;
use skyquery::{decide_mode, Orchestrator, RuleBasedExtractor, SourceRecord};
use skyquery_graph::Neo4jStore;
use skyquery_index::{load_chunks_jsonl, ChunkIndex, HashEmbedder, MemoryIndex};
use skyquery_llm::{GeminiBackend, LlmBackend, OllamaBackend};
use std::path::Path;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "skyquery")]
#[command(author, version, about = "SkyQuery - hybrid satellite data product Q&A", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a question through the full orchestrator
    Ask {
        /// The question
        question: String,
    },

    /// Show which retrieval mode a question routes to
    Mode {
        /// The question
        question: String,
    },

    /// Debug semantic retrieval: show the top chunks for a query
    Search {
        /// Search query
        query: String,

        /// Number of chunks to show
        #[arg(short, long, default_value = "5")]
        k: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    }

    let config = Config::load()?;

    match cli.command {
        Commands::Ask { question } => ask(&config, &question).await,
        Commands::Mode { question } => {
            let mode = decide_mode(&question);
            println!("{} {:?}", "mode:".cyan().bold(), mode);
            Ok(())
        }
        Commands::Search { query, k } => search(&config, &query, k).await,
    }
}

async fn ask(config: &Config, question: &str) -> Result<()> {
    let orchestrator = build_orchestrator(config)?;

    let bundle = orchestrator.ask(question).await?;

    println!("{} {:?}", "mode:".cyan().bold(), bundle.mode);
    println!();
    println!("{}", bundle.answer.green());

    if !bundle.sources.is_empty() {
        println!();
        println!("{}", "sources:".cyan().bold());
        for source in &bundle.sources {
            match source {
                SourceRecord::Graph { query, rows } => {
                    println!("  {} {}", "[kg]".yellow(), query.dimmed());
                    if let Some(rows) = rows {
                        println!("       {} rows", rows.len());
                    }
                }
                SourceRecord::Document { source, preview } => {
                    println!("  {} {}", "[rag]".yellow(), source);
                    println!("        {}", preview.dimmed());
                }
            }
        }
    }

    Ok(())
}

async fn search(config: &Config, query: &str, k: usize) -> Result<()> {
    let index = build_index(config)?;
    let hits = index.search(query, k).await?;

    if hits.is_empty() {
        println!("{}", "no chunks indexed".dimmed());
        return Ok(());
    }

    for hit in hits {
        println!(
            "{} {} {}",
            format!("{:.3}", hit.score).yellow(),
            hit.chunk.source().cyan(),
            hit.chunk.text.chars().take(80).collect::<String>().dimmed()
        );
    }
    Ok(())
}

fn build_orchestrator(config: &Config) -> Result<Orchestrator> {
    let llm = build_llm(config)?;
    let store = Neo4jStore::new(
        &config.graph.uri,
        &config.graph.user,
        &std::env::var("NEO4J_PASSWORD").context("NEO4J_PASSWORD is not set")?,
    )
    .with_database(&config.graph.database);
    let index = build_index(config)?;

    Ok(Orchestrator::new(
        llm,
        Arc::new(store),
        Arc::new(index),
        Arc::new(RuleBasedExtractor::new()),
    ))
}

fn build_llm(config: &Config) -> Result<Arc<dyn LlmBackend>> {
    match config.llm.backend.as_str() {
        "gemini" => {
            let mut backend = GeminiBackend::from_env()
                .map_err(|_| anyhow!("GEMINI_API_KEY or GOOGLE_API_KEY is not set"))?;
            if let Some(model) = &config.llm.model {
                backend = backend.with_model(model);
            }
            Ok(Arc::new(backend))
        }
        "ollama" => {
            let mut backend = OllamaBackend::new(&config.llm.ollama_url);
            if let Some(model) = &config.llm.model {
                backend = backend.with_model(model);
            }
            Ok(Arc::new(backend))
        }
        other => Err(anyhow!("Unknown LLM backend '{other}' (use gemini or ollama)")),
    }
}

fn build_index(config: &Config) -> Result<MemoryIndex> {
    let index = MemoryIndex::new(Box::new(HashEmbedder::new(config.index.dimension)));
    if let Some(corpus) = &config.index.corpus {
        let chunks = load_chunks_jsonl(Path::new(corpus))
            .with_context(|| format!("Failed to load corpus from {}", corpus))?;
        index.add_chunks(chunks)?;
    }
    Ok(index)
}

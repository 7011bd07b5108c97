//! Application state: service construction and the shared orchestrator.
//!
//! The graph store, chunk index and LLM client are opened once here and
//! shared read-only across requests; the orchestrator itself holds no
//! per-request state.

use anyhow::{Context, Result};
use skyquery::{Orchestrator, RuleBasedExtractor};
use skyquery_graph::Neo4jStore;
use skyquery_index::{load_chunks_jsonl, HashEmbedder, MemoryIndex};
use skyquery_llm::{GeminiBackend, LlmBackend, OllamaBackend};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Embedding dimension for the in-process index.
const EMBEDDING_DIM: usize = 256;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    /// Build all services from the environment.
    ///
    /// LLM: `GEMINI_API_KEY`/`GOOGLE_API_KEY` selects Gemini, otherwise
    /// Ollama at `OLLAMA_URL` (default localhost).
    /// Graph: `NEO4J_URI`, `NEO4J_USER`, `NEO4J_PASSWORD`.
    /// Index: in-process, loaded from the given JSONL corpus.
    pub fn from_env(corpus: Option<&str>) -> Result<Self> {
        let llm: Arc<dyn LlmBackend> = match GeminiBackend::from_env() {
            Ok(backend) => {
                info!("using Gemini backend");
                Arc::new(backend)
            }
            Err(_) => {
                let endpoint = std::env::var("OLLAMA_URL")
                    .unwrap_or_else(|_| "http://localhost:11434".to_string());
                info!(%endpoint, "no Gemini key found, using Ollama backend");
                Arc::new(OllamaBackend::new(&endpoint))
            }
        };

        let store = Neo4jStore::from_env()
            .context("Failed to configure Neo4j (set NEO4J_URI, NEO4J_USER, NEO4J_PASSWORD)")?;

        let index = MemoryIndex::new(Box::new(HashEmbedder::new(EMBEDDING_DIM)));
        match corpus {
            Some(path) => {
                let chunks = load_chunks_jsonl(Path::new(path))
                    .with_context(|| format!("Failed to load corpus from {}", path))?;
                info!(chunks = chunks.len(), %path, "loaded chunk corpus");
                index.add_chunks(chunks)?;
            }
            None => {
                warn!("no corpus supplied, semantic retrieval will return nothing");
            }
        }

        let orchestrator = Orchestrator::new(
            llm,
            Arc::new(store),
            Arc::new(index),
            Arc::new(RuleBasedExtractor::new()),
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
        })
    }
}

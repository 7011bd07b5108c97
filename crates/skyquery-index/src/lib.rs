//! # SkyQuery Index
//!
//! Chunk storage and similarity search for SkyQuery's semantic retrieval
//! path.
//!
//! A [`ChunkIndex`] answers two questions: "which K chunks are nearest to
//! this query" and "what is every chunk you hold" (the latter exists only
//! for the keyword-fallback scan and is deliberately kept behind the trait
//! so a keyword index could replace the linear scan later).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skyquery_index::{Chunk, ChunkIndex, HashEmbedder, MemoryIndex};
//!
//! let index = MemoryIndex::new(Box::new(HashEmbedder::new(256)));
//! index.add_chunks(vec![
//!     Chunk::new("c1", "INSAT-3D rainfall estimates at 0.25 degree grid")
//!         .with_metadata("source", "insat3d.html"),
//! ])?;
//!
//! let hits = index.search("rainfall", 5).await?;
//! ```

mod corpus;
mod embedder;
pub mod memory;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub use corpus::load_chunks_jsonl;
pub use embedder::{Embedder, HashEmbedder};
pub use memory::MemoryIndex;
pub use mock::MockIndex;

/// Errors that can occur when working with a chunk index.
#[derive(Debug, Clone, Error)]
pub enum IndexError {
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Index error: {0}")]
    Internal(String),
}

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// A span of source text stored with provenance metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for this chunk.
    pub id: String,
    /// The chunk text.
    pub text: String,
    /// Metadata: at least a `source` identifier, plus optional domain tags
    /// (`satellite`, `parameter`, `region`).
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    /// Add a metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// The source identifier, or "Unknown" when missing.
    pub fn source(&self) -> &str {
        self.metadata
            .get("source")
            .and_then(|v| v.as_str())
            .unwrap_or("Unknown")
    }

    /// Case-insensitive substring test against the chunk text.
    pub fn contains_keyword(&self, keyword: &str) -> bool {
        self.text.to_lowercase().contains(&keyword.to_lowercase())
    }
}

/// A chunk with its similarity score for some query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// Similarity score (higher is more similar).
    pub score: f32,
}

/// Abstract interface for chunk similarity search.
#[async_trait]
pub trait ChunkIndex: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Return the top `k` chunks nearest to `query`, descending by score.
    async fn search(&self, query: &str, k: usize) -> IndexResult<Vec<ScoredChunk>>;

    /// Enumerate every stored chunk. Only used by the keyword-fallback
    /// scan; O(N) is acceptable here.
    async fn all_chunks(&self) -> IndexResult<Vec<Chunk>>;

    /// Total number of stored chunks.
    async fn count(&self) -> IndexResult<usize>;
}

/// Utility functions for vector math.
pub mod util {
    /// Compute cosine similarity between two vectors.
    pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        assert_eq!(a.len(), b.len(), "Vectors must have same dimension");

        let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot / (norm_a * norm_b)
        }
    }

    /// Normalize a vector to unit length.
    pub fn normalize(v: &mut [f32]) {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in v.iter_mut() {
                *x /= norm;
            }
        }
    }
}

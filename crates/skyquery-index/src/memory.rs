//! In-memory chunk index using brute-force search.
//!
//! Suitable for corpora up to a few tens of thousands of chunks; the
//! exhaustive enumeration path the fallback scan needs is free here.

use crate::{Chunk, ChunkIndex, Embedder, IndexError, IndexResult, ScoredChunk, util};
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory chunk index: embeds on insert, scores by cosine on search.
pub struct MemoryIndex {
    entries: RwLock<Vec<(Chunk, Vec<f32>)>>,
    embedder: Box<dyn Embedder>,
}

impl MemoryIndex {
    /// Create an empty index over the given embedder.
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            embedder,
        }
    }

    /// Embed and store chunks, preserving insertion order.
    pub fn add_chunks(&self, chunks: Vec<Chunk>) -> IndexResult<()> {
        let mut embedded = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let vector = self.embedder.embed(&chunk.text)?;
            embedded.push((chunk, vector));
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|e| IndexError::Internal(format!("Failed to acquire write lock: {}", e)))?;
        entries.extend(embedded);
        Ok(())
    }
}

#[async_trait]
impl ChunkIndex for MemoryIndex {
    fn name(&self) -> &str {
        "memory"
    }

    async fn search(&self, query: &str, k: usize) -> IndexResult<Vec<ScoredChunk>> {
        let query_vec = self.embedder.embed(query)?;

        let entries = self
            .entries
            .read()
            .map_err(|e| IndexError::Internal(format!("Failed to acquire read lock: {}", e)))?;

        let mut scored: Vec<ScoredChunk> = entries
            .iter()
            .map(|(chunk, vector)| ScoredChunk {
                chunk: chunk.clone(),
                score: util::cosine_similarity(&query_vec, vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    async fn all_chunks(&self) -> IndexResult<Vec<Chunk>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| IndexError::Internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries.iter().map(|(chunk, _)| chunk.clone()).collect())
    }

    async fn count(&self) -> IndexResult<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|e| IndexError::Internal(format!("Failed to acquire read lock: {}", e)))?;

        Ok(entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashEmbedder;

    fn index_with(texts: &[&str]) -> MemoryIndex {
        let index = MemoryIndex::new(Box::new(HashEmbedder::new(256)));
        let chunks = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(format!("c{}", i), *t))
            .collect();
        index.add_chunks(chunks).unwrap();
        index
    }

    #[tokio::test]
    async fn test_search_ranks_by_similarity() {
        let index = index_with(&[
            "INSAT-3D rainfall estimates at half hourly intervals",
            "Oceansat-3 ocean colour monitor payload",
            "website privacy policy and terms of use",
        ]);

        let hits = index
            .search("rainfall estimates from INSAT-3D", 2)
            .await
            .unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.id, "c0");
        assert!(hits[0].score >= hits[1].score);
    }

    #[tokio::test]
    async fn test_search_k_larger_than_corpus() {
        let index = index_with(&["only one chunk"]);
        let hits = index.search("anything", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn test_all_chunks_preserves_insertion_order() {
        let index = index_with(&["first", "second", "third"]);
        let chunks = index.all_chunks().await.unwrap();
        let ids: Vec<&str> = chunks.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c0", "c1", "c2"]);
    }

    #[tokio::test]
    async fn test_count() {
        let index = index_with(&["a b", "c d"]);
        assert_eq!(index.count().await.unwrap(), 2);
    }
}

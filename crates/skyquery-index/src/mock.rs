//! Mock chunk index for testing.
//!
//! Returns a fixed hit list for every search and a fixed corpus for the
//! fallback scan, independent of any embedding.

use crate::{Chunk, ChunkIndex, IndexError, IndexResult, ScoredChunk};
use async_trait::async_trait;

/// Mock index with canned search results and corpus.
pub struct MockIndex {
    hits: Vec<ScoredChunk>,
    corpus: Vec<Chunk>,
    fail_with: Option<IndexError>,
}

impl MockIndex {
    /// Create an empty mock.
    pub fn new() -> Self {
        Self {
            hits: Vec::new(),
            corpus: Vec::new(),
            fail_with: None,
        }
    }

    /// Set the hits every `search` call returns (truncated to `k`).
    pub fn with_hits(mut self, chunks: Vec<Chunk>) -> Self {
        // Descending synthetic scores so rank order is explicit.
        let n = chunks.len() as f32;
        self.hits = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| ScoredChunk {
                chunk,
                score: (n - i as f32) / n,
            })
            .collect();
        self
    }

    /// Set the corpus `all_chunks` returns.
    pub fn with_corpus(mut self, chunks: Vec<Chunk>) -> Self {
        self.corpus = chunks;
        self
    }

    /// Make every call fail with the given error.
    pub fn with_error(mut self, error: IndexError) -> Self {
        self.fail_with = Some(error);
        self
    }
}

impl Default for MockIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChunkIndex for MockIndex {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, _query: &str, k: usize) -> IndexResult<Vec<ScoredChunk>> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        Ok(self.hits.iter().take(k).cloned().collect())
    }

    async fn all_chunks(&self) -> IndexResult<Vec<Chunk>> {
        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }
        Ok(self.corpus.clone())
    }

    async fn count(&self) -> IndexResult<usize> {
        Ok(self.corpus.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_hits_truncated_to_k() {
        let index = MockIndex::new().with_hits(vec![
            Chunk::new("a", "one"),
            Chunk::new("b", "two"),
            Chunk::new("c", "three"),
        ]);

        let hits = index.search("anything", 2).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].chunk.id, "a");
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn test_injected_error() {
        let index = MockIndex::new().with_error(IndexError::Internal("down".to_string()));
        assert!(index.search("q", 5).await.is_err());
        assert!(index.all_chunks().await.is_err());
    }
}

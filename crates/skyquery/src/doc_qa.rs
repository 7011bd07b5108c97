//! Document question answering with keyword fallback.
//!
//! The pipeline: primary top-K retrieval, keyword check, optional
//! exhaustive-scan fallback, keyword-first reordering, context assembly,
//! grounded synthesis.
//!
//! Provenance note: the `sources` list always comes from a dedicated
//! initial retrieval call, before fallback and reordering. A
//! fallback-rescued answer can therefore list sources unrelated to its
//! grounding context. This matches production behavior and is kept as-is;
//! see DESIGN.md before changing it.

use crate::error::DocQaError;
use crate::extract::EntityExtractor;
use crate::fusion::SourceRecord;
use skyquery_index::{Chunk, ChunkIndex};
use skyquery_llm::{ContextAnswerPrompt, LlmBackend, PromptTemplate};
use std::sync::Arc;
use tracing::{debug, warn};

/// Chunks fetched per retrieval call.
pub const TOP_K: usize = 5;
/// Chunks reported as provenance.
pub const SOURCE_COUNT: usize = 3;
/// Characters of chunk text shown in a source preview.
const PREVIEW_LEN: usize = 200;

/// Output of the document path.
#[derive(Debug, Clone)]
pub struct DocAnswer {
    /// The synthesized (or sentinel) answer.
    pub answer: String,
    /// Provenance records from the initial retrieval's top chunks.
    pub sources: Vec<SourceRecord>,
}

/// The document QA pipeline.
pub struct DocQa {
    llm: Arc<dyn LlmBackend>,
    index: Arc<dyn ChunkIndex>,
    extractor: Arc<dyn EntityExtractor>,
}

impl DocQa {
    /// Create a new pipeline over the given services.
    pub fn new(
        llm: Arc<dyn LlmBackend>,
        index: Arc<dyn ChunkIndex>,
        extractor: Arc<dyn EntityExtractor>,
    ) -> Self {
        Self {
            llm,
            index,
            extractor,
        }
    }

    /// Answer a question from the document corpus.
    ///
    /// When `fallback_keyword` is absent it is derived from the question's
    /// first recognized entity. The keyword is only consulted when
    /// `use_fallback` is on.
    pub async fn answer(
        &self,
        question: &str,
        use_fallback: bool,
        fallback_keyword: Option<String>,
    ) -> Result<DocAnswer, DocQaError> {
        // Provenance comes from this call's top chunks, independent of what
        // later grounds the answer.
        let initial = self.index.search(question, TOP_K).await?;
        let sources = initial
            .iter()
            .take(SOURCE_COUNT)
            .map(|hit| SourceRecord::Document {
                source: hit.chunk.source().to_string(),
                preview: preview(&hit.chunk.text),
            })
            .collect();

        let keyword = fallback_keyword.or_else(|| self.extractor.first_entity(question));
        debug!(keyword = keyword.as_deref(), "fallback keyword");

        let answer = self
            .grounded_answer(question, use_fallback, keyword.as_deref())
            .await?;

        Ok(DocAnswer { answer, sources })
    }

    /// Retrieve, optionally rescue, reorder, and synthesize.
    async fn grounded_answer(
        &self,
        question: &str,
        use_fallback: bool,
        keyword: Option<&str>,
    ) -> Result<String, DocQaError> {
        let retrieved = self.index.search(question, TOP_K).await?;
        let mut chunks: Vec<Chunk> = retrieved.into_iter().map(|hit| hit.chunk).collect();

        // Retrieval "failed" when the keyword is missing from every hit,
        // not when the hit list is empty.
        let found = match keyword {
            Some(keyword) if use_fallback => {
                chunks.iter().any(|chunk| chunk.contains_keyword(keyword))
            }
            _ => !chunks.is_empty(),
        };

        if use_fallback && !found {
            if let Some(keyword) = keyword {
                warn!(keyword, "semantic retrieval missed the keyword, scanning corpus");
                chunks = self
                    .index
                    .all_chunks()
                    .await?
                    .into_iter()
                    .filter(|chunk| chunk.contains_keyword(keyword))
                    .collect();

                if chunks.is_empty() {
                    // Normal return, not an error; the model is never asked.
                    return Ok(format!(
                        "Could not find any relevant information for '{}'.",
                        keyword
                    ));
                }
            }
        }

        // Bias context toward the keyword even when the primary retrieval
        // succeeded.
        if use_fallback {
            if let Some(keyword) = keyword {
                chunks = prioritize_keyword(chunks, keyword);
            }
        }

        let context = chunks
            .iter()
            .map(|chunk| chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        let prompt = ContextAnswerPrompt::new(context, question);
        let answer = self.llm.complete(&prompt.generate()).await?;
        Ok(answer.trim().to_string())
    }
}

/// Stable partition: chunks containing the keyword first, then the rest,
/// each group preserving its original relative order.
pub fn prioritize_keyword(chunks: Vec<Chunk>, keyword: &str) -> Vec<Chunk> {
    let mut contains_keyword = Vec::new();
    let mut others = Vec::new();

    for chunk in chunks {
        if chunk.contains_keyword(keyword) {
            contains_keyword.push(chunk);
        } else {
            others.push(chunk);
        }
    }

    contains_keyword.extend(others);
    contains_keyword
}

/// Short preview of a chunk text for provenance listings.
fn preview(text: &str) -> String {
    let truncated: String = text.chars().take(PREVIEW_LEN).collect();
    format!("{}...", truncated)
}

//! Error taxonomy for the orchestrator.
//!
//! Each retrieval path isolates its own failures; the orchestrator only
//! adds the case where every selected path failed. Mode routing is total
//! and has no error type.

use skyquery_graph::GraphError;
use skyquery_index::IndexError;
use skyquery_llm::LlmError;
use thiserror::Error;

/// Failures of the knowledge-graph path.
#[derive(Debug, Error)]
pub enum GraphQaError {
    /// The model produced no usable statement.
    #[error("Query generation failed: {0}")]
    Generation(String),

    /// The store rejected the generated statement. Carries the offending
    /// query so callers can log it separately from generation failures.
    #[error("Graph store rejected generated query `{query}`: {source}")]
    Execution {
        query: String,
        #[source]
        source: GraphError,
    },

    /// The store itself was unreachable or misbehaved.
    #[error("Graph store unavailable: {0}")]
    Store(#[source] GraphError),

    /// The language model was unreachable or misbehaved.
    #[error("Language model failed: {0}")]
    Llm(#[from] LlmError),
}

/// Failures of the document-retrieval path.
#[derive(Debug, Error)]
pub enum DocQaError {
    /// The chunk index was unreachable or misbehaved.
    #[error("Chunk index failed: {0}")]
    Index(#[from] IndexError),

    /// The language model was unreachable or misbehaved.
    #[error("Language model failed: {0}")]
    Llm(#[from] LlmError),
}

/// Failures of a whole orchestration call.
#[derive(Debug, Error)]
pub enum AskError {
    /// The knowledge-graph path failed and was the only path selected.
    #[error(transparent)]
    Graph(#[from] GraphQaError),

    /// The document path failed and was the only path selected.
    #[error(transparent)]
    Documents(#[from] DocQaError),

    /// Both paths were selected and both failed.
    #[error("Both retrieval paths failed (kg: {kg}; rag: {rag})")]
    BothFailed { kg: GraphQaError, rag: DocQaError },
}

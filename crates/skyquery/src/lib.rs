//! # SkyQuery
//!
//! Hybrid retrieval for natural-language questions about satellite data
//! products: a deterministic router sends each question down a
//! knowledge-graph pipeline (NL to Cypher to rows to answer), a semantic
//! document pipeline (vector search with keyword fallback), or both, and a
//! fusion layer merges the outputs into one answer with traceable sources.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skyquery::prelude::*;
//! use std::sync::Arc;
//!
//! let orchestrator = Orchestrator::new(llm, graph_store, chunk_index, extractor);
//!
//! let bundle = orchestrator.ask("Where is INSAT-3D rainfall data?").await?;
//! println!("[{:?}] {}", bundle.mode, bundle.answer);
//! for source in &bundle.sources {
//!     println!("  {:?}", source);
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`router`] - phrase-rule mode classification (KG / RAG / BOTH)
//! - [`graph_qa`] - knowledge-graph pipeline over [`skyquery_graph`]
//! - [`doc_qa`] - document pipeline over [`skyquery_index`], with the
//!   keyword fallback and reordering
//! - [`extract`] - fallback keyword extraction
//! - [`fusion`] - merge policy and the `AnswerBundle` contract
//! - [`orchestrator`] - ties the pipelines together with per-path failure
//!   isolation
//!
//! All external services (graph store, chunk index, language model, entity
//! extractor) are injected as trait objects; every one ships a mock, so the
//! whole orchestration is testable without a network.

pub mod doc_qa;
pub mod error;
pub mod extract;
pub mod fusion;
pub mod graph_qa;
pub mod orchestrator;
pub mod router;

pub use doc_qa::{DocAnswer, DocQa};
pub use error::{AskError, DocQaError, GraphQaError};
pub use extract::{EntityExtractor, EntitySpan, RuleBasedExtractor, StaticExtractor};
pub use fusion::{fuse, AnswerBundle, SourceRecord};
pub use graph_qa::{GraphAnswer, GraphQa};
pub use orchestrator::Orchestrator;
pub use router::{decide_mode, Mode};

/// Prelude module for convenient imports.
///
/// ```rust
/// use skyquery::prelude::*;
/// ```
pub mod prelude {
    pub use crate::doc_qa::{DocAnswer, DocQa};
    pub use crate::error::{AskError, DocQaError, GraphQaError};
    pub use crate::extract::{EntityExtractor, RuleBasedExtractor};
    pub use crate::fusion::{fuse, AnswerBundle, SourceRecord};
    pub use crate::graph_qa::{GraphAnswer, GraphQa};
    pub use crate::orchestrator::Orchestrator;
    pub use crate::router::{decide_mode, Mode};

    pub use skyquery_graph::{GraphSchema, GraphStore, Row};
    pub use skyquery_index::{Chunk, ChunkIndex, ScoredChunk};
    pub use skyquery_llm::{LlmBackend, LlmConfig};
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

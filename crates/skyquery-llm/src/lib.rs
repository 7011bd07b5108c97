//! # SkyQuery LLM
//!
//! Language-model backends for SkyQuery question answering.
//!
//! This crate provides the `LlmBackend` trait consumed by the retrieval
//! pipelines, the prompt templates for Cypher generation and grounded
//! answer synthesis, and concrete backends.
//!
//! ## Features
//!
//! - `api`: Gemini API backend
//! - `local`: Local backend (Ollama)
//! - `full`: All backends
//!
//! ## Usage
//!
//! ```rust,ignore
//! use skyquery_llm::{LlmBackend, OllamaBackend};
//!
//! let backend = OllamaBackend::new("http://localhost:11434");
//! let answer = backend.complete("Summarize INSAT-3D in one sentence.").await?;
//! ```

mod backend;
mod prompt;

pub use backend::{LlmBackend, LlmConfig, LlmError, LlmResult, MockBackend};
pub use prompt::{
    ContextAnswerPrompt, CypherPrompt, GraphAnswerPrompt, PromptTemplate, NO_ANSWER_SENTINEL,
};

#[cfg(feature = "local")]
mod ollama;
#[cfg(feature = "local")]
pub use ollama::OllamaBackend;

#[cfg(feature = "api")]
mod gemini;
#[cfg(feature = "api")]
pub use gemini::GeminiBackend;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{LlmBackend, LlmConfig, LlmError, LlmResult, MockBackend};
    pub use crate::{ContextAnswerPrompt, CypherPrompt, GraphAnswerPrompt, PromptTemplate};

    #[cfg(feature = "local")]
    pub use crate::OllamaBackend;

    #[cfg(feature = "api")]
    pub use crate::GeminiBackend;
}

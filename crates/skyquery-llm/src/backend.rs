//! Core LLM backend trait.

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;

/// LLM-related errors.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Rate limited: retry after {0} seconds")]
    RateLimited(u32),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Timeout after {0} seconds")]
    Timeout(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;

/// Configuration for LLM requests.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model name/identifier.
    pub model: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Request timeout in seconds.
    pub timeout_secs: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "default".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            timeout_secs: 30,
        }
    }
}

impl LlmConfig {
    /// Create config for Gemini.
    pub fn gemini() -> Self {
        Self {
            model: "gemini-2.5-flash-lite".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            timeout_secs: 30,
        }
    }

    /// Create config for Ollama.
    pub fn ollama() -> Self {
        Self {
            model: "llama3.2".to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            timeout_secs: 60, // Local models can be slower
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set max tokens.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    /// Set timeout.
    pub fn with_timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Core trait for LLM backends.
///
/// Implementors turn a rendered prompt into generated text. The retrieval
/// pipelines only depend on `complete`; everything else is bookkeeping.
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Get the backend name.
    fn name(&self) -> &str;

    /// Get the current configuration.
    fn config(&self) -> &LlmConfig;

    /// Generate a completion for a prompt.
    async fn complete(&self, prompt: &str) -> LlmResult<String>;

    /// Check if the backend is available.
    async fn health_check(&self) -> LlmResult<bool> {
        // Default: try a simple completion
        match self.complete("ping").await {
            Ok(_) => Ok(true),
            Err(e) => match e {
                LlmError::ConnectionFailed(_) => Ok(false),
                LlmError::AuthenticationFailed => Ok(false),
                _ => Ok(true),
            },
        }
    }
}

/// A mock backend for testing.
///
/// Returns canned responses matched by prompt substring and records every
/// prompt it receives, so tests can assert which pipeline stages called the
/// model (and with what context).
pub struct MockBackend {
    config: LlmConfig,
    responses: Vec<(String, String)>,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    /// Create a new mock backend.
    pub fn new() -> Self {
        Self {
            config: LlmConfig::default(),
            responses: Vec::new(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Add a canned response for a prompt pattern.
    ///
    /// Patterns are checked in insertion order; the first match wins.
    pub fn with_response(mut self, pattern: &str, response: &str) -> Self {
        self.responses.push((pattern.to_string(), response.to_string()));
        self
    }

    /// All prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("prompt log poisoned").clone()
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().expect("prompt log poisoned").len()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        self.prompts
            .lock()
            .expect("prompt log poisoned")
            .push(prompt.to_string());

        for (pattern, response) in &self.responses {
            if prompt.contains(pattern) {
                return Ok(response.clone());
            }
        }
        Ok("Mock response".to_string())
    }
}

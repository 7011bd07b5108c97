//! Gemini backend for the Google Generative Language API.
//!
//! Requires the `api` feature and an API key.

use crate::backend::{LlmBackend, LlmConfig, LlmError, LlmResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
    #[serde(default)]
    status: String,
}

/// Gemini backend for the Google Generative Language API.
///
/// # Example
///
/// ```rust,ignore
/// use skyquery_llm::{GeminiBackend, LlmBackend};
///
/// let backend = GeminiBackend::from_env()?;
/// let answer = backend.complete("Describe INSAT-3D rainfall products.").await?;
/// ```
pub struct GeminiBackend {
    api_key: String,
    config: LlmConfig,
    client: reqwest::Client,
}

impl GeminiBackend {
    /// Create a new Gemini backend.
    pub fn new(api_key: &str) -> Self {
        Self::with_config(api_key, LlmConfig::gemini())
    }

    /// Create with custom config.
    pub fn with_config(api_key: &str, config: LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key: api_key.to_string(),
            config,
            client,
        }
    }

    /// Create from `GEMINI_API_KEY` or `GOOGLE_API_KEY`.
    pub fn from_env() -> LlmResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| LlmError::AuthenticationFailed)?;
        Ok(Self::new(&api_key))
    }

    /// Set the model.
    pub fn with_model(mut self, model: &str) -> Self {
        self.config.model = model.to_string();
        self
    }

    /// Use gemini-2.5-flash.
    pub fn flash(mut self) -> Self {
        self.config.model = "gemini-2.5-flash".to_string();
        self
    }

    /// Use gemini-2.5-flash-lite (default, fastest).
    pub fn flash_lite(mut self) -> Self {
        self.config.model = "gemini-2.5-flash-lite".to_string();
        self
    }

    /// Make a request to the Gemini API.
    async fn request(&self, prompt: &str) -> LlmResult<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_tokens,
            },
        };

        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.config.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    LlmError::ConnectionFailed("Cannot connect to Gemini API".to_string())
                } else if e.is_timeout() {
                    LlmError::Timeout(self.config.timeout_secs)
                } else {
                    LlmError::ApiError(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(LlmError::AuthenticationFailed);
            }

            if status.as_u16() == 429 {
                return Err(LlmError::RateLimited(60));
            }

            if status.as_u16() == 404 {
                return Err(LlmError::ModelNotFound(self.config.model.clone()));
            }

            if let Ok(error) = serde_json::from_str::<GeminiErrorBody>(&body) {
                return Err(LlmError::ApiError(format!(
                    "Gemini API error {} ({}): {}",
                    status, error.error.status, error.error.message
                )));
            }

            return Err(LlmError::ApiError(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        resp.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| LlmError::InvalidResponse("No candidates in response".to_string()))
    }
}

#[async_trait]
impl LlmBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    async fn complete(&self, prompt: &str) -> LlmResult<String> {
        self.request(prompt).await
    }
}

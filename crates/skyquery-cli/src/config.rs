//! Configuration management for the SkyQuery CLI.
//!
//! Settings live in `skyquery.toml` (searched from the current directory
//! upward). Secrets (API keys, the Neo4j password) come from the
//! environment only, never from the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SkyQuery CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub graph: GraphSection,
    #[serde(default)]
    pub index: IndexSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSection {
    /// "gemini" or "ollama".
    #[serde(default = "default_backend")]
    pub backend: String,
    /// Model override; backend default when empty.
    #[serde(default)]
    pub model: Option<String>,
    /// Ollama endpoint.
    #[serde(default = "default_ollama_url")]
    pub ollama_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphSection {
    /// Neo4j HTTP endpoint.
    #[serde(default = "default_neo4j_uri")]
    pub uri: String,
    #[serde(default = "default_neo4j_user")]
    pub user: String,
    #[serde(default = "default_neo4j_database")]
    pub database: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSection {
    /// Path to the chunk corpus (JSONL).
    #[serde(default)]
    pub corpus: Option<String>,
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

fn default_backend() -> String {
    "ollama".to_string()
}
fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}
fn default_neo4j_uri() -> String {
    "http://localhost:7474".to_string()
}
fn default_neo4j_user() -> String {
    "neo4j".to_string()
}
fn default_neo4j_database() -> String {
    "neo4j".to_string()
}
fn default_dimension() -> usize {
    256
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model: None,
            ollama_url: default_ollama_url(),
        }
    }
}

impl Default for GraphSection {
    fn default() -> Self {
        Self {
            uri: default_neo4j_uri(),
            user: default_neo4j_user(),
            database: default_neo4j_database(),
        }
    }
}

impl Default for IndexSection {
    fn default() -> Self {
        Self {
            corpus: None,
            dimension: default_dimension(),
        }
    }
}

impl Config {
    /// Load config from skyquery.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        if let Some(path) = find_config_file() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config: {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }
}

/// Find skyquery.toml in current or parent directories.
fn find_config_file() -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let config_path = dir.join("skyquery.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.llm.backend, "ollama");
        assert_eq!(config.graph.user, "neo4j");
        assert_eq!(config.index.dimension, 256);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [llm]
            backend = "gemini"
            model = "gemini-2.5-flash"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.backend, "gemini");
        assert_eq!(config.llm.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(config.graph.uri, "http://localhost:7474");
    }
}

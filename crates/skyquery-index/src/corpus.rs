//! Chunk corpus loading.
//!
//! The index-building batch job writes one JSON object per line:
//! `{"id": "...", "text": "...", "metadata": {...}}`. `id` defaults to the
//! line number when omitted.

use crate::{Chunk, IndexError, IndexResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawChunk {
    #[serde(default)]
    id: Option<String>,
    text: String,
    #[serde(default)]
    metadata: HashMap<String, serde_json::Value>,
}

/// Load chunks from a JSONL file. Blank lines are skipped.
pub fn load_chunks_jsonl(path: &Path) -> IndexResult<Vec<Chunk>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| IndexError::Corpus(format!("Failed to read {}: {}", path.display(), e)))?;

    let mut chunks = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let raw: RawChunk = serde_json::from_str(line).map_err(|e| {
            IndexError::Corpus(format!(
                "Invalid chunk at {}:{}: {}",
                path.display(),
                line_no + 1,
                e
            ))
        })?;
        chunks.push(Chunk {
            id: raw.id.unwrap_or_else(|| format!("chunk-{}", line_no)),
            text: raw.text,
            metadata: raw.metadata,
        });
    }
    Ok(chunks)
}

//! # SkyQuery Graph
//!
//! Graph store interface for SkyQuery's knowledge-graph retrieval path.
//!
//! The orchestrator only ever talks to a [`GraphStore`]: a service that
//! executes a Cypher statement with named parameters and returns ordered
//! rows, and that can report a schema snapshot for prompt construction.
//!
//! ## Supported Backends
//!
//! | Backend | Feature Flag | Description |
//! |---------|--------------|-------------|
//! | Mock | (default) | Canned responses, good for testing |
//! | Neo4j | `neo4j` | Neo4j HTTP transaction API |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use skyquery_graph::{GraphStore, Neo4jStore};
//!
//! let store = Neo4jStore::from_env()?;
//! let rows = store.run("MATCH (s:Satellite) RETURN s.name", &Default::default()).await?;
//! ```

pub mod mock;

#[cfg(feature = "neo4j")]
pub mod neo4j;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur when working with a graph store.
#[derive(Debug, Clone, Error)]
pub enum GraphError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query rejected: {0}")]
    QueryRejected(String),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Schema introspection failed: {0}")]
    Schema(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Timeout after {0} seconds")]
    Timeout(u32),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Named parameters for a query.
pub type Params = HashMap<String, serde_json::Value>;

/// One result row: an ordered list of column/value pairs.
///
/// Column order is whatever the store returned; callers must not re-sort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    fields: Vec<(String, serde_json::Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column/value pair.
    pub fn with_field(mut self, column: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.push((column.into(), value.into()));
        self
    }

    /// Look up a value by column name.
    pub fn get(&self, column: &str) -> Option<&serde_json::Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Iterate column/value pairs in store order.
    pub fn iter(&self) -> impl Iterator<Item = &(String, serde_json::Value)> {
        self.fields.iter()
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the row as a `column: value` record for prompt text.
    pub fn render(&self) -> String {
        self.fields
            .iter()
            .map(|(name, value)| format!("{}: {}", name, render_value(value)))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A node label and its known properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLabel {
    pub name: String,
    pub properties: Vec<String>,
}

/// A relationship pattern between two node labels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelPattern {
    pub start: String,
    pub rel_type: String,
    pub end: String,
}

/// Snapshot of the graph schema, rendered into generation prompts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSchema {
    pub node_labels: Vec<NodeLabel>,
    pub relationships: Vec<RelPattern>,
}

impl GraphSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node label with its properties.
    pub fn with_label(mut self, name: impl Into<String>, properties: &[&str]) -> Self {
        self.node_labels.push(NodeLabel {
            name: name.into(),
            properties: properties.iter().map(|p| (*p).to_string()).collect(),
        });
        self
    }

    /// Add a relationship pattern.
    pub fn with_relationship(
        mut self,
        start: impl Into<String>,
        rel_type: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        self.relationships.push(RelPattern {
            start: start.into(),
            rel_type: rel_type.into(),
            end: end.into(),
        });
        self
    }

    /// Render the schema as prompt text.
    pub fn render(&self) -> String {
        let mut out = String::from("Node labels:\n");
        for label in &self.node_labels {
            out.push_str("  ");
            out.push_str(&label.name);
            if !label.properties.is_empty() {
                out.push_str(" { ");
                out.push_str(&label.properties.join(", "));
                out.push_str(" }");
            }
            out.push('\n');
        }
        out.push_str("Relationships:\n");
        for rel in &self.relationships {
            out.push_str(&format!(
                "  (:{})-[:{}]->(:{})\n",
                rel.start, rel.rel_type, rel.end
            ));
        }
        out
    }
}

/// Abstract interface for a read-only graph store.
///
/// The store is opened once at process scope and shared; implementations
/// must be safe to call from concurrent requests.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Execute a query with named parameters, returning rows in store order.
    async fn run(&self, query: &str, params: &Params) -> GraphResult<Vec<Row>>;

    /// Fetch a snapshot of the current graph schema.
    async fn schema(&self) -> GraphResult<GraphSchema>;
}

// Re-export commonly used types
pub use mock::MockGraph;

#[cfg(feature = "neo4j")]
pub use neo4j::Neo4jStore;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_builder() {
        let row = Row::new()
            .with_field("name", "INSAT-3D")
            .with_field("launch_year", 2013);

        assert_eq!(row.len(), 2);
        assert_eq!(row.get("name"), Some(&serde_json::json!("INSAT-3D")));
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn test_row_render_preserves_column_order() {
        let row = Row::new()
            .with_field("b", "second")
            .with_field("a", "first");

        assert_eq!(row.render(), "b: second; a: first");
    }

    #[test]
    fn test_schema_render() {
        let schema = GraphSchema::new()
            .with_label("Satellite", &["name", "status"])
            .with_label("Product", &["name", "display_name", "product_type"])
            .with_relationship("Satellite", "PRODUCES", "Product");

        let rendered = schema.render();
        assert!(rendered.contains("Satellite { name, status }"));
        assert!(rendered.contains("(:Satellite)-[:PRODUCES]->(:Product)"));
    }
}

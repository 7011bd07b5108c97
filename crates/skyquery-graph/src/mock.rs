//! Mock graph store for testing.
//!
//! Matches queries by substring against canned responses and records every
//! executed statement, so pipeline tests can assert what was run without a
//! live database.

use crate::{GraphError, GraphResult, GraphSchema, GraphStore, Params, Row};
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock graph store with canned responses.
pub struct MockGraph {
    schema: GraphSchema,
    responses: Vec<(String, Vec<Row>)>,
    fail_with: Option<GraphError>,
    executed: Mutex<Vec<String>>,
}

impl MockGraph {
    /// Create a new mock with an empty schema.
    pub fn new() -> Self {
        Self {
            schema: GraphSchema::new(),
            responses: Vec::new(),
            fail_with: None,
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Set the schema returned by `schema()`.
    pub fn with_schema(mut self, schema: GraphSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Add canned rows for queries containing `pattern`.
    ///
    /// Patterns are checked in insertion order; the first match wins.
    /// Unmatched queries return zero rows.
    pub fn with_response(mut self, pattern: &str, rows: Vec<Row>) -> Self {
        self.responses.push((pattern.to_string(), rows));
        self
    }

    /// Make every `run` call fail with the given error.
    pub fn with_error(mut self, error: GraphError) -> Self {
        self.fail_with = Some(error);
        self
    }

    /// All statements executed so far, in call order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().expect("query log poisoned").clone()
    }
}

impl Default for MockGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GraphStore for MockGraph {
    fn name(&self) -> &str {
        "mock"
    }

    async fn run(&self, query: &str, _params: &Params) -> GraphResult<Vec<Row>> {
        self.executed
            .lock()
            .expect("query log poisoned")
            .push(query.to_string());

        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }

        for (pattern, rows) in &self.responses {
            if query.contains(pattern) {
                return Ok(rows.clone());
            }
        }
        Ok(Vec::new())
    }

    async fn schema(&self) -> GraphResult<GraphSchema> {
        Ok(self.schema.clone())
    }
}

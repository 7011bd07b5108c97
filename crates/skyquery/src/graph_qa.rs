//! Knowledge-graph question answering.
//!
//! NL question -> generated Cypher -> rows -> NL answer. The two failure
//! kinds callers care about stay distinct: a generation that produced no
//! usable statement, and a statement the store rejected (which carries the
//! offending query so it can be logged separately).

use crate::error::GraphQaError;
use skyquery_graph::{GraphError, GraphStore, Params, Row};
use skyquery_llm::{CypherPrompt, GraphAnswerPrompt, LlmBackend, PromptTemplate};
use std::sync::Arc;
use tracing::debug;

/// Output of the knowledge-graph path.
#[derive(Debug, Clone)]
pub struct GraphAnswer {
    /// The synthesized natural-language answer.
    pub answer: String,
    /// The generated Cypher statement, kept for provenance.
    pub query: String,
    /// The raw result rows, in store order.
    pub rows: Vec<Row>,
}

/// The knowledge-graph QA pipeline.
pub struct GraphQa {
    llm: Arc<dyn LlmBackend>,
    store: Arc<dyn GraphStore>,
}

impl GraphQa {
    /// Create a new pipeline over the given services.
    pub fn new(llm: Arc<dyn LlmBackend>, store: Arc<dyn GraphStore>) -> Self {
        Self { llm, store }
    }

    /// Answer a question via the knowledge graph.
    pub async fn answer(&self, question: &str) -> Result<GraphAnswer, GraphQaError> {
        let schema = self.store.schema().await.map_err(GraphQaError::Store)?;

        let prompt = CypherPrompt::new(schema.render(), question);
        let raw = self.llm.complete(&prompt.generate()).await?;
        let query = strip_fences(&raw).trim().to_string();
        if query.is_empty() {
            return Err(GraphQaError::Generation(
                "model returned an empty statement".to_string(),
            ));
        }
        debug!(query = %query, "generated cypher");

        // Generated statements are self-contained; the parameter slot is for
        // other callers of the store.
        let rows = match self.store.run(&query, &Params::new()).await {
            Ok(rows) => rows,
            Err(e @ (GraphError::QueryRejected(_) | GraphError::Transaction(_))) => {
                return Err(GraphQaError::Execution { query, source: e });
            }
            Err(e) => return Err(GraphQaError::Store(e)),
        };
        debug!(rows = rows.len(), "graph query executed");

        let prompt = GraphAnswerPrompt::new(question, render_rows(&rows));
        let answer = self.llm.complete(&prompt.generate()).await?;

        Ok(GraphAnswer {
            answer: answer.trim().to_string(),
            query,
            rows,
        })
    }
}

/// Render rows as field/value records, preserving store order.
fn render_rows(rows: &[Row]) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    rows.iter()
        .map(|row| format!("- {}", row.render()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Strip markdown code fences from a generated statement.
fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix("```cypher").unwrap_or(text);
    let text = text.strip_prefix("```").unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use skyquery_graph::{GraphSchema, MockGraph};
    use skyquery_llm::MockBackend;

    fn schema() -> GraphSchema {
        GraphSchema::new()
            .with_label("Satellite", &["name"])
            .with_label("Product", &["name", "display_name", "product_type"])
            .with_relationship("Satellite", "PRODUCES", "Product")
    }

    #[tokio::test]
    async fn answers_from_generated_query_and_rows() {
        let llm = Arc::new(
            MockBackend::new()
                .with_response(
                    "Generate a Cypher statement",
                    "MATCH (s:Satellite)-[:PRODUCES]->(p:Product) RETURN p.display_name",
                )
                .with_response("Query results", "INSAT-3D produces the Imager L1B product."),
        );
        let store = Arc::new(MockGraph::new().with_schema(schema()).with_response(
            "PRODUCES",
            vec![Row::new().with_field("p.display_name", "Imager L1B")],
        ));

        let qa = GraphQa::new(llm, store.clone());
        let result = qa.answer("Which products does INSAT-3D produce?").await.unwrap();

        assert_eq!(result.answer, "INSAT-3D produces the Imager L1B product.");
        assert!(result.query.contains("PRODUCES"));
        assert_eq!(result.rows.len(), 1);
        assert_eq!(store.executed().len(), 1);
    }

    #[tokio::test]
    async fn zero_rows_still_produces_an_answer() {
        let llm = Arc::new(
            MockBackend::new()
                .with_response("Generate a Cypher statement", "MATCH (s:Satellite) RETURN s.name")
                .with_response("(no rows)", "No matching entries were found in the knowledge graph."),
        );
        let store = Arc::new(MockGraph::new().with_schema(schema()));

        let qa = GraphQa::new(llm.clone(), store);
        let result = qa.answer("List satellites named Foo").await.unwrap();

        assert!(result.rows.is_empty());
        assert!(result.answer.contains("No matching entries"));
        // Second prompt carried the empty-row marker.
        assert!(llm.prompts()[1].contains("(no rows)"));
    }

    #[tokio::test]
    async fn empty_generation_is_a_distinct_failure() {
        let llm = Arc::new(MockBackend::new().with_response("Generate a Cypher statement", "   "));
        let store = Arc::new(MockGraph::new().with_schema(schema()));

        let qa = GraphQa::new(llm, store.clone());
        let err = qa.answer("List satellites").await.unwrap_err();

        assert!(matches!(err, GraphQaError::Generation(_)));
        // Nothing reached the store.
        assert!(store.executed().is_empty());
    }

    #[tokio::test]
    async fn rejected_query_surfaces_with_the_offending_statement() {
        let llm = Arc::new(
            MockBackend::new().with_response("Generate a Cypher statement", "MATCH oops RETURN"),
        );
        let store = Arc::new(
            MockGraph::new()
                .with_schema(schema())
                .with_error(GraphError::QueryRejected("Invalid input 'oops'".to_string())),
        );

        let qa = GraphQa::new(llm, store);
        let err = qa.answer("List satellites").await.unwrap_err();

        match err {
            GraphQaError::Execution { query, source } => {
                assert_eq!(query, "MATCH oops RETURN");
                assert!(matches!(source, GraphError::QueryRejected(_)));
            }
            other => panic!("expected Execution error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn markdown_fences_are_stripped() {
        let llm = Arc::new(
            MockBackend::new().with_response(
                "Generate a Cypher statement",
                "```cypher\nMATCH (s:Satellite) RETURN s.name\n```",
            ),
        );
        let store = Arc::new(MockGraph::new().with_schema(schema()));

        let qa = GraphQa::new(llm, store.clone());
        let result = qa.answer("List satellites").await.unwrap();

        assert_eq!(result.query, "MATCH (s:Satellite) RETURN s.name");
        assert_eq!(store.executed()[0], "MATCH (s:Satellite) RETURN s.name");
    }

    #[test]
    fn rows_render_in_store_order() {
        let rows = vec![
            Row::new().with_field("name", "B-sat"),
            Row::new().with_field("name", "A-sat"),
        ];
        let rendered = render_rows(&rows);
        let b_pos = rendered.find("B-sat").unwrap();
        let a_pos = rendered.find("A-sat").unwrap();
        assert!(b_pos < a_pos, "row order must be preserved verbatim");
    }
}

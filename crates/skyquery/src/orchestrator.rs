//! The hybrid retrieval orchestrator.
//!
//! Routes a question, runs the selected pipeline(s), and fuses their
//! outputs. Service handles are injected at construction; the orchestrator
//! owns no durable state and is safe to share across requests.

use crate::doc_qa::DocQa;
use crate::error::AskError;
use crate::extract::EntityExtractor;
use crate::fusion::{fuse, AnswerBundle};
use crate::graph_qa::GraphQa;
use crate::router::{decide_mode, Mode};
use skyquery_graph::GraphStore;
use skyquery_index::ChunkIndex;
use skyquery_llm::LlmBackend;
use std::sync::Arc;
use tracing::{info, warn};

/// Hybrid retrieval orchestrator.
pub struct Orchestrator {
    graph_qa: GraphQa,
    doc_qa: DocQa,
}

impl Orchestrator {
    /// Create an orchestrator over the given services.
    pub fn new(
        llm: Arc<dyn LlmBackend>,
        store: Arc<dyn GraphStore>,
        index: Arc<dyn ChunkIndex>,
        extractor: Arc<dyn EntityExtractor>,
    ) -> Self {
        Self {
            graph_qa: GraphQa::new(llm.clone(), store),
            doc_qa: DocQa::new(llm, index, extractor),
        }
    }

    /// Answer a question.
    ///
    /// Single-path modes propagate their pipeline's failure. Under BOTH the
    /// paths run concurrently and a failure in one is logged and dropped;
    /// only both failing is an error.
    pub async fn ask(&self, question: &str) -> Result<AnswerBundle, AskError> {
        let mode = decide_mode(question);
        info!(?mode, "routing question");

        match mode {
            Mode::Kg => {
                let kg = self.graph_qa.answer(question).await?;
                Ok(fuse(mode, Some(kg), None))
            }
            Mode::Rag => {
                let rag = self.doc_qa.answer(question, true, None).await?;
                Ok(fuse(mode, None, Some(rag)))
            }
            Mode::Both => {
                let (kg, rag) = tokio::join!(
                    self.graph_qa.answer(question),
                    self.doc_qa.answer(question, true, None),
                );

                match (kg, rag) {
                    (Err(kg), Err(rag)) => Err(AskError::BothFailed { kg, rag }),
                    (kg, rag) => {
                        if let Err(e) = &kg {
                            warn!(error = %e, "knowledge-graph path failed, fusing documents only");
                        }
                        if let Err(e) = &rag {
                            warn!(error = %e, "document path failed, fusing knowledge graph only");
                        }
                        Ok(fuse(mode, kg.ok(), rag.ok()))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphQaError;
    use crate::extract::StaticExtractor;
    use crate::fusion::SourceRecord;
    use skyquery_graph::{GraphError, GraphSchema, MockGraph, Row};
    use skyquery_index::{Chunk, IndexError, MockIndex};
    use skyquery_llm::MockBackend;

    fn working_llm() -> Arc<MockBackend> {
        Arc::new(
            MockBackend::new()
                .with_response(
                    "Generate a Cypher statement",
                    "MATCH (s:Satellite)-[:PRODUCES]->(p:Product) RETURN p.display_name",
                )
                .with_response("Query results", "The graph lists the Imager L1B product.")
                .with_response("Context:", "The documents describe rainfall estimation."),
        )
    }

    fn working_graph() -> MockGraph {
        MockGraph::new()
            .with_schema(GraphSchema::new().with_label("Satellite", &["name"]))
            .with_response(
                "PRODUCES",
                vec![Row::new().with_field("p.display_name", "Imager L1B")],
            )
    }

    fn working_index() -> MockIndex {
        MockIndex::new().with_hits(vec![Chunk::new(
            "c1",
            "INSAT-3D rainfall estimation overview",
        )
        .with_metadata("source", "rain.html")])
    }

    fn orchestrator(
        llm: Arc<MockBackend>,
        graph: MockGraph,
        index: MockIndex,
    ) -> Orchestrator {
        Orchestrator::new(
            llm,
            Arc::new(graph),
            Arc::new(index),
            Arc::new(StaticExtractor::new("INSAT-3D")),
        )
    }

    #[tokio::test]
    async fn kg_question_takes_the_graph_path_only() {
        let orch = orchestrator(working_llm(), working_graph(), working_index());

        let bundle = orch.ask("Where is INSAT-3D rainfall data?").await.unwrap();

        assert_eq!(bundle.mode, Mode::Kg);
        assert!(bundle.answer.contains("Imager L1B"));
        assert!(matches!(bundle.sources[0], SourceRecord::Graph { .. }));
    }

    #[tokio::test]
    async fn rag_question_takes_the_document_path_only() {
        let orch = orchestrator(working_llm(), working_graph(), working_index());

        let bundle = orch
            .ask("Explain how INSAT-3D observes rainfall.")
            .await
            .unwrap();

        assert_eq!(bundle.mode, Mode::Rag);
        assert!(bundle.answer.contains("rainfall estimation"));
        assert!(bundle
            .sources
            .iter()
            .all(|s| matches!(s, SourceRecord::Document { .. })));
    }

    #[tokio::test]
    async fn unmatched_question_fuses_both_paths() {
        let orch = orchestrator(working_llm(), working_graph(), working_index());

        let bundle = orch.ask("Tell me about INSAT-3D.").await.unwrap();

        assert_eq!(bundle.mode, Mode::Both);
        assert!(bundle.answer.contains("Imager L1B"));
        assert!(bundle.answer.contains("rainfall estimation"));
        assert!(bundle.answer.contains("\n\n"));
    }

    #[tokio::test]
    async fn both_mode_survives_a_graph_failure() {
        let graph = MockGraph::new()
            .with_schema(GraphSchema::new())
            .with_error(GraphError::Connection("store is down".to_string()));
        let orch = orchestrator(working_llm(), graph, working_index());

        let bundle = orch.ask("Tell me about INSAT-3D.").await.unwrap();

        assert_eq!(bundle.mode, Mode::Both);
        assert!(bundle.answer.contains("rainfall estimation"));
        assert!(bundle
            .sources
            .iter()
            .all(|s| matches!(s, SourceRecord::Document { .. })));
    }

    #[tokio::test]
    async fn both_mode_with_both_paths_down_is_an_error() {
        let graph = MockGraph::new()
            .with_error(GraphError::Connection("store is down".to_string()));
        let index = MockIndex::new().with_error(IndexError::Internal("index is down".to_string()));
        let orch = orchestrator(working_llm(), graph, index);

        let err = orch.ask("Tell me about INSAT-3D.").await.unwrap_err();
        assert!(matches!(err, AskError::BothFailed { .. }));
    }

    #[tokio::test]
    async fn kg_mode_propagates_the_path_failure() {
        let graph = MockGraph::new()
            .with_schema(GraphSchema::new())
            .with_error(GraphError::QueryRejected("bad cypher".to_string()));
        let orch = orchestrator(working_llm(), graph, working_index());

        let err = orch.ask("List all satellites").await.unwrap_err();
        assert!(matches!(
            err,
            AskError::Graph(GraphQaError::Execution { .. })
        ));
    }
}

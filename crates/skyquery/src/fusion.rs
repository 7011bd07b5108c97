//! Answer fusion: merges path outputs into the response contract.
//!
//! Fusion only formats what it is given. Recovery from path failures
//! happens upstream in the orchestrator; a missing result here simply
//! contributes nothing to the bundle.

use crate::doc_qa::DocAnswer;
use crate::graph_qa::GraphAnswer;
use crate::router::Mode;
use serde::{Deserialize, Serialize};
use skyquery_graph::Row;

/// One provenance record. The tag names the path that produced it, so
/// every source stays traceable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "path")]
pub enum SourceRecord {
    /// Produced by the knowledge-graph path.
    #[serde(rename = "kg")]
    Graph {
        /// The generated Cypher statement.
        query: String,
        /// Result rows; included in single-path responses, omitted when
        /// fused alongside document sources.
        #[serde(skip_serializing_if = "Option::is_none")]
        rows: Option<Vec<Row>>,
    },
    /// Produced by the document-retrieval path.
    #[serde(rename = "rag")]
    Document {
        /// Source identifier of the chunk.
        source: String,
        /// Short text preview.
        preview: String,
    },
}

/// The unit returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerBundle {
    /// The fused answer text.
    pub answer: String,
    /// Provenance records, knowledge-graph first.
    pub sources: Vec<SourceRecord>,
    /// The mode the question was routed to.
    pub mode: Mode,
}

/// Merge path outputs per the active mode.
pub fn fuse(mode: Mode, kg: Option<GraphAnswer>, rag: Option<DocAnswer>) -> AnswerBundle {
    if mode == Mode::Kg {
        if let Some(kg) = &kg {
            return AnswerBundle {
                answer: kg.answer.clone(),
                sources: vec![SourceRecord::Graph {
                    query: kg.query.clone(),
                    rows: Some(kg.rows.clone()),
                }],
                mode,
            };
        }
    }

    if mode == Mode::Rag {
        if let Some(rag) = rag {
            return AnswerBundle {
                answer: rag.answer,
                sources: rag.sources,
                mode,
            };
        }
    }

    // BOTH, or a selected path that produced nothing: combine whatever
    // exists. Empty answers are dropped before joining so the separator
    // never leads or trails.
    let mut parts: Vec<String> = Vec::new();
    let mut sources: Vec<SourceRecord> = Vec::new();

    if let Some(kg) = kg {
        parts.push(kg.answer);
        sources.push(SourceRecord::Graph {
            query: kg.query,
            rows: None,
        });
    }

    if let Some(rag) = rag {
        parts.push(rag.answer);
        sources.extend(rag.sources);
    }

    AnswerBundle {
        answer: parts
            .iter()
            .filter(|part| !part.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n\n"),
        sources,
        mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kg_answer(answer: &str) -> GraphAnswer {
        GraphAnswer {
            answer: answer.to_string(),
            query: "MATCH (s:Satellite) RETURN s.name".to_string(),
            rows: vec![Row::new().with_field("s.name", "INSAT-3D")],
        }
    }

    fn rag_answer(answer: &str) -> DocAnswer {
        DocAnswer {
            answer: answer.to_string(),
            sources: vec![
                SourceRecord::Document {
                    source: "insat3d.html".to_string(),
                    preview: "INSAT-3D rainfall...".to_string(),
                },
                SourceRecord::Document {
                    source: "oceansat.html".to_string(),
                    preview: "Oceansat-3 winds...".to_string(),
                },
            ],
        }
    }

    #[test]
    fn kg_mode_carries_query_and_rows() {
        let bundle = fuse(Mode::Kg, Some(kg_answer("From the graph.")), None);

        assert_eq!(bundle.answer, "From the graph.");
        assert_eq!(bundle.mode, Mode::Kg);
        assert_eq!(bundle.sources.len(), 1);
        match &bundle.sources[0] {
            SourceRecord::Graph { query, rows } => {
                assert!(query.contains("MATCH"));
                assert_eq!(rows.as_ref().unwrap().len(), 1);
            }
            other => panic!("expected graph source, got {other:?}"),
        }
    }

    #[test]
    fn rag_mode_passes_sources_verbatim() {
        let rag = rag_answer("From the documents.");
        let expected = rag.sources.clone();
        let bundle = fuse(Mode::Rag, None, Some(rag));

        assert_eq!(bundle.answer, "From the documents.");
        assert_eq!(bundle.sources, expected);
    }

    #[test]
    fn both_mode_joins_with_one_blank_line() {
        let bundle = fuse(
            Mode::Both,
            Some(kg_answer("Graph part.")),
            Some(rag_answer("Document part.")),
        );

        assert_eq!(bundle.answer, "Graph part.\n\nDocument part.");
    }

    #[test]
    fn both_mode_with_empty_kg_answer_has_no_leading_separator() {
        let bundle = fuse(
            Mode::Both,
            Some(kg_answer("")),
            Some(rag_answer("Document part.")),
        );

        assert_eq!(bundle.answer, "Document part.");
        // The KG source record is still listed even though its answer was empty.
        assert_eq!(bundle.sources.len(), 3);
    }

    #[test]
    fn both_mode_orders_graph_sources_before_document_sources() {
        let bundle = fuse(
            Mode::Both,
            Some(kg_answer("Graph part.")),
            Some(rag_answer("Document part.")),
        );

        assert!(matches!(bundle.sources[0], SourceRecord::Graph { .. }));
        assert!(matches!(bundle.sources[1], SourceRecord::Document { .. }));
        assert!(matches!(bundle.sources[2], SourceRecord::Document { .. }));
        // Fused graph records omit the row payload.
        match &bundle.sources[0] {
            SourceRecord::Graph { rows, .. } => assert!(rows.is_none()),
            _ => unreachable!(),
        }
    }

    #[test]
    fn selected_path_missing_formats_what_exists() {
        // KG was selected but produced nothing; the caller supplied only the
        // document result. Fusion does not recover, just formats.
        let bundle = fuse(Mode::Kg, None, Some(rag_answer("Best effort.")));

        assert_eq!(bundle.answer, "Best effort.");
        assert_eq!(bundle.mode, Mode::Kg);
        assert_eq!(bundle.sources.len(), 2);
    }

    #[test]
    fn nothing_in_nothing_out() {
        let bundle = fuse(Mode::Both, None, None);
        assert!(bundle.answer.is_empty());
        assert!(bundle.sources.is_empty());
    }

    #[test]
    fn every_source_is_traceable_to_a_path() {
        let bundle = fuse(
            Mode::Both,
            Some(kg_answer("Graph part.")),
            Some(rag_answer("Document part.")),
        );

        let json = serde_json::to_value(&bundle.sources).unwrap();
        for source in json.as_array().unwrap() {
            let path = source.get("path").and_then(|p| p.as_str()).unwrap();
            assert!(path == "kg" || path == "rag");
        }
    }
}

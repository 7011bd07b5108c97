//! Prompt templates for query generation and grounded answer synthesis.

/// Fixed sentinel the context-grounded prompt instructs the model to emit
/// when the supplied context is genuinely unrelated to the question.
/// Downstream fusion code can match on this exact string.
pub const NO_ANSWER_SENTINEL: &str = "I don't know the answer.";

/// A prompt template for LLM requests.
pub trait PromptTemplate {
    /// Generate the prompt text.
    fn generate(&self) -> String;

    /// Get the system prompt (if any).
    fn system_prompt(&self) -> Option<String> {
        None
    }
}

/// Prompt for translating a natural-language question into Cypher.
///
/// Carries the fixed domain translation rules (entity and relationship
/// vocabulary, category filters, disambiguation guidance) plus the live
/// schema snapshot and few-shot examples.
#[derive(Debug, Clone)]
pub struct CypherPrompt {
    /// Rendered schema of the graph being queried.
    pub schema: String,
    /// The user's question.
    pub question: String,
}

impl CypherPrompt {
    /// Create a new Cypher generation prompt.
    pub fn new(schema: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            question: question.into(),
        }
    }
}

impl PromptTemplate for CypherPrompt {
    fn system_prompt(&self) -> Option<String> {
        Some(
            "You are an expert at translating questions about satellite data \
             products into Cypher. Respond ONLY with a single Cypher statement, \
             no explanation."
                .to_string(),
        )
    }

    fn generate(&self) -> String {
        format!(
            r#"Task: Generate a Cypher statement to query a Neo4j database.

Use ONLY the provided schema and follow these rules:

- Satellites are connected to products via :PRODUCES.
- Products are connected to parameters via :OBSERVES.
- Products are connected to regions via :COVERS.
- Ocean-related products are identified by parameters where par.category = "ocean".
- Each Product has:
  - p.product_type: "doc" or "site_doc" (documentation pages and generic site pages; no real data products yet).
  - p.display_name: a cleaner, human-readable name.
  - p.doc_section: section of the documentation (e.g., "Introduction", "Payloads", "References").
  - p.keywords: list of tokens summarizing the page.

Generation rules:

- If the question is about:
  - Datasets or data products (e.g., "download", "data", "grid", "time series"):
    - At present there are NO true data products tagged in the graph, so return a helpful message explaining that only documentation nodes (product_type="doc"/"site_doc") exist.
  - Satellite descriptions, introductions, payloads, objectives, references:
    - Use Product nodes with p.product_type = "doc".
    - Filter by p.doc_section where relevant (e.g., doc_section = "Payloads" for payload questions).
  - Site policies, access, or general site info:
    - Use Product nodes with p.product_type = "site_doc".

- Prefer returning p.display_name instead of the raw p.name when listing products.
- When filtering by satellite, match on s:Satellite with s.name (e.g., "Oceansat-3", "INSAT-3D").
- When filtering by parameters (rainfall, ocean, etc.), join via :OBSERVES and use par.category or par.display_name.

Schema:
{schema}

Examples:

# Which products are ocean-related from Oceansat-3?
MATCH (s:Satellite {{name: "Oceansat-3"}})-[:PRODUCES]->(p:Product)-[:OBSERVES]->(par:Parameter)
WHERE par.category = "ocean"
RETURN DISTINCT p.display_name, p.product_type, par.display_name

# What are the payload pages for INSAT-3D?
MATCH (s:Satellite {{name: "INSAT-3D"}})-[:PRODUCES]->(p:Product)
WHERE p.product_type = "doc" AND p.doc_section = "Payloads"
RETURN p.display_name, p.doc_section

# Show documentation pages for Oceansat-3
MATCH (s:Satellite {{name: "Oceansat-3"}})-[:PRODUCES]->(p:Product)
WHERE p.product_type = "doc"
RETURN p.display_name, p.doc_section

The question is:
{question}"#,
            schema = self.schema,
            question = self.question,
        )
    }
}

/// Prompt for answering a question from knowledge-graph result rows.
#[derive(Debug, Clone)]
pub struct GraphAnswerPrompt {
    /// The user's question.
    pub question: String,
    /// Result rows rendered as field/value records, in store order.
    pub rows: String,
}

impl GraphAnswerPrompt {
    /// Create a new graph answer prompt.
    pub fn new(question: impl Into<String>, rows: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            rows: rows.into(),
        }
    }
}

impl PromptTemplate for GraphAnswerPrompt {
    fn generate(&self) -> String {
        format!(
            r#"You are helping users understand satellite data products using
results retrieved from a knowledge graph.

Question:
{question}

Query results:
{rows}

Instructions:
- Base your answer ONLY on the query results above, in the order given.
- Do not invent entities, products, or properties that are not in the results.
- If the result list is empty, say that no matching entries were found in the
  knowledge graph.

Answer in one or two concise sentences:"#,
            question = self.question,
            rows = self.rows,
        )
    }
}

/// Prompt for answering a question strictly from retrieved document context.
#[derive(Debug, Clone)]
pub struct ContextAnswerPrompt {
    /// Concatenated chunk texts, blank-line separated.
    pub context: String,
    /// The user's question.
    pub question: String,
}

impl ContextAnswerPrompt {
    /// Create a new context answer prompt.
    pub fn new(context: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            question: question.into(),
        }
    }
}

impl PromptTemplate for ContextAnswerPrompt {
    fn generate(&self) -> String {
        format!(
            r#"You are helping users understand MOSDAC satellite data products.

Context:
{context}

Question:
{question}

Instructions:
- Base your answer ONLY on the context above.
- If the question asks for spatial resolution or temporal frequency, look for:
  - grid size (e.g., 0.25 degree, 0.5 degree, km, etc.)
  - time step (e.g., 30 minutes, hourly, daily).
- If the context contains any approximate information related to the question, use it and answer in one strong, factual sentence.
- Only if the context truly has no relevant information to answer the question, respond with exactly: {sentinel}
- Do NOT say you don't know just because access details (download URL, portal path) are missing.

Answer in one concise sentence:"#,
            context = self.context,
            question = self.question,
            sentinel = NO_ANSWER_SENTINEL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cypher_prompt() {
        let prompt = CypherPrompt::new(
            "Satellite { name }",
            "What are the payload pages for INSAT-3D?",
        );

        let generated = prompt.generate();
        assert!(generated.contains("Satellite { name }"));
        assert!(generated.contains("payload pages for INSAT-3D"));
        assert!(generated.contains(":PRODUCES"));
        assert!(prompt.system_prompt().unwrap().contains("Cypher"));
    }

    #[test]
    fn test_graph_answer_prompt() {
        let prompt = GraphAnswerPrompt::new(
            "Which products does INSAT-3D produce?",
            "- display_name: Imager L1B",
        );

        let generated = prompt.generate();
        assert!(generated.contains("Imager L1B"));
        assert!(generated.contains("ONLY on the query results"));
    }

    #[test]
    fn test_context_answer_prompt_carries_sentinel() {
        let prompt = ContextAnswerPrompt::new("Some context.", "Some question?");

        let generated = prompt.generate();
        assert!(generated.contains("Some context."));
        assert!(generated.contains(NO_ANSWER_SENTINEL));
        assert!(generated.contains("grid size"));
        assert!(generated.contains("download URL"));
    }
}

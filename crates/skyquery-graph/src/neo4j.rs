//! Neo4j backend over the HTTP transaction API.
//!
//! Requires the `neo4j` feature. Talks to `/db/{database}/tx/commit` with
//! basic auth; no driver dependency, no bolt protocol.

use crate::{GraphError, GraphResult, GraphSchema, GraphStore, NodeLabel, Params, RelPattern, Row};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const SCHEMA_NODE_PROPERTIES: &str =
    "CALL db.schema.nodeTypeProperties() YIELD nodeLabels, propertyName \
     RETURN nodeLabels, propertyName";

const SCHEMA_RELATIONSHIPS: &str =
    "MATCH (a)-[r]->(b) \
     RETURN DISTINCT labels(a)[0] AS start, type(r) AS rel_type, labels(b)[0] AS end \
     LIMIT 200";

/// Transaction API request.
#[derive(Debug, Serialize)]
struct TxRequest {
    statements: Vec<TxStatement>,
}

#[derive(Debug, Serialize)]
struct TxStatement {
    statement: String,
    parameters: Params,
}

/// Transaction API response.
#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxResult {
    columns: Vec<String>,
    data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
struct TxRow {
    row: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    code: String,
    message: String,
}

/// Neo4j graph store over the HTTP transaction API.
///
/// # Example
///
/// ```rust,ignore
/// use skyquery_graph::{GraphStore, Neo4jStore};
///
/// let store = Neo4jStore::new("http://localhost:7474", "neo4j", "password");
/// let schema = store.schema().await?;
/// ```
pub struct Neo4jStore {
    base_url: String,
    database: String,
    user: String,
    password: String,
    timeout_secs: u32,
    client: reqwest::Client,
}

impl Neo4jStore {
    /// Create a new store against the given HTTP endpoint.
    pub fn new(url: &str, user: &str, password: &str) -> Self {
        let timeout_secs = 30;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs as u64))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: url.trim_end_matches('/').to_string(),
            database: "neo4j".to_string(),
            user: user.to_string(),
            password: password.to_string(),
            timeout_secs,
            client,
        }
    }

    /// Create from `NEO4J_URI`, `NEO4J_USER` and `NEO4J_PASSWORD`.
    pub fn from_env() -> GraphResult<Self> {
        let uri = std::env::var("NEO4J_URI")
            .map_err(|_| GraphError::Connection("NEO4J_URI is not set".to_string()))?;
        let user = std::env::var("NEO4J_USER").unwrap_or_else(|_| "neo4j".to_string());
        let password = std::env::var("NEO4J_PASSWORD").map_err(|_| GraphError::AuthenticationFailed)?;
        Ok(Self::new(&uri, &user, &password))
    }

    /// Select a database other than the default `neo4j`.
    pub fn with_database(mut self, database: &str) -> Self {
        self.database = database.to_string();
        self
    }

    /// Submit one statement through the transaction endpoint.
    async fn commit(&self, statement: &str, parameters: &Params) -> GraphResult<TxResult> {
        let request = TxRequest {
            statements: vec![TxStatement {
                statement: statement.to_string(),
                parameters: parameters.clone(),
            }],
        };

        let url = format!("{}/db/{}/tx/commit", self.base_url, self.database);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.user, Some(&self.password))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    GraphError::Connection(format!(
                        "Cannot connect to Neo4j at {}",
                        self.base_url
                    ))
                } else if e.is_timeout() {
                    GraphError::Timeout(self.timeout_secs)
                } else {
                    GraphError::Connection(e.to_string())
                }
            })?;

        let status = response.status();

        if status.as_u16() == 401 {
            return Err(GraphError::AuthenticationFailed);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Transaction(format!(
                "Neo4j error {}: {}",
                status, body
            )));
        }

        let mut resp: TxResponse = response
            .json()
            .await
            .map_err(|e| GraphError::InvalidResponse(e.to_string()))?;

        if let Some(error) = resp.errors.first() {
            // Syntax-class errors are what the statement generator needs to
            // see distinctly from transport failures.
            if error.code.contains("SyntaxError") || error.code.contains("Statement") {
                return Err(GraphError::QueryRejected(format!(
                    "{}: {}",
                    error.code, error.message
                )));
            }
            return Err(GraphError::Transaction(format!(
                "{}: {}",
                error.code, error.message
            )));
        }

        if resp.results.is_empty() {
            return Err(GraphError::InvalidResponse(
                "No result set in response".to_string(),
            ));
        }
        Ok(resp.results.remove(0))
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    fn name(&self) -> &str {
        "neo4j"
    }

    async fn run(&self, query: &str, params: &Params) -> GraphResult<Vec<Row>> {
        let result = self.commit(query, params).await?;

        let rows = result
            .data
            .into_iter()
            .map(|data| {
                let mut row = Row::new();
                for (column, value) in result.columns.iter().zip(data.row.into_iter()) {
                    row = row.with_field(column.clone(), value);
                }
                row
            })
            .collect();

        Ok(rows)
    }

    async fn schema(&self) -> GraphResult<GraphSchema> {
        // Labels and their properties.
        let props = self
            .commit(SCHEMA_NODE_PROPERTIES, &Params::new())
            .await
            .map_err(|e| GraphError::Schema(e.to_string()))?;

        let mut by_label: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for data in props.data {
            let labels = data.row.first().and_then(|v| v.as_array()).cloned();
            let property = data
                .row
                .get(1)
                .and_then(|v| v.as_str())
                .map(|s| s.to_string());
            if let (Some(labels), Some(property)) = (labels, property) {
                for label in labels.iter().filter_map(|l| l.as_str()) {
                    let entry = by_label.entry(label.to_string()).or_default();
                    if !entry.contains(&property) {
                        entry.push(property.clone());
                    }
                }
            }
        }

        // Relationship patterns actually present in the data.
        let rels = self
            .commit(SCHEMA_RELATIONSHIPS, &Params::new())
            .await
            .map_err(|e| GraphError::Schema(e.to_string()))?;

        let relationships = rels
            .data
            .into_iter()
            .filter_map(|data| {
                let start = data.row.first()?.as_str()?.to_string();
                let rel_type = data.row.get(1)?.as_str()?.to_string();
                let end = data.row.get(2)?.as_str()?.to_string();
                Some(RelPattern {
                    start,
                    rel_type,
                    end,
                })
            })
            .collect();

        Ok(GraphSchema {
            node_labels: by_label
                .into_iter()
                .map(|(name, properties)| NodeLabel { name, properties })
                .collect(),
            relationships,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_config() {
        let store = Neo4jStore::new("http://localhost:7474/", "neo4j", "secret")
            .with_database("satellites");
        assert_eq!(store.base_url, "http://localhost:7474");
        assert_eq!(store.database, "satellites");
    }

    #[test]
    fn test_tx_response_parsing() {
        let json = r#"{
            "results": [{
                "columns": ["name", "status"],
                "data": [{"row": ["INSAT-3D", "active"]}]
            }],
            "errors": []
        }"#;

        let resp: TxResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.results[0].columns, vec!["name", "status"]);
        assert_eq!(resp.results[0].data[0].row[0], "INSAT-3D");
    }

    #[test]
    fn test_tx_error_parsing() {
        let json = r#"{
            "results": [],
            "errors": [{"code": "Neo.ClientError.Statement.SyntaxError", "message": "Invalid input"}]
        }"#;

        let resp: TxResponse = serde_json::from_str(json).unwrap();
        assert!(resp.errors[0].code.contains("SyntaxError"));
    }
}

//! Mode routing: decides which retrieval path(s) a question takes.
//!
//! Pure phrase matching over the lower-cased question, evaluated as an
//! explicit rule table in fixed priority order so the precedence law
//! (knowledge-graph phrases beat explanatory phrases) stays auditable.

use serde::{Deserialize, Serialize};

/// Which retrieval path(s) to run for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Knowledge-graph lookup only.
    Kg,
    /// Semantic document retrieval only.
    Rag,
    /// Both paths, fused.
    Both,
}

/// Routing rules, evaluated top to bottom; the first phrase hit wins.
const ROUTING_RULES: &[(Mode, &[&str])] = &[
    (
        // Enumeration/location intent
        Mode::Kg,
        &["where is", "where are", "list", "which products", "which data"],
    ),
    (
        // Explanatory intent
        Mode::Rag,
        &["explain", "what is", "how does", "describe", "why"],
    ),
];

/// Classify a question into a retrieval mode.
///
/// Total over all string inputs; questions matching neither phrase set
/// (including empty input) route to [`Mode::Both`]. Input validation is the
/// caller's job, not the router's.
pub fn decide_mode(question: &str) -> Mode {
    let q = question.to_lowercase();

    for (mode, phrases) in ROUTING_RULES {
        if phrases.iter().any(|phrase| q.contains(phrase)) {
            return *mode;
        }
    }

    Mode::Both
}

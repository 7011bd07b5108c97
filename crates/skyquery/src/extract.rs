//! Fallback keyword extraction.
//!
//! The document pipeline needs one salient entity from the question to
//! validate (and, when needed, rescue) semantic retrieval. This is the
//! named-entity seam: production can plug a real NER service in behind
//! [`EntityExtractor`]; the default is a rule-based recognizer tuned for
//! mission designators like "INSAT-3D" or "Oceansat-3".

/// A recognized entity span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    /// The entity text, punctuation-trimmed.
    pub text: String,
    /// Byte offset of the span in the input.
    pub start: usize,
}

/// Recognizes entity spans in question text, ordered by position.
pub trait EntityExtractor: Send + Sync {
    /// Extract all entity spans, in order of appearance.
    fn extract(&self, text: &str) -> Vec<EntitySpan>;

    /// The first recognized entity, if any. This is the fallback keyword.
    fn first_entity(&self, text: &str) -> Option<String> {
        self.extract(text).into_iter().next().map(|span| span.text)
    }
}

/// Words that look like entities when capitalized at sentence start but
/// never are.
const NON_ENTITY_WORDS: &[&str] = &[
    "where", "what", "which", "how", "why", "when", "who", "whose", "is", "are", "was", "were",
    "do", "does", "did", "can", "could", "will", "would", "should", "the", "a", "an", "of", "for",
    "from", "in", "on", "at", "to", "and", "or", "list", "show", "tell", "give", "find", "explain",
    "describe", "compare", "me", "about", "data", "products", "please", "i", "you", "it",
];

/// Rule-based entity recognizer.
///
/// A token qualifies when it is a mission-style designator (contains an
/// uppercase letter plus a digit or an internal hyphen, e.g. "INSAT-3D",
/// "SCATSAT-1") or a capitalized word outside the question-word list.
/// Consecutive qualifying tokens merge into one span.
pub struct RuleBasedExtractor;

impl RuleBasedExtractor {
    /// Create a new rule-based extractor.
    pub fn new() -> Self {
        Self
    }

    fn qualifies(token: &str) -> bool {
        if token.is_empty() {
            return false;
        }

        let has_upper = token.chars().any(|c| c.is_uppercase());
        let has_digit = token.chars().any(|c| c.is_ascii_digit());
        if has_upper && (has_digit || token.contains('-')) {
            return true;
        }

        let capitalized = token.chars().next().is_some_and(|c| c.is_uppercase());
        capitalized && !NON_ENTITY_WORDS.contains(&token.to_lowercase().as_str())
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor for RuleBasedExtractor {
    fn extract(&self, text: &str) -> Vec<EntitySpan> {
        let mut spans: Vec<EntitySpan> = Vec::new();
        let mut current: Option<EntitySpan> = None;
        let mut cursor = 0;

        for raw in text.split_whitespace() {
            // Track byte offsets so spans stay ordered by position.
            let start = text[cursor..]
                .find(raw)
                .map(|offset| cursor + offset)
                .unwrap_or(cursor);
            cursor = start + raw.len();

            let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
            if Self::qualifies(token) {
                match current.as_mut() {
                    Some(span) => {
                        span.text.push(' ');
                        span.text.push_str(token);
                    }
                    None => {
                        current = Some(EntitySpan {
                            text: token.to_string(),
                            start,
                        });
                    }
                }
            } else if let Some(span) = current.take() {
                spans.push(span);
            }
        }

        if let Some(span) = current {
            spans.push(span);
        }
        spans
    }
}

/// Extractor returning a fixed entity; for tests.
pub struct StaticExtractor {
    entity: Option<String>,
}

impl StaticExtractor {
    /// Always recognize the given entity.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: Some(entity.into()),
        }
    }

    /// Recognize nothing.
    pub fn none() -> Self {
        Self { entity: None }
    }
}

impl EntityExtractor for StaticExtractor {
    fn extract(&self, _text: &str) -> Vec<EntitySpan> {
        self.entity
            .iter()
            .map(|text| EntitySpan {
                text: text.clone(),
                start: 0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_mission_designators() {
        let extractor = RuleBasedExtractor::new();
        assert_eq!(
            extractor.first_entity("Where is INSAT-3D rainfall data?"),
            Some("INSAT-3D".to_string())
        );
        assert_eq!(
            extractor.first_entity("Tell me about Oceansat-3."),
            Some("Oceansat-3".to_string())
        );
    }

    #[test]
    fn trims_trailing_punctuation() {
        let extractor = RuleBasedExtractor::new();
        assert_eq!(
            extractor.first_entity("Is SCATSAT-1 still operational?"),
            Some("SCATSAT-1".to_string())
        );
    }

    #[test]
    fn merges_consecutive_capitalized_tokens() {
        let extractor = RuleBasedExtractor::new();
        let spans = extractor.extract("Which products cover the Indian Ocean region?");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "Indian Ocean");
    }

    #[test]
    fn question_words_are_not_entities() {
        let extractor = RuleBasedExtractor::new();
        assert_eq!(extractor.first_entity("What is sea surface temperature?"), None);
        assert_eq!(extractor.first_entity("WHERE IS the archive?"), None);
    }

    #[test]
    fn spans_are_ordered_by_position() {
        let extractor = RuleBasedExtractor::new();
        let spans = extractor.extract("Does INSAT-3D overlap with Oceansat-3?");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "INSAT-3D");
        assert_eq!(spans[1].text, "Oceansat-3");
        assert!(spans[0].start < spans[1].start);
    }

    #[test]
    fn static_extractor_is_fixed() {
        let extractor = StaticExtractor::new("INSAT-3D");
        assert_eq!(
            extractor.first_entity("anything at all"),
            Some("INSAT-3D".to_string())
        );
        assert_eq!(StaticExtractor::none().first_entity("anything"), None);
    }
}

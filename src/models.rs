//! Core data types that flow between the index gateway, the prompt
//! assembler, and the conversation chain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document destined for the remote vector index.
///
/// Once upserted, the remote index owns the record; no local copy is kept.
/// Re-seeding with the same id overwrites the remote record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: serde_json::Map::new(),
        }
    }
}

/// One ranked hit from a similarity search, highest score first.
#[derive(Debug, Clone)]
pub struct RetrievedMatch {
    pub id: String,
    pub score: f64,
    pub content: String,
}

/// Speaker of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Wire-format role name as the completion API expects it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One entry of a session transcript.
#[derive(Debug, Clone)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

/// Join retrieved match content into the context block for one turn,
/// preserving rank order. An empty match list yields an empty string —
/// the prompt still renders its (empty) context slot.
pub fn context_string(matches: &[RetrievedMatch]) -> String {
    matches
        .iter()
        .map(|m| m.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_match(id: &str, score: f64, content: &str) -> RetrievedMatch {
        RetrievedMatch {
            id: id.to_string(),
            score,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_context_string_empty() {
        assert_eq!(context_string(&[]), "");
    }

    #[test]
    fn test_context_string_single() {
        let matches = vec![make_match("a", 0.9, "alpha")];
        assert_eq!(context_string(&matches), "alpha");
    }

    #[test]
    fn test_context_string_preserves_rank_order() {
        let matches = vec![
            make_match("a", 0.9, "first"),
            make_match("b", 0.5, "second"),
            make_match("c", 0.1, "third"),
        ];
        assert_eq!(context_string(&matches), "first\nsecond\nthird");
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(Role::User.as_str(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn test_document_metadata_defaults_empty() {
        let doc: Document = serde_json::from_str(r#"{"id": "d1", "content": "text"}"#).unwrap();
        assert!(doc.metadata.is_empty());
    }
}

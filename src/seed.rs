//! Index seeding.
//!
//! Upserts documents into the remote vector index, either the built-in
//! sample set or a caller-supplied JSON file. Seeding is idempotent by id:
//! running it twice overwrites the same remote records.

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::config::Config;
use crate::embedding::EmbeddingClient;
use crate::index::VectorIndex;
use crate::models::Document;

/// The built-in sample documents, with fixed ids so re-seeding overwrites
/// rather than duplicates.
pub fn sample_documents() -> Vec<Document> {
    vec![
        Document::new(
            "user-dietary-preferences",
            "The user is vegetarian and loves Mediterranean food: falafel wraps, lentil soup, \
             and grilled halloumi are favorites. They avoid meat and dislike overly spicy dishes.",
        ),
        Document::new(
            "user-hobbies",
            "In their free time the user enjoys bouldering, landscape photography, and \
             restoring old film cameras.",
        ),
        Document::new(
            "user-work",
            "The user works as a backend engineer on a payments platform, mostly writing Rust \
             and operating PostgreSQL.",
        ),
        Document::new(
            "user-home",
            "The user lives in Lisbon and commutes by bicycle along the river most mornings.",
        ),
    ]
}

/// One entry of a seed file. The id is optional — entries without one get
/// a generated UUID (and are therefore NOT idempotent across runs).
#[derive(Debug, Deserialize)]
struct SeedEntry {
    id: Option<String>,
    content: String,
    #[serde(default)]
    metadata: serde_json::Map<String, serde_json::Value>,
}

/// Load documents from a JSON file: an array of
/// `{"id"?, "content", "metadata"?}` objects.
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;

    let entries: Vec<SeedEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse seed file: {}", path.display()))?;

    let documents = entries
        .into_iter()
        .map(|entry| Document {
            id: entry.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            content: entry.content,
            metadata: entry.metadata,
        })
        .collect();

    Ok(documents)
}

/// Run the `seed` command.
///
/// Dry runs resolve and print the documents without constructing any
/// client, so they work with no API keys and no network.
pub async fn run_seed(config: &Config, file: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let mut documents = match file {
        Some(path) => load_documents(&path)?,
        None => sample_documents(),
    };

    if dry_run {
        println!("Would upsert {} documents:", documents.len());
        for doc in &documents {
            println!("  {}  \"{}\"", doc.id, excerpt(&doc.content, 72));
        }
        return Ok(());
    }

    let seeded_at = Utc::now().to_rfc3339();
    for doc in &mut documents {
        doc.metadata.insert(
            "seeded_at".to_string(),
            serde_json::Value::String(seeded_at.clone()),
        );
    }

    let embedder = EmbeddingClient::new(&config.embedding)?;
    let index = VectorIndex::new(&config.index, embedder)?;

    let count = index.seed(&documents).await?;
    println!("Upserted {} documents into the index.", count);

    Ok(())
}

fn excerpt(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let cut: String = flat.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_samples_with_fixed_ids() {
        let docs = sample_documents();
        assert_eq!(docs.len(), 4);

        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert!(ids.contains(&"user-dietary-preferences"));
        // Fixed ids keep re-seeding idempotent.
        assert_eq!(sample_documents()[0].id, docs[0].id);
    }

    #[test]
    fn test_dietary_sample_answers_food_questions() {
        let docs = sample_documents();
        let dietary = docs
            .iter()
            .find(|d| d.id == "user-dietary-preferences")
            .unwrap();
        assert!(dietary.content.contains("vegetarian"));
    }

    #[test]
    fn test_load_documents_assigns_missing_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(
            &path,
            r#"[
                { "id": "fixed", "content": "has an id" },
                { "content": "gets a uuid", "metadata": { "topic": "misc" } }
            ]"#,
        )
        .unwrap();

        let docs = load_documents(&path).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].id, "fixed");
        assert!(!docs[1].id.is_empty());
        assert_ne!(docs[1].id, "fixed");
        assert_eq!(docs[1].metadata["topic"], "misc");
    }

    #[test]
    fn test_load_documents_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        std::fs::write(&path, "{ not an array }").unwrap();
        assert!(load_documents(&path).is_err());
    }

    #[test]
    fn test_excerpt_truncates() {
        assert_eq!(excerpt("short", 72), "short");
        let long = "x".repeat(100);
        let cut = excerpt(&long, 10);
        assert!(cut.starts_with("xxxxxxxxxx"));
        assert!(cut.ends_with("..."));
    }
}

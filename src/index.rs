//! Remote vector index gateway.
//!
//! Wraps a hosted Pinecone-style index behind two operations: upsert-by-id
//! document insertion ([`VectorIndex::seed`]) and similarity search
//! ([`VectorIndex::retrieve`]). Embedding happens here — callers hand over
//! plain text, the gateway calls the embedding client before talking to
//! the index's data plane.
//!
//! Requires `index.host` in the configuration and the `PINECONE_API_KEY`
//! environment variable.
//!
//! Document text is stored under the `"text"` metadata key; any caller
//! metadata is preserved alongside it.

use anyhow::{bail, Result};
use std::time::Duration;

use crate::config::{Config, IndexConfig};
use crate::embedding::EmbeddingClient;
use crate::models::{Document, RetrievedMatch};

/// Metadata key the document body is stored under.
const TEXT_KEY: &str = "text";

/// Gateway to one remote vector index.
pub struct VectorIndex {
    host: String,
    namespace: String,
    api_key: String,
    client: reqwest::Client,
    max_retries: u32,
    embedder: EmbeddingClient,
}

impl VectorIndex {
    /// Create a gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `index.host` is not configured or
    /// `PINECONE_API_KEY` is not in the environment. Whether the host is
    /// actually reachable is only discovered on the first call.
    pub fn new(config: &IndexConfig, embedder: EmbeddingClient) -> Result<Self> {
        let host = config
            .host
            .clone()
            .ok_or_else(|| anyhow::anyhow!("index.host must be set in config for index access"))?;

        let api_key = std::env::var("PINECONE_API_KEY")
            .map_err(|_| anyhow::anyhow!("PINECONE_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            host: normalize_host(&host),
            namespace: config.namespace.clone(),
            api_key,
            client,
            max_retries: config.max_retries,
            embedder,
        })
    }

    /// Embed and upsert documents into the remote index.
    ///
    /// Upsert semantics: re-seeding with an id that already exists
    /// overwrites the remote record. Returns the number of records sent.
    pub async fn seed(&self, documents: &[Document]) -> Result<usize> {
        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await?;

        if vectors.len() != documents.len() {
            bail!(
                "Embedding count mismatch: {} documents, {} vectors",
                documents.len(),
                vectors.len()
            );
        }

        let records = upsert_records(documents, &vectors);
        let body = serde_json::json!({
            "vectors": records,
            "namespace": self.namespace,
        });

        self.post("vectors/upsert", &body).await?;

        Ok(documents.len())
    }

    /// Embed `query` and return the top-`k` most similar documents,
    /// highest score first.
    ///
    /// Fewer than `k` stored records yield fewer matches; an empty index
    /// yields an empty vec, not an error.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedMatch>> {
        let vector = self.embedder.embed(query).await?;

        let body = serde_json::json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
            "namespace": self.namespace,
        });

        let json = self.post("query", &body).await?;
        parse_query_response(&json)
    }

    /// POST a JSON body to a data-plane endpoint with retry/backoff.
    ///
    /// Same strategy as the embedding client: 429/5xx and network errors
    /// retry with exponential backoff, other 4xx fail immediately.
    async fn post(&self, endpoint: &str, body: &serde_json::Value) -> Result<serde_json::Value> {
        let url = format!("{}/{}", self.host, endpoint);
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&url)
                .header("Api-Key", &self.api_key)
                .header("Content-Type", "application/json")
                .json(body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response.json().await?);
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow::anyhow!(
                            "Vector index error {}: {}",
                            status,
                            body_text
                        ));
                        continue;
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    bail!("Vector index error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Vector index request failed after retries")))
    }
}

/// Strip a trailing slash and default the scheme to https.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

/// Build the upsert record list: one `{id, values, metadata}` object per
/// document, with the body text stored under the `"text"` metadata key.
fn upsert_records(documents: &[Document], vectors: &[Vec<f32>]) -> Vec<serde_json::Value> {
    documents
        .iter()
        .zip(vectors.iter())
        .map(|(doc, values)| {
            let mut metadata = doc.metadata.clone();
            metadata.insert(
                TEXT_KEY.to_string(),
                serde_json::Value::String(doc.content.clone()),
            );
            serde_json::json!({
                "id": doc.id,
                "values": values,
                "metadata": metadata,
            })
        })
        .collect()
}

/// Parse a query response into ranked matches.
///
/// Matches without a `"text"` metadata entry (records not written by this
/// tool) are skipped with a warning on stderr.
fn parse_query_response(json: &serde_json::Value) -> Result<Vec<RetrievedMatch>> {
    let matches = json
        .get("matches")
        .and_then(|m| m.as_array())
        .ok_or_else(|| anyhow::anyhow!("Invalid query response: missing matches array"))?;

    let mut results = Vec::with_capacity(matches.len());

    for entry in matches {
        let id = entry
            .get("id")
            .and_then(|i| i.as_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid query response: match without id"))?;

        let score = entry.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0);

        let content = entry
            .get("metadata")
            .and_then(|m| m.get(TEXT_KEY))
            .and_then(|t| t.as_str());

        match content {
            Some(text) => results.push(RetrievedMatch {
                id: id.to_string(),
                score,
                content: text.to_string(),
            }),
            None => {
                eprintln!("warning: match {} has no text metadata, skipping", id);
            }
        }
    }

    Ok(results)
}

/// Run the `query` command: one-shot retrieval with ranked output.
pub async fn run_query(config: &Config, query: &str, top_k: Option<usize>) -> Result<()> {
    if query.trim().is_empty() {
        println!("No matches.");
        return Ok(());
    }

    let embedder = EmbeddingClient::new(&config.embedding)?;
    let index = VectorIndex::new(&config.index, embedder)?;
    let k = top_k.unwrap_or(config.index.top_k);

    let matches = index.retrieve(query, k).await?;

    if matches.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    for (i, m) in matches.iter().enumerate() {
        println!("{}. [{:.3}] {}", i + 1, m.score, m.id);
        println!("    \"{}\"", m.content.replace('\n', " "));
        println!();
    }

    Ok(())
}

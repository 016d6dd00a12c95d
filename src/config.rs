use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level configuration, loaded from a TOML file.
///
/// Every section has sensible defaults, so `retort` runs with no config
/// file at all — only the API keys in the environment are mandatory.
/// Secrets never live in the file: `OPENAI_API_KEY` and `PINECONE_API_KEY`
/// are read from the process environment by the clients that need them.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

/// Settings for the hosted chat-completion model.
#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_chat_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_chat_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_chat_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Settings for the hosted embedding model.
#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_embedding_model")]
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Settings for the remote vector index.
///
/// `host` is the index's data-plane endpoint
/// (e.g. `https://my-index-abc123.svc.us-east-1.pinecone.io`). It is only
/// required for commands that actually touch the index, so validation
/// happens at gateway construction, not at config load.
#[derive(Debug, Deserialize, Clone)]
pub struct IndexConfig {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub namespace: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            host: None,
            namespace: String::new(),
            top_k: default_top_k(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

/// Transcript retention policy.
///
/// `max_turns` caps the per-session transcript length (one turn = one
/// user or assistant entry). Oldest turns are dropped first.
#[derive(Debug, Deserialize, Clone)]
pub struct HistoryConfig {
    #[serde(default = "default_max_turns")]
    pub max_turns: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
        }
    }
}

fn default_chat_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_max_tokens() -> u32 {
    2000
}
fn default_temperature() -> f32 {
    0.7
}
fn default_chat_timeout_secs() -> u64 {
    60
}
fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    5
}
fn default_top_k() -> usize {
    5
}
fn default_max_turns() -> usize {
    50
}

/// Load configuration from `path`.
///
/// A missing file is not an error — the built-in defaults are returned so
/// the tool works with nothing but environment variables set. A file that
/// exists but fails to parse or validate is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.chat.max_tokens == 0 {
        anyhow::bail!("chat.max_tokens must be > 0");
    }

    if !(0.0..=2.0).contains(&config.chat.temperature) {
        anyhow::bail!("chat.temperature must be in [0.0, 2.0]");
    }

    if config.index.top_k < 1 {
        anyhow::bail!("index.top_k must be >= 1");
    }

    // One turn per side minimum, otherwise the chain can never keep a
    // full exchange in history.
    if config.history.max_turns < 2 {
        anyhow::bail!("history.max_turns must be >= 2");
    }

    Ok(())
}

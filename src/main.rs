//! # Retort CLI
//!
//! The `retort` binary is a retrieval-augmented chat assistant for the
//! terminal. It seeds documents into a remote vector index, and answers
//! questions grounded in what that index returns.
//!
//! ## Usage
//!
//! ```bash
//! retort --config ./config/retort.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `retort chat` | Interactive chat loop with retrieval per turn |
//! | `retort seed` | Upsert documents into the remote vector index |
//! | `retort query "<text>"` | One-shot retrieval, printed with scores |
//!
//! ## Examples
//!
//! ```bash
//! # Seed the built-in sample documents
//! retort seed
//!
//! # Seed from a JSON file instead
//! retort seed --file ./docs.json
//!
//! # Inspect what retrieval returns for a query
//! retort query "What should I eat?" --top-k 3
//!
//! # Chat, keeping history under the session id "alice"
//! retort chat --session alice
//! ```
//!
//! Credentials come from the environment: `OPENAI_API_KEY` for the
//! embedding and completion APIs, `PINECONE_API_KEY` for the vector index.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use retort::{config, index, repl, seed};

/// Retort — a retrieval-augmented terminal chat assistant.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. A missing file falls back to built-in defaults; see
/// `config/retort.example.toml` for the full set of options.
#[derive(Parser)]
#[command(
    name = "retort",
    about = "Retort — a retrieval-augmented terminal chat assistant",
    version,
    long_about = "Retort reads a line from the terminal, retrieves semantically relevant \
    documents from a remote vector index, injects them into the prompt alongside the rolling \
    conversation history, and prints the hosted chat model's reply."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/retort.toml`. Model names, sampling
    /// parameters, index host, and history retention are read from this
    /// file; API keys always come from the environment.
    #[arg(long, global = true, default_value = "./config/retort.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the interactive chat loop.
    ///
    /// Each turn embeds your input, retrieves the most similar documents
    /// from the index, and answers with that context in the prompt.
    /// Exit with `/exit` or Ctrl-D.
    Chat {
        /// Session id for the conversation transcript. Separate sessions
        /// keep separate histories within one process.
        #[arg(long, default_value = "default")]
        session: String,

        /// Number of documents to retrieve per turn (overrides config).
        #[arg(long)]
        top_k: Option<usize>,
    },

    /// Upsert documents into the remote vector index.
    ///
    /// Without `--file`, seeds the four built-in sample documents.
    /// Seeding is idempotent by id — re-running overwrites the same
    /// remote records.
    Seed {
        /// JSON file with an array of `{"id"?, "content", "metadata"?}`
        /// objects. Entries without an id get a generated UUID.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Print what would be upserted without touching the network.
        #[arg(long)]
        dry_run: bool,
    },

    /// Retrieve documents for a query and print them with scores.
    ///
    /// Debugging aid for inspecting what context a chat turn would see.
    Query {
        /// The query text.
        query: String,

        /// Number of documents to retrieve (overrides config).
        #[arg(long)]
        top_k: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Chat { session, top_k } => {
            repl::run_chat(&cfg, &session, top_k).await?;
        }
        Commands::Seed { file, dry_run } => {
            seed::run_seed(&cfg, file, dry_run).await?;
        }
        Commands::Query { query, top_k } => {
            index::run_query(&cfg, &query, top_k).await?;
        }
    }

    Ok(())
}

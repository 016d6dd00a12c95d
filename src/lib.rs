//! # Retort
//!
//! A retrieval-augmented terminal chat assistant.
//!
//! Retort answers questions in a terminal loop, grounding each reply in
//! documents retrieved from a remote vector index. Per turn: the user's
//! line is embedded and similarity-searched against the index, the top
//! matches are injected into a fixed prompt template together with the
//! rolling session transcript, and the composed message list goes to a
//! hosted chat-completion model.
//!
//! ## Architecture
//!
//! ```text
//! stdin ──▶ ┌──────────┐   query    ┌──────────────┐
//!           │ Chat loop │──────────▶│ Vector index  │──▶ embeddings API
//!           │  (repl)   │◀──────────│   gateway     │    + index API
//!           └────┬─────┘  context   └──────────────┘
//!                ▼
//!           ┌──────────┐  messages  ┌──────────────┐
//!           │  Chain    │──────────▶│  Chat client  │──▶ completions API
//!           │ + history │◀──────────│               │
//!           └────┬─────┘   reply    └──────────────┘
//!                ▼
//!             stdout
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export OPENAI_API_KEY=...
//! export PINECONE_API_KEY=...
//! retort seed                     # upsert the sample documents
//! retort query "What should I eat?"
//! retort chat --session alice     # interactive loop
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`embedding`] | Hosted embedding API client |
//! | [`chat`] | Hosted chat-completion API client |
//! | [`index`] | Remote vector index gateway |
//! | [`prompt`] | Prompt template |
//! | [`history`] | Session transcript store |
//! | [`chain`] | Conversation chain |
//! | [`seed`] | Index seeding |
//! | [`repl`] | Interactive chat loop |

pub mod chain;
pub mod chat;
pub mod config;
pub mod embedding;
pub mod history;
pub mod index;
pub mod models;
pub mod prompt;
pub mod repl;
pub mod seed;

//! Interactive chat loop.
//!
//! Reads one line at a time from standard input, retrieves context for it,
//! invokes the conversation chain, and prints the reply prefixed with
//! `Assistant:`. The loop is strictly sequential — retrieval, then
//! completion, then back to the prompt.
//!
//! Exit: EOF (Ctrl-D) or the `/exit` sentinel. Errors escaping a turn
//! propagate to `main`, which prints them and exits non-zero — the single
//! top-level error handler.

use anyhow::Result;
use std::io::{BufRead, Write};

use crate::chain::ConversationChain;
use crate::chat::ChatClient;
use crate::config::Config;
use crate::embedding::EmbeddingClient;
use crate::index::VectorIndex;
use crate::models::context_string;

/// Sentinel input that ends the session.
const EXIT_COMMAND: &str = "/exit";

/// Run the `chat` command for one session.
pub async fn run_chat(config: &Config, session: &str, top_k: Option<usize>) -> Result<()> {
    let embedder = EmbeddingClient::new(&config.embedding)?;
    let index = VectorIndex::new(&config.index, embedder)?;
    let chat = ChatClient::new(&config.chat)?;
    let mut chain = ConversationChain::new(Box::new(chat), config.history.max_turns);

    let top_k = top_k.unwrap_or(config.index.top_k);
    let interactive = atty::is(atty::Stream::Stdin);

    if interactive {
        eprintln!("retort — session '{}'. Type /exit or press Ctrl-D to quit.", session);
    }

    let stdin = std::io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        if interactive {
            print!("You: ");
            std::io::stdout().flush()?;
        }

        line.clear();
        let bytes_read = reader.read_line(&mut line)?;
        if bytes_read == 0 {
            // EOF
            break;
        }

        let input = line.trim_end_matches(['\n', '\r']);
        if input == EXIT_COMMAND {
            break;
        }

        // Empty input is forwarded as-is; there is no input validation.
        let matches = index.retrieve(input, top_k).await?;
        let context = context_string(&matches);

        let reply = chain.invoke(session, input, &context).await?;
        println!("Assistant: {}", reply);
    }

    Ok(())
}

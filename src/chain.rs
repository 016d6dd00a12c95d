//! Conversation chain.
//!
//! Composes the prompt template, a completion backend, and the transcript
//! store into one invocable unit. Each invocation renders the prompt from
//! the session's current history, sends it, and — only after a successful
//! completion — appends the user input and the assistant reply to the
//! transcript. A failed turn leaves the transcript untouched.

use anyhow::Result;

use crate::chat::Completion;
use crate::history::TranscriptStore;
use crate::models::Turn;
use crate::prompt::PromptTemplate;

pub struct ConversationChain {
    template: PromptTemplate,
    chat: Box<dyn Completion>,
    store: TranscriptStore,
}

impl ConversationChain {
    pub fn new(chat: Box<dyn Completion>, max_turns: usize) -> Self {
        Self {
            template: PromptTemplate::new(),
            chat,
            store: TranscriptStore::new(max_turns),
        }
    }

    /// Run one turn for `session`: render, complete, record, return the
    /// reply. Suspends until the remote completion finishes.
    pub async fn invoke(&mut self, session: &str, input: &str, context: &str) -> Result<String> {
        let messages = self
            .template
            .render(context, self.store.turns(session), input);

        let reply = self.chat.complete(&messages).await?;

        self.store.append(session, Turn::user(input));
        self.store.append(session, Turn::assistant(&reply));

        Ok(reply)
    }

    /// Number of transcript entries recorded for `session`.
    pub fn transcript_len(&self, session: &str) -> usize {
        self.store.len(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatMessage;
    use anyhow::bail;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend that echoes a canned reply and records every request.
    struct Scripted {
        reply: String,
        requests: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl Scripted {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Completion for Scripted {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            self.requests.lock().unwrap().push(messages.to_vec());
            Ok(self.reply.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl Completion for Failing {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String> {
            bail!("Completion API error 401 Unauthorized: bad key");
        }
    }

    #[tokio::test]
    async fn test_invoke_records_both_sides() {
        let mut chain = ConversationChain::new(Box::new(Scripted::new("Hello!")), 50);

        let reply = chain.invoke("s", "Hi", "").await.unwrap();
        assert_eq!(reply, "Hello!");
        assert_eq!(chain.transcript_len("s"), 2);

        chain.invoke("s", "And again", "").await.unwrap();
        assert_eq!(chain.transcript_len("s"), 4);
    }

    /// Keeps a handle on the scripted backend after the chain takes
    /// ownership, so tests can inspect the requests it saw.
    struct SharedBackend(std::sync::Arc<Scripted>);

    #[async_trait]
    impl Completion for SharedBackend {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            self.0.complete(messages).await
        }
    }

    #[tokio::test]
    async fn test_second_turn_sees_first_in_history() {
        let backend = std::sync::Arc::new(Scripted::new("You said: Hi"));
        let mut chain = ConversationChain::new(Box::new(SharedBackend(backend.clone())), 50);

        chain.invoke("s", "Hi", "").await.unwrap();
        chain.invoke("s", "What did I just say?", "").await.unwrap();

        let requests = backend.requests.lock().unwrap();
        let second = &requests[1];
        assert!(second.iter().any(|m| m.role == "user" && m.content == "Hi"));
        assert_eq!(second.last().unwrap().content, "What did I just say?");
    }

    #[tokio::test]
    async fn test_failed_turn_leaves_transcript_untouched() {
        let mut chain = ConversationChain::new(Box::new(Failing), 50);

        let result = chain.invoke("s", "Hi", "").await;
        assert!(result.is_err());
        assert_eq!(chain.transcript_len("s"), 0);
    }

    #[tokio::test]
    async fn test_sessions_do_not_share_history() {
        let backend = std::sync::Arc::new(Scripted::new("ok"));
        let mut chain = ConversationChain::new(Box::new(SharedBackend(backend.clone())), 50);

        chain.invoke("alpha", "alpha says hi", "").await.unwrap();
        chain.invoke("beta", "beta says hi", "").await.unwrap();

        let requests = backend.requests.lock().unwrap();
        // Beta's first request must not carry alpha's turn.
        let beta_request = &requests[1];
        assert!(!beta_request.iter().any(|m| m.content == "alpha says hi"));
        assert_eq!(chain.transcript_len("alpha"), 2);
        assert_eq!(chain.transcript_len("beta"), 2);
    }
}

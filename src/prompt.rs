//! Prompt assembly.
//!
//! Builds the message list sent to the completion model: a fixed system
//! instruction with the retrieved context substituted in, the session
//! transcript in order, and the current user utterance last. The template
//! is stateless; substitution happens at render time.

use crate::chat::ChatMessage;
use crate::models::Turn;

/// System instruction with the `{context}` substitution slot.
const SYSTEM_TEMPLATE: &str = "You are a helpful assistant. Answer the user's questions using \
the context below. If the context does not contain the answer, say you don't know rather than \
guessing.\n\nContext:\n{context}";

/// Stateless, reusable prompt template.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptTemplate;

impl PromptTemplate {
    pub fn new() -> Self {
        Self
    }

    /// Expand the template into a message list.
    ///
    /// Rendering is a pure function of its inputs: identical context,
    /// history, and input always produce an identical message list. The
    /// context slot is always present, even when empty.
    pub fn render(&self, context: &str, history: &[Turn], input: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);

        messages.push(ChatMessage::system(
            SYSTEM_TEMPLATE.replace("{context}", context),
        ));

        for turn in history {
            messages.push(ChatMessage {
                role: turn.role.as_str().to_string(),
                content: turn.content.clone(),
            });
        }

        messages.push(ChatMessage::user(input));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_shape() {
        let template = PromptTemplate::new();
        let messages = template.render("some context", &[], "hello");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.contains("some context"));
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "hello");
    }

    #[test]
    fn test_render_is_idempotent() {
        let history = vec![Turn::user("Hi"), Turn::assistant("Hello!")];

        let a = PromptTemplate::new().render("ctx", &history, "next");
        let b = PromptTemplate::new().render("ctx", &history, "next");
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_includes_history_in_order() {
        let history = vec![Turn::user("Hi"), Turn::assistant("Hello! How can I help?")];
        let messages = PromptTemplate::new().render("", &history, "What did I just say?");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1].role, "user");
        assert_eq!(messages[1].content, "Hi");
        assert_eq!(messages[2].role, "assistant");
        assert_eq!(messages[3].content, "What did I just say?");
    }

    #[test]
    fn test_render_empty_context_keeps_slot() {
        let messages = PromptTemplate::new().render("", &[], "q");
        // The instruction still ends with its (empty) context block.
        assert!(messages[0].content.ends_with("Context:\n"));
        assert!(!messages[0].content.contains("{context}"));
    }

    #[test]
    fn test_render_empty_input_forwarded() {
        let messages = PromptTemplate::new().render("ctx", &[], "");
        assert_eq!(messages.last().unwrap().content, "");
    }
}

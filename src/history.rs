//! Session transcript bookkeeping.
//!
//! An in-memory mapping from session id to an ordered turn list. Lives for
//! the process lifetime; nothing is persisted. Growth is bounded by the
//! configured retention limit — when a session exceeds it, the oldest
//! turns are dropped first.

use std::collections::HashMap;

use crate::models::Turn;

/// In-memory, session-keyed transcript store.
pub struct TranscriptStore {
    sessions: HashMap<String, Vec<Turn>>,
    max_turns: usize,
}

impl TranscriptStore {
    /// `max_turns` caps each session's transcript length (one entry = one
    /// user or assistant turn).
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            max_turns,
        }
    }

    /// The session's turns in chronological order. Unknown sessions have
    /// an empty transcript.
    pub fn turns(&self, session: &str) -> &[Turn] {
        self.sessions
            .get(session)
            .map(|turns| turns.as_slice())
            .unwrap_or(&[])
    }

    /// Append a turn, trimming the oldest entries past the retention cap.
    pub fn append(&mut self, session: &str, turn: Turn) {
        let turns = self.sessions.entry(session.to_string()).or_default();
        turns.push(turn);

        if turns.len() > self.max_turns {
            let excess = turns.len() - self.max_turns;
            turns.drain(..excess);
        }
    }

    pub fn len(&self, session: &str) -> usize {
        self.turns(session).len()
    }

    pub fn is_empty(&self, session: &str) -> bool {
        self.len(session) == 0
    }
}

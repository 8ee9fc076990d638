//! Bounded conversational context fed to the generation call.
//!
//! The window is a FIFO queue of *turns* plus a seed message that is never
//! evicted.  A turn opens with a user message and closes with the next
//! assistant message:
//!
//! - an assistant message with no open turn forms a turn on its own;
//! - a user message arriving while the previous turn is still unanswered
//!   opens a new turn and leaves the previous one partial.
//!
//! Once more than `turn_limit` turns are held the oldest is dropped, so
//! replaying an arbitrarily long log leaves only its tail.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::message::{Message, Role};

/// Default number of turns kept in the window.
pub const DEFAULT_TURN_LIMIT: usize = 5;

/// Seed message installed on start and after every clear.
pub const DEFAULT_SEED_MESSAGE: &str = "You are a helpful, concise, and friendly AI assistant.";

/// One `(role, text)` element of a window snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub role: Role,
    pub text: String,
}

impl ContextEntry {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self { role, text: text.into() }
    }
}

#[derive(Debug, Clone, Default)]
struct Turn {
    user: Option<String>,
    assistant: Option<String>,
}

impl Turn {
    fn is_open(&self) -> bool {
        self.user.is_some() && self.assistant.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct ContextWindow {
    seed: String,
    turn_limit: usize,
    turns: VecDeque<Turn>,
}

impl ContextWindow {
    /// Create a window holding only `seed`.  A `turn_limit` of zero is
    /// raised to one.
    pub fn new(seed: impl Into<String>, turn_limit: usize) -> Self {
        let turn_limit = turn_limit.max(1);
        Self {
            seed: seed.into(),
            turn_limit,
            turns: VecDeque::with_capacity(turn_limit + 1),
        }
    }

    /// Reset the window so it contains the single seed message `text`.
    pub fn seed(&mut self, text: impl Into<String>) {
        self.seed = text.into();
        self.turns.clear();
    }

    pub fn record_user(&mut self, text: impl Into<String>) {
        self.turns.push_back(Turn {
            user: Some(text.into()),
            assistant: None,
        });
        self.evict();
    }

    pub fn record_assistant(&mut self, text: impl Into<String>) {
        match self.turns.back_mut() {
            Some(turn) if turn.is_open() => turn.assistant = Some(text.into()),
            _ => {
                self.turns.push_back(Turn {
                    user: None,
                    assistant: Some(text.into()),
                });
                self.evict();
            }
        }
    }

    /// Seed first, then every held turn in order.
    pub fn snapshot(&self) -> Vec<ContextEntry> {
        let mut entries = Vec::with_capacity(1 + self.turns.len() * 2);
        entries.push(ContextEntry::new(Role::System, self.seed.clone()));
        for turn in &self.turns {
            if let Some(user) = &turn.user {
                entries.push(ContextEntry::new(Role::User, user.clone()));
            }
            if let Some(assistant) = &turn.assistant {
                entries.push(ContextEntry::new(Role::Assistant, assistant.clone()));
            }
        }
        entries
    }

    /// Drop every turn and re-apply the current seed.
    pub fn clear(&mut self) {
        let seed = std::mem::take(&mut self.seed);
        self.seed(seed);
    }

    /// Feed persisted messages through [`record_user`](Self::record_user) /
    /// [`record_assistant`](Self::record_assistant) in order.  `system` rows
    /// carry no conversational content and are ignored.
    pub fn replay<'a>(&mut self, messages: impl IntoIterator<Item = &'a Message>) {
        for message in messages {
            match message.role {
                Role::User => self.record_user(message.content.as_str()),
                Role::Assistant => self.record_assistant(message.content.as_str()),
                Role::System => {}
            }
        }
    }

    pub fn turn_count(&self) -> usize {
        self.turns.len()
    }

    pub fn turn_limit(&self) -> usize {
        self.turn_limit
    }

    fn evict(&mut self) {
        while self.turns.len() > self.turn_limit {
            self.turns.pop_front();
        }
    }
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self::new(DEFAULT_SEED_MESSAGE, DEFAULT_TURN_LIMIT)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    fn texts(window: &ContextWindow) -> Vec<(Role, String)> {
        window.snapshot().into_iter().map(|e| (e.role, e.text)).collect()
    }

    fn message(id: i64, role: Role, content: &str) -> Message {
        Message { id, role, content: content.into() }
    }

    #[test]
    fn fresh_window_holds_only_seed() {
        let window = ContextWindow::new("be nice", 3);
        assert_eq!(texts(&window), vec![(Role::System, "be nice".to_owned())]);
        assert_eq!(window.turn_count(), 0);
    }

    #[test]
    fn user_and_assistant_pair_into_one_turn() {
        let mut window = ContextWindow::new("seed", 3);
        window.record_user("q1");
        window.record_assistant("a1");
        assert_eq!(window.turn_count(), 1);
        assert_eq!(
            texts(&window),
            vec![
                (Role::System, "seed".to_owned()),
                (Role::User, "q1".to_owned()),
                (Role::Assistant, "a1".to_owned()),
            ]
        );
    }

    #[test]
    fn eviction_is_fifo_by_turn() {
        let mut window = ContextWindow::new("seed", 2);
        for i in 0..4 {
            window.record_user(format!("q{i}"));
            window.record_assistant(format!("a{i}"));
        }
        assert_eq!(window.turn_count(), 2);
        let snapshot = texts(&window);
        assert_eq!(snapshot.len(), 5);
        assert_eq!(snapshot[0].0, Role::System);
        assert_eq!(snapshot[1].1, "q2");
        assert_eq!(snapshot[4].1, "a3");
    }

    #[test]
    fn unanswered_user_message_is_a_partial_turn() {
        let mut window = ContextWindow::new("seed", 2);
        window.record_user("lost");
        window.record_user("q");
        window.record_assistant("a");
        assert_eq!(window.turn_count(), 2);

        window.record_user("next");
        assert_eq!(window.turn_count(), 2);
        let snapshot = texts(&window);
        assert_eq!(snapshot[1], (Role::User, "q".to_owned()));
        assert_eq!(snapshot.last().unwrap(), &(Role::User, "next".to_owned()));
    }

    #[test]
    fn orphan_assistant_message_forms_its_own_turn() {
        let mut window = ContextWindow::new("seed", 5);
        window.record_assistant("greeting");
        window.record_assistant("another");
        assert_eq!(window.turn_count(), 2);
    }

    #[test]
    fn clear_restores_seed_only() {
        let mut window = ContextWindow::new("seed", 5);
        window.record_user("q");
        window.record_assistant("a");
        window.clear();
        assert_eq!(texts(&window), vec![(Role::System, "seed".to_owned())]);
    }

    #[test]
    fn seed_replaces_text_and_drops_turns() {
        let mut window = ContextWindow::new("old", 5);
        window.record_user("q");
        window.seed("new");
        assert_eq!(texts(&window), vec![(Role::System, "new".to_owned())]);
    }

    #[test]
    fn zero_turn_limit_is_raised_to_one() {
        let mut window = ContextWindow::new("seed", 0);
        assert_eq!(window.turn_limit(), 1);
        window.record_user("q");
        window.record_assistant("a");
        assert_eq!(window.turn_count(), 1);
    }

    #[test]
    fn replay_keeps_only_tail_of_long_history() {
        let mut log = Vec::new();
        for i in 0..12 {
            log.push(message(i * 2 + 1, Role::User, &format!("q{i}")));
            log.push(message(i * 2 + 2, Role::Assistant, &format!("a{i}")));
        }

        let mut window = ContextWindow::new("seed", 5);
        window.replay(&log);

        assert_eq!(window.turn_count(), 5);
        let snapshot = texts(&window);
        assert_eq!(snapshot.len(), 11);
        assert_eq!(snapshot[1].1, "q7");
        assert_eq!(snapshot[10].1, "a11");
    }

    #[test]
    fn replay_ignores_system_rows() {
        let mut window = ContextWindow::new("seed", 5);
        window.replay(&[
            message(1, Role::System, "stale instruction"),
            message(2, Role::User, "q"),
        ]);
        assert_eq!(window.turn_count(), 1);
        assert_eq!(window.snapshot().len(), 2);
    }
}

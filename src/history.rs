//! Bounded in-memory buffer of recent chat turns.

use std::collections::VecDeque;
use std::time::SystemTime;

use crate::config::MAX_HISTORY_TURNS;

/// One exchange between a guest and the assistant.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub user: String,
    pub reply: String,
    pub timestamp: SystemTime,
}

impl ChatTurn {
    pub fn new(user: impl Into<String>, reply: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            reply: reply.into(),
            timestamp: SystemTime::now(),
        }
    }
}

/// FIFO of the most recent turns; the oldest turn is evicted once full.
#[derive(Debug, Clone)]
pub struct ChatHistory {
    turns: VecDeque<ChatTurn>,
    capacity: usize,
    total_turns: usize,
}

impl Default for ChatHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatHistory {
    /// Creates an empty history holding up to [`MAX_HISTORY_TURNS`] turns.
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_TURNS)
    }

    /// Creates an empty history with a custom bound. A zero bound keeps nothing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            turns: VecDeque::with_capacity(capacity),
            capacity,
            total_turns: 0,
        }
    }

    /// Appends a turn and trims the buffer to the configured bound.
    pub fn push(&mut self, turn: ChatTurn) {
        self.total_turns += 1;
        if self.capacity == 0 {
            return;
        }
        while self.turns.len() >= self.capacity {
            self.turns.pop_front();
        }
        self.turns.push_back(turn);
    }

    /// Turns currently retained, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of turns pushed since creation, including evicted ones.
    pub fn total_turns(&self) -> usize {
        self.total_turns
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

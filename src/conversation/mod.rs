//! Conversation types and state management
//!
//! A [`Conversation`] is the model-facing log: an append-only sequence of
//! role-tagged [`Turn`]s. It is never reordered or trimmed.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn. System turns are kept in the log but never surface in
    /// [`Conversation::history`].
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.append(Turn::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.append(Turn::assistant(content));
    }

    /// User and assistant turns in the order they were appended
    pub fn history(&self) -> Vec<Turn> {
        self.turns
            .iter()
            .filter(|turn| turn.role != Role::System)
            .cloned()
            .collect()
    }

    /// Number of user and assistant turns
    pub fn len(&self) -> usize {
        self.turns.iter().filter(|t| t.role != Role::System).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when no exchange is half-finished
    pub fn is_settled(&self) -> bool {
        self.len() % 2 == 0
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.role != Role::System)
    }
}

//! Transcript entries

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One chat bubble.
///
/// Assistant replies that stream in start empty and grow by appending
/// fragments; [`DisplayMessage::freeze`] ends that. Content is never
/// rewritten.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayMessage {
    id: Uuid,
    content: String,
    is_user: bool,
    timestamp: DateTime<Utc>,
    streaming: bool,
}

impl DisplayMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::finished(content.into(), true)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::finished(content.into(), false)
    }

    /// Empty assistant message waiting for fragments
    pub fn placeholder() -> Self {
        Self {
            streaming: true,
            ..Self::finished(String::new(), false)
        }
    }

    fn finished(content: String, is_user: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            is_user,
            timestamp: Utc::now(),
            streaming: false,
        }
    }

    /// Append a fragment. Returns false, leaving the content alone, once the
    /// message is frozen.
    pub fn append(&mut self, fragment: &str) -> bool {
        if !self.streaming {
            return false;
        }
        self.content.push_str(fragment);
        true
    }

    pub fn freeze(&mut self) {
        self.streaming = false;
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_user(&self) -> bool {
        self.is_user
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// `HH:MM` label shown under the bubble
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

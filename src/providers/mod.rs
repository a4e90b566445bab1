//! Chat-completion backends
//!
//! [`ModelClient`] talks to one OpenAI-compatible endpoint. Whatever goes
//! wrong on the way, its calls come back in the normal shape: the content is
//! then the offline fallback answer and `error` says what happened.

mod openai_compat;
mod simulated;
mod sse;

use std::fmt;
use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures::Stream;
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::conversation::Turn;

pub use openai_compat::{format_messages, ModelClient, FALLBACK_WORD_DELAY};
pub use simulated::simulated_stream;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("LLM client not configured: {0}")]
    NotConfigured(#[from] ConfigError),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No response content received from the model")]
    EmptyContent,

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
}

/// Lazy, single-consumption sequence of reply fragments.
///
/// Ends after the last fragment; a failure part-way through is yielded as one
/// final `Err` item.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ModelError>> + Send>>;

/// Result of a blocking completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub content: String,

    /// Set when `content` came from the fallback responder
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Completion {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of a streaming completion
pub struct StreamingCompletion {
    pub stream: FragmentStream,

    /// Set when `stream` replays the fallback answer
    pub error: Option<String>,
}

impl StreamingCompletion {
    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }
}

impl fmt::Debug for StreamingCompletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingCompletion")
            .field("stream", &"<fragments>")
            .field("error", &self.error)
            .finish()
    }
}

/// What the chat widget needs from a model.
///
/// `Err` is reserved for failures the backend could not turn into a
/// fallback answer; [`ModelClient`] never returns it.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete_once(&self, question: &str, history: &[Turn]) -> anyhow::Result<Completion>;

    async fn complete_streaming(
        &self,
        question: &str,
        history: &[Turn],
    ) -> anyhow::Result<StreamingCompletion>;

    async fn check_health(&self) -> bool;

    /// Whether replies should stream unless a caller asks otherwise
    fn streams_by_default(&self) -> bool {
        true
    }
}

//! Hub Assistant - site chat assistant
//!
//! The chat pipeline behind the AI Workflow Hub assistant: an
//! OpenAI-compatible model client with streaming, an offline fallback
//! responder, the conversation log and a rendering-independent widget
//! controller that a shell (browser, terminal, native) drives.

pub mod config;
pub mod conversation;
pub mod fallback;
pub mod logging;
pub mod providers;
pub mod widget;

pub use config::{AssistantConfig, ConfigError, LlmConfig};
pub use conversation::{Conversation, Role, Turn};
pub use providers::{ChatBackend, Completion, ModelClient, ModelError, StreamingCompletion};
pub use widget::{ChatWidget, WidgetState, WidgetView};

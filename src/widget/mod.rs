//! Chat widget controller
//!
//! The widget is an explicit state machine:
//!
//! ```text
//! Idle -> Sending -> Streaming        -> Idle
//!                 -> AwaitingBlocking -> Idle
//! ```
//!
//! plus an error banner that never blocks the return to `Idle`. It owns the
//! transcript, the model-facing conversation and the input line, and reports
//! changes through a [`WidgetView`].

mod controller;
mod keys;
mod message;
mod view;

pub use controller::{ChatWidget, Ticket};
pub use keys::{action_for, Key, KeyAction, KeyPress};
pub use message::DisplayMessage;
pub use view::{NoopView, WidgetView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    Idle,
    Sending,
    Streaming,
    AwaitingBlocking,
}

impl WidgetState {
    pub fn is_busy(&self) -> bool {
        !matches!(self, WidgetState::Idle)
    }
}

/// How a reply is fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendMode {
    Streaming,
    Blocking,
}

/// Canned question offered as a one-click chip under the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickAction {
    pub label: &'static str,
    pub query: &'static str,
}

pub const QUICK_ACTIONS: &[QuickAction] = &[
    QuickAction { label: "Services", query: "What services do you offer?" },
    QuickAction { label: "Navigation", query: "How do I navigate the website?" },
    QuickAction { label: "Features", query: "What features are available?" },
    QuickAction { label: "Getting Started", query: "How do I get started with AI workflows?" },
    QuickAction { label: "Case Studies", query: "Show me some case studies" },
    QuickAction { label: "Risk Assessment", query: "Tell me about risk assessment" },
    QuickAction { label: "Test: Count R", query: "How many r in Strawberry?" },
    QuickAction { label: "Test: Math", query: "What is 25 + 17?" },
    QuickAction { label: "Test: Unclear Q", query: "How do I implement this?" },
    QuickAction { label: "Test: Unknown", query: "What is the weather today?" },
];

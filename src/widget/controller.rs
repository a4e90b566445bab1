//! The widget state machine
//!
//! [`ChatWidget::send`] drives a whole exchange. Shells that run the backend
//! themselves use the step methods instead (`begin_submit`, `begin_streaming`,
//! `apply_fragment`, ...), each of which takes the [`Ticket`] handed out by
//! `begin_submit` and does nothing when that ticket is no longer current.

use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::prompts_builtin;
use crate::conversation::{Conversation, Turn};
use crate::providers::{ChatBackend, ModelError};

use super::keys::{action_for, KeyAction, KeyPress};
use super::message::DisplayMessage;
use super::view::{NoopView, WidgetView};
use super::{SendMode, WidgetState, QUICK_ACTIONS};

/// Identifies one request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

struct ActiveRequest {
    ticket: Ticket,
    question: String,
    /// History before the question was appended
    history: Vec<Turn>,
    reply_id: Option<Uuid>,
}

/// Abandons its request when dropped before the request settled
struct InFlight<'a> {
    widget: &'a mut ChatWidget,
    ticket: Ticket,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.widget.abandon(self.ticket);
    }
}

pub struct ChatWidget {
    backend: Arc<dyn ChatBackend>,
    view: Box<dyn WidgetView>,
    conversation: Conversation,
    messages: Vec<DisplayMessage>,
    input: String,
    state: WidgetState,
    error: Option<String>,
    is_open: bool,
    next_ticket: u64,
    active: Option<ActiveRequest>,
}

impl ChatWidget {
    /// Closed widget with the built-in greeting as its first message
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self::with_greeting(backend, prompts_builtin::GREETING)
    }

    pub fn with_greeting(backend: Arc<dyn ChatBackend>, greeting: impl Into<String>) -> Self {
        Self {
            backend,
            view: Box::new(NoopView),
            conversation: Conversation::new(),
            messages: vec![DisplayMessage::assistant(greeting)],
            input: String::new(),
            state: WidgetState::Idle,
            error: None,
            is_open: false,
            next_ticket: 0,
            active: None,
        }
    }

    pub fn with_view(mut self, view: impl WidgetView + 'static) -> Self {
        self.view = Box::new(view);
        self
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn messages(&self) -> &[DisplayMessage] {
        &self.messages
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn input_enabled(&self) -> bool {
        !self.state.is_busy()
    }

    pub fn can_submit(&self) -> bool {
        !self.state.is_busy() && !self.input.trim().is_empty()
    }

    /// Text for the typing indicator, `None` when idle
    pub fn status_label(&self) -> Option<&'static str> {
        match self.state {
            WidgetState::Idle => None,
            WidgetState::Streaming => Some("Generating response..."),
            WidgetState::Sending | WidgetState::AwaitingBlocking => Some("Processing..."),
        }
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Put a quick action's query into the input. Ignored while busy.
    pub fn apply_quick_action(&mut self, label: &str) -> bool {
        if self.state.is_busy() {
            return false;
        }
        match QUICK_ACTIONS.iter().find(|action| action.label == label) {
            Some(action) => {
                self.input = action.query.to_string();
                true
            }
            None => false,
        }
    }

    pub fn open(&mut self) {
        if self.is_open {
            return;
        }
        self.is_open = true;
        self.view.visibility_changed(true);
        self.view.focus_input();
    }

    /// Hide the widget. A request in flight keeps running.
    pub fn close(&mut self) {
        if !self.is_open {
            return;
        }
        self.is_open = false;
        self.view.visibility_changed(false);
    }

    pub fn toggle(&mut self) {
        if self.is_open {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn dismiss_error(&mut self) {
        self.set_error(None);
    }

    /// Apply a keyboard shortcut. `Submit` is only returned when a send
    /// would be accepted; the caller then awaits [`ChatWidget::send`].
    pub fn handle_key(&mut self, press: KeyPress) -> KeyAction {
        match action_for(press, self.is_open) {
            KeyAction::Toggle => {
                self.toggle();
                KeyAction::Toggle
            }
            KeyAction::Close => {
                self.close();
                KeyAction::Close
            }
            KeyAction::Submit if self.can_submit() => KeyAction::Submit,
            _ => KeyAction::Ignored,
        }
    }

    pub async fn check_health(&self) -> bool {
        self.backend.check_health().await
    }

    /// Send the input using the backend's default mode
    pub async fn send(&mut self) -> bool {
        let mode = if self.backend.streams_by_default() {
            SendMode::Streaming
        } else {
            SendMode::Blocking
        };
        self.send_with(mode).await
    }

    pub async fn send_streaming(&mut self) -> bool {
        self.send_with(SendMode::Streaming).await
    }

    pub async fn send_blocking(&mut self) -> bool {
        self.send_with(SendMode::Blocking).await
    }

    /// Run one exchange. Returns false when the submit was rejected (empty
    /// input or a request already in flight).
    pub async fn send_with(&mut self, mode: SendMode) -> bool {
        let Some(ticket) = self.begin_submit() else {
            return false;
        };

        let (question, history) = match self.active.as_mut() {
            Some(active) => (active.question.clone(), std::mem::take(&mut active.history)),
            None => return false,
        };

        // dropping this future mid-request abandons the request
        let mut guard = InFlight {
            widget: self,
            ticket,
        };

        let result = match mode {
            SendMode::Streaming => guard.widget.run_streaming(ticket, &question, &history).await,
            SendMode::Blocking => guard.widget.run_blocking(ticket, &question, &history).await,
        };

        if let Err(e) = result {
            guard.widget.fail_request(ticket, &e);
        }
        true
    }

    /// Give up on the request in flight, if any. See [`ChatWidget::abandon`].
    pub fn cancel(&mut self) -> bool {
        match self.active.as_ref().map(|active| active.ticket) {
            Some(ticket) => self.abandon(ticket),
            None => false,
        }
    }

    /// End the exchange for `ticket` without waiting for the backend: any
    /// partial reply is frozen, a cancellation notice closes the exchange
    /// and the widget returns to `Idle`.
    pub fn abandon(&mut self, ticket: Ticket) -> bool {
        if !self.is_active(ticket) {
            return false;
        }

        debug!("request abandoned in state {:?}", self.state);
        self.close_with_notice(prompts_builtin::CANCELLED_NOTICE);
        true
    }

    async fn run_streaming(
        &mut self,
        ticket: Ticket,
        question: &str,
        history: &[Turn],
    ) -> anyhow::Result<()> {
        self.begin_streaming(ticket);

        let backend = Arc::clone(&self.backend);
        let completion = backend.complete_streaming(question, history).await?;
        if let Some(ref error) = completion.error {
            warn!("LLM Streaming API Error: {}", error);
        }

        let mut stream = completion.stream;
        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => {
                    self.apply_fragment(ticket, &fragment);
                }
                Err(e) => {
                    self.fail_stream(ticket, &e);
                    return Ok(());
                }
            }
        }

        self.finish_stream(ticket);
        Ok(())
    }

    async fn run_blocking(
        &mut self,
        ticket: Ticket,
        question: &str,
        history: &[Turn],
    ) -> anyhow::Result<()> {
        self.begin_blocking(ticket);

        let backend = Arc::clone(&self.backend);
        let completion = backend.complete_once(question, history).await?;
        if let Some(ref error) = completion.error {
            warn!("LLM API Error: {}", error);
        }

        self.finish_blocking(ticket, completion.content);
        Ok(())
    }

    /// Accept the current input: user message and turn, input cleared,
    /// state `Sending`. `None` when the input is blank or a request is in
    /// flight; nothing changes then.
    pub fn begin_submit(&mut self) -> Option<Ticket> {
        if self.state.is_busy() {
            debug!("submit ignored, request in flight");
            return None;
        }

        let question = self.input.trim().to_string();
        if question.is_empty() {
            return None;
        }

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;

        let history = self.conversation.history();
        self.set_error(None);
        self.messages.push(DisplayMessage::user(question.clone()));
        self.conversation.push_user(question.clone());
        self.input.clear();
        self.active = Some(ActiveRequest {
            ticket,
            question,
            history,
            reply_id: None,
        });

        self.set_state(WidgetState::Sending);
        self.transcript_changed();
        Some(ticket)
    }

    /// Switch to `Streaming` and show an empty reply bubble
    pub fn begin_streaming(&mut self, ticket: Ticket) -> bool {
        if !self.is_active(ticket) || self.state != WidgetState::Sending {
            return false;
        }

        let placeholder = DisplayMessage::placeholder();
        if let Some(active) = self.active.as_mut() {
            active.reply_id = Some(placeholder.id());
        }
        self.messages.push(placeholder);

        self.set_state(WidgetState::Streaming);
        self.transcript_changed();
        true
    }

    pub fn begin_blocking(&mut self, ticket: Ticket) -> bool {
        if !self.is_active(ticket) || self.state != WidgetState::Sending {
            return false;
        }
        self.set_state(WidgetState::AwaitingBlocking);
        true
    }

    /// Append one fragment to the reply bubble
    pub fn apply_fragment(&mut self, ticket: Ticket, fragment: &str) -> bool {
        if !self.is_active(ticket) || self.state != WidgetState::Streaming {
            return false;
        }

        let applied = self
            .reply_mut()
            .map(|message| message.append(fragment))
            .unwrap_or(false);
        if applied {
            self.transcript_changed();
        }
        applied
    }

    /// Freeze the reply and record it as the assistant turn. A stream that
    /// produced no text is handled as a failed stream.
    pub fn finish_stream(&mut self, ticket: Ticket) -> bool {
        if !self.is_active(ticket) || self.state != WidgetState::Streaming {
            return false;
        }

        let content = self
            .reply_mut()
            .map(|message| {
                message.freeze();
                message.content().to_string()
            })
            .unwrap_or_default();

        if content.trim().is_empty() {
            return self.fail_stream(ticket, &ModelError::EmptyContent);
        }

        self.conversation.push_assistant(content);
        self.transcript_changed();
        self.complete();
        true
    }

    /// The stream broke off. Delivered text stays; a notice follows it.
    pub fn fail_stream(&mut self, ticket: Ticket, error: &ModelError) -> bool {
        if !self.is_active(ticket) || self.state != WidgetState::Streaming {
            return false;
        }

        warn!("Streaming error: {}", error);
        self.close_with_notice(prompts_builtin::STREAM_FAILURE_NOTICE);
        true
    }

    pub fn finish_blocking(&mut self, ticket: Ticket, content: impl Into<String>) -> bool {
        if !self.is_active(ticket) || self.state != WidgetState::AwaitingBlocking {
            return false;
        }

        let content = content.into();
        self.messages.push(DisplayMessage::assistant(content.clone()));
        self.conversation.push_assistant(content);
        self.transcript_changed();
        self.complete();
        true
    }

    /// Unexpected failure while serving the request: banner, notice, back
    /// to `Idle`.
    pub fn fail_request(&mut self, ticket: Ticket, err: &anyhow::Error) -> bool {
        if !self.is_active(ticket) {
            return false;
        }

        error!("AI Assistant error: {:#}", err);
        self.set_error(Some(prompts_builtin::ERROR_BANNER));
        self.close_with_notice(prompts_builtin::TECHNICAL_DIFFICULTY_NOTICE);
        true
    }

    fn is_active(&self, ticket: Ticket) -> bool {
        self.active
            .as_ref()
            .map_or(false, |active| active.ticket == ticket)
    }

    fn reply_mut(&mut self) -> Option<&mut DisplayMessage> {
        let id = self.active.as_ref()?.reply_id?;
        self.messages.iter_mut().rev().find(|message| message.id() == id)
    }

    // Keeps the history even: the assistant turn is the partial reply when
    // there is one, otherwise the notice itself.
    fn close_with_notice(&mut self, notice: &str) {
        let partial = self
            .reply_mut()
            .map(|message| {
                message.freeze();
                message.content().to_string()
            })
            .unwrap_or_default();

        if partial.trim().is_empty() {
            if let Some(id) = self.active.as_ref().and_then(|active| active.reply_id) {
                self.messages.retain(|message| message.id() != id);
            }
            self.conversation.push_assistant(notice);
        } else {
            self.conversation.push_assistant(partial);
        }

        self.messages.push(DisplayMessage::assistant(notice));
        self.transcript_changed();
        self.complete();
    }

    fn complete(&mut self) {
        self.active = None;
        self.set_state(WidgetState::Idle);
    }

    fn set_state(&mut self, state: WidgetState) {
        if self.state != state {
            self.state = state;
            self.view.state_changed(state);
        }
    }

    fn set_error(&mut self, error: Option<&str>) {
        if self.error.as_deref() == error {
            return;
        }
        self.error = error.map(str::to_string);
        self.view.error_changed(self.error.as_deref());
    }

    fn transcript_changed(&mut self) {
        self.view.transcript_changed(&self.messages);
        self.view.scroll_to_latest();
    }
}

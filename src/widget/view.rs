//! Rendering hooks
//!
//! The controller knows nothing about how it is drawn. A shell implements
//! [`WidgetView`] to repaint, scroll and move focus; every method has a no-op
//! default.

use super::message::DisplayMessage;
use super::WidgetState;

pub trait WidgetView: Send {
    /// The transcript changed (new message or a fragment appended)
    fn transcript_changed(&mut self, _messages: &[DisplayMessage]) {}

    /// Runs after every transcript change
    fn scroll_to_latest(&mut self) {}

    /// Runs whenever the widget becomes visible
    fn focus_input(&mut self) {}

    fn state_changed(&mut self, _state: WidgetState) {}

    /// The error banner was set or cleared
    fn error_changed(&mut self, _error: Option<&str>) {}

    fn visibility_changed(&mut self, _is_open: bool) {}
}

/// View that ignores everything
#[derive(Debug, Default)]
pub struct NoopView;

impl WidgetView for NoopView {}

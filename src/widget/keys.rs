//! Keyboard shortcuts

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Other,
}

/// A key press with the modifiers the widget cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyPress {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            key,
            ctrl: true,
            shift: false,
        }
    }

    pub fn shift(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Ctrl+K: open or close the widget
    Toggle,
    /// Escape while open
    Close,
    /// Enter without Shift while open: the shell should send the input
    Submit,
    Ignored,
}

/// Map a key press to a widget action
pub fn action_for(press: KeyPress, is_open: bool) -> KeyAction {
    match press.key {
        Key::Char(c) if press.ctrl && c.eq_ignore_ascii_case(&'k') => KeyAction::Toggle,
        Key::Escape if is_open => KeyAction::Close,
        Key::Enter if is_open && !press.shift => KeyAction::Submit,
        _ => KeyAction::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcuts() {
        assert_eq!(action_for(KeyPress::ctrl(Key::Char('k')), false), KeyAction::Toggle);
        assert_eq!(action_for(KeyPress::ctrl(Key::Char('K')), true), KeyAction::Toggle);
        assert_eq!(action_for(KeyPress::plain(Key::Char('k')), true), KeyAction::Ignored);
        assert_eq!(action_for(KeyPress::plain(Key::Escape), true), KeyAction::Close);
        assert_eq!(action_for(KeyPress::plain(Key::Escape), false), KeyAction::Ignored);
    }

    #[test]
    fn test_enter_submits_only_without_shift() {
        assert_eq!(action_for(KeyPress::plain(Key::Enter), true), KeyAction::Submit);
        assert_eq!(action_for(KeyPress::shift(Key::Enter), true), KeyAction::Ignored);
        assert_eq!(action_for(KeyPress::plain(Key::Enter), false), KeyAction::Ignored);
    }
}

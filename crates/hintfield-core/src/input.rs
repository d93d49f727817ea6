use crate::ViewId;

/// Keyboard and focus events a platform delivers to text inputs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Focus the input with this state key.
    Focus(ViewId),
    /// Drop focus from whatever is focused.
    Blur,
    /// Move focus to the next input in composition order (wraps).
    FocusNext,
    /// Committed text (typed characters, paste).
    Text(String),
    Backspace,
    Delete,
    Left { extend: bool },
    Right { extend: bool },
}

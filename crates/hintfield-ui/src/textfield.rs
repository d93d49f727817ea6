use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use hintfield_core::*;
use unicode_segmentation::UnicodeSegmentation;

fn prev_grapheme_boundary(text: &str, byte: usize) -> usize {
    let mut last = 0usize;
    for (i, _) in text.grapheme_indices(true) {
        if i >= byte {
            break;
        }
        last = i;
    }
    last
}

fn next_grapheme_boundary(text: &str, byte: usize) -> usize {
    for (i, _) in text.grapheme_indices(true) {
        if i > byte {
            return i;
        }
    }
    text.len()
}

fn clamp_to_char_boundary(s: &str, i: usize) -> usize {
    if i >= s.len() {
        return s.len();
    }
    let mut j = i;
    while j > 0 && !s.is_char_boundary(j) {
        j -= 1;
    }
    j
}

/// Editing state of one text input. Owned by the host, keyed by the input's state key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextFieldState {
    pub text: String,
    /// Byte range; `end` is the caret.
    pub selection: Range<usize>,
}

impl TextFieldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// State holding `text` with the caret at its end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let end = text.len();
        Self {
            text,
            selection: end..end,
        }
    }

    /// Replace the whole text, keeping the caret where it was when possible.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let start = clamp_to_char_boundary(&self.text, self.selection.start);
        let end = clamp_to_char_boundary(&self.text, self.selection.end);
        self.selection = start..end;
    }

    fn ordered_selection(&self) -> Range<usize> {
        let a = self.selection.start.min(self.text.len());
        let b = self.selection.end.min(self.text.len());
        a.min(b)..a.max(b)
    }

    pub fn insert_text(&mut self, text: &str) {
        let Range { start, end } = self.ordered_selection();
        self.text.replace_range(start..end, text);
        let new_pos = start + text.len();
        self.selection = new_pos..new_pos;
    }

    pub fn delete_backward(&mut self) {
        if self.selection.start == self.selection.end {
            let pos = self.selection.start.min(self.text.len());
            if pos > 0 {
                let prev = prev_grapheme_boundary(&self.text, pos);
                self.text.replace_range(prev..pos, "");
                self.selection = prev..prev;
            }
        } else {
            self.insert_text("");
        }
    }

    pub fn delete_forward(&mut self) {
        if self.selection.start == self.selection.end {
            let pos = self.selection.start.min(self.text.len());
            if pos < self.text.len() {
                let next = next_grapheme_boundary(&self.text, pos);
                self.text.replace_range(pos..next, "");
            }
        } else {
            self.insert_text("");
        }
    }

    pub fn move_cursor(&mut self, delta: isize, extend_selection: bool) {
        let mut pos = self.selection.end.min(self.text.len());
        if delta < 0 {
            for _ in 0..delta.unsigned_abs() {
                pos = prev_grapheme_boundary(&self.text, pos);
            }
        } else if delta > 0 {
            for _ in 0..(delta as usize) {
                pos = next_grapheme_boundary(&self.text, pos);
            }
        }
        if extend_selection {
            self.selection.end = pos;
        } else {
            self.selection = pos..pos;
        }
    }

    pub fn selected_text(&self) -> String {
        self.text[self.ordered_selection()].to_string()
    }

    pub fn caret_index(&self) -> usize {
        self.selection.end
    }
}

/// Maps the stored value to what gets painted. Never touches the stored text.
#[derive(Clone, Default)]
pub enum VisualTransformation {
    #[default]
    None,
    /// Every code point is painted as this character.
    Mask(char),
    Custom(Rc<dyn Fn(&str) -> String>),
}

impl VisualTransformation {
    pub const PASSWORD_MASK: char = '•';

    pub fn password() -> Self {
        VisualTransformation::Mask(Self::PASSWORD_MASK)
    }

    pub fn custom(f: impl Fn(&str) -> String + 'static) -> Self {
        VisualTransformation::Custom(Rc::new(f))
    }

    pub fn filter(&self, text: &str) -> String {
        match self {
            VisualTransformation::None => text.to_string(),
            VisualTransformation::Mask(c) => text.chars().map(|_| *c).collect(),
            VisualTransformation::Custom(f) => f(text),
        }
    }
}

impl fmt::Debug for VisualTransformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualTransformation::None => write!(f, "None"),
            VisualTransformation::Mask(c) => f.debug_tuple("Mask").field(c).finish(),
            VisualTransformation::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Single-line input without decoration. The host owns editing state under
/// `state_key`; `value` is what the caller currently holds.
#[allow(clippy::too_many_arguments)]
pub fn BasicTextField(
    state_key: ViewId,
    value: &str,
    focused: bool,
    style: TextStyle,
    visual: &VisualTransformation,
    label: Option<&str>,
    on_change: impl Fn(String) + 'static,
    on_focus_change: impl Fn(bool) + 'static,
) -> View {
    let mut semantics = Semantics::new(Role::TextField).focused(focused);
    if let Some(label) = label {
        semantics = semantics.label(label);
    }
    View::new(
        state_key,
        ViewKind::TextInput {
            state_key,
            value: value.to_string(),
            display: visual.filter(value),
            style,
            focused,
            on_change: Some(Rc::new(on_change)),
            on_focus_change: Some(Rc::new(on_focus_change)),
        },
    )
    .semantics(semantics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textfield_insert() {
        let mut state = TextFieldState::new();
        state.insert_text("Hello");
        assert_eq!(state.text, "Hello");
        assert_eq!(state.selection, 5..5);
    }

    #[test]
    fn test_textfield_delete_backward() {
        let mut state = TextFieldState::new();
        state.insert_text("Hello");
        state.delete_backward();
        assert_eq!(state.text, "Hell");
        assert_eq!(state.selection, 4..4);
    }

    #[test]
    fn test_textfield_delete_forward() {
        let mut state = TextFieldState::with_text("Hello");
        state.move_cursor(-5, false);
        state.delete_forward();
        assert_eq!(state.text, "ello");
        assert_eq!(state.caret_index(), 0);
    }

    #[test]
    fn test_textfield_selection() {
        let mut state = TextFieldState::new();
        state.insert_text("Hello World");
        state.selection = 0..5;
        assert_eq!(state.selected_text(), "Hello");
        state.insert_text("Hi");
        assert_eq!(state.text, "Hi World");
        assert_eq!(state.selection, 2..2);
    }

    #[test]
    fn test_backward_selection_replaces() {
        let mut state = TextFieldState::with_text("abcd");
        state.move_cursor(-2, true);
        assert_eq!(state.selected_text(), "cd");
        state.delete_backward();
        assert_eq!(state.text, "ab");
    }

    #[test]
    fn test_textfield_cursor_movement() {
        let mut state = TextFieldState::new();
        state.insert_text("Hello");
        state.move_cursor(-2, false);
        assert_eq!(state.selection, 3..3);

        state.move_cursor(1, false);
        assert_eq!(state.selection, 4..4);
    }

    #[test]
    fn test_grapheme_delete_and_move() {
        // thumbs up + skin tone is one cluster
        let mut st = TextFieldState::new();
        st.insert_text("A\u{1F44D}\u{1F3FD}B");
        st.move_cursor(-1, false);
        assert_eq!(st.selection.end, "A\u{1F44D}\u{1F3FD}".len());
        st.delete_backward();
        assert_eq!(st.text, "AB");
        assert_eq!(st.selection, "A".len().."A".len());
    }

    #[test]
    fn test_set_text_clamps_caret() {
        let mut st = TextFieldState::with_text("héllo");
        st.set_text("hé");
        assert!(st.text.is_char_boundary(st.caret_index()));
        assert!(st.caret_index() <= st.text.len());
    }

    #[test]
    fn test_password_masks_every_code_point() {
        let vt = VisualTransformation::password();
        assert_eq!(vt.filter("abc"), "•••");
        assert_eq!(vt.filter("é\u{1F44D}"), "••");
        assert_eq!(vt.filter(""), "");
        assert_eq!(VisualTransformation::None.filter("abc"), "abc");
    }

    #[test]
    fn test_custom_transformation() {
        let vt = VisualTransformation::custom(|s| s.to_uppercase());
        assert_eq!(vt.filter("abc"), "ABC");
    }

    #[test]
    fn test_basic_text_field_keeps_value_and_display_apart() {
        let v = BasicTextField(
            7,
            "abc",
            true,
            TextStyle::default(),
            &VisualTransformation::password(),
            Some("name"),
            |_| {},
            |_| {},
        );
        match &v.kind {
            ViewKind::TextInput {
                state_key,
                value,
                display,
                focused,
                ..
            } => {
                assert_eq!(*state_key, 7);
                assert_eq!(value, "abc");
                assert_eq!(display, "•••");
                assert!(*focused);
            }
            other => panic!("expected input, got {other:?}"),
        }
        let sem = v.semantics.as_ref().unwrap();
        assert_eq!(sem.role, Role::TextField);
        assert_eq!(sem.label.as_deref(), Some("name"));
    }
}

//! Text field whose hint moves out of the box once the field is in use.
//!
//! While the field is empty and unfocused the hint is painted inside the box,
//! faint, in the same type style as typed text. On focus, or as soon as there
//! is text, the hint is painted above the box as a small bold label. Each hint
//! letter is its own shared node, so the swap animates letter by letter
//! instead of cutting.

use std::rc::Rc;

use hintfield_core::*;

use crate::letters::AnimatedLetters;
use crate::shared::{AnimatedContent, SharedTransitionLayout};
use crate::textfield::{BasicTextField, VisualTransformation};
use crate::{Box, Column, ViewExt};

pub const DEFAULT_HINT: &str = "hint";

const LABEL_START_PADDING_DP: f32 = 2.0;
const LABEL_SPACING_DP: f32 = 2.0;
const INPUT_MIN_WIDTH_DP: f32 = 300.0;
const INPUT_RADIUS_DP: f32 = 10.0;
const INPUT_PADDING_H_DP: f32 = 10.0;
const INPUT_PADDING_V_DP: f32 = 8.0;

/// Per-instance state: the text, the focus flag, and whether the hint sits above.
pub struct HintedTextFieldState {
    instance: u64,
    text: Signal<String>,
    focused: Signal<bool>,
    show_hint_above: Derived<bool>,
}

impl HintedTextFieldState {
    pub fn new() -> Self {
        let instance = next_instance_id();
        let text = signal(String::new());
        let focused = signal(false);
        let show_hint_above = derived_state_of({
            let (text, focused) = (text.clone(), focused.clone());
            move || focused.get() || !text.with(String::is_empty)
        });
        show_hint_above.signal().subscribe(move |above| {
            log::debug!(
                "hinted_text_field_{instance}: hint {}",
                if *above { "above" } else { "inside" }
            );
        });
        Self {
            instance,
            text,
            focused,
            show_hint_above,
        }
    }

    /// State key of the inner text input; stable for the life of the instance.
    pub fn input_key(&self) -> ViewId {
        self.instance
    }

    /// Namespace for this instance's shared keys.
    pub fn shared_key(&self) -> String {
        format!("hinted_text_field_{}", self.instance)
    }

    pub fn text(&self) -> String {
        self.text.get()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.text.set(text.into());
    }

    pub fn is_focused(&self) -> bool {
        self.focused.get()
    }

    pub fn set_focused(&self, focused: bool) {
        self.focused.set(focused);
    }

    pub fn show_hint_above(&self) -> bool {
        self.show_hint_above.get()
    }
}

impl Default for HintedTextFieldState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn remember_hinted_text_field_state() -> Rc<HintedTextFieldState> {
    remember(HintedTextFieldState::new)
}

fn text_field_text_style() -> TextStyle {
    TextStyle::default()
        .font_size(14.0)
        .font_weight(FontWeight::Normal)
        .color(theme().on_surface.copy_alpha(0.9))
}

fn interior_hint_style() -> TextStyle {
    text_field_text_style().color(theme().on_surface.copy_alpha(0.4))
}

fn exterior_hint_style() -> TextStyle {
    TextStyle::default()
        .font_size(12.0)
        .font_weight(FontWeight::Bold)
        .color(theme().hint_label)
}

/// The hinted field driven by caller-held state.
pub fn HintedTextFieldWithState(
    state: &HintedTextFieldState,
    modifier: Modifier,
    hint: &str,
    visual_transformation: &VisualTransformation,
) -> View {
    let above = state.show_hint_above();
    let value = state.text();
    let focused = state.is_focused();
    let input_key = state.input_key();
    let on_change = {
        let text = state.text.clone();
        move |s: String| text.set(s)
    };
    let on_focus_change = {
        let f = state.focused.clone();
        move |v: bool| f.set(v)
    };

    SharedTransitionLayout(state.shared_key(), |scope| {
        AnimatedContent("hintAnimation", above, |above| {
            let t = theme();
            let hairline = 1.0 / density().scale.max(f32::EPSILON);

            // The label slot is always composed; it is empty while the hint is inside.
            let exterior = above
                .then(|| AnimatedLetters(scope, hint, exterior_hint_style(), Modifier::new()));
            let label = Box(Modifier::new().padding_start(LABEL_START_PADDING_DP)).child(exterior);

            let interior = (!above)
                .then(|| AnimatedLetters(scope, hint, interior_hint_style(), Modifier::new()));
            let input = BasicTextField(
                input_key,
                &value,
                focused,
                text_field_text_style(),
                visual_transformation,
                Some(hint),
                on_change,
                on_focus_change,
            );

            Column(modifier).child((
                label,
                Box(Modifier::new().height(LABEL_SPACING_DP)),
                Box(Modifier::new()
                    .shared_element(scope.key("input"))
                    .min_width(INPUT_MIN_WIDTH_DP)
                    .background_rounded(t.surface, INPUT_RADIUS_DP)
                    .border(hairline, t.on_surface.copy_alpha(0.3), INPUT_RADIUS_DP)
                    .padding_symmetric(INPUT_PADDING_H_DP, INPUT_PADDING_V_DP)
                    .align_items(AlignItems::Center))
                .child((interior, input)),
            ))
        })
    })
}

/// Text field with an animated hint. Owns its state for as long as the call
/// site stays composed.
pub fn HintedTextField(
    modifier: Modifier,
    hint: &str,
    visual_transformation: &VisualTransformation,
) -> View {
    let state = remember_hinted_text_field_state();
    HintedTextFieldWithState(&state, modifier, hint, visual_transformation)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Letter {
        key: String,
        text: String,
        size: f32,
    }

    fn letters(root: &View) -> Vec<Letter> {
        let mut out = Vec::new();
        root.walk(&mut |v| {
            if let (Some(shared), ViewKind::Text { text, style }) = (&v.modifier.shared, &v.kind)
                && shared.key.contains("/hint_")
            {
                out.push(Letter {
                    key: shared.key.clone(),
                    text: text.clone(),
                    size: style.font_size,
                });
            }
        });
        out
    }

    fn spelled(ls: &[Letter]) -> String {
        ls.iter().map(|l| l.text.as_str()).collect()
    }

    fn input_of(root: &View) -> (ViewId, String, String) {
        let mut found = None;
        root.walk(&mut |v| {
            if let ViewKind::TextInput {
                state_key,
                value,
                display,
                ..
            } = &v.kind
            {
                found = Some((*state_key, value.clone(), display.clone()));
            }
        });
        found.expect("text input in tree")
    }

    fn frame(
        build: impl FnOnce(&HintedTextFieldState) -> View,
    ) -> (Rc<HintedTextFieldState>, View) {
        let _g = ComposeGuard::begin();
        let state = remember_hinted_text_field_state();
        let view = build(&state);
        (state, view)
    }

    fn field(state: &HintedTextFieldState, hint: &str) -> View {
        HintedTextFieldWithState(state, Modifier::new(), hint, &VisualTransformation::None)
    }

    #[test]
    fn display_mode_follows_focus_or_text() {
        let state = HintedTextFieldState::new();
        for (text, focused) in [("", false), ("", true), ("a", false), ("a", true)] {
            state.set_text(text);
            state.set_focused(focused);
            assert_eq!(state.show_hint_above(), focused || !text.is_empty());
        }
    }

    #[test]
    fn unfocused_empty_field_shows_hint_inside() {
        let (_, view) = frame(|s| field(s, "name"));
        let ls = letters(&view);
        assert_eq!(spelled(&ls), "name");
        assert!(ls.iter().all(|l| l.size == 14.0));
    }

    #[test]
    fn focused_field_shows_hint_above_only() {
        let (state, _) = frame(|s| field(s, "name"));
        state.set_focused(true);
        let (_, view) = frame(|s| field(s, "name"));
        let ls = letters(&view);
        assert_eq!(spelled(&ls), "name");
        assert!(ls.iter().all(|l| l.size == 12.0));
        assert_eq!(view.children.len(), 3);
    }

    #[test]
    fn label_slot_is_composed_in_both_modes() {
        let (state, inside) = frame(|s| field(s, "name"));
        assert_eq!(inside.children.len(), 3);
        assert!(inside.children[0].children.is_empty());

        let input_y = |v: &View| -> f32 {
            let laid = crate::layout::layout(v, (800, 600)).unwrap();
            laid.children[2].rect.y
        };
        let y_inside = input_y(&inside);
        assert!((y_inside - LABEL_SPACING_DP).abs() < 1e-3);

        state.set_focused(true);
        let (_, above) = frame(|s| field(s, "name"));
        let label_h = crate::text_line_height_px(sp_to_px(12.0));
        assert!((input_y(&above) - y_inside - label_h).abs() < 1e-3);
    }

    #[test]
    fn field_on_a_worker_thread_tears_down_cleanly() {
        let handle = std::thread::spawn(|| {
            let _g = ComposeGuard::begin();
            let view = HintedTextField(Modifier::new(), "name", &VisualTransformation::password());
            assert_eq!(spelled(&letters(&view)), "name");
        });
        assert!(handle.join().is_ok());
    }

    #[test]
    fn letter_keys_survive_the_flip() {
        let (state, inside) = frame(|s| field(s, "name"));
        state.set_text("x");
        let (_, above) = frame(|s| field(s, "name"));
        let a: Vec<String> = letters(&inside).into_iter().map(|l| l.key).collect();
        let b: Vec<String> = letters(&above).into_iter().map(|l| l.key).collect();
        assert_eq!(a, b);
        assert!(a[0].ends_with("/hint_0"));
    }

    #[test]
    fn empty_hint_renders_no_letters() {
        let (_, view) = frame(|s| field(s, ""));
        assert!(letters(&view).is_empty());
    }

    #[test]
    fn input_box_is_shared_element() {
        let (state, view) = frame(|s| field(s, "name"));
        let key = format!("{}/input", state.shared_key());
        let node = view.find_shared(&key).expect("input box");
        assert_eq!(node.modifier.shared.as_ref().unwrap().kind, SharedKind::Element);
        assert_eq!(node.modifier.min_width, Some(300.0));
    }

    #[test]
    fn masking_applies_to_display_only() {
        let (state, _) = frame(|s| field(s, "password"));
        state.set_text("abc");
        let (_, view) = frame(|s| {
            HintedTextFieldWithState(
                s,
                Modifier::new(),
                "password",
                &VisualTransformation::password(),
            )
        });
        let (_, value, display) = input_of(&view);
        assert_eq!(value, "abc");
        assert_eq!(display, "•••");
        assert_eq!(state.text(), "abc");
    }

    #[test]
    fn input_callbacks_write_state() {
        let (state, view) = frame(|s| field(s, "name"));
        let mut cbs = None;
        view.walk(&mut |v| {
            if let ViewKind::TextInput {
                on_change,
                on_focus_change,
                ..
            } = &v.kind
            {
                cbs = Some((on_change.clone(), on_focus_change.clone()));
            }
        });
        let (on_change, on_focus) = cbs.unwrap();
        on_focus.unwrap()(true);
        assert!(state.is_focused());
        on_change.unwrap()("hello".into());
        assert_eq!(state.text(), "hello");
        assert!(state.show_hint_above());
    }

    #[test]
    fn self_owned_state_is_stable_across_frames() {
        let key_of = |v: &View| input_of(v).0;
        let a = {
            let _g = ComposeGuard::begin();
            HintedTextField(Modifier::new(), DEFAULT_HINT, &VisualTransformation::None)
        };
        let b = {
            let _g = ComposeGuard::begin();
            HintedTextField(Modifier::new(), DEFAULT_HINT, &VisualTransformation::None)
        };
        assert_eq!(key_of(&a), key_of(&b));
        assert_eq!(spelled(&letters(&a)), "hint");
    }

    #[test]
    fn exterior_hint_uses_label_color() {
        let (state, _) = frame(|s| field(s, "n"));
        state.set_focused(true);
        let (_, view) = frame(|s| field(s, "n"));
        let mut color = None;
        view.walk(&mut |v| {
            if let ViewKind::Text { style, .. } = &v.kind {
                color = Some(style.color);
            }
        });
        assert_eq!(color, Some(theme().hint_label));
    }
}

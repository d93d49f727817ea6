#![allow(non_snake_case)]
//! Widgets, layout and the hinted text field.

pub mod hinted;
pub mod layout;
pub mod letters;
pub mod shared;
pub mod textfield;

use hintfield_core::*;

pub use hinted::{
    DEFAULT_HINT, HintedTextField, HintedTextFieldState, HintedTextFieldWithState,
    remember_hinted_text_field_state,
};
pub use layout::{layout_and_paint, text_line_height_px, text_width_px};
pub use letters::{AnimatedLetters, LetterUnit, letter_spring, letter_units};
pub use shared::{AnimatedContent, SharedTransitionLayout, SharedTransitionScope, SharedTransitions};
pub use textfield::{BasicTextField, TextFieldState, VisualTransformation};

/// Children overlap, aligned by the modifier (start/top by default).
pub fn Box(modifier: Modifier) -> View {
    View::new(0, ViewKind::Box).modifier(modifier)
}

pub fn Row(modifier: Modifier) -> View {
    View::new(0, ViewKind::Row).modifier(modifier)
}

pub fn Column(modifier: Modifier) -> View {
    View::new(0, ViewKind::Column).modifier(modifier)
}

pub fn Text(text: impl Into<String>) -> View {
    View::new(
        0,
        ViewKind::Text {
            text: text.into(),
            style: TextStyle::default(),
        },
    )
}

pub trait TextStyleExt {
    fn text_style(self, style: TextStyle) -> View;
}

impl TextStyleExt for View {
    fn text_style(mut self, style: TextStyle) -> View {
        if let ViewKind::Text { style: s, .. } = &mut self.kind {
            *s = style;
        }
        self
    }
}

/// Extension trait for child building
pub trait ViewExt: Sized {
    fn child(self, children: impl IntoChildren) -> Self;
}

impl ViewExt for View {
    fn child(mut self, children: impl IntoChildren) -> Self {
        self.children.extend(children.into_children());
        self
    }
}

pub trait IntoChildren {
    fn into_children(self) -> Vec<View>;
}

impl IntoChildren for View {
    fn into_children(self) -> Vec<View> {
        vec![self]
    }
}

impl IntoChildren for Vec<View> {
    fn into_children(self) -> Vec<View> {
        self
    }
}

impl IntoChildren for Option<View> {
    fn into_children(self) -> Vec<View> {
        self.into_iter().collect()
    }
}

impl<const N: usize> IntoChildren for [View; N] {
    fn into_children(self) -> Vec<View> {
        self.into()
    }
}

// Tuple implementations
macro_rules! impl_into_children_tuple {
    ($($idx:tt $t:ident),+) => {
        impl<$($t: IntoChildren),+> IntoChildren for ($($t,)+) {
            fn into_children(self) -> Vec<View> {
                let mut v = Vec::new();
                $(v.extend(self.$idx.into_children());)+
                v
            }
        }
    };
}

impl_into_children_tuple!(0 A, 1 B);
impl_into_children_tuple!(0 A, 1 B, 2 C);
impl_into_children_tuple!(0 A, 1 B, 2 C, 3 D);

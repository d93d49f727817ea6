//! Per-letter shared bounds.
//!
//! Every letter of a string becomes its own shared node, so when the same
//! string is composed somewhere else each letter travels on its own spring.
//! Earlier letters get stiffer springs and arrive first.

use hintfield_core::animation::{SpringSpec, damping};
use hintfield_core::*;

use crate::shared::SharedTransitionScope;
use crate::{Row, Text, TextStyleExt, ViewExt};

pub const LETTER_BASE_STIFFNESS: f32 = 25.0;
pub const LETTER_DAMPING_RATIO: f32 = damping::LOW_BOUNCY;

#[derive(Clone, Debug, PartialEq)]
pub struct LetterUnit {
    pub index: usize,
    pub letter: char,
    /// Unqualified key; qualify with `SharedTransitionScope::key`.
    pub key: String,
    pub spec: SpringSpec,
}

/// Spring for letter `index` of a `len`-letter string.
pub fn letter_spring(index: usize, len: usize) -> SpringSpec {
    let rank = len.saturating_sub(index) as f32;
    SpringSpec::new(LETTER_DAMPING_RATIO, LETTER_BASE_STIFFNESS * rank)
}

/// Splits `text` into one unit per code point.
pub fn letter_units(text: &str) -> Vec<LetterUnit> {
    let len = text.chars().count();
    text.chars()
        .enumerate()
        .map(|(index, letter)| LetterUnit {
            index,
            letter,
            key: format!("hint_{index}"),
            spec: letter_spring(index, len),
        })
        .collect()
}

/// Lays the letters of `text` out in a row, each tagged as a shared node in `scope`.
pub fn AnimatedLetters(
    scope: &SharedTransitionScope,
    text: &str,
    style: TextStyle,
    modifier: Modifier,
) -> View {
    let letters: Vec<View> = letter_units(text)
        .into_iter()
        .map(|u| {
            Text(u.letter.to_string())
                .text_style(style)
                .modifier(Modifier::new().shared_bounds(scope.key(&u.key), u.spec))
        })
        .collect();
    Row(modifier).child(letters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_unit_per_letter() {
        let units = letter_units("name");
        assert_eq!(units.len(), 4);
        assert_eq!(
            units.iter().map(|u| u.letter).collect::<String>(),
            "name"
        );
        assert_eq!(units[2].key, "hint_2");
    }

    #[test]
    fn stiffness_falls_with_index() {
        let units = letter_units("name");
        let k: Vec<f32> = units.iter().map(|u| u.spec.stiffness).collect();
        assert_eq!(k, vec![100.0, 75.0, 50.0, 25.0]);
        assert!(units.iter().all(|u| u.spec.damping_ratio == 0.75));
        assert!(k.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn last_letter_gets_base_stiffness() {
        assert_eq!(letter_spring(0, 1).stiffness, LETTER_BASE_STIFFNESS);
        assert_eq!(letter_spring(9, 10).stiffness, LETTER_BASE_STIFFNESS);
    }

    #[test]
    fn empty_text_has_no_letters() {
        assert!(letter_units("").is_empty());
        let row = AnimatedLetters(
            &SharedTransitionScope::new("s"),
            "",
            TextStyle::default(),
            Modifier::new(),
        );
        assert!(row.children.is_empty());
    }

    #[test]
    fn letters_are_keyed_in_scope() {
        let scope = SharedTransitionScope::new("field_3");
        let style = TextStyle::default().font_size(12.0);
        let row = AnimatedLetters(&scope, "ab", style, Modifier::new());
        assert_eq!(row.children.len(), 2);
        let shared = row.children[1].modifier.shared.as_ref().unwrap();
        assert_eq!(shared.key, "field_3/hint_1");
        assert_eq!(shared.kind, SharedKind::Bounds);
        assert_eq!(shared.spec.stiffness, 25.0);
        match &row.children[0].kind {
            ViewKind::Text { text, style: s } => {
                assert_eq!(text, "a");
                assert_eq!(s.font_size, 12.0);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }
}

use crate::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FontWeight {
    Light,
    #[default]
    Normal,
    Medium,
    Bold,
}

/// Resolved text appearance. `font_size` is in sp (scaled by density and text scale at layout).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            font_weight: FontWeight::Normal,
            color: Color::WHITE,
        }
    }
}

impl TextStyle {
    pub fn font_size(mut self, sp: f32) -> Self {
        self.font_size = sp;
        self
    }
    pub fn font_weight(mut self, w: FontWeight) -> Self {
        self.font_weight = w;
        self
    }
    pub fn color(mut self, c: Color) -> Self {
        self.color = c;
        self
    }
}

/// Type scale exposed to widgets through `typography()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Typography {
    pub body_large: TextStyle,
    pub label_large: TextStyle,
    pub label_small: TextStyle,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            body_large: TextStyle::default(),
            label_large: TextStyle {
                font_size: 14.0,
                font_weight: FontWeight::Medium,
                color: Color::WHITE,
            },
            label_small: TextStyle {
                font_size: 11.0,
                font_weight: FontWeight::Medium,
                color: Color::WHITE,
            },
        }
    }
}

use taffy::AlignItems;

use crate::{Color, animation::SpringSpec};

#[derive(Clone, Debug, PartialEq)]
pub struct Border {
    pub width: f32,
    pub color: Color,
    pub radius: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PaddingValues {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

/// How a shared node participates in transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SharedKind {
    /// Same content in both states; only bounds move.
    Element,
    /// Content may differ between states (e.g. text style); bounds and style interpolate.
    Bounds,
}

/// Identity of a node across frames for bounds transitions.
#[derive(Clone, Debug, PartialEq)]
pub struct SharedElement {
    pub key: String,
    pub kind: SharedKind,
    pub spec: SpringSpec,
}

#[derive(Clone, Debug, Default)]
pub struct Modifier {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub fill_max_w: bool,
    pub padding: Option<f32>,
    pub padding_values: Option<PaddingValues>,
    pub min_width: Option<f32>,
    pub background: Option<Color>,
    pub background_radius: f32,
    pub border: Option<Border>,
    pub align_items_container: Option<AlignItems>,
    pub shared: Option<SharedElement>,
}

impl Modifier {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn width(mut self, w: f32) -> Self {
        self.width = Some(w);
        self
    }
    pub fn height(mut self, h: f32) -> Self {
        self.height = Some(h);
        self
    }
    pub fn fill_max_width(mut self) -> Self {
        self.fill_max_w = true;
        self
    }
    pub fn padding(mut self, v: f32) -> Self {
        self.padding = Some(v);
        self
    }
    pub fn padding_values(mut self, padding: PaddingValues) -> Self {
        self.padding_values = Some(padding);
        self
    }
    pub fn padding_start(self, v: f32) -> Self {
        self.padding_values(PaddingValues {
            left: v,
            ..Default::default()
        })
    }
    pub fn padding_symmetric(self, horizontal: f32, vertical: f32) -> Self {
        self.padding_values(PaddingValues {
            left: horizontal,
            right: horizontal,
            top: vertical,
            bottom: vertical,
        })
    }
    pub fn min_width(mut self, w: f32) -> Self {
        self.min_width = Some(w);
        self
    }
    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
    pub fn background_rounded(mut self, color: Color, radius: f32) -> Self {
        self.background = Some(color);
        self.background_radius = radius;
        self
    }
    pub fn border(mut self, width: f32, color: Color, radius: f32) -> Self {
        self.border = Some(Border {
            width,
            color,
            radius,
        });
        self
    }
    pub fn align_items(mut self, a: AlignItems) -> Self {
        self.align_items_container = Some(a);
        self
    }
    /// Shared element: same content in both states, only the bounds move.
    pub fn shared_element(mut self, key: impl Into<String>) -> Self {
        self.shared = Some(SharedElement {
            key: key.into(),
            kind: SharedKind::Element,
            spec: SpringSpec::default(),
        });
        self
    }
    /// Shared bounds with a custom spring; content style is interpolated too.
    pub fn shared_bounds(mut self, key: impl Into<String>, spec: SpringSpec) -> Self {
        self.shared = Some(SharedElement {
            key: key.into(),
            kind: SharedKind::Bounds,
            spec,
        });
        self
    }
}

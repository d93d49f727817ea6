use crate::{Color, Modifier, Rect, TextStyle};
use std::rc::Rc;

pub type ViewId = u64;

pub type TextCallback = Rc<dyn Fn(String)>;
pub type FocusCallback = Rc<dyn Fn(bool)>;

#[derive(Clone)]
pub enum ViewKind {
    /// Children overlap in a single cell.
    Box,
    Row,
    Column,
    Text {
        text: String,
        style: TextStyle,
    },
    /// Editable single-line input. `value` is the stored text, `display` what gets painted.
    TextInput {
        state_key: ViewId,
        value: String,
        display: String,
        style: TextStyle,
        focused: bool,
        on_change: Option<TextCallback>,
        on_focus_change: Option<FocusCallback>,
    },
}

impl std::fmt::Debug for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Box => write!(f, "Box"),
            ViewKind::Row => write!(f, "Row"),
            ViewKind::Column => write!(f, "Column"),
            ViewKind::Text { text, style } => f
                .debug_struct("Text")
                .field("text", text)
                .field("style", style)
                .finish(),
            ViewKind::TextInput {
                state_key,
                value,
                display,
                style,
                focused,
                ..
            } => f
                .debug_struct("TextInput")
                .field("state_key", state_key)
                .field("value", value)
                .field("display", display)
                .field("style", style)
                .field("focused", focused)
                .finish(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct View {
    pub id: ViewId,
    pub kind: ViewKind,
    pub modifier: Modifier,
    pub children: Vec<View>,
    pub semantics: Option<crate::semantics::Semantics>,
}

impl View {
    pub fn new(id: ViewId, kind: ViewKind) -> Self {
        View {
            id,
            kind,
            modifier: Modifier::default(),
            children: vec![],
            semantics: None,
        }
    }
    pub fn modifier(mut self, m: Modifier) -> Self {
        self.modifier = m;
        self
    }
    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
    pub fn semantics(mut self, s: crate::semantics::Semantics) -> Self {
        self.semantics = Some(s);
        self
    }

    /// Depth-first, pre-order walk over this view and its descendants.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a View)) {
        f(self);
        for c in &self.children {
            c.walk(f);
        }
    }

    /// First node in pre-order whose shared key equals `key`.
    pub fn find_shared(&self, key: &str) -> Option<&View> {
        if self
            .modifier
            .shared
            .as_ref()
            .is_some_and(|s| s.key == key)
        {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_shared(key))
    }
}

/// Renderable scene
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub clear_color: Color,
    pub nodes: Vec<SceneNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Rect {
        rect: Rect,
        color: Color,
        radius: f32,
    },
    Border {
        rect: Rect,
        color: Color,
        width: f32,
        radius: f32,
    },
    Text {
        rect: Rect,
        text: String,
        color: Color,
        size: f32,
    },
}

impl Scene {
    /// Text runs in paint order.
    pub fn texts(&self) -> impl Iterator<Item = (&Rect, &str)> {
        self.nodes.iter().filter_map(|n| match n {
            SceneNode::Text { rect, text, .. } => Some((rect, text.as_str())),
            _ => None,
        })
    }
}

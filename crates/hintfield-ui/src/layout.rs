//! Taffy layout and paint.
//!
//! Layout runs on the composed `View` tree and yields absolute px rects.
//! Before painting, every shared node's rect is handed to `SharedTransitions`
//! and the animated bounds it returns are what gets drawn.

use std::collections::HashMap;

use hintfield_core::*;
use taffy::prelude::{
    AvailableSpace, Display, FlexDirection, GridPlacement, Line, NodeId, Style, TaffyTree, flex,
    length, line, percent,
};
use taffy::style::GridTemplateComponent;

use crate::shared::{SharedTarget, SharedTransitions, TextLook};
use crate::textfield::TextFieldState;

/// Glyph advance estimate used for measurement (no shaping here).
const ADVANCE_EM: f32 = 0.6;
const LINE_HEIGHT_EM: f32 = 1.3;
const CARET_WIDTH_DP: f32 = 1.5;

pub fn text_width_px(text: &str, size_px: f32) -> f32 {
    text.chars().count() as f32 * size_px * ADVANCE_EM
}

pub fn text_line_height_px(size_px: f32) -> f32 {
    size_px * LINE_HEIGHT_EM
}

/// Caret position counted in painted characters. Editing state that no longer
/// matches the value puts the caret at the end.
fn caret_chars(state: Option<&TextFieldState>, value: &str, display: &str) -> usize {
    let n = state
        .filter(|st| st.text == value)
        .and_then(|st| st.text.get(..st.caret_index()))
        .map_or_else(|| value.chars().count(), |before| before.chars().count());
    n.min(display.chars().count())
}

#[derive(Clone)]
enum NodeCtx {
    Text { text: String, size_px: f32 },
    Container,
}

/// A view with its absolute layout rect (px).
pub struct LayoutNode<'v> {
    pub view: &'v View,
    pub rect: Rect,
    pub children: Vec<LayoutNode<'v>>,
}

impl<'v> LayoutNode<'v> {
    pub fn walk(&self, f: &mut impl FnMut(&LayoutNode<'v>)) {
        f(self);
        for c in &self.children {
            c.walk(f);
        }
    }
}

fn style_from_modifier(m: &Modifier, kind: &ViewKind, in_box: bool) -> Style {
    let px = |dp_val: f32| dp_to_px(dp_val);
    let mut s = Style::default();

    match kind {
        ViewKind::Row => {
            s.display = Display::Flex;
            s.flex_direction = FlexDirection::Row;
            s.align_items = Some(AlignItems::FlexStart);
        }
        ViewKind::Column => {
            s.display = Display::Flex;
            s.flex_direction = FlexDirection::Column;
            s.align_items = Some(AlignItems::Stretch);
        }
        ViewKind::Box => {
            // One cell; every child is placed into it.
            s.display = Display::Grid;
            s.grid_template_columns = vec![GridTemplateComponent::Single(flex(1.0))];
            s.align_items = Some(AlignItems::Start);
        }
        ViewKind::Text { .. } | ViewKind::TextInput { .. } => {
            s.display = Display::Block;
        }
    }
    s.justify_content = Some(JustifyContent::FlexStart);

    if in_box {
        s.grid_row = Line {
            start: line(1),
            end: GridPlacement::Span(1),
        };
        s.grid_column = Line {
            start: line(1),
            end: GridPlacement::Span(1),
        };
    }

    if let Some(a) = m.align_items_container {
        s.align_items = Some(a);
    }

    // dp padding, per side when given
    if let Some(pv_dp) = m.padding_values {
        s.padding = taffy::geometry::Rect {
            left: length(px(pv_dp.left)),
            right: length(px(pv_dp.right)),
            top: length(px(pv_dp.top)),
            bottom: length(px(pv_dp.bottom)),
        };
    } else if let Some(p_dp) = m.padding {
        let v = length(px(p_dp));
        s.padding = taffy::geometry::Rect {
            left: v,
            right: v,
            top: v,
            bottom: v,
        };
    }

    // Explicit size
    if let Some(w_dp) = m.width {
        s.size.width = length(px(w_dp.max(0.0)));
    }
    if let Some(h_dp) = m.height {
        s.size.height = length(px(h_dp.max(0.0)));
    }
    if m.fill_max_w && m.width.is_none() {
        s.min_size.width = percent(1.0);
        s.max_size.width = percent(1.0);
    }

    // user min clamps
    if let Some(v_dp) = m.min_width {
        s.min_size.width = length(px(v_dp.max(0.0)));
    }

    s
}

fn build_node(v: &View, in_box: bool, t: &mut TaffyTree<NodeCtx>) -> UiResult<NodeId> {
    let style = style_from_modifier(&v.modifier, &v.kind, in_box);
    let node = match &v.kind {
        ViewKind::Text { text, style: ts } => t.new_leaf_with_context(
            style,
            NodeCtx::Text {
                text: text.clone(),
                size_px: sp_to_px(ts.font_size),
            },
        )?,
        ViewKind::TextInput {
            display, style: ts, ..
        } => t.new_leaf_with_context(
            style,
            NodeCtx::Text {
                text: display.clone(),
                size_px: sp_to_px(ts.font_size),
            },
        )?,
        kind => {
            let child_in_box = matches!(kind, ViewKind::Box);
            let children = v
                .children
                .iter()
                .map(|c| build_node(c, child_in_box, t))
                .collect::<UiResult<Vec<_>>>()?;
            let n = t.new_with_children(style, &children)?;
            t.set_node_context(n, Some(NodeCtx::Container))?;
            n
        }
    };
    Ok(node)
}

/// Lay out `root` inside a window of `size_px` and return absolute rects.
pub fn layout(root: &View, size_px: (u32, u32)) -> UiResult<LayoutNode<'_>> {
    let mut taffy: TaffyTree<NodeCtx> = TaffyTree::new();
    let root_node = build_node(root, false, &mut taffy)?;

    {
        let mut rs = taffy.style(root_node)?.clone();
        rs.size.width = length(size_px.0 as f32);
        rs.size.height = length(size_px.1 as f32);
        taffy.set_style(root_node, rs)?;
    }

    let available = taffy::geometry::Size {
        width: AvailableSpace::Definite(size_px.0 as f32),
        height: AvailableSpace::Definite(size_px.1 as f32),
    };

    // Leaves measure by char count; containers by their children
    taffy.compute_layout_with_measure(
        root_node,
        available,
        |known, _avail, _node, ctx, _style| match ctx {
            Some(NodeCtx::Text { text, size_px }) => taffy::geometry::Size {
                width: known.width.unwrap_or(text_width_px(text, *size_px)),
                height: known.height.unwrap_or(text_line_height_px(*size_px)),
            },
            Some(NodeCtx::Container) | None => taffy::geometry::Size::ZERO,
        },
    )?;

    fn collect<'v>(
        v: &'v View,
        node: NodeId,
        t: &TaffyTree<NodeCtx>,
        origin: (f32, f32),
    ) -> UiResult<LayoutNode<'v>> {
        let l = t.layout(node)?;
        let rect = Rect {
            x: origin.0 + l.location.x,
            y: origin.1 + l.location.y,
            w: l.size.width,
            h: l.size.height,
        };
        let kids = t.children(node)?;
        let children = v
            .children
            .iter()
            .zip(kids)
            .map(|(cv, cn)| collect(cv, cn, t, (rect.x, rect.y)))
            .collect::<UiResult<Vec<_>>>()?;
        Ok(LayoutNode {
            view: v,
            rect,
            children,
        })
    }

    collect(root, root_node, &taffy, (0.0, 0.0))
}

fn text_look(style: &TextStyle) -> TextLook {
    TextLook {
        size_px: sp_to_px(style.font_size),
        color: style.color,
    }
}

/// Targets for every shared node in `root`, in pre-order.
pub fn shared_targets(root: &LayoutNode<'_>) -> Vec<SharedTarget> {
    let mut out = Vec::new();
    root.walk(&mut |n| {
        if let Some(shared) = &n.view.modifier.shared {
            let look = match (&n.view.kind, shared.kind) {
                (ViewKind::Text { style, .. }, SharedKind::Bounds) => Some(text_look(style)),
                _ => None,
            };
            out.push(SharedTarget {
                key: shared.key.clone(),
                rect: n.rect,
                look,
                spec: shared.spec,
            });
        }
    });
    out
}

struct PaintCtx<'a> {
    transitions: &'a SharedTransitions,
    textfield_states: &'a HashMap<ViewId, TextFieldState>,
    scene: Scene,
    inputs: Vec<InputRegion>,
    semantics: Vec<SemNode>,
    shared: Vec<SharedBounds>,
    seen_keys: HashMap<String, usize>,
}

fn paint_node(node: &LayoutNode<'_>, delta: Vec2, cx: &mut PaintCtx<'_>) {
    let v = node.view;
    let mut rect = node.rect.translate(delta.x, delta.y);
    let mut look = None;
    let mut child_delta = delta;

    if let Some(shared) = &v.modifier.shared {
        *cx.seen_keys.entry(shared.key.clone()).or_default() += 1;
        if let Some(anim) = cx.transitions.get(&shared.key) {
            rect = anim.rect;
            look = anim.look;
            child_delta = Vec2 {
                x: rect.x - node.rect.x,
                y: rect.y - node.rect.y,
            };
        }
        cx.shared.push(SharedBounds {
            key: shared.key.clone(),
            rect,
            target: node.rect,
        });
    }

    if let Some(bg) = v.modifier.background {
        cx.scene.nodes.push(SceneNode::Rect {
            rect,
            color: bg,
            radius: dp_to_px(v.modifier.background_radius),
        });
    }
    if let Some(b) = &v.modifier.border {
        cx.scene.nodes.push(SceneNode::Border {
            rect,
            color: b.color,
            width: dp_to_px(b.width),
            radius: dp_to_px(b.radius),
        });
    }

    match &v.kind {
        ViewKind::Text { text, style } => {
            let look = look.unwrap_or_else(|| text_look(style));
            cx.scene.nodes.push(SceneNode::Text {
                rect,
                text: text.clone(),
                color: look.color,
                size: look.size_px,
            });
        }
        ViewKind::TextInput {
            state_key,
            value,
            display,
            style,
            focused,
            on_change,
            on_focus_change,
        } => {
            if !display.is_empty() {
                cx.scene.nodes.push(SceneNode::Text {
                    rect,
                    text: display.clone(),
                    color: style.color,
                    size: sp_to_px(style.font_size),
                });
            }
            if *focused {
                let size_px = sp_to_px(style.font_size);
                let n = caret_chars(cx.textfield_states.get(state_key), value, display);
                let before: String = display.chars().take(n).collect();
                let caret_x = (rect.x + text_width_px(&before, size_px)).min(rect.x + rect.w);
                cx.scene.nodes.push(SceneNode::Rect {
                    rect: Rect {
                        x: caret_x,
                        y: rect.y,
                        w: dp_to_px(CARET_WIDTH_DP),
                        h: text_line_height_px(size_px),
                    },
                    color: theme().focus,
                    radius: 0.0,
                });
            }
            cx.inputs.push(InputRegion {
                state_key: *state_key,
                rect,
                value: value.clone(),
                focused: *focused,
                on_change: on_change.clone(),
                on_focus_change: on_focus_change.clone(),
            });
        }
        ViewKind::Box | ViewKind::Row | ViewKind::Column => {}
    }

    if let Some(sem) = &v.semantics {
        let id = match &v.kind {
            ViewKind::TextInput { state_key, .. } => *state_key,
            _ => v.id,
        };
        cx.semantics.push(SemNode {
            id,
            role: sem.role,
            label: sem.label.clone(),
            rect,
            focused: sem.focused,
            enabled: sem.enabled,
        });
    }

    for c in &node.children {
        paint_node(c, child_delta, cx);
    }
}

/// Paint a laid-out tree, drawing shared nodes at their animated bounds and
/// carets where the host's editing state puts them.
pub fn paint(
    root: &LayoutNode<'_>,
    transitions: &SharedTransitions,
    textfield_states: &HashMap<ViewId, TextFieldState>,
) -> Painted {
    let mut cx = PaintCtx {
        transitions,
        textfield_states,
        scene: Scene {
            clear_color: theme().background,
            nodes: Vec::new(),
        },
        inputs: Vec::new(),
        semantics: Vec::new(),
        shared: Vec::new(),
        seen_keys: HashMap::new(),
    };
    paint_node(root, Vec2::default(), &mut cx);
    for (key, n) in &cx.seen_keys {
        if *n > 1 {
            log::warn!("shared key '{key}' used by {n} nodes in one frame");
        }
    }
    Painted {
        scene: cx.scene,
        inputs: cx.inputs,
        semantics_nodes: cx.semantics,
        shared: cx.shared,
    }
}

/// One frame: advance running transitions by `dt` seconds, lay out, register
/// the new shared targets, and paint.
pub fn layout_and_paint(
    root: &View,
    size_px: (u32, u32),
    transitions: &mut SharedTransitions,
    textfield_states: &HashMap<ViewId, TextFieldState>,
    dt: f32,
) -> UiResult<Painted> {
    transitions.step(dt);
    let laid_out = layout(root, size_px)?;
    transitions.update(&shared_targets(&laid_out));
    let painted = paint(&laid_out, transitions, textfield_states);
    log::trace!(
        "painted {} scene nodes, {} shared, animating={}",
        painted.scene.nodes.len(),
        painted.shared.len(),
        transitions.is_animating()
    );
    Ok(painted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Box, Column, Row, Text, TextStyleExt, ViewExt};

    fn paint_once(root: &View, st: &mut SharedTransitions) -> Painted {
        layout_and_paint(root, (400, 300), st, &HashMap::new(), 1.0 / 60.0).unwrap()
    }

    fn caret_x(p: &Painted) -> f32 {
        p.scene
            .nodes
            .iter()
            .find_map(|n| match n {
                SceneNode::Rect { rect, color, .. } if *color == theme().focus => Some(rect.x),
                _ => None,
            })
            .expect("caret")
    }

    fn focused_input(value: &str, display: &str) -> View {
        let input = View::new(
            9,
            ViewKind::TextInput {
                state_key: 9,
                value: value.into(),
                display: display.into(),
                style: TextStyle::default().font_size(10.0),
                focused: true,
                on_change: None,
                on_focus_change: None,
            },
        );
        Column(Modifier::new()).child(input)
    }

    #[test]
    fn text_is_measured_from_char_count() {
        assert_eq!(text_width_px("abcd", 10.0), 24.0);
        assert!((text_line_height_px(10.0) - 13.0).abs() < 1e-4);
        let root = Column(Modifier::new()).child(Text("abcd").text_style(TextStyle::default().font_size(10.0)));
        let laid = layout(&root, (400, 300)).unwrap();
        let t = &laid.children[0];
        assert!((t.rect.h - 13.0).abs() < 1e-3);
    }

    #[test]
    fn column_stacks_and_box_overlaps() {
        let root = Column(Modifier::new()).child((
            Box(Modifier::new().height(20.0)),
            Box(Modifier::new()).child((Text("a"), Text("bb"))),
        ));
        let laid = layout(&root, (400, 300)).unwrap();
        let boxed = &laid.children[1];
        assert!((boxed.rect.y - 20.0).abs() < 1e-3);
        assert_eq!(boxed.children[0].rect.y, boxed.children[1].rect.y);
        assert_eq!(boxed.children[0].rect.x, boxed.children[1].rect.x);
    }

    #[test]
    fn row_places_letters_left_to_right() {
        let root = Row(Modifier::new()).child((Text("a"), Text("b"), Text("c")));
        let laid = layout(&root, (400, 300)).unwrap();
        let xs: Vec<f32> = laid.children.iter().map(|c| c.rect.x).collect();
        assert!(xs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn shared_node_and_children_follow_animated_bounds() {
        let mut st = SharedTransitions::new();
        let build = |gap: f32| {
            Column(Modifier::new()).child((
                Box(Modifier::new().height(gap)),
                Box(Modifier::new().shared_element("s/input")).child(Text("x")),
            ))
        };
        paint_once(&build(0.0), &mut st);
        let p = paint_once(&build(40.0), &mut st);
        let b = p.shared.iter().find(|s| s.key == "s/input").unwrap();
        assert!((b.target.y - 40.0).abs() < 1e-3);
        assert!(b.rect.y.abs() < 1e-3);
        let (text_rect, _) = p.scene.texts().next().unwrap();
        assert!(text_rect.y.abs() < 1e-3);

        for _ in 0..120 {
            paint_once(&build(40.0), &mut st);
        }
        let p = paint_once(&build(40.0), &mut st);
        let (text_rect, _) = p.scene.texts().next().unwrap();
        assert!((text_rect.y - 40.0).abs() < 0.05);
    }

    #[test]
    fn focused_input_paints_caret_and_reports_region() {
        let input = View::new(
            9,
            ViewKind::TextInput {
                state_key: 9,
                value: "ab".into(),
                display: "••".into(),
                style: TextStyle::default(),
                focused: true,
                on_change: None,
                on_focus_change: None,
            },
        )
        .semantics(Semantics::new(Role::TextField).label("pw"));
        let root = Column(Modifier::new()).child(input);
        let p = paint_once(&root, &mut SharedTransitions::new());
        assert_eq!(p.inputs.len(), 1);
        assert_eq!(p.inputs[0].value, "ab");
        assert_eq!(p.scene.texts().map(|(_, t)| t).collect::<Vec<_>>(), vec!["••"]);
        assert!(p.scene.nodes.iter().any(|n| matches!(
            n,
            SceneNode::Rect { color, .. } if *color == theme().focus
        )));
        assert_eq!(p.semantics_nodes[0].id, 9);
        assert_eq!(p.semantics_nodes[0].label.as_deref(), Some("pw"));
    }

    #[test]
    fn caret_follows_editing_state() {
        let root = focused_input("abc", "•••");
        let laid = layout(&root, (400, 300)).unwrap();
        let x0 = laid.children[0].rect.x;

        let p = paint(&laid, &SharedTransitions::new(), &HashMap::new());
        assert!((caret_x(&p) - x0 - 18.0).abs() < 1e-3);

        let mut st = TextFieldState::with_text("abc");
        st.move_cursor(-2, false);
        let states = HashMap::from([(9, st)]);
        let p = paint(&laid, &SharedTransitions::new(), &states);
        assert!((caret_x(&p) - x0 - 6.0).abs() < 1e-3);

        // Stale state for another value falls back to the end.
        let states = HashMap::from([(9, TextFieldState::new())]);
        let p = paint(&laid, &SharedTransitions::new(), &states);
        assert!((caret_x(&p) - x0 - 18.0).abs() < 1e-3);
    }

    #[test]
    fn min_width_and_padding_are_in_dp() {
        let root = Column(Modifier::new().align_items(AlignItems::FlexStart)).child(
            Box(Modifier::new().min_width(300.0).padding_symmetric(10.0, 8.0)).child(Text("a")),
        );
        let laid = with_density(Density { scale: 2.0 }, || layout(&root, (1000, 600))).unwrap();
        let b = &laid.children[0];
        assert!((b.rect.w - 600.0).abs() < 1e-3);
        assert!((b.children[0].rect.x - 20.0).abs() < 1e-3);
        assert!((b.children[0].rect.y - 16.0).abs() < 1e-3);
    }
}

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::rc::Rc;

use login_core::*;
use taffy::prelude::{
    AvailableSpace, Display, FlexDirection, NodeId, Position, Style, TaffyTree, auto, length,
    percent,
};

use crate::Interactions;
use crate::icons::paint_icon;
use crate::textfield::{TF_PADDING_X_DP, TextFieldState, display_text};

/// Rough advance of one character as a fraction of the font size.
const APPROX_ADVANCE: f32 = 0.6;

#[derive(Clone)]
enum NodeCtx {
    Text { chars: usize, size_px: f32, bold: bool },
    Button { chars: usize, size_px: f32 },
    Icon,
    Container,
}

fn approx_text_width(chars: usize, size_px: f32, bold: bool) -> f32 {
    let k = if bold { APPROX_ADVANCE * 1.05 } else { APPROX_ADVANCE };
    chars as f32 * size_px * k
}

/// `in_row` is the parent's main axis; fill along it grows, across it stretches.
fn style_from_modifier(m: &Modifier, kind: &ViewKind, in_row: bool) -> Style {
    let px = dp_to_px;
    let mut s = Style {
        display: Display::Flex,
        ..Default::default()
    };

    let is_row = matches!(kind, ViewKind::Row | ViewKind::TextField { .. });
    let is_column = matches!(kind, ViewKind::Column | ViewKind::Surface);
    let is_container = is_row || is_column || matches!(kind, ViewKind::Box);

    if is_row {
        s.flex_direction = FlexDirection::Row;
    }
    if is_column {
        s.flex_direction = FlexDirection::Column;
    }

    s.align_items = Some(if is_container {
        AlignItems::Stretch
    } else {
        AlignItems::FlexStart
    });
    s.justify_content = Some(JustifyContent::FlexStart);

    // trailing slot: pinned to the end, vertically centered
    if let ViewKind::TextField { .. } = kind {
        s.justify_content = Some(JustifyContent::FlexEnd);
        s.align_items = Some(AlignItems::Center);
        s.padding.right = length(px(4.0));
    }

    if let Some(j) = m.justify_content {
        s.justify_content = Some(j);
    }
    if let Some(a) = m.align_items_container {
        s.align_items = Some(a);
    }
    if let Some(g) = m.flex_grow {
        s.flex_grow = g;
    }
    if let Some(a) = m.align_self {
        s.align_self = Some(a);
    }

    if let Some(PositionType::Absolute) = m.position_type {
        s.position = Position::Absolute;
        s.inset = taffy::geometry::Rect {
            left: m.offset_left.map(|v| length(px(v))).unwrap_or_else(auto),
            right: m.offset_right.map(|v| length(px(v))).unwrap_or_else(auto),
            top: m.offset_top.map(|v| length(px(v))).unwrap_or_else(auto),
            bottom: m.offset_bottom.map(|v| length(px(v))).unwrap_or_else(auto),
        };
    }

    if let Some(pv) = m.padding_values {
        s.padding = taffy::geometry::Rect {
            left: length(px(pv.left)),
            right: length(px(pv.right)),
            top: length(px(pv.top)),
            bottom: length(px(pv.bottom)),
        };
    } else if let Some(p) = m.padding {
        let v = length(px(p));
        s.padding = taffy::geometry::Rect {
            left: v,
            right: v,
            top: v,
            bottom: v,
        };
    }

    // Explicit size wins over fill
    let mut width_set = false;
    let mut height_set = false;
    if let Some(sz) = m.size {
        s.size.width = length(px(sz.width.max(0.0)));
        s.size.height = length(px(sz.height.max(0.0)));
        width_set = true;
        height_set = true;
    }
    if let Some(w) = m.width {
        s.size.width = length(px(w.max(0.0)));
        width_set = true;
    }
    if let Some(h) = m.height {
        s.size.height = length(px(h.max(0.0)));
        height_set = true;
    }

    let want_fill_w = m.fill_max || m.fill_max_w;
    let want_fill_h = m.fill_max || m.fill_max_h;

    // Main axis fill -> weight (flex: 1 1 0%), cross axis fill -> 100%
    if in_row {
        if want_fill_w && !width_set {
            s.flex_grow = s.flex_grow.max(1.0);
            s.flex_shrink = s.flex_shrink.max(1.0);
            s.flex_basis = length(0.0);
            s.min_size.width = length(0.0);
        }
        if want_fill_h && !height_set {
            s.min_size.height = percent(1.0);
            s.max_size.height = percent(1.0);
        }
    } else {
        if want_fill_h && !height_set {
            s.flex_grow = s.flex_grow.max(1.0);
            s.flex_shrink = s.flex_shrink.max(1.0);
            s.flex_basis = length(0.0);
            s.min_size.height = length(0.0);
        }
        if want_fill_w && !width_set {
            s.min_size.width = percent(1.0);
            s.max_size.width = percent(1.0);
        }
    }

    if let ViewKind::TextField { .. } = kind {
        if !height_set {
            s.size.height = length(px(36.0));
        }
        if !width_set && !want_fill_w {
            s.size.width = length(px(220.0));
        }
    }

    s
}

fn build_node(
    v: &View,
    t: &mut TaffyTree<NodeCtx>,
    nodes_map: &mut HashMap<ViewId, NodeId>,
    in_row: bool,
) -> Result<NodeId, LayoutError> {
    let style = style_from_modifier(&v.modifier, &v.kind, in_row);
    // Box keeps taffy's default row direction
    let row_parent = style.flex_direction == FlexDirection::Row;

    let node = match &v.kind {
        ViewKind::Text {
            text,
            font_size,
            weight,
            ..
        } => t.new_leaf_with_context(
            style,
            NodeCtx::Text {
                chars: text.chars().count(),
                size_px: sp_to_px(*font_size),
                bold: weight.0 >= FontWeight::SEMIBOLD.0,
            },
        )?,
        ViewKind::Button {
            text, font_size, ..
        } => t.new_leaf_with_context(
            style,
            NodeCtx::Button {
                chars: text.chars().count(),
                size_px: sp_to_px(*font_size),
            },
        )?,
        ViewKind::Icon { .. } => t.new_leaf_with_context(style, NodeCtx::Icon)?,
        _ => {
            let children = v
                .children
                .iter()
                .map(|c| build_node(c, t, nodes_map, row_parent))
                .collect::<Result<Vec<_>, _>>()?;
            let n = t.new_with_children(style, &children)?;
            t.set_node_context(n, Some(NodeCtx::Container))?;
            n
        }
    };

    nodes_map.insert(v.id, node);
    Ok(node)
}

fn stamp(mut v: View, id: &mut u64) -> View {
    v.id = *id;
    *id += 1;
    v.children = v.children.into_iter().map(|c| stamp(c, id)).collect();
    v
}

/// Lays out `root` in a window of `size_px` physical pixels and paints it.
///
/// View ids are assigned depth-first starting at 1, so they stay stable while
/// the tree shape does. Text field editing state is looked up by state key
/// (or view id) in `textfield_states` and synchronized to the field's value.
pub fn layout_and_paint(
    root: &View,
    size_px: (u32, u32),
    textfield_states: &HashMap<u64, Rc<RefCell<TextFieldState>>>,
    interactions: &Interactions,
    focused: Option<u64>,
) -> Result<(Scene, Vec<HitRegion>, Vec<SemNode>), LayoutError> {
    let mut next_id = 1u64;
    let root = stamp(root.clone(), &mut next_id);

    let mut taffy: TaffyTree<NodeCtx> = TaffyTree::new();
    let mut nodes_map = HashMap::new();
    let root_node = build_node(&root, &mut taffy, &mut nodes_map, false)?;

    let mut rs = taffy.style(root_node)?.clone();
    rs.size.width = length(size_px.0 as f32);
    rs.size.height = length(size_px.1 as f32);
    taffy.set_style(root_node, rs)?;

    let available = taffy::geometry::Size {
        width: AvailableSpace::Definite(size_px.0 as f32),
        height: AvailableSpace::Definite(size_px.1 as f32),
    };

    taffy.compute_layout_with_measure(root_node, available, |known, _avail, _node, ctx, _style| {
        match ctx {
            Some(NodeCtx::Text {
                chars,
                size_px,
                bold,
            }) => taffy::geometry::Size {
                width: known
                    .width
                    .unwrap_or(approx_text_width(*chars, *size_px, *bold)),
                height: known.height.unwrap_or(*size_px * 1.3),
            },
            Some(NodeCtx::Button { chars, size_px }) => taffy::geometry::Size {
                width: known
                    .width
                    .unwrap_or(approx_text_width(*chars, *size_px, false) + dp_to_px(32.0)),
                height: known.height.unwrap_or(dp_to_px(36.0)),
            },
            Some(NodeCtx::Icon) => taffy::geometry::Size {
                width: known.width.unwrap_or(dp_to_px(24.0)),
                height: known.height.unwrap_or(dp_to_px(24.0)),
            },
            Some(NodeCtx::Container) | None => taffy::geometry::Size::ZERO,
        }
    })?;

    let mut painter = Painter {
        tree: &taffy,
        nodes: &nodes_map,
        scene: Scene {
            clear_color: theme().background,
            nodes: vec![],
        },
        hits: vec![],
        sems: vec![],
        textfield_states,
        interactions,
        focused,
    };
    painter.walk(&root, (0.0, 0.0), 1.0)?;

    let Painter {
        scene,
        mut hits,
        sems,
        ..
    } = painter;

    // Low z first; equal z keeps paint order. Topmost is found from the back.
    hits.sort_by(|a, b| a.z_index.partial_cmp(&b.z_index).unwrap_or(Ordering::Equal));

    Ok((scene, hits, sems))
}

struct Painter<'a> {
    tree: &'a TaffyTree<NodeCtx>,
    nodes: &'a HashMap<ViewId, NodeId>,
    scene: Scene,
    hits: Vec<HitRegion>,
    sems: Vec<SemNode>,
    textfield_states: &'a HashMap<u64, Rc<RefCell<TextFieldState>>>,
    interactions: &'a Interactions,
    focused: Option<u64>,
}

impl Painter<'_> {
    fn rect_of(&self, v: &View, offset: (f32, f32)) -> Result<Rect, LayoutError> {
        let node = self
            .nodes
            .get(&v.id)
            .copied()
            .ok_or(LayoutError::MissingNode(v.id))?;
        let l = self.tree.layout(node)?;
        Ok(Rect {
            x: offset.0 + l.location.x,
            y: offset.1 + l.location.y,
            w: l.size.width,
            h: l.size.height,
        })
    }

    fn focus_ring(&mut self, v: &View, rect: Rect, alpha: f32) {
        self.scene.nodes.push(SceneNode::Border {
            rect,
            color: theme().focus.mul_alpha(alpha),
            width: dp_to_px(2.0),
            radius: v.modifier.clip_rounded.map(dp_to_px).unwrap_or(0.0),
        });
    }

    fn walk(&mut self, v: &View, offset: (f32, f32), alpha: f32) -> Result<(), LayoutError> {
        let rect = self.rect_of(v, offset)?;
        let m = &v.modifier;
        let is_focused = self.focused == Some(v.id);
        let radius = m.clip_rounded.map(dp_to_px).unwrap_or(0.0);
        let alpha = (alpha * m.alpha.unwrap_or(1.0)).clamp(0.0, 1.0);

        let content_rect = if let Some(pv) = m.padding_values {
            Rect {
                x: rect.x + dp_to_px(pv.left),
                y: rect.y + dp_to_px(pv.top),
                w: (rect.w - dp_to_px(pv.left) - dp_to_px(pv.right)).max(0.0),
                h: (rect.h - dp_to_px(pv.top) - dp_to_px(pv.bottom)).max(0.0),
            }
        } else if let Some(p) = m.padding {
            rect.inset(dp_to_px(p), dp_to_px(p))
        } else {
            rect
        };

        if let Some(bg) = m.background {
            self.scene.nodes.push(SceneNode::Rect {
                rect,
                color: bg.mul_alpha(alpha),
                radius,
            });
        }
        if let Some(b) = &m.border {
            self.scene.nodes.push(SceneNode::Border {
                rect,
                color: b.color.mul_alpha(alpha),
                width: dp_to_px(b.width),
                radius: dp_to_px(b.radius).max(radius),
            });
        }

        if let Some(on_click) = &m.on_click {
            let mut hit = HitRegion::new(v.id, rect);
            hit.on_click = Some(on_click.clone());
            hit.focusable = true;
            hit.z_index = m.z_index;
            self.hits.push(hit);
            if is_focused {
                self.focus_ring(v, rect, alpha);
            }
        }

        if let Some(sem) = &m.semantics {
            self.sems.push(SemNode {
                id: v.id,
                role: sem.role,
                label: sem.label.clone(),
                rect,
                focused: is_focused,
                enabled: sem.enabled,
            });
        }

        match &v.kind {
            ViewKind::Text {
                text,
                color,
                font_size,
                weight,
            } => {
                let size = sp_to_px(*font_size);
                let line_h = size * 1.3;
                let dy = ((content_rect.h - line_h) * 0.5).max(0.0);
                self.scene.nodes.push(SceneNode::Text {
                    rect: Rect {
                        x: content_rect.x,
                        y: content_rect.y + dy,
                        w: content_rect.w,
                        h: line_h,
                    },
                    text: text.clone(),
                    color: color.mul_alpha(alpha),
                    size,
                    weight: *weight,
                });
                if m.semantics.is_none() {
                    self.sems.push(SemNode {
                        id: v.id,
                        role: Role::Text,
                        label: Some(text.clone()),
                        rect,
                        focused: is_focused,
                        enabled: true,
                    });
                }
            }

            ViewKind::Button {
                text,
                on_click,
                enabled,
                colors,
                font_size,
            } => {
                let (container, content) = colors.resolve(*enabled);
                let radius = m.clip_rounded.map(dp_to_px).unwrap_or(dp_to_px(4.0));
                self.scene.nodes.push(SceneNode::Rect {
                    rect,
                    color: container.mul_alpha(alpha),
                    radius,
                });
                if *enabled {
                    let overlay = if self.interactions.pressed.contains(&v.id) {
                        0.12
                    } else if self.interactions.hover == Some(v.id) {
                        0.06
                    } else {
                        0.0
                    };
                    if overlay > 0.0 {
                        self.scene.nodes.push(SceneNode::Rect {
                            rect,
                            color: Color::BLACK.copy_alpha(overlay * alpha),
                            radius,
                        });
                    }
                }

                let size = sp_to_px(*font_size);
                let label_w = approx_text_width(text.chars().count(), size, true);
                let line_h = size * 1.3;
                self.scene.nodes.push(SceneNode::Text {
                    rect: Rect {
                        x: rect.x + ((rect.w - label_w) * 0.5).max(0.0),
                        y: rect.y + ((rect.h - line_h) * 0.5).max(0.0),
                        w: label_w,
                        h: line_h,
                    },
                    text: text.clone(),
                    color: content.mul_alpha(alpha),
                    size,
                    weight: FontWeight::SEMIBOLD,
                });

                if *enabled && let Some(cb) = on_click {
                    let mut hit = HitRegion::new(v.id, rect);
                    hit.on_click = Some(cb.clone());
                    hit.focusable = true;
                    hit.z_index = m.z_index;
                    self.hits.push(hit);
                }
                let label = v
                    .semantics
                    .as_ref()
                    .and_then(|s| s.label.clone())
                    .unwrap_or_else(|| text.clone());
                self.sems.push(SemNode {
                    id: v.id,
                    role: Role::Button,
                    label: Some(label),
                    rect,
                    focused: is_focused,
                    enabled: *enabled,
                });
                if is_focused && *enabled {
                    self.focus_ring(v, rect, alpha);
                }
            }

            ViewKind::TextField {
                state_key,
                value,
                hint,
                text_size,
                text_color,
                on_change,
                on_submit,
                visual,
                keyboard,
            } => {
                let tf_key = if *state_key != 0 { *state_key } else { v.id };

                let mut hit = HitRegion::new(v.id, rect);
                hit.focusable = true;
                hit.z_index = m.z_index;
                hit.on_text_change = on_change.clone();
                hit.on_text_submit = on_submit.clone();
                hit.tf_state_key = Some(tf_key);
                hit.keyboard = *keyboard;
                self.hits.push(hit);

                if is_focused {
                    self.focus_ring(v, rect, alpha);
                }

                let font_px = sp_to_px(*text_size);
                let line_h = font_px * 1.3;
                let pad_x = dp_to_px(TF_PADDING_X_DP);
                // the editable line ends where the trailing slot begins
                let mut right = rect.x + rect.w - pad_x;
                for c in &v.children {
                    right = right.min(self.rect_of(c, (rect.x, rect.y))?.x);
                }
                let inner = Rect {
                    x: rect.x + pad_x,
                    y: rect.y + ((rect.h - line_h) * 0.5).max(0.0),
                    w: (right - rect.x - pad_x).max(0.0),
                    h: line_h.min(rect.h),
                };
                self.scene.nodes.push(SceneNode::PushClip {
                    rect: inner,
                    radius: 0.0,
                });

                let th = theme();
                let hint_color = th.on_surface_variant.mul_alpha(alpha);
                let state_rc = self
                    .textfield_states
                    .get(&tf_key)
                    .or_else(|| self.textfield_states.get(&v.id));

                if let Some(state_rc) = state_rc {
                    {
                        let mut st = state_rc.borrow_mut();
                        st.sync_value(value);
                        st.visual = *visual;
                        st.font_px = font_px;
                        st.inner_x = inner.x;
                        st.set_inner_width(inner.w);
                        if is_focused {
                            let metrics = st.display_metrics();
                            let caret_x = st.x_for_index(&metrics, st.caret_index());
                            st.ensure_caret_visible(caret_x, inner.w);
                        }
                    }

                    let st = state_rc.borrow();
                    let shown = st.display_text();
                    let metrics = st.display_metrics();

                    let sel = st.selection_range();
                    if sel.start != sel.end {
                        let sx = st.x_for_index(&metrics, sel.start) - st.scroll_offset;
                        let ex = st.x_for_index(&metrics, sel.end) - st.scroll_offset;
                        self.scene.nodes.push(SceneNode::Rect {
                            rect: Rect {
                                x: inner.x + sx,
                                y: inner.y,
                                w: (ex - sx).max(0.0),
                                h: inner.h,
                            },
                            color: th.selection.mul_alpha(alpha),
                            radius: 0.0,
                        });
                    }

                    if let Some(range) = &st.composition
                        && range.start < range.end
                    {
                        let sx = st.x_for_index(&metrics, range.start) - st.scroll_offset;
                        let ex = st.x_for_index(&metrics, range.end) - st.scroll_offset;
                        self.scene.nodes.push(SceneNode::Rect {
                            rect: Rect {
                                x: inner.x + sx,
                                y: inner.y + inner.h - dp_to_px(1.0),
                                w: (ex - sx).max(0.0),
                                h: dp_to_px(1.0),
                            },
                            color: th.focus.mul_alpha(alpha),
                            radius: 0.0,
                        });
                    }

                    let (text, color) = if shown.is_empty() {
                        (hint.clone(), hint_color)
                    } else {
                        (shown, text_color.mul_alpha(alpha))
                    };
                    self.scene.nodes.push(SceneNode::Text {
                        rect: Rect {
                            x: inner.x - st.scroll_offset,
                            ..inner
                        },
                        text,
                        color,
                        size: font_px,
                        weight: FontWeight::NORMAL,
                    });

                    if is_focused && sel.start == sel.end && st.caret_visible() {
                        let cx = st.x_for_index(&metrics, st.caret_index()) - st.scroll_offset;
                        self.scene.nodes.push(SceneNode::Rect {
                            rect: Rect {
                                x: inner.x + cx.max(0.0),
                                y: inner.y,
                                w: dp_to_px(1.0),
                                h: inner.h,
                            },
                            color: th.focus.mul_alpha(alpha),
                            radius: 0.0,
                        });
                    }
                } else {
                    if is_focused {
                        log::debug!("text field {tf_key} focused before its editing state exists");
                    }
                    let shown = display_text(*visual, value);
                    let (text, color) = if shown.is_empty() {
                        (hint.clone(), hint_color)
                    } else {
                        (shown, text_color.mul_alpha(alpha))
                    };
                    self.scene.nodes.push(SceneNode::Text {
                        rect: inner,
                        text,
                        color,
                        size: font_px,
                        weight: FontWeight::NORMAL,
                    });
                }
                self.scene.nodes.push(SceneNode::PopClip);

                // Never announce the content; a masked value would leak.
                self.sems.push(SemNode {
                    id: v.id,
                    role: Role::TextField,
                    label: Some(hint.clone()),
                    rect,
                    focused: is_focused,
                    enabled: true,
                });
            }

            ViewKind::Icon { icon, tint } => {
                paint_icon(&mut self.scene, *icon, content_rect, tint.mul_alpha(alpha));
                if let Some(sem) = &v.semantics
                    && m.semantics.is_none()
                {
                    self.sems.push(SemNode {
                        id: v.id,
                        role: sem.role,
                        label: sem.label.clone(),
                        rect,
                        focused: false,
                        enabled: true,
                    });
                }
            }

            ViewKind::Surface | ViewKind::Box | ViewKind::Row | ViewKind::Column => {}
        }

        let clip = m.clip_rounded.is_some() && !v.children.is_empty();
        if clip {
            self.scene.nodes.push(SceneNode::PushClip { rect, radius });
        }
        for c in &v.children {
            self.walk(c, (rect.x, rect.y), alpha)?;
        }
        if clip {
            self.scene.nodes.push(SceneNode::PopClip);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;

    fn run(root: View) -> (Scene, Vec<HitRegion>, Vec<SemNode>) {
        layout_and_paint(
            &root,
            (400, 800),
            &HashMap::new(),
            &Interactions::default(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn ids_are_depth_first() {
        let root = Column(Modifier::new()).child((
            Text("a"),
            Row(Modifier::new()).child(Text("b")),
            Text("c"),
        ));
        let (_, _, sems) = run(root);
        let ids: Vec<_> = sems
            .iter()
            .map(|s| (s.label.clone().unwrap_or_default(), s.id))
            .collect();
        assert_eq!(
            ids,
            vec![("a".into(), 2), ("b".into(), 4), ("c".into(), 5)]
        );
    }

    #[test]
    fn fill_max_width_child_spans_column() {
        let root = Column(Modifier::new().fill_max_size().padding(20.0)).child(
            Box(Modifier::new().fill_max_width().height(50.0).background(Color::BLACK)),
        );
        let (scene, _, _) = run(root);
        let rect = scene
            .nodes
            .iter()
            .find_map(|n| match n {
                SceneNode::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .unwrap();
        assert_eq!((rect.x, rect.y, rect.w, rect.h), (20.0, 20.0, 360.0, 50.0));
    }

    #[test]
    fn disabled_button_has_no_hit_region() {
        let root = Column(Modifier::new()).child((
            Button("Go", || {}).enabled(false),
            Button("Ok", || {}),
        ));
        let (_, hits, sems) = run(root);
        assert_eq!(hits.len(), 1);
        let go = sems.iter().find(|s| s.label.as_deref() == Some("Go")).unwrap();
        let ok = sems.iter().find(|s| s.label.as_deref() == Some("Ok")).unwrap();
        assert!(!go.enabled);
        assert!(ok.enabled);
        assert_eq!(hits[0].id, ok.id);
    }

    #[test]
    fn password_value_is_masked_without_state() {
        let root = TextField("hunter2", "Password", Modifier::new(), |_| {})
            .visual_transformation(VisualTransformation::Password);
        let (scene, hits, sems) = run(root);
        let texts: Vec<_> = scene
            .nodes
            .iter()
            .filter_map(|n| match n {
                SceneNode::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec!["•••••••"]);
        assert_eq!(sems[0].label.as_deref(), Some("Password"));
        assert_eq!(hits[0].tf_state_key, Some(hits[0].id));
    }

    #[test]
    fn state_follows_controlled_value() {
        let st = Rc::new(RefCell::new(TextFieldState::with_text("old")));
        let mut states = HashMap::new();
        states.insert(7u64, st.clone());
        let root = TextField("new@mail.com", "Email", Modifier::new(), |_| {})
            .state_key(7)
            .keyboard_type(KeyboardType::Email);
        let (_, hits, _) = layout_and_paint(
            &root,
            (400, 800),
            &states,
            &Interactions::default(),
            None,
        )
        .unwrap();
        assert_eq!(st.borrow().text, "new@mail.com");
        assert_eq!(hits[0].keyboard, KeyboardType::Email);
        assert_eq!(hits[0].tf_state_key, Some(7));
    }

    #[test]
    fn trailing_slot_sits_at_field_end_and_wins_hits() {
        let root = Column(Modifier::new().fill_max_size()).child(
            TextField("", "Password", Modifier::new().fill_max_width().height(50.0), |_| {})
                .trailing(IconButton(
                    Icon(IconKind::Visibility, "Shown", Color::GRAY, Modifier::new().size(24.0, 24.0)),
                    || {},
                )),
        );
        let (_, hits, _) = run(root);
        assert_eq!(hits.len(), 2);
        let field = hits.iter().find(|h| h.is_text_field()).unwrap();
        let button = hits.iter().find(|h| !h.is_text_field()).unwrap();
        assert!(button.rect.x + button.rect.w <= field.rect.x + field.rect.w);
        assert!(button.rect.x > field.rect.x + field.rect.w / 2.0);
        let p = button.rect.center();
        let top = hits.iter().rev().find(|h| h.rect.contains(p)).unwrap();
        assert_eq!(top.id, button.id);
    }

    #[test]
    fn focused_field_without_state_still_paints_value() {
        let root = TextField("a@b.com", "Email", Modifier::new(), |_| {});
        let (scene, hits, _) = layout_and_paint(
            &root,
            (400, 800),
            &HashMap::new(),
            &Interactions::default(),
            Some(1),
        )
        .unwrap();
        assert_eq!(hits[0].id, 1);
        assert!(scene
            .nodes
            .iter()
            .any(|n| matches!(n, SceneNode::Text { text, .. } if text == "a@b.com")));
    }

    fn first_rect(scene: &Scene) -> Rect {
        scene
            .nodes
            .iter()
            .find_map(|n| match n {
                SceneNode::Rect { rect, .. } => Some(*rect),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn align_self_center_overrides_stretch() {
        let root = Column(Modifier::new().fill_max_size().padding_vertical(10.0)).child(
            Box(Modifier::new()
                .width(100.0)
                .height(20.0)
                .align_self_center()
                .background(Color::BLACK)),
        );
        let (scene, _, _) = run(root);
        let r = first_rect(&scene);
        assert_eq!((r.x, r.y, r.w, r.h), (150.0, 10.0, 100.0, 20.0));
    }

    #[test]
    fn fill_max_height_in_row_takes_cross_axis() {
        let root = Row(Modifier::new().padding_values(PaddingValues {
            left: 5.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
        }))
        .child(Box(Modifier::new()
            .width(30.0)
            .fill_max_height()
            .background(Color::BLACK)));
        let (scene, _, _) = run(root);
        let r = first_rect(&scene);
        assert_eq!((r.x, r.y, r.w, r.h), (5.0, 0.0, 30.0, 800.0));
    }

    #[test]
    fn raised_overlay_wins_hit_test() {
        let root = Box(Modifier::new().fill_max_size()).child((
            Box(Modifier::new()
                .size(100.0, 100.0)
                .absolute()
                .offset(Some(0.0), Some(0.0), None, None)
                .z_index(2.0)
                .on_click(|| {})),
            Box(Modifier::new().size(100.0, 100.0).on_click(|| {})),
        ));
        let (scene, hits, sems) = run(root);
        let frame = Frame {
            scene,
            hit_regions: hits,
            semantics_nodes: sems,
            focus_chain: Vec::new(),
        };
        let top = frame.hit_at(Vec2 { x: 50.0, y: 50.0 }).unwrap();
        assert_eq!(top.id, 2);
    }
}
